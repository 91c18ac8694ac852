use crate::theme::Theme;
use crate::ui::markup;
use eframe::egui::{self, RichText, ScrollArea, TextEdit, Ui};

#[derive(Debug, Clone, Copy)]
pub enum RefineAction {
    Refine,
    SaveToLibrary,
    OpenScheduleModal,
}

pub fn show(
    ui: &mut Ui,
    theme: &Theme,
    raw_input: &mut String,
    refined_topic: &mut String,
    refined_content: &str,
    is_refining: bool,
) -> Option<RefineAction> {
    let mut action = None;

    ui.label(RichText::new("Refine Your Content").strong().size(22.0));
    ui.label(
        RichText::new("Paste your raw text, add a title, and let the AI polish it for you.")
            .color(theme.text_muted),
    );
    ui.add_space(theme.spacing_8);

    ui.columns(2, |columns| {
        let column_height = columns[0].available_height() - 20.0;

        columns[0].group(|ui| {
            ui.label(RichText::new("Your Raw Content").strong());
            ui.add(
                TextEdit::singleline(refined_topic)
                    .desired_width(f32::INFINITY)
                    .hint_text("Enter your blog title here..."),
            );
            ui.add(
                TextEdit::multiline(raw_input)
                    .desired_width(f32::INFINITY)
                    .desired_rows(14)
                    .hint_text("Paste your raw blog text here..."),
            );
            let label = if is_refining { "Refining..." } else { "Refine with AI" };
            if ui
                .add_enabled(
                    !is_refining && !raw_input.trim().is_empty(),
                    egui::Button::new(label),
                )
                .clicked()
            {
                action = Some(RefineAction::Refine);
            }
        });

        columns[1].group(|ui| {
            ui.label(RichText::new("Polished Result").strong());
            ScrollArea::vertical()
                .id_salt("refine_output")
                .max_height(column_height - 80.0)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if is_refining {
                        ui.vertical_centered(|ui| ui.add(egui::Spinner::new()));
                    } else if refined_content.is_empty() {
                        ui.add_space(40.0);
                        ui.vertical_centered(|ui| {
                            ui.label(
                                RichText::new("Your refined blog will appear here.")
                                    .color(theme.text_muted),
                            );
                        });
                    } else {
                        markup::show_text(ui, refined_content);
                    }
                });

            if !refined_content.is_empty() && !is_refining {
                ui.horizontal(|ui| {
                    if ui.button("Save to Library").clicked() {
                        action = Some(RefineAction::SaveToLibrary);
                    }
                    if ui.button("Schedule Post").clicked() {
                        action = Some(RefineAction::OpenScheduleModal);
                    }
                });
            }
        });
    });

    action
}

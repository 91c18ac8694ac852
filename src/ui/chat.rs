use crate::history::{Author, ChatMessage};
use crate::theme::Theme;
use crate::ui::markup;
use eframe::egui::{self, Align, Key, Layout, RichText, ScrollArea, TextEdit, Ui};

#[derive(Debug, Clone)]
pub enum ChatAction {
    Send,
    SaveGenerated(String),
}

/// The last AI message qualifies for saving once it looks like a rendered
/// blog (contains a heading) and no request is in flight.
pub(crate) fn save_offer(chat_log: &[ChatMessage], is_loading: bool) -> Option<&ChatMessage> {
    if is_loading {
        return None;
    }
    let last = chat_log.last()?;
    (last.author == Author::Ai && last.text.contains("# ")).then_some(last)
}

pub fn show(
    ui: &mut Ui,
    theme: &Theme,
    chat_log: &[ChatMessage],
    question: &mut String,
    is_loading: bool,
    scroll_to_bottom: &mut bool,
) -> Option<ChatAction> {
    let mut action = None;

    let transcript_height = (ui.available_height() - 150.0).max(120.0);
    ScrollArea::vertical()
        .id_salt("chat_transcript")
        .max_height(transcript_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if chat_log.is_empty() && !is_loading {
                ui.add_space(60.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("Welcome to BlogBot").strong().size(26.0));
                    ui.label(
                        RichText::new("Your AI-powered content creation assistant.")
                            .color(theme.text_muted),
                    );
                });
            }

            for message in chat_log {
                let (align, fill) = if message.author == Author::User {
                    (Align::Max, theme.surface_3)
                } else {
                    (Align::Min, theme.surface_2)
                };
                ui.with_layout(Layout::top_down(align), |ui| {
                    theme.panel_frame(fill, 12).show(ui, |ui| {
                        ui.set_max_width(ui.available_width() * 0.8);
                        markup::show_text(ui, &message.text);
                    });
                });
                ui.add_space(theme.spacing_8);
            }

            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new());
                });
            }

            if let Some(message) = save_offer(chat_log, is_loading) {
                ui.vertical_centered(|ui| {
                    if ui.button("Save to Saved Blogs").clicked() {
                        action = Some(ChatAction::SaveGenerated(message.text.clone()));
                    }
                });
            }

            if *scroll_to_bottom {
                ui.scroll_to_cursor(Some(Align::BOTTOM));
            }
        });
    *scroll_to_bottom = false;

    ui.add_space(theme.spacing_8);
    theme.composer_frame().show(ui, |ui| {
        let hint = if is_loading {
            "Waiting for response..."
        } else {
            "Ask a follow-up or start a new topic..."
        };

        let mut send_now = false;
        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                !is_loading,
                TextEdit::multiline(question)
                    .desired_rows(2)
                    .desired_width(ui.available_width() - 70.0)
                    .hint_text(hint),
            );
            if response.has_focus()
                && ui.input(|i| i.key_pressed(Key::Enter) && !i.modifiers.shift)
            {
                send_now = true;
            }

            let clicked = ui
                .add_enabled(
                    !is_loading && !question.trim().is_empty(),
                    egui::Button::new("Send"),
                )
                .clicked();
            send_now |= clicked;
        });
        ui.label(
            RichText::new("Press Enter to send, Shift+Enter for new line")
                .small()
                .color(theme.text_muted),
        );

        if send_now && !is_loading && !question.trim().is_empty() {
            action = Some(ChatAction::Send);
        }
    });

    action
}

#[cfg(test)]
mod tests {
    use super::save_offer;
    use crate::history::ChatMessage;

    #[test]
    fn offered_for_final_ai_message_with_heading() {
        let log = vec![
            ChatMessage::user("Write about cats"),
            ChatMessage::ai("# Cats\nAll about cats."),
        ];
        let offer = save_offer(&log, false).expect("should offer save");
        assert!(offer.text.starts_with("# Cats"));
    }

    #[test]
    fn not_offered_while_loading() {
        let log = vec![ChatMessage::ai("# Cats")];
        assert!(save_offer(&log, true).is_none());
    }

    #[test]
    fn not_offered_for_user_message_or_plain_reply() {
        assert!(save_offer(&[ChatMessage::user("# heading?")], false).is_none());
        assert!(save_offer(&[ChatMessage::ai("no heading here")], false).is_none());
    }

    #[test]
    fn not_offered_for_empty_log() {
        assert!(save_offer(&[], false).is_none());
    }
}

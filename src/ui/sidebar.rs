use crate::history::ChatHistoryEntry;
use crate::theme::Theme;
use eframe::egui::{self, Context, RichText, ScrollArea};

const RECENT_CHAT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy)]
pub enum SidebarAction {
    NewChat,
    ShowSchedule,
    ShowSaved,
    ShowRefine,
    OpenChat(i64),
    DeleteChat(i64),
    ClearChats,
}

pub fn show(
    ctx: &Context,
    theme: &Theme,
    chat_history: &[ChatHistoryEntry],
    active_chat_id: Option<i64>,
) -> Option<SidebarAction> {
    let mut action = None;

    egui::SidePanel::left("sidebar")
        .resizable(true)
        .default_width(250.0)
        .show(ctx, |ui| {
            ui.label(RichText::new("BlogBot").strong().size(18.0));
            ui.label(RichText::new("AI Content Creator").small().color(theme.text_muted));
            ui.separator();

            if ui.button("New Chat").clicked() {
                action = Some(SidebarAction::NewChat);
            }
            if ui.button("View Schedule").clicked() {
                action = Some(SidebarAction::ShowSchedule);
            }
            if ui.button("Saved Blogs").clicked() {
                action = Some(SidebarAction::ShowSaved);
            }
            if ui.button("Refine Content").clicked() {
                action = Some(SidebarAction::ShowRefine);
            }

            ui.separator();
            ui.label(
                RichText::new("RECENT CHATS")
                    .small()
                    .color(theme.text_muted),
            );

            if chat_history.is_empty() {
                ui.label(RichText::new("No chats yet.").color(theme.text_muted));
                return;
            }

            ScrollArea::vertical().id_salt("recent_chats").show(ui, |ui| {
                for entry in chat_history.iter().take(RECENT_CHAT_LIMIT) {
                    ui.horizontal(|ui| {
                        let selected = active_chat_id == Some(entry.id);
                        if ui
                            .selectable_label(selected, truncate_title(&entry.title))
                            .clicked()
                        {
                            action = Some(SidebarAction::OpenChat(entry.id));
                        }
                        if ui.small_button("✕").clicked() {
                            action = Some(SidebarAction::DeleteChat(entry.id));
                        }
                    });
                }
            });

            if ui
                .button(RichText::new("Clear all chats").small())
                .clicked()
            {
                action = Some(SidebarAction::ClearChats);
            }
        });

    action
}

fn truncate_title(title: &str) -> String {
    const MAX: usize = 28;
    if title.chars().count() <= MAX {
        title.to_string()
    } else {
        let short: String = title.chars().take(MAX).collect();
        format!("{short}…")
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_title;

    #[test]
    fn short_titles_pass_through() {
        assert_eq!(truncate_title("Write about cats"), "Write about cats");
    }

    #[test]
    fn long_titles_are_ellipsized() {
        let long = "a".repeat(40);
        let shown = truncate_title(&long);
        assert!(shown.ends_with('…'));
        assert_eq!(shown.chars().count(), 29);
    }
}

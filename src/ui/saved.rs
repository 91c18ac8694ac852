use crate::api::{Blog, BlogSource};
use crate::theme::Theme;
use eframe::egui::{self, RichText, ScrollArea, TextEdit, Ui};

#[derive(Debug, Clone)]
pub enum SavedAction {
    OpenEditor(Blog),
    Delete(Blog),
}

pub fn filter_blogs<'a>(blogs: &'a [Blog], search: &str) -> Vec<&'a Blog> {
    let needle = search.to_lowercase();
    blogs
        .iter()
        .filter(|blog| !blog.topic.is_empty() && blog.topic.to_lowercase().contains(&needle))
        .collect()
}

fn format_saved_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn show(
    ui: &mut Ui,
    theme: &Theme,
    blogs: &[Blog],
    search: &mut String,
) -> Option<SavedAction> {
    let mut action = None;

    ui.label(RichText::new("Saved Blogs").strong().size(22.0));
    ui.label(
        RichText::new("Browse, edit, and manage your saved content.").color(theme.text_muted),
    );
    ui.add_space(theme.spacing_8);
    ui.add(
        TextEdit::singleline(search)
            .desired_width(f32::INFINITY)
            .hint_text("Search saved blogs by title..."),
    );
    ui.add_space(theme.spacing_8);

    let filtered = filter_blogs(blogs, search);
    ScrollArea::vertical()
        .id_salt("saved_list")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if filtered.is_empty() {
                ui.add_space(40.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("No Saved Blogs Found").strong().size(16.0));
                    ui.label(
                        RichText::new(
                            "Your saved blogs will appear here once you save them from a chat.",
                        )
                        .color(theme.text_muted),
                    );
                });
                return;
            }

            for blog in filtered {
                theme.card_frame().show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(&blog.topic).strong().size(16.0));
                            if let Some(created_at) = &blog.created_at {
                                ui.label(
                                    RichText::new(format!(
                                        "Saved on: {}",
                                        format_saved_date(created_at)
                                    ))
                                    .small()
                                    .color(theme.text_muted),
                                );
                            }
                        });
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui.button("Delete").clicked() {
                                    action = Some(SavedAction::Delete(blog.clone()));
                                }
                                if ui.button("Edit").clicked() {
                                    let mut opened = blog.clone();
                                    opened.source = BlogSource::Saved;
                                    action = Some(SavedAction::OpenEditor(opened));
                                }
                            },
                        );
                    });
                });
                ui.add_space(theme.spacing_8);
            }
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_matches_topic_substring() {
        let blogs = vec![
            Blog {
                id: "1".to_string(),
                topic: "Rustic Venues".to_string(),
                ..Blog::default()
            },
            Blog {
                id: "2".to_string(),
                topic: "City Halls".to_string(),
                ..Blog::default()
            },
        ];
        let hits = filter_blogs(&blogs, "rustic");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
    }

    #[test]
    fn rfc3339_dates_render_as_day() {
        assert_eq!(format_saved_date("2026-08-30T12:00:00Z"), "2026-08-30");
    }
}

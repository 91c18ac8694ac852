use crate::api::{Blog, BlogSource, BlogStatus};
use crate::theme::Theme;
use eframe::egui::{self, Color32, ComboBox, RichText, ScrollArea, TextEdit, Ui};

#[derive(Debug, Clone)]
pub enum ScheduleAction {
    OpenModal,
    ClearAll,
    OpenEditor(Blog),
    SaveToLibrary(String),
    Delete(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Scheduled,
    Completed,
    Failed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Scheduled,
        StatusFilter::Completed,
        StatusFilter::Failed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Status",
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    fn matches(self, status: BlogStatus) -> bool {
        match self {
            Self::All => true,
            Self::Scheduled => status == BlogStatus::Scheduled,
            Self::Completed => status == BlogStatus::Completed,
            Self::Failed => status == BlogStatus::Failed,
        }
    }
}

/// Case-insensitive topic search plus status filter. Blogs without a topic
/// are dropped, as the server occasionally returns placeholder rows.
pub fn filter_blogs<'a>(blogs: &'a [Blog], search: &str, filter: StatusFilter) -> Vec<&'a Blog> {
    let needle = search.to_lowercase();
    blogs
        .iter()
        .filter(|blog| {
            !blog.topic.is_empty()
                && blog.topic.to_lowercase().contains(&needle)
                && filter.matches(blog.status)
        })
        .collect()
}

/// Render a server timestamp for display; unparseable values pass through.
pub(crate) fn format_schedule_time(raw: &str) -> String {
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(parsed) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

fn status_color(theme: &Theme, status: BlogStatus) -> Color32 {
    match status {
        BlogStatus::Scheduled => theme.warning,
        BlogStatus::Completed => theme.success,
        BlogStatus::Failed => theme.danger,
    }
}

pub fn show(
    ui: &mut Ui,
    theme: &Theme,
    blogs: &[Blog],
    search: &mut String,
    filter: &mut StatusFilter,
) -> Option<ScheduleAction> {
    let mut action = None;
    let filtered = filter_blogs(blogs, search, *filter);

    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.label(RichText::new("Content Schedule").strong().size(22.0));
            ui.label(
                RichText::new("Manage your scheduled and completed blog posts")
                    .color(theme.text_muted),
            );
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if !filtered.is_empty() && ui.button("Clear All").clicked() {
                action = Some(ScheduleAction::ClearAll);
            }
            if ui.button("Schedule New").clicked() {
                action = Some(ScheduleAction::OpenModal);
            }
        });
    });
    ui.add_space(theme.spacing_8);

    ui.horizontal(|ui| {
        ui.add(
            TextEdit::singleline(search)
                .desired_width(240.0)
                .hint_text("Search blogs..."),
        );
        ComboBox::from_id_salt("status_filter")
            .selected_text(filter.label())
            .show_ui(ui, |ui| {
                for option in StatusFilter::ALL {
                    ui.selectable_value(filter, option, option.label());
                }
            });
        ui.label(
            RichText::new(format!(
                "{} {}",
                filtered.len(),
                if filtered.len() == 1 { "blog" } else { "blogs" }
            ))
            .color(theme.text_muted),
        );
    });
    ui.add_space(theme.spacing_8);

    ScrollArea::vertical()
        .id_salt("schedule_list")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if filtered.is_empty() {
                ui.add_space(40.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("No Scheduled Blogs Found").strong().size(16.0));
                    ui.label(
                        RichText::new("Try adjusting your filters or schedule a new post.")
                            .color(theme.text_muted),
                    );
                });
                return;
            }

            for blog in filtered {
                theme.card_frame().show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            if blog.status == BlogStatus::Completed {
                                if ui
                                    .link(RichText::new(&blog.topic).strong().size(16.0))
                                    .clicked()
                                {
                                    let mut opened = blog.clone();
                                    opened.source = BlogSource::Schedule;
                                    action = Some(ScheduleAction::OpenEditor(opened));
                                }
                            } else {
                                ui.label(RichText::new(&blog.topic).strong().size(16.0));
                            }

                            if let Some(time) = &blog.scheduled_time {
                                ui.label(
                                    RichText::new(format!(
                                        "Scheduled: {}",
                                        format_schedule_time(time)
                                    ))
                                    .small()
                                    .color(theme.text_muted),
                                );
                            }
                            ui.label(
                                RichText::new(blog.status.label())
                                    .small()
                                    .color(status_color(theme, blog.status)),
                            );
                            if blog.status == BlogStatus::Failed {
                                if let Some(error) = &blog.error {
                                    ui.label(
                                        RichText::new(format!("Error: {error}"))
                                            .small()
                                            .color(theme.danger),
                                    );
                                }
                            }
                        });

                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui.button("Delete").clicked() {
                                    action = Some(ScheduleAction::Delete(blog.id.clone()));
                                }
                                if blog.status == BlogStatus::Completed {
                                    if blog.is_saved.unwrap_or(false) {
                                        ui.label(RichText::new("Saved").color(theme.success));
                                    } else if ui.button("Save to Library").clicked() {
                                        action =
                                            Some(ScheduleAction::SaveToLibrary(blog.id.clone()));
                                    }
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

    fn blog(topic: &str, status: BlogStatus) -> Blog {
        Blog {
            id: topic.to_string(),
            topic: topic.to_string(),
            status,
            ..Blog::default()
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let blogs = vec![
            blog("Summer Weddings", BlogStatus::Scheduled),
            blog("Corporate Events", BlogStatus::Scheduled),
        ];
        let hits = filter_blogs(&blogs, "wedding", StatusFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].topic, "Summer Weddings");
    }

    #[test]
    fn status_filter_narrows_results() {
        let blogs = vec![
            blog("a", BlogStatus::Scheduled),
            blog("b", BlogStatus::Completed),
            blog("c", BlogStatus::Failed),
        ];
        let hits = filter_blogs(&blogs, "", StatusFilter::Completed);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].topic, "b");
    }

    #[test]
    fn topicless_blogs_are_dropped() {
        let blogs = vec![blog("", BlogStatus::Scheduled)];
        assert!(filter_blogs(&blogs, "", StatusFilter::All).is_empty());
    }

    #[test]
    fn datetime_local_values_are_reformatted() {
        assert_eq!(format_schedule_time("2026-09-01T10:30"), "2026-09-01 10:30");
    }

    #[test]
    fn unparseable_times_pass_through() {
        assert_eq!(format_schedule_time("soon"), "soon");
    }
}

use crate::api::{Blog, BlogSource};
use crate::theme::Theme;
use crate::ui::markup;
use eframe::egui::{RichText, ScrollArea, TextEdit, TextStyle, Ui};
use std::time::{Duration, Instant};

const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Back,
    CopyMarkdown,
    CopyHtml,
    Download,
    AttachImage,
    Save,
    SaveToLibrary,
    Delete,
}

/// Editing state for the blog currently open in the editor. A fresh copy of
/// the blog is resolved from the matching cache when the editor opens.
pub struct EditorState {
    pub blog: Blog,
    pub is_editing: bool,
    pub edited_content: String,
    pub edited_image: Option<String>,
    pub image_path: String,
    pub copied_at: Option<Instant>,
}

impl EditorState {
    pub fn new(blog: Blog) -> Self {
        let edited_content = blog.content.clone().unwrap_or_default();
        let edited_image = blog.title_image.clone();
        Self {
            blog,
            is_editing: false,
            edited_content,
            edited_image,
            image_path: String::new(),
            copied_at: None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.blog.source == BlogSource::Saved
    }

    pub fn word_count(&self) -> usize {
        self.edited_content.split_whitespace().count()
    }

    pub fn read_minutes(&self) -> usize {
        self.word_count().div_ceil(200)
    }

    /// The text that copy and download act on: the stored content, falling
    /// back to the edit buffer for never-saved drafts.
    pub fn export_content(&self) -> &str {
        match self.blog.content.as_deref() {
            Some(content) if !content.is_empty() => content,
            _ => &self.edited_content,
        }
    }

    pub fn download_file_name(&self) -> String {
        let mut name: String = self
            .blog
            .topic
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() {
                    ch.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        if name.is_empty() {
            name = "blog".to_string();
        }
        format!("{name}.md")
    }
}

pub fn show(ui: &mut Ui, theme: &Theme, state: &mut EditorState) -> Option<EditorAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if ui.button("← Back").clicked() {
            action = Some(EditorAction::Back);
        }
        ui.vertical(|ui| {
            ui.label(RichText::new(&state.blog.topic).strong().size(20.0));
            ui.label(
                RichText::new(format!(
                    "{} words • {} min read",
                    state.word_count(),
                    state.read_minutes()
                ))
                .small()
                .color(theme.text_muted),
            );
        });
    });
    ui.add_space(theme.spacing_8);

    ui.horizontal_wrapped(|ui| {
        let copied = state
            .copied_at
            .is_some_and(|at| at.elapsed() < COPIED_FEEDBACK);
        if ui.button(if copied { "Copied!" } else { "Copy" }).clicked() {
            action = Some(EditorAction::CopyMarkdown);
        }
        if ui.button("Copy HTML").clicked() {
            action = Some(EditorAction::CopyHtml);
        }
        if ui.button("Download").clicked() {
            action = Some(EditorAction::Download);
        }

        if !state.is_read_only() {
            let edit_label = if state.is_editing { "Cancel" } else { "Edit" };
            if ui.button(edit_label).clicked() {
                state.is_editing = !state.is_editing;
            }
            if ui.button("Save").clicked() {
                action = Some(EditorAction::Save);
            }
            if state.blog.source != BlogSource::Saved && ui.button("Save to Library").clicked() {
                action = Some(EditorAction::SaveToLibrary);
            }
            if ui.button("Delete").clicked() {
                action = Some(EditorAction::Delete);
            }
        }
    });

    if !state.is_read_only() && state.is_editing {
        ui.horizontal(|ui| {
            ui.add(
                TextEdit::singleline(&mut state.image_path)
                    .desired_width(280.0)
                    .hint_text("Path to a title image..."),
            );
            if ui.button("Attach Image").clicked() {
                action = Some(EditorAction::AttachImage);
            }
            if state.edited_image.is_some() {
                ui.label(RichText::new("image attached").small().color(theme.success));
            }
        });
    }
    ui.add_space(theme.spacing_8);

    ScrollArea::vertical()
        .id_salt("editor_content")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if state.is_editing && !state.is_read_only() {
                ui.add(
                    TextEdit::multiline(&mut state.edited_content)
                        .desired_width(f32::INFINITY)
                        .desired_rows(24)
                        .font(TextStyle::Monospace)
                        .hint_text("Write your blog content here..."),
                );
            } else {
                theme.card_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    markup::show_text(ui, state.blog.content.as_deref().unwrap_or(""));
                });
            }
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_content(topic: &str, content: &str) -> EditorState {
        EditorState::new(Blog {
            id: "1".to_string(),
            topic: topic.to_string(),
            content: Some(content.to_string()),
            ..Blog::default()
        })
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        let state = state_with_content("t", "  one   two\nthree  ");
        assert_eq!(state.word_count(), 3);
    }

    #[test]
    fn read_time_rounds_up() {
        let body = vec!["word"; 201].join(" ");
        let state = state_with_content("t", &body);
        assert_eq!(state.read_minutes(), 2);
    }

    #[test]
    fn download_name_sanitizes_topic() {
        let state = state_with_content("Top 10: Venues & More!", "x");
        assert_eq!(state.download_file_name(), "top_10__venues___more_.md");
    }

    #[test]
    fn saved_source_blogs_are_read_only() {
        let mut blog = Blog {
            id: "1".to_string(),
            ..Blog::default()
        };
        blog.source = BlogSource::Saved;
        assert!(EditorState::new(blog).is_read_only());
    }

    #[test]
    fn export_prefers_stored_content_over_edits() {
        let mut state = state_with_content("t", "stored");
        state.edited_content = "draft".to_string();
        assert_eq!(state.export_content(), "stored");
    }
}

use crate::theme::Theme;
use eframe::egui::{self, Align2, ComboBox, Context, RichText, TextEdit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    General,
    Wedding,
    Corporate,
    Birthday,
    Seasonal,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::General,
        Category::Wedding,
        Category::Corporate,
        Category::Birthday,
        Category::Seasonal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Wedding => "wedding",
            Self::Corporate => "corporate",
            Self::Birthday => "birthday",
            Self::Seasonal => "seasonal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Wedding => "Wedding",
            Self::Corporate => "Corporate",
            Self::Birthday => "Birthday",
            Self::Seasonal => "Seasonal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ModalAction {
    Submit,
    AttachImage,
    Close,
}

/// Controlled inputs for the schedule form. Reset each time the modal opens.
#[derive(Debug, Default)]
pub struct ScheduleModalState {
    pub open: bool,
    pub topic: String,
    pub time: String,
    pub image_path: String,
    pub image: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub validation: Option<String>,
}

impl ScheduleModalState {
    pub fn open_with(&mut self, initial_topic: &str) {
        self.topic = initial_topic.to_string();
        self.time.clear();
        self.image_path.clear();
        self.image = None;
        self.category = Category::default();
        self.priority = Priority::default();
        self.validation = None;
        self.open = true;
    }

    /// Both topic and time are required before anything goes on the wire.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.topic.trim().is_empty() || self.time.trim().is_empty() {
            return Err("Please provide a topic and select a time.");
        }
        Ok(())
    }
}

pub fn show(ctx: &Context, theme: &Theme, state: &mut ScheduleModalState) -> Option<ModalAction> {
    if !state.open {
        return None;
    }
    let mut action = None;

    egui::Window::new("Schedule Blog Post")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(380.0);

            ui.label(RichText::new("Blog Topic *").strong());
            ui.add(
                TextEdit::singleline(&mut state.topic)
                    .desired_width(f32::INFINITY)
                    .hint_text("Enter an engaging blog topic..."),
            );

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new("Category").strong());
                    ComboBox::from_id_salt("schedule_category")
                        .selected_text(state.category.label())
                        .show_ui(ui, |ui| {
                            for option in Category::ALL {
                                ui.selectable_value(&mut state.category, option, option.label());
                            }
                        });
                });
                ui.vertical(|ui| {
                    ui.label(RichText::new("Priority").strong());
                    ComboBox::from_id_salt("schedule_priority")
                        .selected_text(state.priority.label())
                        .show_ui(ui, |ui| {
                            for option in Priority::ALL {
                                ui.selectable_value(&mut state.priority, option, option.label());
                            }
                        });
                });
            });

            ui.label(RichText::new("Schedule Time *").strong());
            ui.add(
                TextEdit::singleline(&mut state.time)
                    .desired_width(f32::INFINITY)
                    .hint_text("YYYY-MM-DDTHH:MM"),
            );

            ui.label(RichText::new("Title Image (Optional)").strong());
            ui.horizontal(|ui| {
                ui.add(
                    TextEdit::singleline(&mut state.image_path)
                        .desired_width(240.0)
                        .hint_text("Path to an image file..."),
                );
                if ui.button("Attach").clicked() {
                    action = Some(ModalAction::AttachImage);
                }
                if state.image.is_some() {
                    ui.label(RichText::new("attached").small().color(theme.success));
                }
            });

            if let Some(validation) = &state.validation {
                ui.label(RichText::new(validation).color(theme.danger));
            }

            ui.add_space(theme.spacing_8);
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    action = Some(ModalAction::Close);
                }
                if ui.button("Schedule Post").clicked() {
                    match state.validate() {
                        Ok(()) => action = Some(ModalAction::Submit),
                        Err(message) => state.validation = Some(message.to_string()),
                    }
                }
            });
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_topic_is_rejected_locally() {
        let mut state = ScheduleModalState::default();
        state.open_with("");
        state.time = "2026-09-01T10:00".to_string();
        assert!(state.validate().is_err());
    }

    #[test]
    fn missing_time_is_rejected_locally() {
        let mut state = ScheduleModalState::default();
        state.open_with("Cats");
        assert!(state.validate().is_err());
    }

    #[test]
    fn topic_and_time_together_pass() {
        let mut state = ScheduleModalState::default();
        state.open_with("Cats");
        state.time = "2026-09-01T10:00".to_string();
        assert!(state.validate().is_ok());
    }

    #[test]
    fn reopening_resets_previous_inputs() {
        let mut state = ScheduleModalState::default();
        state.open_with("Old topic");
        state.time = "2026-09-01T10:00".to_string();
        state.image = Some("data:image/png;base64,xyz".to_string());
        state.priority = Priority::High;

        state.open_with("New topic");
        assert_eq!(state.topic, "New topic");
        assert!(state.time.is_empty());
        assert!(state.image.is_none());
        assert_eq!(state.priority, Priority::Medium);
    }
}

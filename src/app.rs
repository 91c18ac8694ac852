use crate::api::{ApiClient, Blog, BlogSource, GenerationTarget, HistoryItem, ScheduleRequest};
use crate::event::{AppEvent, MutationKind};
use crate::format;
use crate::history::{self, store, Author, ChatHistoryEntry, ChatMessage};
use crate::theme::Theme;
use crate::ui::chat::{self, ChatAction};
use crate::ui::editor::{self, EditorAction, EditorState};
use crate::ui::load_image_data_uri;
use crate::ui::modal::{self, ModalAction, ScheduleModalState};
use crate::ui::refine::{self, RefineAction};
use crate::ui::saved::{self, SavedAction};
use crate::ui::schedule::{self, ScheduleAction, StatusFilter};
use crate::ui::sidebar::{self, SidebarAction};
use eframe::egui::{self, RichText};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

const REFINE_PROMPT_PREFIX: &str = "Please refine the following raw text into a well-structured and engaging blog post. Use markdown for formatting: use '# ' for the main title, '## ' for subheadings, '**text**' for bolding important keywords, and '__text__' for underlining key phrases. Make the content more readable and professional. Do not add any introductory or concluding text. Raw text is below:\n\n---\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chat,
    Schedule,
    Saved,
    Refine,
    Editor,
}

/// Whether the schedule modal creates a post to be generated server-side or
/// wraps already-refined content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SchedulingMode {
    #[default]
    Generate,
    PreWritten,
}

enum PendingConfirm {
    DeleteBlog {
        id: String,
        topic: String,
        back_to: Option<View>,
    },
    ClearScheduled,
}

fn follow_up_view(kind: MutationKind) -> Option<View> {
    match kind {
        MutationKind::Update {
            source: BlogSource::Saved,
        } => Some(View::Saved),
        MutationKind::Update {
            source: BlogSource::Schedule,
        } => Some(View::Schedule),
        MutationKind::SaveToLibrary | MutationKind::Schedule => Some(View::Schedule),
        MutationKind::SaveRefined => Some(View::Chat),
        MutationKind::Delete | MutationKind::SaveGenerated | MutationKind::ClearScheduled => None,
    }
}

fn source_view(source: BlogSource) -> View {
    match source {
        BlogSource::Saved => View::Saved,
        BlogSource::Schedule => View::Schedule,
    }
}

pub struct BlogBotApp {
    rx: Receiver<AppEvent>,
    api: ApiClient,
    theme: Theme,
    alive: Arc<AtomicBool>,
    view: View,

    // chat
    question: String,
    chat_log: Vec<ChatMessage>,
    is_loading: bool,
    chat_history: Vec<ChatHistoryEntry>,
    active_chat_id: Option<i64>,
    scroll_to_bottom: bool,

    // read-through caches of the remote collections
    saved_blogs: Vec<Blog>,
    scheduled_blogs: Vec<Blog>,

    // banners
    error: Option<String>,
    notice: Option<String>,

    // schedule + saved views
    search_term: String,
    filter_status: StatusFilter,

    // refine view
    raw_input: String,
    refined_topic: String,
    refined_content: String,
    is_refining: bool,

    scheduling_mode: SchedulingMode,
    schedule_modal: ScheduleModalState,
    editor: Option<EditorState>,
    confirm: Option<PendingConfirm>,
}

impl BlogBotApp {
    pub fn new(rx: Receiver<AppEvent>, api: ApiClient) -> Self {
        let (chat_history, warning) = store::load();
        if let Some(warning) = warning {
            tracing::warn!("chat history load: {warning}");
        }

        let alive = Arc::new(AtomicBool::new(true));
        api.fetch_saved();
        api.fetch_scheduled();
        api.spawn_schedule_poller(Arc::clone(&alive));

        Self {
            rx,
            api,
            theme: Theme::default(),
            alive,
            view: View::Chat,
            question: String::new(),
            chat_log: Vec::new(),
            is_loading: false,
            chat_history,
            active_chat_id: None,
            scroll_to_bottom: false,
            saved_blogs: Vec::new(),
            scheduled_blogs: Vec::new(),
            error: None,
            notice: None,
            search_term: String::new(),
            filter_status: StatusFilter::default(),
            raw_input: String::new(),
            refined_topic: String::new(),
            refined_content: String::new(),
            is_refining: false,
            scheduling_mode: SchedulingMode::default(),
            schedule_modal: ScheduleModalState::default(),
            editor: None,
            confirm: None,
        }
    }

    fn persist_history(&self) {
        if let Err(err) = store::save(&self.chat_history) {
            tracing::warn!("failed to persist chat history: {err}");
        }
    }

    fn set_view(&mut self, view: View) {
        if view != View::Editor {
            self.editor = None;
        }
        self.view = view;
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ChatReply(text) => {
                self.chat_log.push(ChatMessage::ai(text));
                let id = history::record_exchange(
                    &mut self.chat_history,
                    self.active_chat_id,
                    &self.chat_log,
                );
                self.active_chat_id = Some(id);
                self.persist_history();
                self.is_loading = false;
                self.scroll_to_bottom = true;
            }
            AppEvent::ChatFailed(message) => {
                // The user message stays in the log; nothing is rolled back.
                self.error = Some(format!("An error occurred: {message}"));
                self.is_loading = false;
            }
            AppEvent::RefineReply(text) => {
                self.refined_content = text;
                self.is_refining = false;
            }
            AppEvent::RefineFailed(message) => {
                self.error = Some(format!("Refinement failed: {message}"));
                self.is_refining = false;
            }
            AppEvent::SavedFetched(blogs) => self.saved_blogs = blogs,
            AppEvent::ScheduledFetched(blogs) => self.scheduled_blogs = blogs,
            AppEvent::FetchFailed { what, message } => {
                tracing::warn!("could not fetch {what}: {message}");
            }
            AppEvent::MutationDone(kind) => {
                // Reconcile the caches with server truth after every mutation.
                self.api.fetch_saved();
                self.api.fetch_scheduled();
                if matches!(
                    kind,
                    MutationKind::SaveRefined | MutationKind::SaveGenerated
                ) {
                    self.notice = Some("Blog saved successfully!".to_string());
                }
                if let Some(view) = follow_up_view(kind) {
                    self.set_view(view);
                }
            }
            AppEvent::MutationFailed(message) => self.error = Some(message),
        }
    }

    fn send_chat(&mut self) {
        let question = self.question.trim().to_string();
        if question.is_empty() {
            return;
        }
        self.chat_log.push(ChatMessage::user(question));
        self.question.clear();
        self.is_loading = true;
        self.scroll_to_bottom = true;

        let history_items: Vec<HistoryItem> = self.chat_log.iter().map(HistoryItem::from).collect();
        self.api.generate(history_items, GenerationTarget::Chat);
    }

    fn refine_submit(&mut self) {
        if self.raw_input.trim().is_empty() {
            self.error = Some("Please paste content to refine.".to_string());
            return;
        }
        self.is_refining = true;
        self.refined_content.clear();
        self.error = None;

        let prompt = format!("{REFINE_PROMPT_PREFIX}{}", self.raw_input);
        self.api.generate(
            vec![HistoryItem {
                author: Author::User,
                text: prompt,
            }],
            GenerationTarget::Refine,
        );
    }

    fn save_refined(&mut self) {
        if self.refined_topic.trim().is_empty() || self.refined_content.trim().is_empty() {
            self.error =
                Some("Please provide a title and refine content before saving.".to_string());
            return;
        }
        self.api
            .save_refined(self.refined_topic.clone(), self.refined_content.clone());
    }

    fn start_new_chat(&mut self) {
        self.set_view(View::Chat);
        self.active_chat_id = None;
        self.chat_log.clear();
    }

    fn load_chat(&mut self, id: i64) {
        if let Some(entry) = self.chat_history.iter().find(|entry| entry.id == id) {
            let log = entry.log.clone();
            self.set_view(View::Chat);
            self.active_chat_id = Some(id);
            self.chat_log = log;
            self.scroll_to_bottom = true;
        }
    }

    fn delete_chat(&mut self, id: i64) {
        self.chat_history.retain(|entry| entry.id != id);
        self.persist_history();
        if self.active_chat_id == Some(id) {
            self.start_new_chat();
        }
    }

    /// Resolve the freshest copy of the blog from the matching cache before
    /// handing it to the editor.
    fn open_editor(&mut self, blog: Blog) {
        let source = blog.source;
        let cache = match source {
            BlogSource::Saved => &self.saved_blogs,
            BlogSource::Schedule => &self.scheduled_blogs,
        };
        let mut fresh = cache
            .iter()
            .find(|candidate| candidate.id == blog.id)
            .cloned()
            .unwrap_or(blog);
        fresh.source = source;
        self.editor = Some(EditorState::new(fresh));
        self.view = View::Editor;
    }

    fn submit_schedule(&mut self) {
        let modal = &self.schedule_modal;
        let (topic, content) = match self.scheduling_mode {
            SchedulingMode::Generate => (modal.topic.trim().to_string(), None),
            SchedulingMode::PreWritten => (
                self.refined_topic.clone(),
                Some(self.refined_content.clone()),
            ),
        };
        let request = ScheduleRequest {
            topic,
            scheduled_time: modal.time.trim().to_string(),
            title_image: modal.image.clone(),
            category: modal.category.as_str().to_string(),
            priority: modal.priority.as_str().to_string(),
            content,
        };
        self.schedule_modal.open = false;
        self.api.schedule_blog(request);
    }

    fn handle_sidebar_action(&mut self, action: SidebarAction) {
        match action {
            SidebarAction::NewChat => self.start_new_chat(),
            SidebarAction::ShowSchedule => self.set_view(View::Schedule),
            SidebarAction::ShowSaved => self.set_view(View::Saved),
            SidebarAction::ShowRefine => self.set_view(View::Refine),
            SidebarAction::OpenChat(id) => self.load_chat(id),
            SidebarAction::DeleteChat(id) => self.delete_chat(id),
            SidebarAction::ClearChats => {
                self.chat_history.clear();
                self.persist_history();
                self.start_new_chat();
            }
        }
    }

    fn handle_modal_action(&mut self, action: ModalAction) {
        match action {
            ModalAction::Submit => self.submit_schedule(),
            ModalAction::AttachImage => {
                match load_image_data_uri(&self.schedule_modal.image_path) {
                    Ok(uri) => {
                        self.schedule_modal.image = Some(uri);
                        self.schedule_modal.validation = None;
                    }
                    Err(message) => self.schedule_modal.validation = Some(message),
                }
            }
            ModalAction::Close => self.schedule_modal.open = false,
        }
    }

    fn handle_editor_action(&mut self, ctx: &egui::Context, action: EditorAction) {
        let Some(state) = self.editor.as_mut() else {
            return;
        };
        match action {
            EditorAction::Back => {
                let back = source_view(state.blog.source);
                self.set_view(back);
            }
            EditorAction::CopyMarkdown => {
                ctx.copy_text(state.export_content().to_string());
                state.copied_at = Some(Instant::now());
            }
            EditorAction::CopyHtml => {
                ctx.copy_text(format::format_html(state.export_content()));
                state.copied_at = Some(Instant::now());
            }
            EditorAction::Download => {
                let file_name = state.download_file_name();
                let content = state.export_content().to_string();
                let dir = dirs::download_dir()
                    .or_else(dirs::home_dir)
                    .unwrap_or_else(|| PathBuf::from("."));
                let path = dir.join(file_name);
                match std::fs::write(&path, content) {
                    Ok(()) => self.notice = Some(format!("Saved to {}", path.display())),
                    Err(err) => self.error = Some(format!("Failed to save file: {err}")),
                }
            }
            EditorAction::AttachImage => match load_image_data_uri(&state.image_path) {
                Ok(uri) => state.edited_image = Some(uri),
                Err(message) => self.error = Some(message),
            },
            EditorAction::Save => {
                let id = state.blog.id.clone();
                let content = state.edited_content.clone();
                let image = state.edited_image.clone();
                let source = state.blog.source;
                state.is_editing = false;
                self.api.update_blog(id, content, image, source);
            }
            EditorAction::SaveToLibrary => {
                let id = state.blog.id.clone();
                self.api.save_to_library(id);
            }
            EditorAction::Delete => {
                let back_to = Some(source_view(state.blog.source));
                self.confirm = Some(PendingConfirm::DeleteBlog {
                    id: state.blog.id.clone(),
                    topic: state.blog.topic.clone(),
                    back_to,
                });
            }
        }
    }

    fn run_confirmed(&mut self, confirm: PendingConfirm) {
        match confirm {
            PendingConfirm::DeleteBlog { id, back_to, .. } => {
                self.api.delete_blog(id);
                if let Some(view) = back_to {
                    self.set_view(view);
                }
            }
            PendingConfirm::ClearScheduled => {
                let ids = self
                    .scheduled_blogs
                    .iter()
                    .map(|blog| blog.id.clone())
                    .collect();
                self.api.clear_scheduled(ids);
            }
        }
    }

    fn show_banners(&mut self, ctx: &egui::Context) {
        if self.error.is_none() && self.notice.is_none() {
            return;
        }
        egui::TopBottomPanel::top("banners").show(ctx, |ui| {
            if let Some(error) = self.error.clone() {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(error).color(self.theme.danger));
                    if ui.small_button("✕").clicked() {
                        self.error = None;
                    }
                });
            }
            if let Some(notice) = self.notice.clone() {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(notice).color(self.theme.success));
                    if ui.small_button("✕").clicked() {
                        self.notice = None;
                    }
                });
            }
        });
    }

    fn show_confirm(&mut self, ctx: &egui::Context) {
        let Some(confirm) = &self.confirm else {
            return;
        };
        let message = match confirm {
            PendingConfirm::DeleteBlog { topic, .. } => {
                format!("Are you sure you want to delete \"{topic}\"?")
            }
            PendingConfirm::ClearScheduled => {
                "Are you sure you want to delete all scheduled blogs?".to_string()
            }
        };

        let mut decision: Option<bool> = None;
        egui::Window::new("Confirm")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                    if ui.button("Delete").clicked() {
                        decision = Some(true);
                    }
                });
            });

        match decision {
            Some(true) => {
                if let Some(confirm) = self.confirm.take() {
                    self.run_confirmed(confirm);
                }
            }
            Some(false) => self.confirm = None,
            None => {}
        }
    }

    fn show_central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            match self.view {
                View::Chat => {
                    let action = chat::show(
                        ui,
                        &self.theme,
                        &self.chat_log,
                        &mut self.question,
                        self.is_loading,
                        &mut self.scroll_to_bottom,
                    );
                    match action {
                        Some(ChatAction::Send) => self.send_chat(),
                        Some(ChatAction::SaveGenerated(text)) => self.api.save_generated(text),
                        None => {}
                    }
                }
                View::Schedule => {
                    let action = schedule::show(
                        ui,
                        &self.theme,
                        &self.scheduled_blogs,
                        &mut self.search_term,
                        &mut self.filter_status,
                    );
                    match action {
                        Some(ScheduleAction::OpenModal) => {
                            self.scheduling_mode = SchedulingMode::Generate;
                            self.schedule_modal.open_with("");
                        }
                        Some(ScheduleAction::ClearAll) => {
                            self.confirm = Some(PendingConfirm::ClearScheduled);
                        }
                        Some(ScheduleAction::OpenEditor(blog)) => self.open_editor(blog),
                        Some(ScheduleAction::SaveToLibrary(id)) => self.api.save_to_library(id),
                        Some(ScheduleAction::Delete(id)) => self.api.delete_blog(id),
                        None => {}
                    }
                }
                View::Saved => {
                    let action =
                        saved::show(ui, &self.theme, &self.saved_blogs, &mut self.search_term);
                    match action {
                        Some(SavedAction::OpenEditor(blog)) => self.open_editor(blog),
                        Some(SavedAction::Delete(blog)) => {
                            self.confirm = Some(PendingConfirm::DeleteBlog {
                                id: blog.id,
                                topic: blog.topic,
                                back_to: None,
                            });
                        }
                        None => {}
                    }
                }
                View::Refine => {
                    let action = refine::show(
                        ui,
                        &self.theme,
                        &mut self.raw_input,
                        &mut self.refined_topic,
                        &self.refined_content,
                        self.is_refining,
                    );
                    match action {
                        Some(RefineAction::Refine) => self.refine_submit(),
                        Some(RefineAction::SaveToLibrary) => self.save_refined(),
                        Some(RefineAction::OpenScheduleModal) => {
                            if self.refined_topic.trim().is_empty() {
                                self.error =
                                    Some("Please enter a title before scheduling.".to_string());
                            } else {
                                self.scheduling_mode = SchedulingMode::PreWritten;
                                let topic = self.refined_topic.clone();
                                self.schedule_modal.open_with(&topic);
                            }
                        }
                        None => {}
                    }
                }
                View::Editor => {
                    let action = match self.editor.as_mut() {
                        Some(state) => editor::show(ui, &self.theme, state),
                        None => {
                            self.view = View::Chat;
                            None
                        }
                    };
                    if let Some(action) = action {
                        self.handle_editor_action(ctx, action);
                    }
                }
            }
        });
    }
}

impl eframe::App for BlogBotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep frames coming so poll results and task outcomes are drained
        // even when the user is idle.
        ctx.request_repaint_after(Duration::from_millis(200));

        self.drain_events();
        if let Some(action) = sidebar::show(ctx, &self.theme, &self.chat_history, self.active_chat_id)
        {
            self.handle_sidebar_action(action);
        }
        self.show_banners(ctx);
        self.show_central(ctx);
        if let Some(action) = modal::show(ctx, &self.theme, &mut self.schedule_modal) {
            self.handle_modal_action(action);
        }
        self.show_confirm(ctx);
    }
}

impl Drop for BlogBotApp {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_return_to_the_source_view() {
        assert_eq!(
            follow_up_view(MutationKind::Update {
                source: BlogSource::Saved
            }),
            Some(View::Saved)
        );
        assert_eq!(
            follow_up_view(MutationKind::Update {
                source: BlogSource::Schedule
            }),
            Some(View::Schedule)
        );
    }

    #[test]
    fn library_and_schedule_mutations_land_on_schedule() {
        assert_eq!(
            follow_up_view(MutationKind::SaveToLibrary),
            Some(View::Schedule)
        );
        assert_eq!(follow_up_view(MutationKind::Schedule), Some(View::Schedule));
    }

    #[test]
    fn save_refined_returns_to_chat() {
        assert_eq!(follow_up_view(MutationKind::SaveRefined), Some(View::Chat));
    }

    #[test]
    fn deletes_keep_the_current_view() {
        assert_eq!(follow_up_view(MutationKind::Delete), None);
        assert_eq!(follow_up_view(MutationKind::ClearScheduled), None);
        assert_eq!(follow_up_view(MutationKind::SaveGenerated), None);
    }
}

use crate::api::{Blog, BlogSource};

/// Outcomes of background work, delivered to the UI thread once per frame.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ChatReply(String),
    ChatFailed(String),
    RefineReply(String),
    RefineFailed(String),
    SavedFetched(Vec<Blog>),
    ScheduledFetched(Vec<Blog>),
    FetchFailed {
        what: &'static str,
        message: String,
    },
    MutationDone(MutationKind),
    MutationFailed(String),
}

/// Which mutating call completed, so the shell can pick the follow-up view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Update { source: BlogSource },
    SaveToLibrary,
    Delete,
    Schedule,
    SaveRefined,
    SaveGenerated,
    ClearScheduled,
}

use serde::{Deserialize, Serialize};

pub mod store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Ai,
}

/// A single chat message. Never mutated once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
    pub id: i64,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
            id: now_millis(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            author: Author::Ai,
            text: text.into(),
            id: now_millis(),
        }
    }
}

/// A persisted conversation, newest-first in the containing collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    pub id: i64,
    pub title: String,
    pub log: Vec<ChatMessage>,
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Fold a completed exchange into the history collection.
///
/// Updates the active entry in place when one exists; otherwise creates a new
/// entry at the front, titled with the first user message of the log. Returns
/// the id of the entry that now holds the log.
pub fn record_exchange(
    entries: &mut Vec<ChatHistoryEntry>,
    active_id: Option<i64>,
    log: &[ChatMessage],
) -> i64 {
    if let Some(id) = active_id {
        if let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) {
            entry.log = log.to_vec();
            return id;
        }
    }

    let title = log
        .iter()
        .find(|message| message.author == Author::User)
        .map(|message| message.text.clone())
        .unwrap_or_else(|| "New chat".to_string());
    let id = now_millis();
    entries.insert(
        0,
        ChatHistoryEntry {
            id,
            title,
            log: log.to_vec(),
        },
    );
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_for(question: &str, reply: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::user(question), ChatMessage::ai(reply)]
    }

    #[test]
    fn first_exchange_creates_entry_titled_with_user_text() {
        let mut entries = Vec::new();
        let log = log_for("Write about cats", "# Cats\nsome content");

        let id = record_exchange(&mut entries, None, &log);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].title, "Write about cats");
        assert_eq!(entries[0].log.len(), 2);
    }

    #[test]
    fn active_entry_is_updated_in_place() {
        let mut entries = Vec::new();
        let log = log_for("Write about cats", "# Cats");
        let id = record_exchange(&mut entries, None, &log);

        let mut longer = log.clone();
        longer.push(ChatMessage::user("make it shorter"));
        longer.push(ChatMessage::ai("# Cats, briefly"));
        let same_id = record_exchange(&mut entries, Some(id), &longer);

        assert_eq!(same_id, id);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].log.len(), 4);
    }

    #[test]
    fn new_entries_go_to_the_front() {
        let mut entries = Vec::new();
        record_exchange(&mut entries, None, &log_for("first", "a"));
        record_exchange(&mut entries, None, &log_for("second", "b"));

        assert_eq!(entries[0].title, "second");
        assert_eq!(entries[1].title, "first");
    }

    #[test]
    fn stale_active_id_falls_back_to_a_new_entry() {
        let mut entries = Vec::new();
        let log = log_for("orphaned", "reply");

        record_exchange(&mut entries, Some(12345), &log);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "orphaned");
    }
}

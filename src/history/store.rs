//! Durable chat-history storage.
//!
//! The whole collection is one JSON blob, rewritten on every change and
//! rehydrated at startup. A corrupt or absent file yields an empty
//! collection plus a warning for the diagnostics log.

use crate::history::ChatHistoryEntry;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const HISTORY_FILE: &str = "chat_history.json";

fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".blogbot")
}

fn history_path() -> PathBuf {
    data_dir().join(HISTORY_FILE)
}

fn read_history_file(path: &Path) -> Result<Vec<ChatHistoryEntry>, String> {
    let data =
        fs::read(path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    serde_json::from_slice(&data)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))
}

fn write_history_file(path: &Path, entries: &[ChatHistoryEntry]) -> io::Result<()> {
    let Some(dir) = path.parent() else {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"));
    };
    fs::create_dir_all(dir)?;

    let bytes = serde_json::to_vec_pretty(entries)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, bytes)?;
    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if path.exists() {
                fs::remove_file(path)?;
                fs::rename(&tmp_path, path)?;
                Ok(())
            } else {
                Err(rename_err)
            }
        }
    }
}

pub fn load() -> (Vec<ChatHistoryEntry>, Option<String>) {
    let path = history_path();
    if !path.exists() {
        return (Vec::new(), None);
    }
    match read_history_file(&path) {
        Ok(entries) => (entries, None),
        Err(warning) => (Vec::new(), Some(warning)),
    }
}

pub fn save(entries: &[ChatHistoryEntry]) -> io::Result<()> {
    write_history_file(&history_path(), entries)
}

#[cfg(test)]
mod tests {
    use super::{read_history_file, write_history_file};
    use crate::history::{ChatHistoryEntry, ChatMessage};

    #[test]
    fn round_trips_the_full_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chat_history.json");
        let entries = vec![
            ChatHistoryEntry {
                id: 2,
                title: "second".to_string(),
                log: vec![ChatMessage::user("second"), ChatMessage::ai("reply")],
            },
            ChatHistoryEntry {
                id: 1,
                title: "first".to_string(),
                log: vec![ChatMessage::user("first")],
            },
        ];

        write_history_file(&path, &entries).expect("write should succeed");
        let loaded = read_history_file(&path).expect("read should succeed");

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, "second");
        assert_eq!(loaded[1].log[0].text, "first");
    }

    #[test]
    fn corrupt_blob_reports_a_parse_warning() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chat_history.json");
        std::fs::write(&path, b"{ not json").expect("fixture should write");

        let error = read_history_file(&path).expect_err("corrupt data should fail");
        assert!(error.contains("failed to parse"));
    }

    #[test]
    fn rewrite_replaces_previous_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chat_history.json");
        let first = vec![ChatHistoryEntry {
            id: 1,
            title: "old".to_string(),
            log: Vec::new(),
        }];
        write_history_file(&path, &first).expect("initial write");

        write_history_file(&path, &[]).expect("rewrite");
        let loaded = read_history_file(&path).expect("read");
        assert!(loaded.is_empty());
    }
}

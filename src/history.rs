//! Question/answer history
//!
//! A bounded-by-nothing, newest-first list of past study-buddy exchanges,
//! persisted through a key-value storage port so it survives restarts.
//! Entries are immutable once recorded; the list only grows at the head or
//! is cleared wholesale. The persisted form uses the legacy camelCase field
//! names, and entries written by older clients without a `formattedText`
//! field are repaired at load time.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::api::types::AnswerPayload;
use crate::format::build_formatted_text;

/// Storage key under which the serialized history list lives.
pub const HISTORY_KEY: &str = "study_buddy_history";

/// One recorded question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub question: String,
    pub answer: AnswerPayload,
    /// Display text derived from `answer`; recomputed at load time when a
    /// persisted entry predates this field.
    #[serde(default)]
    pub formatted_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asked_at: Option<DateTime<Utc>>,
}

/// Key-value persistence port. The history store depends on this seam
/// rather than a concrete storage mechanism, so tests substitute an
/// in-memory implementation.
pub trait StoragePort: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed storage under the platform data directory
/// (`~/.local/share/studydesk/` on Linux). One key maps to one JSON file.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new() -> Result<Self> {
        let dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studydesk");
        Self::at(dir)
    }

    pub fn at(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir).context("Failed to create storage directory")?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Sanitize key for the filesystem
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl StoragePort for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        std::fs::write(&path, value)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// In-memory storage, used by tests and available as a no-persistence mode.
#[derive(Default)]
pub struct MemoryStorage {
    entries: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

impl StoragePort for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .entries
            .lock()
            .map_err(|e| anyhow::anyhow!("storage lock poisoned: {}", e))?;
        Ok(map.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .entries
            .lock()
            .map_err(|e| anyhow::anyhow!("storage lock poisoned: {}", e))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self
            .entries
            .lock()
            .map_err(|e| anyhow::anyhow!("storage lock poisoned: {}", e))?;
        map.remove(key);
        Ok(())
    }
}

/// The persisted Q&A history, newest entry first.
pub struct HistoryStore {
    storage: Box<dyn StoragePort>,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Load the history from storage. An absent key starts empty; a corrupt
    /// payload is logged and discarded rather than failing the session.
    pub fn open(storage: Box<dyn StoragePort>) -> Result<Self> {
        let entries = match storage.load(HISTORY_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(mut entries) => {
                    repair(&mut entries);
                    entries
                }
                Err(e) => {
                    warn!("discarding corrupt history: {}", e);
                    Vec::new()
                }
            },
        };
        debug!("loaded {} history entries", entries.len());
        Ok(Self { storage, entries })
    }

    /// Record a new exchange at the head of the list and persist the full
    /// list immediately.
    pub fn record(&mut self, question: &str, answer: AnswerPayload) -> Result<&HistoryEntry> {
        let entry = HistoryEntry {
            question: question.to_string(),
            formatted_text: build_formatted_text(&answer),
            answer,
            asked_at: Some(Utc::now()),
        };
        self.entries.insert(0, entry);
        self.persist()?;
        Ok(&self.entries[0])
    }

    /// Drop all entries and remove the persisted representation.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.storage.remove(HISTORY_KEY)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        self.storage.save(HISTORY_KEY, &json)
    }
}

/// Backward-compatible repair: entries persisted without a formatted text
/// get one recomputed from their answer payload.
fn repair(entries: &mut [HistoryEntry]) {
    for entry in entries {
        if entry.formatted_text.is_empty() {
            entry.formatted_text = build_formatted_text(&entry.answer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn memory_store() -> HistoryStore {
        HistoryStore::open(Box::new(MemoryStorage::default())).unwrap()
    }

    /// Shared storage wrapper so a test can reopen the "same" storage.
    struct SharedStorage(Arc<MemoryStorage>);

    impl StoragePort for SharedStorage {
        fn load(&self, key: &str) -> Result<Option<String>> {
            self.0.load(key)
        }
        fn save(&self, key: &str, value: &str) -> Result<()> {
            self.0.save(key, value)
        }
        fn remove(&self, key: &str) -> Result<()> {
            self.0.remove(key)
        }
    }

    #[test]
    fn test_open_empty() {
        let store = memory_store();
        assert!(store.is_empty());
    }

    #[test]
    fn test_record_prepends() {
        let mut store = memory_store();
        store
            .record("what is 2+2?", AnswerPayload::text("4"))
            .unwrap();
        store
            .record("what is calculus?", AnswerPayload::text("math of change"))
            .unwrap();

        let entries = store.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question, "what is calculus?");
        assert_eq!(entries[1].question, "what is 2+2?");
        assert_eq!(entries[1].formatted_text, "4");
    }

    #[test]
    fn test_record_shifts_prior_entries_unchanged() {
        let mut store = memory_store();
        store.record("q1", AnswerPayload::text("a1")).unwrap();
        let before = store.entries()[0].clone();

        store.record("q2", AnswerPayload::text("a2")).unwrap();
        assert_eq!(store.entries()[1], before);
    }

    #[test]
    fn test_record_persists_immediately() {
        let shared = Arc::new(MemoryStorage::default());
        let mut store =
            HistoryStore::open(Box::new(SharedStorage(Arc::clone(&shared)))).unwrap();
        store.record("q", AnswerPayload::text("a")).unwrap();

        let reopened = HistoryStore::open(Box::new(SharedStorage(shared))).unwrap();
        assert_eq!(reopened.entries().len(), 1);
        assert_eq!(reopened.entries()[0].question, "q");
    }

    #[test]
    fn test_clear_removes_persisted_state() {
        let shared = Arc::new(MemoryStorage::default());
        let mut store =
            HistoryStore::open(Box::new(SharedStorage(Arc::clone(&shared)))).unwrap();
        store.record("q", AnswerPayload::text("a")).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());

        // Subsequent load without a new record also yields empty.
        assert!(shared.load(HISTORY_KEY).unwrap().is_none());
        let reopened = HistoryStore::open(Box::new(SharedStorage(shared))).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_load_repairs_missing_formatted_text() {
        let storage = MemoryStorage::default();
        // An entry persisted by an older client: no formattedText field.
        let legacy = json!([{
            "question": "what is a derivative?",
            "answer": {"definition": "D", "examples": ["a", "b"]}
        }]);
        storage.save(HISTORY_KEY, &legacy.to_string()).unwrap();

        let store = HistoryStore::open(Box::new(storage)).unwrap();
        assert_eq!(
            store.entries()[0].formatted_text,
            "Definition:\nD\n\nExamples:\n1. a\n2. b"
        );
    }

    #[test]
    fn test_corrupt_history_starts_empty() {
        let storage = MemoryStorage::default();
        storage.save(HISTORY_KEY, "{{{ not json").unwrap();
        let store = HistoryStore::open(Box::new(storage)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_persisted_field_names_are_camel_case() {
        let shared = Arc::new(MemoryStorage::default());
        let mut store =
            HistoryStore::open(Box::new(SharedStorage(Arc::clone(&shared)))).unwrap();
        store.record("q", AnswerPayload::text("a")).unwrap();

        let raw = shared.load(HISTORY_KEY).unwrap().unwrap();
        assert!(raw.contains("\"formattedText\""));
        assert!(raw.contains("\"askedAt\""));
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = FileStorage::at(dir.path().to_path_buf()).unwrap();

        assert!(storage.load("missing").unwrap().is_none());
        storage.save("k", "v").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert!(storage.load("k").unwrap().is_none());
        // Removing an absent key is not an error.
        storage.remove("k").unwrap();
    }

    #[test]
    fn test_file_storage_key_sanitization() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = FileStorage::at(dir.path().to_path_buf()).unwrap();
        let path = storage.key_path("weird key/with slashes");
        assert!(!path.file_name().unwrap().to_string_lossy().contains('/'));
        assert!(!path.to_string_lossy().contains(' '));
    }

    #[test]
    fn test_file_backed_history_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        {
            let storage = FileStorage::at(dir.path().to_path_buf()).unwrap();
            let mut store = HistoryStore::open(Box::new(storage)).unwrap();
            store
                .record("persisted?", AnswerPayload::text("yes"))
                .unwrap();
        }
        let storage = FileStorage::at(dir.path().to_path_buf()).unwrap();
        let store = HistoryStore::open(Box::new(storage)).unwrap();
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.entries()[0].question, "persisted?");
    }
}

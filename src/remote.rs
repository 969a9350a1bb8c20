use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const USERS_COLLECTION: &str = "users";

/// Document path for a user's progress, e.g. `users/abc123`.
pub fn user_progress_path(user_id: &str) -> String {
    format!("{USERS_COLLECTION}/{user_id}")
}

/// Map key for one level inside the remote document, e.g. `3-12`.
pub fn level_key(chapter_id: u32, level_id: u32) -> String {
    format!("{chapter_id}-{level_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteLevelRecord {
    pub completed: bool,
    pub stars: u8,
    pub best_moves: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteProgressDoc {
    pub completed_levels: BTreeMap<String, RemoteLevelRecord>,
    pub total_stars: u32,
    pub unlocked_chapters: Vec<u32>,
}

impl Default for RemoteProgressDoc {
    fn default() -> Self {
        Self {
            completed_levels: BTreeMap::new(),
            total_stars: 0,
            unlocked_chapters: vec![1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    Offline,
    Backend(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Offline => write!(f, "remote unreachable"),
            RemoteError::Backend(message) => write!(f, "remote error: {message}"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Remote document store contract. `set_document_merge` has upsert
/// semantics: fields present in `doc` replace the stored ones, absent
/// fields survive, matching the sync backend we target.
pub trait RemoteStore {
    fn get_document(&self, path: &str) -> Result<Option<RemoteProgressDoc>, RemoteError>;
    fn set_document_merge(&self, path: &str, doc: &RemoteProgressDoc) -> Result<(), RemoteError>;
}

/// In-memory remote for tests, with read/write failure injection.
#[derive(Default)]
pub struct MemoryRemote {
    documents: RefCell<BTreeMap<String, RemoteProgressDoc>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn seed(&self, path: &str, doc: RemoteProgressDoc) {
        self.documents.borrow_mut().insert(path.to_string(), doc);
    }

    pub fn document(&self, path: &str) -> Option<RemoteProgressDoc> {
        self.documents.borrow().get(path).cloned()
    }
}

impl RemoteStore for MemoryRemote {
    fn get_document(&self, path: &str) -> Result<Option<RemoteProgressDoc>, RemoteError> {
        if self.fail_reads.get() {
            return Err(RemoteError::Offline);
        }
        Ok(self.documents.borrow().get(path).cloned())
    }

    fn set_document_merge(&self, path: &str, doc: &RemoteProgressDoc) -> Result<(), RemoteError> {
        if self.fail_writes.get() {
            return Err(RemoteError::Offline);
        }
        let mut documents = self.documents.borrow_mut();
        let stored = documents.entry(path.to_string()).or_default();
        for (key, record) in &doc.completed_levels {
            stored.completed_levels.insert(key.clone(), *record);
        }
        stored.total_stars = doc.total_stars;
        for chapter in &doc.unlocked_chapters {
            if !stored.unlocked_chapters.contains(chapter) {
                stored.unlocked_chapters.push(*chapter);
            }
        }
        stored.unlocked_chapters.sort_unstable();
        Ok(())
    }
}

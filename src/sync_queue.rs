use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use suraido_core::merge_best;

use crate::platform::{Clock, Connectivity, Identity};
use crate::remote::{level_key, user_progress_path, RemoteLevelRecord, RemoteStore};
use crate::storage::KeyValueStore;

pub const SYNC_QUEUE_KEY: &str = "suraido.sync_queue.v1";
pub const SYNC_QUEUE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedProgress {
    pub chapter_id: u32,
    pub level_id: u32,
    pub moves: u32,
    pub stars: u8,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QueueBlob {
    version: u32,
    entries: BTreeMap<String, QueuedProgress>,
}

impl Default for QueueBlob {
    fn default() -> Self {
        Self {
            version: SYNC_QUEUE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Offline,
    NoIdentity,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    Skipped(SkipReason),
    Empty,
    Synced(usize),
    Failed,
}

/// Offline-first outbox for completed levels. Entries are keyed by
/// level so repeat completions collapse into one best-of record; the
/// queue is cleared only after the remote write is confirmed.
pub struct SyncQueue {
    storage: Rc<dyn KeyValueStore>,
    remote: Rc<dyn RemoteStore>,
    connectivity: Rc<dyn Connectivity>,
    identity: Rc<dyn Identity>,
    clock: Rc<dyn Clock>,
    blob: QueueBlob,
    in_flight: Cell<bool>,
    was_connected: Cell<bool>,
}

impl SyncQueue {
    pub fn new(
        storage: Rc<dyn KeyValueStore>,
        remote: Rc<dyn RemoteStore>,
        connectivity: Rc<dyn Connectivity>,
        identity: Rc<dyn Identity>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let blob = load_blob(storage.as_ref());
        let was_connected = connectivity.is_connected();
        Self {
            storage,
            remote,
            connectivity,
            identity,
            clock,
            blob,
            in_flight: Cell::new(false),
            was_connected: Cell::new(was_connected),
        }
    }

    pub fn pending(&self) -> usize {
        self.blob.entries.len()
    }

    /// Records a completion for upload, merging with any queued result
    /// for the same level, then tries an immediate flush when online.
    pub fn enqueue(&mut self, chapter_id: u32, level_id: u32, moves: u32, stars: u8) {
        let key = level_key(chapter_id, level_id);
        let (stars, moves) = match self.blob.entries.get(&key) {
            Some(existing) => merge_best(existing.stars, existing.moves, stars, moves),
            None => (stars, moves),
        };
        self.blob.entries.insert(
            key,
            QueuedProgress {
                chapter_id,
                level_id,
                moves,
                stars,
                timestamp: self.clock.now_ms(),
            },
        );
        self.persist();
        if self.connectivity.is_connected() {
            self.flush();
        }
    }

    /// Pushes all queued completions to the remote document. Connectivity
    /// and identity are re-checked here because conditions may have
    /// changed since enqueue. Never propagates errors.
    pub fn flush(&mut self) -> FlushOutcome {
        if self.in_flight.get() {
            return FlushOutcome::Skipped(SkipReason::InFlight);
        }
        let user_id = match self.identity.current_user_id() {
            Some(user_id) => user_id,
            None => return FlushOutcome::Skipped(SkipReason::NoIdentity),
        };
        if !self.connectivity.is_connected() {
            return FlushOutcome::Skipped(SkipReason::Offline);
        }
        if self.blob.entries.is_empty() {
            return FlushOutcome::Empty;
        }

        self.in_flight.set(true);
        let outcome = self.flush_inner(&user_id);
        self.in_flight.set(false);
        outcome
    }

    fn flush_inner(&mut self, user_id: &str) -> FlushOutcome {
        let path = user_progress_path(user_id);
        let mut doc = match self.remote.get_document(&path) {
            Ok(doc) => doc.unwrap_or_default(),
            Err(err) => {
                log::warn!("sync flush read failed: {err}");
                return FlushOutcome::Failed;
            }
        };

        let mut star_delta: u32 = 0;
        for (key, queued) in &self.blob.entries {
            let existing = doc.completed_levels.get(key).copied().unwrap_or(
                RemoteLevelRecord {
                    completed: false,
                    stars: 0,
                    best_moves: 0,
                },
            );
            let (stars, best_moves) =
                merge_best(existing.stars, existing.best_moves, queued.stars, queued.moves);
            if stars > existing.stars {
                star_delta += u32::from(stars - existing.stars);
            }
            doc.completed_levels.insert(
                key.clone(),
                RemoteLevelRecord {
                    completed: true,
                    stars,
                    best_moves,
                },
            );
        }
        doc.total_stars += star_delta;

        if let Err(err) = self.remote.set_document_merge(&path, &doc) {
            log::warn!("sync flush write failed: {err}");
            return FlushOutcome::Failed;
        }

        let synced = self.blob.entries.len();
        self.blob.entries.clear();
        self.persist();
        log::info!("synced {synced} queued completions");
        FlushOutcome::Synced(synced)
    }

    /// Call when network reachability changes; flushes on the
    /// offline-to-online edge.
    pub fn handle_connectivity_change(&mut self) {
        let connected = self.connectivity.is_connected();
        let was_connected = self.was_connected.replace(connected);
        if connected && !was_connected {
            self.flush();
        }
    }

    /// Flush anything left over from a previous run.
    pub fn start(&mut self) {
        if self.connectivity.is_connected() {
            self.flush();
        }
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.blob) {
            Ok(encoded) => encoded,
            Err(err) => {
                log::warn!("failed to encode sync queue: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.set(SYNC_QUEUE_KEY, &encoded) {
            log::warn!("failed to persist sync queue: {err}");
        }
    }
}

fn load_blob(storage: &dyn KeyValueStore) -> QueueBlob {
    let raw = match storage.get(SYNC_QUEUE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return QueueBlob::default(),
        Err(err) => {
            log::warn!("failed to read sync queue: {err}");
            return QueueBlob::default();
        }
    };
    match serde_json::from_str::<QueueBlob>(&raw) {
        Ok(blob) if blob.version == SYNC_QUEUE_VERSION => blob,
        Ok(_) => QueueBlob::default(),
        Err(err) => {
            log::warn!("discarding corrupt sync queue blob: {err}");
            QueueBlob::default()
        }
    }
}

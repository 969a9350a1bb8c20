use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use suraido_core::{merge_best, LEVELS_PER_CHAPTER};

use crate::storage::KeyValueStore;

pub const PROGRESS_KEY: &str = "suraido.progress.v1";
pub const PROGRESS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub completed: bool,
    pub stars: u8,
    pub best_moves: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterProgress {
    pub completed: u32,
    pub stars_earned: u32,
    pub stars_possible: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgressBlob {
    version: u32,
    levels: BTreeMap<String, LevelProgress>,
    total_stars: u32,
    last_played: Option<(u32, u32)>,
}

impl Default for ProgressBlob {
    fn default() -> Self {
        Self {
            version: PROGRESS_VERSION,
            levels: BTreeMap::new(),
            total_stars: 0,
            last_played: None,
        }
    }
}

fn level_map_key(chapter_id: u32, level_id: u32) -> String {
    format!("{chapter_id}-{level_id}")
}

/// Local source of truth for completion state. Every mutation persists
/// immediately; a failed write is logged and the in-memory state keeps
/// going.
pub struct ProgressStore {
    storage: Rc<dyn KeyValueStore>,
    blob: ProgressBlob,
}

impl ProgressStore {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        let blob = load_blob(storage.as_ref());
        Self { storage, blob }
    }

    pub fn level(&self, chapter_id: u32, level_id: u32) -> LevelProgress {
        self.blob
            .levels
            .get(&level_map_key(chapter_id, level_id))
            .copied()
            .unwrap_or_default()
    }

    pub fn total_stars(&self) -> u32 {
        self.blob.total_stars
    }

    pub fn last_played(&self) -> Option<(u32, u32)> {
        self.blob.last_played
    }

    /// Records a completion, keeping the best of the stored and the new
    /// result. Returns the stars now on record for the level.
    pub fn record_completion(&mut self, chapter_id: u32, level_id: u32, moves: u32, stars: u8) -> u8 {
        let key = level_map_key(chapter_id, level_id);
        let existing = self.blob.levels.get(&key).copied().unwrap_or_default();
        let (best_stars, best_moves) =
            merge_best(existing.stars, existing.best_moves, stars, moves);
        if best_stars > existing.stars {
            self.blob.total_stars += u32::from(best_stars - existing.stars);
        }
        self.blob.levels.insert(
            key,
            LevelProgress {
                completed: true,
                stars: best_stars,
                best_moves,
            },
        );
        self.persist();
        best_stars
    }

    pub fn set_last_played(&mut self, chapter_id: u32, level_id: u32) {
        self.blob.last_played = Some((chapter_id, level_id));
        self.persist();
    }

    /// A level is unlocked when its predecessor in the same chapter is
    /// completed; the first level of a chapter needs the final level of
    /// the previous chapter. Level 1-1 is always open.
    pub fn is_level_unlocked(&self, chapter_id: u32, level_id: u32) -> bool {
        if chapter_id == 0 || level_id == 0 {
            return false;
        }
        if chapter_id == 1 && level_id == 1 {
            return true;
        }
        if level_id > 1 {
            return self.level(chapter_id, level_id - 1).completed;
        }
        self.level(chapter_id - 1, LEVELS_PER_CHAPTER).completed
    }

    pub fn is_chapter_unlocked(&self, chapter_id: u32) -> bool {
        self.is_level_unlocked(chapter_id, 1)
    }

    /// Aggregates completion over `level_count` levels, the chapter's
    /// size per the catalog.
    pub fn chapter_progress(&self, chapter_id: u32, level_count: u32) -> ChapterProgress {
        let mut progress = ChapterProgress {
            stars_possible: level_count * 3,
            ..ChapterProgress::default()
        };
        for level_id in 1..=level_count {
            let level = self.level(chapter_id, level_id);
            if level.completed {
                progress.completed += 1;
            }
            progress.stars_earned += u32::from(level.stars);
        }
        progress
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.blob) {
            Ok(encoded) => encoded,
            Err(err) => {
                log::warn!("failed to encode progress: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.set(PROGRESS_KEY, &encoded) {
            log::warn!("failed to persist progress: {err}");
        }
    }
}

fn load_blob(storage: &dyn KeyValueStore) -> ProgressBlob {
    let raw = match storage.get(PROGRESS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return ProgressBlob::default(),
        Err(err) => {
            log::warn!("failed to read progress: {err}");
            return ProgressBlob::default();
        }
    };
    match serde_json::from_str::<ProgressBlob>(&raw) {
        Ok(blob) if blob.version == PROGRESS_VERSION => blob,
        Ok(_) => ProgressBlob::default(),
        Err(err) => {
            log::warn!("discarding corrupt progress blob: {err}");
            ProgressBlob::default()
        }
    }
}

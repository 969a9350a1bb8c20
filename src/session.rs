use std::rc::Rc;

use suraido_core::{
    calculate_stars, is_solved, perform_move, progress_percentage, shuffle_grid, shuffle_seed,
    GridSize, SessionSnapshot, SESSION_SNAPSHOT_VERSION, SHUFFLE_SEED_BASE,
};

use crate::platform::Clock;
use crate::progress::ProgressStore;
use crate::storage::KeyValueStore;
use crate::sync_queue::SyncQueue;

pub const SESSION_KEY: &str = "suraido.session.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilePress {
    Ignored,
    Moved,
    Solved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintMove {
    pub tile_index: usize,
    pub target_index: usize,
}

/// One play-through of one level. Holds the live grid, counts moves,
/// and reports a win at most once.
pub struct GameSession {
    storage: Rc<dyn KeyValueStore>,
    chapter_id: u32,
    level_id: u32,
    size: GridSize,
    grid: Vec<usize>,
    empty_index: usize,
    move_count: u32,
    hints_used: u32,
    shuffle_nonce: u32,
    solved: bool,
    reported: bool,
    on_win: Option<Rc<dyn Fn(u32)>>,
}

impl GameSession {
    /// Starts a session for the given level, resuming a saved in-progress
    /// grid when one exists for exactly this chapter and level.
    pub fn initialize(
        storage: Rc<dyn KeyValueStore>,
        clock: &dyn Clock,
        chapter_id: u32,
        level_id: u32,
        size: GridSize,
    ) -> Self {
        if let Some(snapshot) = load_snapshot(storage.as_ref()) {
            if snapshot.chapter_id == chapter_id
                && snapshot.level_id == level_id
                && snapshot.is_valid_for(size)
            {
                return Self {
                    storage,
                    chapter_id,
                    level_id,
                    size,
                    grid: snapshot.grid,
                    empty_index: snapshot.empty_index,
                    move_count: snapshot.move_count,
                    hints_used: snapshot.hints_used,
                    shuffle_nonce: snapshot.shuffle_nonce,
                    solved: false,
                    reported: false,
                    on_win: None,
                };
            }
        }

        let nonce = clock.now_ms() as u32;
        let shuffled = shuffle_grid(size, shuffle_seed(SHUFFLE_SEED_BASE, nonce, size));
        Self {
            storage,
            chapter_id,
            level_id,
            size,
            grid: shuffled.grid,
            empty_index: shuffled.empty_index,
            move_count: 0,
            hints_used: 0,
            shuffle_nonce: nonce,
            solved: false,
            reported: false,
            on_win: None,
        }
    }

    pub fn set_on_win(&mut self, hook: Rc<dyn Fn(u32)>) {
        self.on_win = Some(hook);
    }

    pub fn chapter_id(&self) -> u32 {
        self.chapter_id
    }

    pub fn level_id(&self) -> u32 {
        self.level_id
    }

    pub fn grid(&self) -> &[usize] {
        &self.grid
    }

    pub fn grid_size(&self) -> GridSize {
        self.size
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn progress_percentage(&self) -> u32 {
        progress_percentage(&self.grid)
    }

    /// Applies a tile press. Illegal presses leave everything untouched;
    /// nothing moves once the puzzle is solved.
    pub fn handle_tile_press(&mut self, tile_index: usize) -> TilePress {
        if self.solved || tile_index >= self.grid.len() {
            return TilePress::Ignored;
        }
        let outcome = perform_move(&self.grid, tile_index, self.empty_index, self.size);
        if !outcome.moved {
            return TilePress::Ignored;
        }
        self.grid = outcome.grid;
        self.empty_index = outcome.empty_index;
        self.move_count += 1;
        if is_solved(&self.grid) {
            self.solved = true;
            if let Some(hook) = self.on_win.clone() {
                hook(self.move_count);
            }
            return TilePress::Solved;
        }
        TilePress::Moved
    }

    /// Reshuffles with a fresh nonce. Replay after a win and abandoning
    /// mid-game both come through here.
    pub fn reset(&mut self) {
        self.shuffle_nonce = self.shuffle_nonce.wrapping_add(1);
        let shuffled = shuffle_grid(
            self.size,
            shuffle_seed(SHUFFLE_SEED_BASE, self.shuffle_nonce, self.size),
        );
        self.grid = shuffled.grid;
        self.empty_index = shuffled.empty_index;
        self.move_count = 0;
        self.hints_used = 0;
        self.solved = false;
        self.reported = false;
    }

    /// Picks the lowest-index misplaced tile (the empty token excluded)
    /// and tells where it belongs. Does not touch the grid or the move
    /// count. None when every tile is already home.
    pub fn use_hint(&mut self) -> Option<HintMove> {
        if self.solved {
            return None;
        }
        let empty_token = self.grid.len() - 1;
        // A tile's home cell is the index equal to its value.
        let hint = self
            .grid
            .iter()
            .enumerate()
            .find(|&(index, &value)| value != index && value != empty_token)
            .map(|(index, &value)| HintMove {
                tile_index: index,
                target_index: value,
            })?;
        self.hints_used += 1;
        Some(hint)
    }

    /// Persists the in-progress grid, or clears it once solved.
    pub fn save_state(&self) {
        if self.solved {
            if let Err(err) = self.storage.remove(SESSION_KEY) {
                log::warn!("failed to clear saved session: {err}");
            }
            return;
        }
        let snapshot = SessionSnapshot {
            version: SESSION_SNAPSHOT_VERSION,
            chapter_id: self.chapter_id,
            level_id: self.level_id,
            grid: self.grid.clone(),
            empty_index: self.empty_index,
            move_count: self.move_count,
            hints_used: self.hints_used,
            shuffle_nonce: self.shuffle_nonce,
        };
        let encoded = match serde_json::to_string(&snapshot) {
            Ok(encoded) => encoded,
            Err(err) => {
                log::warn!("failed to encode session snapshot: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.set(SESSION_KEY, &encoded) {
            log::warn!("failed to persist session snapshot: {err}");
        }
    }

    /// Records the win locally and queues it for upload. Runs at most
    /// once per solve; returns the stars now on record.
    pub fn complete_and_save(
        &mut self,
        progress: &mut ProgressStore,
        queue: &mut SyncQueue,
    ) -> Option<u8> {
        if !self.solved || self.reported {
            return None;
        }
        self.reported = true;
        let stars = calculate_stars(self.move_count, self.size);
        let recorded =
            progress.record_completion(self.chapter_id, self.level_id, self.move_count, stars);
        queue.enqueue(self.chapter_id, self.level_id, self.move_count, stars);
        if let Err(err) = self.storage.remove(SESSION_KEY) {
            log::warn!("failed to clear saved session: {err}");
        }
        Some(recorded)
    }
}

fn load_snapshot(storage: &dyn KeyValueStore) -> Option<SessionSnapshot> {
    let raw = match storage.get(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            log::warn!("failed to read saved session: {err}");
            return None;
        }
    };
    match serde_json::from_str::<SessionSnapshot>(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            log::warn!("discarding corrupt session snapshot: {err}");
            None
        }
    }
}

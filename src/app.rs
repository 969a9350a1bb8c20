use std::rc::Rc;

use suraido_core::{Catalog, ChapterInfo, GridSize, LEVELS_PER_CHAPTER};

use crate::hints::HintStore;
use crate::platform::{Clock, Connectivity, Identity};
use crate::progress::{ChapterProgress, LevelProgress, ProgressStore};
use crate::remote::RemoteStore;
use crate::session::{GameSession, HintMove, TilePress};
use crate::storage::KeyValueStore;
use crate::sync_queue::{FlushOutcome, SyncQueue};

/// Top-level game state: catalog, progress, hints, sync queue, and the
/// session currently being played. A UI shell drives this and renders
/// whatever it reads back.
pub struct GameApp {
    catalog: Catalog,
    storage: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    progress: ProgressStore,
    hints: HintStore,
    queue: SyncQueue,
    session: Option<GameSession>,
}

impl GameApp {
    pub fn new(
        storage: Rc<dyn KeyValueStore>,
        remote: Rc<dyn RemoteStore>,
        connectivity: Rc<dyn Connectivity>,
        identity: Rc<dyn Identity>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let progress = ProgressStore::new(Rc::clone(&storage));
        let hints = HintStore::new(Rc::clone(&storage));
        let queue = SyncQueue::new(
            Rc::clone(&storage),
            remote,
            connectivity,
            identity,
            Rc::clone(&clock),
        );
        Self {
            catalog: Catalog::generated(),
            storage,
            clock,
            progress,
            hints,
            queue,
            session: None,
        }
    }

    /// App startup: drain anything the last run left in the queue.
    pub fn start(&mut self) {
        self.queue.start();
    }

    /// Opens a level for play. Refuses locked levels; any in-progress
    /// session is saved before being replaced.
    pub fn load_level(&mut self, chapter_id: u32, level_id: u32) -> bool {
        if self.catalog.level_by_id(chapter_id, level_id).is_none() {
            return false;
        }
        if !self.progress.is_level_unlocked(chapter_id, level_id) {
            return false;
        }
        if let Some(session) = &self.session {
            session.save_state();
        }
        let size = self.catalog.grid_size_for(chapter_id, level_id);
        self.session = Some(GameSession::initialize(
            Rc::clone(&self.storage),
            self.clock.as_ref(),
            chapter_id,
            level_id,
            size,
        ));
        self.progress.set_last_played(chapter_id, level_id);
        true
    }

    /// Forwards a press to the active session. A solve is reported to
    /// progress and the sync queue exactly once, and finishing the last
    /// level of a chapter grants the hint bonus.
    pub fn handle_tile_press(&mut self, tile_index: usize) -> TilePress {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return TilePress::Ignored,
        };
        let outcome = session.handle_tile_press(tile_index);
        if outcome == TilePress::Solved {
            let level_id = session.level_id();
            if session
                .complete_and_save(&mut self.progress, &mut self.queue)
                .is_some()
                && level_id == LEVELS_PER_CHAPTER
            {
                self.hints.add_chapter_bonus();
            }
        }
        outcome
    }

    /// Spends a hint only when the session actually produces one.
    pub fn use_hint(&mut self) -> Option<HintMove> {
        if self.hints.hint_count() == 0 {
            return None;
        }
        let hint = self.session.as_mut()?.use_hint()?;
        self.hints.use_hint();
        Some(hint)
    }

    pub fn reset_game(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
        }
    }

    /// Call on backgrounding or shutdown.
    pub fn save_state(&self) {
        if let Some(session) = &self.session {
            session.save_state();
        }
    }

    pub fn handle_connectivity_change(&mut self) {
        self.queue.handle_connectivity_change();
    }

    pub fn flush_sync(&mut self) -> FlushOutcome {
        self.queue.flush()
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn chapters(&self) -> &[ChapterInfo] {
        self.catalog.chapters()
    }

    pub fn grid_size_for(&self, chapter_id: u32, level_id: u32) -> GridSize {
        self.catalog.grid_size_for(chapter_id, level_id)
    }

    pub fn level_progress(&self, chapter_id: u32, level_id: u32) -> LevelProgress {
        self.progress.level(chapter_id, level_id)
    }

    pub fn chapter_progress(&self, chapter_id: u32) -> ChapterProgress {
        self.progress
            .chapter_progress(chapter_id, self.catalog.levels_in_chapter(chapter_id))
    }

    pub fn is_level_unlocked(&self, chapter_id: u32, level_id: u32) -> bool {
        self.progress.is_level_unlocked(chapter_id, level_id)
    }

    pub fn is_chapter_unlocked(&self, chapter_id: u32) -> bool {
        self.progress.is_chapter_unlocked(chapter_id)
    }

    pub fn total_stars(&self) -> u32 {
        self.progress.total_stars()
    }

    pub fn last_played(&self) -> Option<(u32, u32)> {
        self.progress.last_played()
    }

    pub fn hint_count(&self) -> u32 {
        self.hints.hint_count()
    }

    pub fn pending_sync(&self) -> usize {
        self.queue.pending()
    }
}

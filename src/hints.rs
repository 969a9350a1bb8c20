use std::rc::Rc;

use crate::storage::KeyValueStore;

pub const HINTS_KEY: &str = "suraido.hints.v1";
pub const DEFAULT_HINTS: u32 = 10;
pub const CHAPTER_BONUS_HINTS: u32 = 5;

/// Hint budget, persisted as a bare integer string.
pub struct HintStore {
    storage: Rc<dyn KeyValueStore>,
    count: u32,
}

impl HintStore {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        let count = load_count(storage.as_ref());
        Self { storage, count }
    }

    pub fn hint_count(&self) -> u32 {
        self.count
    }

    /// Spends one hint. Returns false when the budget is empty.
    pub fn use_hint(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.persist();
        true
    }

    pub fn add_hints(&mut self, amount: u32) {
        self.count = self.count.saturating_add(amount);
        self.persist();
    }

    pub fn add_chapter_bonus(&mut self) {
        self.add_hints(CHAPTER_BONUS_HINTS);
    }

    pub fn reset(&mut self) {
        self.count = DEFAULT_HINTS;
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.storage.set(HINTS_KEY, &self.count.to_string()) {
            log::warn!("failed to persist hint count: {err}");
        }
    }
}

fn load_count(storage: &dyn KeyValueStore) -> u32 {
    match storage.get(HINTS_KEY) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or(DEFAULT_HINTS),
        Ok(None) => DEFAULT_HINTS,
        Err(err) => {
            log::warn!("failed to read hint count: {err}");
            DEFAULT_HINTS
        }
    }
}

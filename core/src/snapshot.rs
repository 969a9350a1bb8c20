use serde::{Deserialize, Serialize};

use crate::grid::GridSize;
use crate::logic::is_permutation;

pub const SESSION_SNAPSHOT_VERSION: u32 = 1;

/// Serialized in-progress attempt for one level, saved on every exit path
/// and restored when the same chapter/level is reopened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub chapter_id: u32,
    pub level_id: u32,
    pub grid: Vec<usize>,
    pub empty_index: usize,
    pub move_count: u32,
    pub hints_used: u32,
    pub shuffle_nonce: u32,
}

impl SessionSnapshot {
    /// A snapshot is usable only if it matches the current schema version
    /// and describes a coherent board: right length, a true permutation,
    /// and the tracked empty index actually holding the empty token.
    pub fn is_valid_for(&self, size: GridSize) -> bool {
        let total = size.total_tiles();
        self.version == SESSION_SNAPSHOT_VERSION
            && self.grid.len() == total
            && is_permutation(&self.grid)
            && self.grid.get(self.empty_index) == Some(&(total - 1))
    }
}

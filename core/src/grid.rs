use serde::{Deserialize, Serialize};

/// Board dimensions. This game's level design uses vertical grids
/// (rows = cols + 1), but the type does not enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub cols: u32,
    pub rows: u32,
}

impl GridSize {
    pub const fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    pub fn total_tiles(&self) -> usize {
        (self.cols * self.rows) as usize
    }
}

pub const DEFAULT_GRID: GridSize = GridSize::new(3, 4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePosition {
    pub row: u32,
    pub col: u32,
}

pub fn index_to_position(index: usize, size: GridSize) -> TilePosition {
    TilePosition {
        row: index as u32 / size.cols,
        col: index as u32 % size.cols,
    }
}

pub fn position_to_index(position: TilePosition, size: GridSize) -> usize {
    (position.row * size.cols + position.col) as usize
}

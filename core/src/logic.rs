use crate::grid::{index_to_position, position_to_index, GridSize, TilePosition};

pub const SHUFFLE_MOVES_PER_TILE: usize = 5;
pub const SHUFFLE_SEED_BASE: u32 = 0x511D_E5ED;

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

pub fn rand_unit(seed: u32, salt: u32) -> f32 {
    let mixed = splitmix32(seed ^ salt);
    let top = mixed >> 8;
    top as f32 / ((1u32 << 24) as f32)
}

pub fn shuffle_seed(base: u32, nonce: u32, size: GridSize) -> u32 {
    let grid = (size.cols << 16) ^ size.rows;
    base ^ nonce.wrapping_mul(0x9E37_79B9) ^ grid ^ 0x5CA7_7EED
}

/// The solved layout: tile values `0..N-1` in place. The empty slot is the
/// tile carrying value `N-1`, initially at the last index.
pub fn create_solved_grid(size: GridSize) -> Vec<usize> {
    (0..size.total_tiles()).collect()
}

/// Orthogonal neighbors of `index`, in up/down/left/right order, clipped at
/// the grid edges.
pub fn adjacent_indices(index: usize, size: GridSize) -> Vec<usize> {
    let TilePosition { row, col } = index_to_position(index, size);
    let mut adjacent = Vec::with_capacity(4);
    if row > 0 {
        adjacent.push(position_to_index(TilePosition { row: row - 1, col }, size));
    }
    if row + 1 < size.rows {
        adjacent.push(position_to_index(TilePosition { row: row + 1, col }, size));
    }
    if col > 0 {
        adjacent.push(position_to_index(TilePosition { row, col: col - 1 }, size));
    }
    if col + 1 < size.cols {
        adjacent.push(position_to_index(TilePosition { row, col: col + 1 }, size));
    }
    adjacent
}

pub fn can_move_tile(tile_index: usize, empty_index: usize, size: GridSize) -> bool {
    adjacent_indices(empty_index, size).contains(&tile_index)
}

pub fn swap_tiles(grid: &[usize], index_a: usize, index_b: usize) -> Vec<usize> {
    let mut next = grid.to_vec();
    next.swap(index_a, index_b);
    next
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub grid: Vec<usize>,
    pub empty_index: usize,
    pub moved: bool,
}

/// Slides the tile at `tile_index` into the empty slot. An illegal move is a
/// no-op that returns the input unchanged with `moved = false`; callers must
/// only count a move when `moved` is true.
pub fn perform_move(
    grid: &[usize],
    tile_index: usize,
    empty_index: usize,
    size: GridSize,
) -> MoveOutcome {
    if !can_move_tile(tile_index, empty_index, size) {
        return MoveOutcome {
            grid: grid.to_vec(),
            empty_index,
            moved: false,
        };
    }
    MoveOutcome {
        grid: swap_tiles(grid, tile_index, empty_index),
        empty_index: tile_index,
        moved: true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffledGrid {
    pub grid: Vec<usize>,
    pub empty_index: usize,
}

/// Random walk of `N*5` legal moves starting from the solved grid, so every
/// result is reachable from solved and therefore solvable. Each step refuses
/// to slide back the tile moved on the previous step, which keeps move pairs
/// from cancelling and guarantees the result differs from solved.
pub fn shuffle_grid(size: GridSize, seed: u32) -> ShuffledGrid {
    let total = size.total_tiles();
    let mut grid = create_solved_grid(size);
    let mut empty_index = total.saturating_sub(1);
    let moves = total * SHUFFLE_MOVES_PER_TILE;
    let mut last_empty: Option<usize> = None;

    for step in 0..moves {
        let adjacent = adjacent_indices(empty_index, size);
        let candidates: Vec<usize> = adjacent
            .iter()
            .copied()
            .filter(|idx| Some(*idx) != last_empty)
            .collect();
        // Degenerate 1xN grids can filter every neighbor away.
        let candidates = if candidates.is_empty() { adjacent } else { candidates };
        let pick = (rand_unit(seed, step as u32) * candidates.len() as f32) as usize;
        let tile_to_move = candidates[pick.min(candidates.len() - 1)];
        grid.swap(tile_to_move, empty_index);
        last_empty = Some(empty_index);
        empty_index = tile_to_move;
    }

    ShuffledGrid { grid, empty_index }
}

pub fn is_solved(grid: &[usize]) -> bool {
    grid.iter().enumerate().all(|(index, value)| *value == index)
}

/// Percentage of tiles in their home position, rounded to nearest.
pub fn progress_percentage(grid: &[usize]) -> u32 {
    if grid.is_empty() {
        return 0;
    }
    let correct = grid
        .iter()
        .enumerate()
        .filter(|(index, value)| **value == *index)
        .count();
    ((correct as f64 / grid.len() as f64) * 100.0).round() as u32
}

/// True iff `grid` holds each of `0..len` exactly once.
pub fn is_permutation(grid: &[usize]) -> bool {
    let mut seen = vec![false; grid.len()];
    for value in grid {
        match seen.get_mut(*value) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

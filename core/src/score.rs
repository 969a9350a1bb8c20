use crate::grid::GridSize;

#[derive(Debug, Clone, Copy)]
pub struct StarThreshold {
    pub cols: u32,
    pub rows: u32,
    pub gold: u32,
    pub silver: u32,
}

/// Move-count thresholds per grid, tuned for the vertical N x N+1 layouts.
pub const STAR_THRESHOLDS: &[StarThreshold] = &[
    StarThreshold { cols: 2, rows: 3, gold: 10, silver: 20 },
    StarThreshold { cols: 3, rows: 4, gold: 25, silver: 45 },
    StarThreshold { cols: 4, rows: 5, gold: 50, silver: 90 },
    StarThreshold { cols: 5, rows: 6, gold: 80, silver: 140 },
];

pub const FALLBACK_GOLD_PER_TILE: u32 = 4;
pub const FALLBACK_SILVER_PER_TILE: u32 = 6;

pub fn star_threshold_for(size: GridSize) -> (u32, u32) {
    match STAR_THRESHOLDS
        .iter()
        .find(|entry| entry.cols == size.cols && entry.rows == size.rows)
    {
        Some(entry) => (entry.gold, entry.silver),
        None => {
            let tiles = size.cols * size.rows;
            (tiles * FALLBACK_GOLD_PER_TILE, tiles * FALLBACK_SILVER_PER_TILE)
        }
    }
}

/// 3 stars at or under the gold threshold, 2 at or under silver, else 1.
pub fn calculate_stars(moves: u32, size: GridSize) -> u8 {
    let (gold, silver) = star_threshold_for(size);
    if moves <= gold {
        3
    } else if moves <= silver {
        2
    } else {
        1
    }
}

/// Best-of merge for two progress records of the same level: maximum stars,
/// minimum move count where a zero existing count means "no record yet".
pub fn merge_best(
    existing_stars: u8,
    existing_moves: u32,
    stars: u8,
    moves: u32,
) -> (u8, u32) {
    let merged_stars = existing_stars.max(stars);
    let merged_moves = if existing_moves == 0 {
        moves
    } else {
        existing_moves.min(moves)
    };
    (merged_stars, merged_moves)
}

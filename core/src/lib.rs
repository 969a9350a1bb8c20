pub mod catalog;
pub mod grid;
pub mod layout;
pub mod logic;
pub mod score;
pub mod snapshot;

pub use catalog::{
    grid_size_for_level, normalize_grid_size, Catalog, ChapterInfo, GridSizeHint, LevelInfo,
    LEVELS_PER_CHAPTER, TOTAL_CHAPTERS,
};
pub use grid::{index_to_position, position_to_index, GridSize, TilePosition, DEFAULT_GRID};
pub use logic::{
    adjacent_indices, can_move_tile, create_solved_grid, is_permutation, is_solved,
    perform_move, progress_percentage, shuffle_grid, shuffle_seed, MoveOutcome, ShuffledGrid,
    SHUFFLE_MOVES_PER_TILE, SHUFFLE_SEED_BASE,
};
pub use score::{calculate_stars, merge_best, star_threshold_for, STAR_THRESHOLDS};
pub use snapshot::{SessionSnapshot, SESSION_SNAPSHOT_VERSION};

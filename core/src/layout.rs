use crate::grid::{index_to_position, GridSize};

/// Top-left pixel corner of the tile slot at `index`.
pub fn tile_position(index: usize, size: GridSize, tile_size: f32, gap: f32) -> (f32, f32) {
    let position = index_to_position(index, size);
    (
        position.col as f32 * (tile_size + gap),
        position.row as f32 * (tile_size + gap),
    )
}

/// Offset of the sliced background image for the tile carrying `tile_value`,
/// as negative top/left shifts into the full picture.
pub fn image_offset(tile_value: usize, size: GridSize, tile_size: f32) -> (f32, f32) {
    let home = index_to_position(tile_value, size);
    (
        -(home.row as f32 * tile_size),
        -(home.col as f32 * tile_size),
    )
}

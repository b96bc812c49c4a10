use macroquad::math::{Rect, Vec2};

use crate::tile::TileId;

/// One tile to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Tile actually shown, after animation substitution.
    pub tile: TileId,
    /// Source rectangle in the tileset texture.
    pub src: Rect,
    /// World position, before the camera offset.
    pub dest: Vec2,
    /// Draw mirrored horizontally.
    pub flip_x: bool,
    /// Draw mirrored vertically.
    pub flip_y: bool,
    /// `false` for HUD objects, which stay fixed on screen.
    pub camera_relative: bool,
}

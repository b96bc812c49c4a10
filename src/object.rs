use crate::document::LayerTile;
use crate::properties::Properties;
use crate::spatial::ShapeHandle;
use crate::tile::{Tile, TileId};

/// A tile placed on the board.
#[derive(Debug, Clone)]
pub struct Object {
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Tile this object was placed from.
    pub tile: TileId,
    /// Name of the layer the object came from.
    pub layer: String,
    /// Copy of the tile's properties taken at placement; edits stay local to this object.
    pub properties: Properties,
    /// Footprint in the map's collision space.
    pub handle: ShapeHandle,
    /// Mirrored horizontally.
    pub flip_h: bool,
    /// Mirrored vertically.
    pub flip_v: bool,
    /// Flipped along the anti-diagonal. Kept for callers; not drawn.
    pub flip_d: bool,
}

impl Object {
    /// Places `tile` at `(x, y)` with the flips carried by `cell`.
    pub fn new(x: i32, y: i32, tile: &Tile, cell: LayerTile, layer: &str, handle: ShapeHandle) -> Self {
        Object {
            x,
            y,
            tile: tile.id(),
            layer: layer.to_owned(),
            properties: tile.properties.clone(),
            handle,
            flip_h: cell.flip_h,
            flip_v: cell.flip_v,
            flip_d: cell.flip_d,
        }
    }

    /// Mutable access to this object's own properties.
    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

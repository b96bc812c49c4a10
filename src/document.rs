//! Parsed, format-agnostic map description consumed by the loader.

use std::path::Path;

use crate::assets::AssetSource;
use crate::error::MapError;

/// A parsed tilemap.
#[derive(Debug, Clone, Default)]
pub struct TilemapDocument {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Tile layers, bottom first.
    pub layers: Vec<LayerDocument>,
    /// Only the first one is used.
    pub tilesets: Vec<TilesetDocument>,
}

/// One tile layer, cells in row-major order.
#[derive(Debug, Clone, Default)]
pub struct LayerDocument {
    /// Also the tag of every shape the layer places.
    pub name: String,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// `None` for empty cells.
    pub cells: Vec<Option<LayerTile>>,
}

/// A populated layer cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerTile {
    /// Tileset-local tile id.
    pub id: u32,
    /// Horizontal flip bit.
    pub flip_h: bool,
    /// Vertical flip bit.
    pub flip_v: bool,
    /// Diagonal flip bit.
    pub flip_d: bool,
}

impl LayerTile {
    /// An unflipped cell showing `id`.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

/// A tileset: grid geometry, image and per-tile metadata.
#[derive(Debug, Clone, Default)]
pub struct TilesetDocument {
    /// Tileset name.
    pub name: String,
    /// Tiles per row of the image.
    pub columns: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Pixels between tiles; 0 if not used.
    pub spacing: u32,
    /// Pixels around the grid; 0 if not used.
    pub margin: u32,
    /// Image path, relative to the loader's tiled directory.
    pub image: String,
    /// `#RRGGBB` color to treat as transparent.
    pub transparent_color: Option<String>,
    /// Tiles carrying extra metadata.
    pub tiles: Vec<TileDocument>,
}

/// Per-tile metadata declared on a tileset.
#[derive(Debug, Clone, Default)]
pub struct TileDocument {
    /// Tileset-local id.
    pub id: u32,
    /// Custom properties, in declaration order.
    pub properties: Vec<RawProperty>,
    /// Collision shapes; only the first shape of the first group is used.
    pub object_groups: Vec<ObjectGroupDocument>,
    /// Empty when the tile is not animated.
    pub animation: Vec<FrameDocument>,
}

/// A property as written in the file, value still textual.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawProperty {
    /// Property name.
    pub name: String,
    /// Value text.
    pub value: String,
    /// Declared type name.
    pub kind: String,
}

/// Collision shapes attached to a tile.
#[derive(Debug, Clone, Default)]
pub struct ObjectGroupDocument {
    /// Shapes in declaration order.
    pub objects: Vec<ShapeDocument>,
}

/// Rectangle relative to the tile's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeDocument {
    /// Horizontal offset in pixels.
    pub x: f32,
    /// Vertical offset in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// One animation frame as declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDocument {
    /// Tile shown during this frame.
    pub tile_id: u32,
    /// How long it stays, in milliseconds.
    pub duration_ms: u32,
}

/// Turns a map file into a [`TilemapDocument`].
pub trait DocumentParser {
    /// Reads and parses the file at `path`, pulling referenced files from `assets`.
    fn parse(&self, path: &Path, assets: &dyn AssetSource) -> Result<TilemapDocument, MapError>;
}

#![warn(missing_docs)]

//! Tiled map loader for Macroquad: slices the tileset image, registers
//! tiles and animations, and places every layer cell as an object in a
//! collision space.

mod animation;
mod assets;
mod command;
mod config;
mod document;
mod error;
mod image;
mod layer;
mod loader {
    pub mod json_loader;
}
mod map;
mod object;
mod properties;
mod render;
mod spatial;
mod tile;
mod tileset;

pub use animation::{Animation, Frame};
pub use assets::{AssetSource, DirAssets, MemoryAssets};
pub use command::DrawCommand;
pub use config::LoaderConfig;
pub use document::{
    DocumentParser, FrameDocument, LayerDocument, LayerTile, ObjectGroupDocument, RawProperty,
    ShapeDocument, TileDocument, TilemapDocument, TilesetDocument,
};
pub use error::{ErrorKind, MapError};
pub use image::{parse_hex_color, strip_color, ImageDecoder, MacroquadDecoder};
pub use layer::SceneAssembler;
pub use loader::json_loader::{JsonDocumentParser, FLIP_D, FLIP_H, FLIP_V, GID_MASK};
pub use map::{Map, MapLoader};
pub use object::Object;
pub use properties::{Properties, Property};
pub use render::draw_commands;
pub use spatial::{CellCoord, ShapeHandle, Space, SpaceShape};
pub use tile::{CollisionShape, Tile, TileId, TileRegistry};
pub use tileset::{ImageRegion, TilesetImageIndex};

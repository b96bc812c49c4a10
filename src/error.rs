use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tile::TileId;

/// Broad classification of a [`MapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The map or tileset description is unusable as given.
    Configuration,
    /// Bytes could not be read or decoded.
    Decode,
    /// The tileset is self-inconsistent (e.g. a frame tile without an image).
    InvariantViolation,
    /// A placed object references a tile that was never registered.
    Lookup,
}

/// Error type for loading and drawing a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// The map declares no tilesets.
    #[error("no tilesets found in the map")]
    NoTilesets,

    /// A layer's declared size differs from the map's size.
    #[error(
        "layer '{layer}' is {width}x{height} but the map is {map_width}x{map_height}"
    )]
    LayerSizeMismatch {
        /// Layer name.
        layer: String,
        /// Declared layer width in tiles.
        width: u32,
        /// Declared layer height in tiles.
        height: u32,
        /// Map width in tiles.
        map_width: u32,
        /// Map height in tiles.
        map_height: u32,
    },

    /// A layer's cell grid does not hold `width * height` cells.
    #[error("layer '{layer}' has {actual} cells, expected {expected}")]
    LayerDataLength {
        /// Layer name.
        layer: String,
        /// `width * height`.
        expected: usize,
        /// Cells actually present.
        actual: usize,
    },

    /// A layer cell references a gid outside the first tileset.
    #[error("layer '{layer}' references gid {gid} below the tileset's first gid {first_gid}")]
    InvalidTileGid {
        /// Layer name.
        layer: String,
        /// Raw gid with the flip bits cleared.
        gid: u32,
        /// First gid of the tileset.
        first_gid: u32,
    },

    /// The map's pixel size does not fit in a `u32`.
    #[error("map of {width}x{height} tiles at {tile_width}x{tile_height} px is too large")]
    MapTooLarge {
        /// Map width in tiles.
        width: u32,
        /// Map height in tiles.
        height: u32,
        /// Tile width in pixels.
        tile_width: u32,
        /// Tile height in pixels.
        tile_height: u32,
    },

    /// The map or tileset file is not in a supported format.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// File I/O error.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// JSON parse error.
    #[error("failed to parse {path}: {source}")]
    Json {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The tileset image could not be decoded.
    #[error("failed to decode tileset image {path}: {message}")]
    ImageDecode {
        /// Image file.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The tileset's transparent color is not a `#RRGGBB` string.
    #[error("invalid transparent color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    /// A tile that must be drawable resolved to no image.
    #[error("tile {0} has no image")]
    MissingTileImage(TileId),

    /// An animation was declared without frames.
    #[error("animation for tile {0} has no frames")]
    EmptyAnimation(TileId),

    /// A placed object references an unregistered tile.
    #[error("tile {0} is not registered")]
    UnknownTile(TileId),
}

impl MapError {
    /// Which part of the error taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MapError::NoTilesets
            | MapError::LayerSizeMismatch { .. }
            | MapError::LayerDataLength { .. }
            | MapError::InvalidTileGid { .. }
            | MapError::MapTooLarge { .. }
            | MapError::UnsupportedFormat(_) => ErrorKind::Configuration,
            MapError::Io { .. }
            | MapError::Json { .. }
            | MapError::ImageDecode { .. }
            | MapError::InvalidColor(_) => ErrorKind::Decode,
            MapError::MissingTileImage(_) | MapError::EmptyAnimation(_) => {
                ErrorKind::InvariantViolation
            }
            MapError::UnknownTile(_) => ErrorKind::Lookup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors_by_kind() {
        assert_eq!(MapError::NoTilesets.kind(), ErrorKind::Configuration);
        assert_eq!(
            MapError::MapTooLarge {
                width: u32::MAX,
                height: 1,
                tile_width: 8,
                tile_height: 8,
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            MapError::InvalidColor("zz".into()).kind(),
            ErrorKind::Decode
        );
        assert_eq!(
            MapError::MissingTileImage(TileId(4)).kind(),
            ErrorKind::InvariantViolation
        );
        assert_eq!(MapError::UnknownTile(TileId(9)).kind(), ErrorKind::Lookup);
    }

    #[test]
    fn layer_mismatch_message_names_the_layer() {
        let err = MapError::LayerSizeMismatch {
            layer: "ground".into(),
            width: 3,
            height: 2,
            map_width: 2,
            map_height: 2,
        };
        assert_eq!(
            err.to_string(),
            "layer 'ground' is 3x2 but the map is 2x2"
        );
    }
}

use std::collections::HashMap;
use std::fmt;

use crate::document::ShapeDocument;
use crate::properties::Properties;
use crate::tileset::ImageRegion;

/// Tileset-local tile id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Collision rectangle relative to a tile's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionShape {
    /// Offset from the tile's left edge.
    pub x: f32,
    /// Offset from the tile's top edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl From<ShapeDocument> for CollisionShape {
    fn from(s: ShapeDocument) -> Self {
        CollisionShape {
            x: s.x,
            y: s.y,
            width: s.width,
            height: s.height,
        }
    }
}

/// Shared description of one tileset tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    id: TileId,
    /// Region in the tileset image; `None` when the tile has no pixels.
    pub image: Option<ImageRegion>,
    /// Whether the tileset declares an animation for this tile.
    pub has_animation: bool,
    /// Set only for tiles with a custom collision shape.
    pub collision: Option<CollisionShape>,
    /// Custom properties declared in the tileset.
    pub properties: Properties,
}

impl Tile {
    /// A bare tile: no image, no animation, default collision.
    pub fn new(id: TileId) -> Self {
        Tile {
            id,
            image: None,
            has_animation: false,
            collision: None,
            properties: Properties::new(),
        }
    }

    /// Id of this tile in its tileset.
    pub fn id(&self) -> TileId {
        self.id
    }

    /// Whether a collision shape replaces the full-tile footprint.
    pub fn has_custom_collision(&self) -> bool {
        self.collision.is_some()
    }

    /// Sets the image region.
    pub fn with_image(mut self, image: Option<ImageRegion>) -> Self {
        self.image = image;
        self
    }

    /// Sets the properties.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Sets a custom collision shape.
    pub fn with_collision(mut self, shape: CollisionShape) -> Self {
        self.collision = Some(shape);
        self
    }

    /// Marks the tile as animated.
    pub fn with_animation(mut self) -> Self {
        self.has_animation = true;
        self
    }
}

/// All tiles known to a map, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    tiles: HashMap<TileId, Tile>,
}

impl TileRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `tile` unless its id is already present. Returns whether it
    /// was inserted; the first registration always wins.
    pub fn register(&mut self, tile: Tile) -> bool {
        match self.tiles.entry(tile.id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(tile);
                true
            }
        }
    }

    /// Looks up a tile by id.
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Whether `id` is registered.
    pub fn has(&self, id: TileId) -> bool {
        self.tiles.contains_key(&id)
    }

    /// Number of registered tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Property;

    #[test]
    fn first_registration_wins() {
        let mut reg = TileRegistry::new();
        let mut props = Properties::new();
        props.insert(
            "solid",
            Property {
                value: "true".into(),
                kind: "bool".into(),
            },
        );

        assert!(reg.register(Tile::new(TileId(3)).with_properties(props.clone())));
        assert!(!reg.register(
            Tile::new(TileId(3)).with_collision(CollisionShape {
                x: 1.0,
                y: 1.0,
                width: 6.0,
                height: 6.0
            })
        ));

        let tile = reg.get(TileId(3)).unwrap();
        assert_eq!(tile.properties, props);
        assert!(!tile.has_custom_collision());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn lookup_of_unknown_id() {
        let reg = TileRegistry::new();
        assert!(!reg.has(TileId(1)));
        assert!(reg.get(TileId(1)).is_none());
        assert!(reg.is_empty());
    }
}

use crate::animation::{Animation, Frame};
use crate::assets::{AssetSource, DirAssets};
use crate::command::DrawCommand;
use crate::config::LoaderConfig;
use crate::document::{DocumentParser, TilemapDocument, TilesetDocument};
use crate::error::MapError;
use crate::image::{parse_hex_color, strip_color, ImageDecoder, MacroquadDecoder};
use crate::layer::SceneAssembler;
use crate::loader::json_loader::JsonDocumentParser;
use crate::object::Object;
use crate::properties::Properties;
use crate::render::draw_commands;
use crate::spatial::Space;
use crate::tile::{Tile, TileId, TileRegistry};
use crate::tileset::TilesetImageIndex;
use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A loaded map: its tiles, animations and placed objects.
pub struct Map {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    /// Name of the tileset in use.
    pub tileset_name: String,
    index: TilesetImageIndex,
    tiles: TileRegistry,
    animations: HashMap<TileId, Animation>,
    objects: Vec<Object>, // paint order
    space: Space,
    hud_tag: String,
}

impl Map {
    /// Loads a Tiled JSON map from disk, resolving the tileset image next to it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let map_dir = path
            .parent()
            .map(|d| d.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./"));
        let assets = DirAssets::default();
        MapLoader::new(LoaderConfig::with_tiled_dir(map_dir), &assets, &MacroquadDecoder)
            .load(path, &JsonDocumentParser)
    }

    /// Every registered tile, including tiles first seen in a layer.
    pub fn tiles(&self) -> &TileRegistry {
        &self.tiles
    }

    /// Running animations, keyed by the animated tile.
    pub fn animations(&self) -> &HashMap<TileId, Animation> {
        &self.animations
    }

    /// Placed objects in paint order.
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Mutable objects, e.g. to edit their property copies.
    pub fn objects_mut(&mut self) -> &mut [Object] {
        &mut self.objects
    }

    /// Collision space holding every object's footprint.
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Grid geometry of the tileset.
    pub fn tileset(&self) -> &TilesetImageIndex {
        &self.index
    }

    /// Decoded tileset image, after the transparent color was applied.
    pub fn tileset_image(&self) -> Option<&Image> {
        self.index.image()
    }

    /// Pixels of a registered tile, copied out of the tileset image.
    /// `None` for unknown tiles and tiles without a region in the image.
    pub fn tile_image(&self, id: TileId) -> Option<Image> {
        let region = self.tiles.get(id)?.image?;
        region.extract(self.index.image()?)
    }

    /// Uploads the tileset image to the GPU. Needs a macroquad window.
    pub fn upload_texture(&self) -> Option<Texture2D> {
        let tex = Texture2D::from_image(self.index.image()?);
        tex.set_filter(FilterMode::Nearest);
        Some(tex)
    }

    fn register_tileset_tiles(&mut self, tileset: &TilesetDocument) -> Result<(), MapError> {
        for td in &tileset.tiles {
            let id = TileId(td.id);
            let mut tile = Tile::new(id)
                .with_image(self.index.image_for(id))
                .with_properties(Properties::parse(&td.properties));

            // only the first shape of the first object group is used
            if let Some(group) = td.object_groups.first() {
                match group.objects.first() {
                    Some(shape) => tile = tile.with_collision((*shape).into()),
                    None => tracing::warn!(tile = td.id, "collision object group has no shapes"),
                }
            }
            if !td.animation.is_empty() {
                tile = tile.with_animation();
            }

            tracing::debug!(
                tile = td.id,
                animated = tile.has_animation,
                custom_collision = tile.has_custom_collision(),
                properties = tile.properties.len(),
                "registering tileset tile"
            );
            if !self.tiles.register(tile) {
                tracing::debug!(tile = td.id, "duplicate tile metadata ignored");
            }
        }
        Ok(())
    }

    fn build_animations(&mut self, tileset: &TilesetDocument, started: Instant) -> Result<(), MapError> {
        for td in tileset.tiles.iter().filter(|td| !td.animation.is_empty()) {
            let id = TileId(td.id);
            for frame in &td.animation {
                let frame_id = TileId(frame.tile_id);
                if !self.tiles.has(frame_id) {
                    self.tiles
                        .register(Tile::new(frame_id).with_image(self.index.image_for(frame_id)));
                }
                if self.tiles.get(frame_id).and_then(|t| t.image).is_none() {
                    return Err(MapError::MissingTileImage(frame_id));
                }
            }

            let frames = td
                .animation
                .iter()
                .map(|f| Frame::from_millis(TileId(f.tile_id), f.duration_ms));
            let animation = Animation::new(frames, started).ok_or(MapError::EmptyAnimation(id))?;
            self.animations.insert(id, animation);
        }
        Ok(())
    }

    fn assembler(&mut self) -> SceneAssembler<'_> {
        SceneAssembler {
            map_width: self.width,
            map_height: self.height,
            tile_w: self.tile_w,
            tile_h: self.tile_h,
            tiles: &mut self.tiles,
            index: &self.index,
            space: &mut self.space,
            objects: &mut self.objects,
        }
    }

    /// [`frame_at`](Self::frame_at) with the current time.
    pub fn frame(&mut self) -> Result<Vec<DrawCommand>, MapError> {
        self.frame_at(Instant::now())
    }

    /// Advances every animation once and returns the draw list in paint order.
    pub fn frame_at(&mut self, now: Instant) -> Result<Vec<DrawCommand>, MapError> {
        let shown: HashMap<TileId, TileId> = self
            .animations
            .iter_mut()
            .map(|(id, anim)| (*id, anim.advance_at(now)))
            .collect();

        let mut commands = Vec::with_capacity(self.objects.len());
        for obj in &self.objects {
            let tile = self
                .tiles
                .get(obj.tile)
                .ok_or(MapError::UnknownTile(obj.tile))?;

            let mut display = tile;
            if tile.has_animation {
                if let Some(&frame) = shown.get(&tile.id()) {
                    display = self.tiles.get(frame).ok_or(MapError::UnknownTile(frame))?;
                }
            }
            let region = display
                .image
                .ok_or(MapError::MissingTileImage(display.id()))?;

            commands.push(DrawCommand {
                tile: display.id(),
                src: region.source_rect(),
                dest: vec2(obj.x as f32, obj.y as f32),
                flip_x: obj.flip_h,
                flip_y: obj.flip_v,
                camera_relative: !self.space.has_tags(obj.handle, &[self.hud_tag.as_str()]),
            });
        }
        Ok(commands)
    }

    /// Draws the map with `texture` (see [`upload_texture`](Self::upload_texture)).
    /// Fails without drawing anything if an object cannot be resolved.
    pub fn draw(&mut self, texture: &Texture2D, camera: Vec2) -> Result<(), MapError> {
        let commands = self.frame()?;
        draw_commands(texture, &commands, camera);
        Ok(())
    }
}

/// Builds a [`Map`] from a document, pulling files through an [`AssetSource`].
pub struct MapLoader<'a> {
    config: LoaderConfig,
    assets: &'a dyn AssetSource,
    decoder: &'a dyn ImageDecoder,
}

impl<'a> MapLoader<'a> {
    /// Loader reading files from `assets` and decoding images with `decoder`.
    pub fn new(config: LoaderConfig, assets: &'a dyn AssetSource, decoder: &'a dyn ImageDecoder) -> Self {
        MapLoader {
            config,
            assets,
            decoder,
        }
    }

    /// Parses the map at `path` with `parser`, then assembles it.
    pub fn load(&self, path: &Path, parser: &dyn DocumentParser) -> Result<Map, MapError> {
        tracing::info!(path = %path.display(), "loading map");
        let doc = parser.parse(path, self.assets)?;
        self.load_document(doc)
    }

    /// Builds a map from an already parsed document.
    pub fn load_document(&self, doc: TilemapDocument) -> Result<Map, MapError> {
        // object positions are i32, so the whole map must fit in that range
        let pixels = |tiles: u32, size: u32| {
            tiles
                .checked_mul(size)
                .filter(|&px| i32::try_from(px).is_ok())
        };
        let (Some(pixel_w), Some(pixel_h)) = (
            pixels(doc.width, doc.tile_width),
            pixels(doc.height, doc.tile_height),
        ) else {
            return Err(MapError::MapTooLarge {
                width: doc.width,
                height: doc.height,
                tile_width: doc.tile_width,
                tile_height: doc.tile_height,
            });
        };
        let space = Space::new(pixel_w, pixel_h, self.config.space_cell_size);

        let tileset = doc.tilesets.first().ok_or(MapError::NoTilesets)?;
        if doc.tilesets.len() > 1 {
            tracing::warn!(
                count = doc.tilesets.len(),
                used = %tileset.name,
                "only the first tileset is used"
            );
        }

        let mut index = TilesetImageIndex::from_document(tileset);
        if let Some(image) = self.load_tileset_image(tileset)? {
            index.set_image(image);
        }

        let mut map = Map {
            width: doc.width,
            height: doc.height,
            tile_w: doc.tile_width,
            tile_h: doc.tile_height,
            tileset_name: tileset.name.clone(),
            index,
            tiles: TileRegistry::new(),
            animations: HashMap::new(),
            objects: Vec::new(),
            space,
            hud_tag: self.config.hud_tag.clone(),
        };

        map.register_tileset_tiles(tileset)?;
        map.build_animations(tileset, Instant::now())?;

        for (i, layer) in doc.layers.iter().enumerate() {
            map.assembler().process_layer(i, layer)?;
        }

        tracing::info!(
            tiles = map.tiles.len(),
            animations = map.animations.len(),
            objects = map.objects.len(),
            "map loaded"
        );
        Ok(map)
    }

    fn load_tileset_image(&self, tileset: &TilesetDocument) -> Result<Option<Image>, MapError> {
        if tileset.image.is_empty() {
            tracing::warn!(tileset = %tileset.name, "tileset has no image");
            return Ok(None);
        }

        let path = self.config.tiled_dir.join(&tileset.image);
        let bytes = self.assets.read(&path).map_err(|source| MapError::Io {
            path: path.clone(),
            source,
        })?;
        let mut image = self
            .decoder
            .decode(&bytes)
            .map_err(|message| MapError::ImageDecode {
                path: path.clone(),
                message,
            })?;

        if let Some(hex) = &tileset.transparent_color {
            let key = parse_hex_color(hex)?;
            let replaced = strip_color(&mut image, key);
            tracing::debug!(color = %hex, replaced, "applied transparent color");
        }
        Ok(Some(image))
    }
}

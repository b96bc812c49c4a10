use macroquad::math::Rect;

use crate::document::LayerDocument;
use crate::error::MapError;
use crate::object::Object;
use crate::spatial::Space;
use crate::tile::{Tile, TileId, TileRegistry};
use crate::tileset::TilesetImageIndex;

/// Turns layer grids into placed objects.
///
/// Borrows the pieces of the map it writes to, so it can run while the
/// map is still being assembled.
pub struct SceneAssembler<'a> {
    /// Map width in tiles; every layer must match it.
    pub map_width: u32,
    /// Map height in tiles.
    pub map_height: u32,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    /// Registry that unknown cell ids are added to.
    pub tiles: &'a mut TileRegistry,
    /// Source of image regions for newly registered tiles.
    pub index: &'a TilesetImageIndex,
    /// Collision space receiving one footprint per object.
    pub space: &'a mut Space,
    /// Placed objects, in paint order.
    pub objects: &'a mut Vec<Object>,
}

impl SceneAssembler<'_> {
    /// Pixel position of the `num`-th cell in row-major order.
    pub fn tile_position(&self, num: usize) -> Result<(i32, i32), MapError> {
        let w = self.map_width.max(1) as usize;
        let px = |cell: usize, size: u32| {
            u32::try_from(cell)
                .ok()
                .and_then(|c| c.checked_mul(size))
                .and_then(|p| i32::try_from(p).ok())
        };
        match (px(num % w, self.tile_w), px(num / w, self.tile_h)) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(self.too_large()),
        }
    }

    fn too_large(&self) -> MapError {
        MapError::MapTooLarge {
            width: self.map_width,
            height: self.map_height,
            tile_width: self.tile_w,
            tile_height: self.tile_h,
        }
    }

    /// Collision footprint of `tile` drawn at `(x, y)`.
    pub fn footprint(&self, x: i32, y: i32, tile: &Tile) -> Rect {
        match tile.collision {
            Some(shape) => Rect::new(
                x as f32 + shape.x,
                y as f32 + shape.y,
                shape.width,
                shape.height,
            ),
            None => Rect::new(x as f32, y as f32, self.tile_w as f32, self.tile_h as f32),
        }
    }

    fn verify_dimensions(&self, layer: &LayerDocument) -> Result<(), MapError> {
        if layer.width != self.map_width || layer.height != self.map_height {
            return Err(MapError::LayerSizeMismatch {
                layer: layer.name.clone(),
                width: layer.width,
                height: layer.height,
                map_width: self.map_width,
                map_height: self.map_height,
            });
        }
        let expected = (layer.width as usize)
            .checked_mul(layer.height as usize)
            .ok_or_else(|| self.too_large())?;
        if layer.cells.len() != expected {
            return Err(MapError::LayerDataLength {
                layer: layer.name.clone(),
                expected,
                actual: layer.cells.len(),
            });
        }
        Ok(())
    }

    /// Places one object per populated cell. Returns how many were placed.
    pub fn process_layer(&mut self, index: usize, layer: &LayerDocument) -> Result<usize, MapError> {
        self.verify_dimensions(layer)?;

        let before = self.objects.len();
        for (num, cell) in layer.cells.iter().enumerate() {
            let Some(cell) = cell else { continue };
            let id = TileId(cell.id);

            if !self.tiles.has(id) {
                self.tiles
                    .register(Tile::new(id).with_image(self.index.image_for(id)));
            }
            let Some(tile) = self.tiles.get(id) else {
                return Err(MapError::UnknownTile(id));
            };

            let (x, y) = self.tile_position(num)?;
            let footprint = self.footprint(x, y, tile);
            let handle = self.space.insert(footprint, &[layer.name.as_str()]);
            let object = Object::new(x, y, tile, *cell, &layer.name, handle);
            self.objects.push(object);
        }

        let placed = self.objects.len() - before;
        tracing::debug!(
            layer = index,
            name = %layer.name,
            cells = layer.cells.len(),
            placed,
            "processed layer"
        );
        Ok(placed)
    }
}

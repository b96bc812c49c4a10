use std::fmt;
use std::sync::Arc;

use macroquad::math::Rect;
use macroquad::texture::Image;

use crate::document::TilesetDocument;
use crate::tile::TileId;

/// Pixel rectangle of one tile inside the tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageRegion {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageRegion {
    /// Source rectangle for `draw_texture_ex`.
    pub fn source_rect(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }

    /// Whether the whole rectangle lies inside `image`.
    pub fn fits(&self, image: &Image) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        right.is_some_and(|r| r <= u32::from(image.width))
            && bottom.is_some_and(|b| b <= u32::from(image.height))
    }

    /// Copies the region's pixels out of `image`, or `None` if the region
    /// is not fully inside it.
    pub fn extract(&self, image: &Image) -> Option<Image> {
        self.fits(image).then(|| image.sub_image(self.source_rect()))
    }
}

/// Grid geometry of a tileset plus its (optional) decoded image.
#[derive(Clone)]
pub struct TilesetImageIndex {
    /// Tiles per row; zero is read as one.
    pub columns: u32,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    /// Gap between neighbouring tiles.
    pub spacing: u32,
    /// Border around the whole grid.
    pub margin: u32,
    image: Option<Arc<Image>>,
}

impl fmt::Debug for TilesetImageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TilesetImageIndex")
            .field("columns", &self.columns)
            .field("tile_w", &self.tile_w)
            .field("tile_h", &self.tile_h)
            .field("spacing", &self.spacing)
            .field("margin", &self.margin)
            .field(
                "image",
                &self.image.as_ref().map(|img| (img.width, img.height)),
            )
            .finish()
    }
}

impl TilesetImageIndex {
    /// Grid without an image.
    pub fn new(columns: u32, tile_w: u32, tile_h: u32, spacing: u32, margin: u32) -> Self {
        TilesetImageIndex {
            columns,
            tile_w,
            tile_h,
            spacing,
            margin,
            image: None,
        }
    }

    /// Grid geometry of the tileset's declaration.
    pub fn from_document(doc: &TilesetDocument) -> Self {
        Self::new(
            doc.columns,
            doc.tile_width,
            doc.tile_height,
            doc.spacing,
            doc.margin,
        )
    }

    /// Attaches (or replaces) the decoded tileset image.
    pub fn set_image(&mut self, image: Image) {
        self.image = Some(Arc::new(image));
    }

    /// The decoded tileset image, if one was loaded.
    pub fn image(&self) -> Option<&Image> {
        self.image.as_deref()
    }

    /// Region of `id` in the tileset image. `None` while no image is
    /// attached, or when the region falls outside the image.
    pub fn image_for(&self, id: TileId) -> Option<ImageRegion> {
        let image = self.image.as_ref()?;
        let region = self.region(id);
        region.fits(image).then_some(region)
    }

    /// Pure grid arithmetic, independent of the image.
    pub fn region(&self, id: TileId) -> ImageRegion {
        // a zero-column tileset would divide by zero; treat it as one column
        let cols = self.columns.max(1);
        let col = id.0 % cols;
        let row = id.0 / cols;
        // saturates so huge ids land outside any image instead of wrapping
        let step = |n: u32, size: u32| {
            n.saturating_mul(size.saturating_add(self.spacing))
                .saturating_add(self.margin)
        };
        ImageRegion {
            x: step(col, self.tile_w),
            y: step(row, self.tile_h),
            width: self.tile_w,
            height: self.tile_h,
        }
    }
}

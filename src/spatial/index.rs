use macroquad::prelude::*;
use std::collections::HashMap;

/// Index of a shape in its [`Space`], in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub u32);

/// Grid cell, in cells rather than pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

/// A rectangle placed in the space together with its tags.
#[derive(Debug, Clone)]
pub struct SpaceShape {
    /// Footprint in world pixels.
    pub rect: Rect,
    /// Names of the layers (or other groups) the shape belongs to.
    pub tags: Vec<String>,
}

impl SpaceShape {
    /// True if the shape carries every tag in `tags`.
    pub fn has_tags(&self, tags: &[&str]) -> bool {
        tags.iter().all(|t| self.tags.iter().any(|own| own == t))
    }
}

/// Uniform grid of buckets holding the handles of every shape that
/// overlaps each cell.
pub struct Space {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Edge length of one bucket, in pixels.
    pub cell_size: u32,
    buckets: HashMap<CellCoord, Vec<ShapeHandle>>,
    shapes: Vec<SpaceShape>,
}

impl Space {
    /// An empty space of `width` x `height` pixels. A zero cell size is read as one.
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        Space {
            width,
            height,
            cell_size: cell_size.max(1),
            buckets: HashMap::new(),
            shapes: Vec::new(),
        }
    }

    fn columns(&self) -> i32 {
        self.width.div_ceil(self.cell_size).max(1) as i32
    }

    fn rows(&self) -> i32 {
        self.height.div_ceil(self.cell_size).max(1) as i32
    }

    /// Cells overlapped by `rect`, clamped to the space.
    fn cells_for(&self, rect: Rect) -> impl Iterator<Item = CellCoord> {
        let cs = self.cell_size as f32;
        let (cols, rows) = (self.columns(), self.rows());
        let cx_min = ((rect.x / cs).floor() as i32).clamp(0, cols - 1);
        let cy_min = ((rect.y / cs).floor() as i32).clamp(0, rows - 1);
        // a rect ending exactly on a cell edge does not touch the next cell
        let cx_max = (((rect.x + rect.w) / cs).ceil() as i32 - 1).clamp(cx_min, cols - 1);
        let cy_max = (((rect.y + rect.h) / cs).ceil() as i32 - 1).clamp(cy_min, rows - 1);

        (cy_min..=cy_max).flat_map(move |y| (cx_min..=cx_max).map(move |x| CellCoord { x, y }))
    }

    /// Adds a shape and files it under every cell it overlaps.
    pub fn insert(&mut self, rect: Rect, tags: &[&str]) -> ShapeHandle {
        let handle = ShapeHandle(self.shapes.len() as u32);
        self.shapes.push(SpaceShape {
            rect,
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        });
        let cells: Vec<CellCoord> = self.cells_for(rect).collect();
        for cc in cells {
            self.buckets.entry(cc).or_insert_with(Vec::new).push(handle);
        }
        handle
    }

    /// The shape behind `handle`.
    pub fn shape(&self, handle: ShapeHandle) -> Option<&SpaceShape> {
        self.shapes.get(handle.0 as usize)
    }

    /// [`SpaceShape::has_tags`] for `handle`; false for unknown handles.
    pub fn has_tags(&self, handle: ShapeHandle, tags: &[&str]) -> bool {
        self.shape(handle).is_some_and(|s| s.has_tags(tags))
    }

    /// Handles whose rectangles overlap `area`, in insertion order.
    pub fn query(&self, area: Rect) -> Vec<ShapeHandle> {
        let mut found: Vec<ShapeHandle> = self
            .cells_for(area)
            .filter_map(|cc| self.buckets.get(&cc))
            .flatten()
            .copied()
            .filter(|h| self.shapes[h.0 as usize].rect.overlaps(&area))
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Number of shapes inserted.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether no shape was inserted.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[cfg(test)]
    fn bucket(&self, x: i32, y: i32) -> &[ShapeHandle] {
        self.buckets
            .get(&CellCoord { x, y })
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[cfg(test)]
    fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }
}

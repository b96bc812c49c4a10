mod index;

pub use index::{CellCoord, ShapeHandle, Space, SpaceShape};

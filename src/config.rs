use std::path::PathBuf;

/// Settings handed to [`MapLoader`](crate::MapLoader) at load time.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory the tileset image paths are resolved against.
    pub tiled_dir: PathBuf,
    /// Cell size of the collision space grid, in pixels.
    pub space_cell_size: u32,
    /// Shape tag marking objects drawn in screen space instead of world space.
    pub hud_tag: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            tiled_dir: PathBuf::from("."),
            space_cell_size: 16,
            hud_tag: "hud".to_owned(),
        }
    }
}

impl LoaderConfig {
    /// Default settings with tileset images resolved against `dir`.
    pub fn with_tiled_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            tiled_dir: dir.into(),
            ..Default::default()
        }
    }
}

// tests/load_tests.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use macroquad::color::Color;
use macroquad::texture::Image;
use macroquad_tiled_scene::{
    ErrorKind, ImageDecoder, JsonDocumentParser, LoaderConfig, Map, MapError, MapLoader,
    MemoryAssets, TileId,
};

/// Hands back a fixed image regardless of the bytes it is given.
struct FixedDecoder(Image);

impl ImageDecoder for FixedDecoder {
    fn decode(&self, _bytes: &[u8]) -> Result<Image, String> {
        Ok(self.0.clone())
    }
}

struct FailingDecoder;

impl ImageDecoder for FailingDecoder {
    fn decode(&self, _bytes: &[u8]) -> Result<Image, String> {
        Err("bad png".into())
    }
}

fn pixels(width: u16, height: u16, pixels: &[[u8; 4]]) -> Image {
    Image {
        bytes: pixels.iter().flatten().copied().collect(),
        width,
        height,
    }
}

const MAP_JSON: &str = r#"{
  "width": 2,
  "height": 1,
  "tilewidth": 1,
  "tileheight": 1,
  "layers": [
    {"type":"tilelayer","name":"ground","width":2,"height":1,"data":[1,3]}
  ],
  "tilesets": [{"firstgid": 1, "source": "world.json"}]
}"#;

const TILESET_JSON: &str = r##"{
  "name": "world",
  "tilewidth": 1,
  "tileheight": 1,
  "columns": 2,
  "image": "world.png",
  "transparentcolor": "#ff00ff",
  "tiles": [
    {"id": 2, "properties": [{"name":"solid","type":"bool","value":true}]}
  ]
}"##;

fn json_assets() -> MemoryAssets {
    MemoryAssets::new()
        .with("maps/level.json", MAP_JSON)
        .with("maps/world.json", TILESET_JSON)
        .with("maps/world.png", "png bytes")
}

#[test]
fn loads_json_map_and_strips_transparent_color() {
    let assets = json_assets();
    let decoder = FixedDecoder(pixels(
        2,
        2,
        &[
            [255, 0, 255, 255],
            [254, 0, 255, 255],
            [255, 0, 255, 254],
            [255, 0, 255, 255],
        ],
    ));

    let map = MapLoader::new(LoaderConfig::with_tiled_dir("maps"), &assets, &decoder)
        .load(Path::new("maps/level.json"), &JsonDocumentParser)
        .expect("map should load");

    assert_eq!(map.tileset_name, "world");
    let image = map.tileset_image().expect("tileset image");
    assert_eq!(&image.bytes[0..4], &[0, 0, 0, 0]);
    assert_eq!(&image.bytes[4..8], &[254, 0, 255, 255]);
    assert_eq!(&image.bytes[8..12], &[255, 0, 255, 254]);
    assert_eq!(&image.bytes[12..16], &[0, 0, 0, 0]);

    let tiles: Vec<_> = map.objects().iter().map(|o| o.tile).collect();
    assert_eq!(tiles, vec![TileId(0), TileId(2)]);
    assert_eq!(map.objects()[1].properties.get_bool("solid"), Some(true));

    let tile = map.tile_image(TileId(2)).expect("tile pixels");
    assert_eq!((tile.width, tile.height), (1, 1));
    assert_eq!(&tile.bytes[..], &[255, 0, 255, 254]);
}

#[test]
fn decode_failure_is_surfaced_with_the_path() {
    let assets = json_assets();
    let err = MapLoader::new(LoaderConfig::with_tiled_dir("maps"), &assets, &FailingDecoder)
        .load(Path::new("maps/level.json"), &JsonDocumentParser)
        .err()
        .expect("expected decode error");

    assert!(matches!(
        err,
        MapError::ImageDecode { ref path, ref message }
            if path == Path::new("maps/world.png") && message == "bad png"
    ));
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn invalid_transparent_color_is_a_decode_error() {
    let assets = json_assets().with(
        "maps/world.json",
        TILESET_JSON.replace("#ff00ff", "#ff00"),
    );
    let decoder = FixedDecoder(pixels(1, 1, &[[0, 0, 0, 255]]));

    let err = MapLoader::new(LoaderConfig::with_tiled_dir("maps"), &assets, &decoder)
        .load(Path::new("maps/level.json"), &JsonDocumentParser)
        .err()
        .expect("expected color error");
    assert!(matches!(err, MapError::InvalidColor(ref c) if c == "#ff00"));
}

#[test]
fn missing_tileset_image_is_an_io_error() {
    let assets = MemoryAssets::new()
        .with("maps/level.json", MAP_JSON)
        .with("maps/world.json", TILESET_JSON);
    let decoder = FixedDecoder(pixels(1, 1, &[[0, 0, 0, 255]]));

    let err = MapLoader::new(LoaderConfig::with_tiled_dir("maps"), &assets, &decoder)
        .load(Path::new("maps/level.json"), &JsonDocumentParser)
        .err()
        .expect("expected io error");
    assert!(matches!(err, MapError::Io { .. }));
}

fn temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("mq_tiled_scene_load_{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

#[test]
fn map_load_reads_png_from_disk() {
    let dir = temp_dir();
    fs::write(dir.join("level.json"), MAP_JSON).expect("failed to write map");
    fs::write(dir.join("world.json"), TILESET_JSON).expect("failed to write tileset");

    let magenta = Image::gen_image_color(2, 2, Color::from_rgba(255, 0, 255, 255));
    magenta.export_png(dir.join("world.png").to_str().expect("path utf8"));

    let map = Map::load(dir.join("level.json")).expect("map should load");
    let image = map.tileset_image().expect("tileset image");
    assert_eq!((image.width, image.height), (2, 2));
    assert!(image.bytes.iter().all(|&b| b == 0), "every pixel is keyed out");
    assert_eq!(map.objects().len(), 2);
}

#[test]
fn map_load_rejects_non_json() {
    let err = Map::load("level.tmx").err().expect("expected format error");
    assert!(matches!(err, MapError::UnsupportedFormat(ref p) if p == "level.tmx"));
}

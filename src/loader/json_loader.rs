// Tiled JSON -> TilemapDocument
use crate::assets::AssetSource;
use crate::document::*;
use crate::error::MapError;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

/// Horizontal flip flag of a layer gid (bit 31).
pub const FLIP_H: u32 = 0x8000_0000;
/// Vertical flip flag (bit 30).
pub const FLIP_V: u32 = 0x4000_0000;
/// Diagonal flip flag (bit 29).
pub const FLIP_D: u32 = 0x2000_0000;
/// Keeps the lower 29 bits of a gid; bit 28 is free.
pub const GID_MASK: u32 = 0x1FFF_FFFF;

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" expected here
}

#[derive(Deserialize)]
struct JsonMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonValue>, // either {firstgid, source} or an embedded tileset
}

#[derive(Deserialize)]
struct JsonTileset {
    #[serde(default)]
    name: String,
    tilewidth: u32,
    tileheight: u32,
    columns: u32,
    image: String,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    transparentcolor: Option<String>,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
}

#[derive(Deserialize)]
struct JsonObjectGroup {
    #[serde(default)]
    objects: Vec<JsonObject>,
}

#[derive(Deserialize)]
struct JsonFrame {
    tileid: u32,
    duration: u32,
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    objectgroup: Option<JsonObjectGroup>,
    #[serde(default)]
    animation: Vec<JsonFrame>,
}

/// Reads Tiled JSON maps with embedded or external JSON tilesets.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentParser;

impl DocumentParser for JsonDocumentParser {
    fn parse(&self, path: &Path, assets: &dyn AssetSource) -> Result<TilemapDocument, MapError> {
        decode_map_file(path, assets)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(
    path: &Path,
    assets: &dyn AssetSource,
) -> Result<T, MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(path.display().to_string()));
    }
    let bytes = assets.read(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn json_property(prop: JsonProperty) -> RawProperty {
    let JsonProperty { name, kind, value } = prop;
    let value = match value {
        JsonValue::String(s) => s,
        other => other.to_string(),
    };
    RawProperty {
        name,
        value,
        kind: kind.unwrap_or_else(|| "string".to_owned()),
    }
}

fn tile_to_document(tile: JsonTile) -> TileDocument {
    TileDocument {
        id: tile.id,
        properties: tile.properties.into_iter().map(json_property).collect(),
        object_groups: tile
            .objectgroup
            .into_iter()
            .map(|group| ObjectGroupDocument {
                objects: group
                    .objects
                    .into_iter()
                    .map(|o| ShapeDocument {
                        x: o.x,
                        y: o.y,
                        width: o.width,
                        height: o.height,
                    })
                    .collect(),
            })
            .collect(),
        animation: tile
            .animation
            .into_iter()
            .map(|f| FrameDocument {
                tile_id: f.tileid,
                duration_ms: f.duration,
            })
            .collect(),
    }
}

/// `image_dir` is the tileset file's directory relative to the map's directory.
fn tileset_to_document(ts: JsonTileset, image_dir: &Path) -> TilesetDocument {
    TilesetDocument {
        name: ts.name,
        columns: ts.columns,
        tile_width: ts.tilewidth,
        tile_height: ts.tileheight,
        spacing: ts.spacing,
        margin: ts.margin,
        image: image_dir.join(&ts.image).to_string_lossy().into_owned(),
        transparent_color: ts.transparentcolor,
        tiles: ts.tiles.into_iter().map(tile_to_document).collect(),
    }
}

fn layer_cell(raw_gid: u32, first_gid: u32, layer: &str) -> Result<Option<LayerTile>, MapError> {
    let gid = raw_gid & GID_MASK;
    if gid == 0 {
        return Ok(None);
    }
    if gid < first_gid {
        return Err(MapError::InvalidTileGid {
            layer: layer.to_owned(),
            gid,
            first_gid,
        });
    }
    Ok(Some(LayerTile {
        id: gid - first_gid,
        flip_h: raw_gid & FLIP_H != 0,
        flip_v: raw_gid & FLIP_V != 0,
        flip_d: raw_gid & FLIP_D != 0,
    }))
}

/// Reads a Tiled JSON map and its first tileset (embedded or external).
pub fn decode_map_file(path: &Path, assets: &dyn AssetSource) -> Result<TilemapDocument, MapError> {
    let j: JsonMap = read_json(path, assets)?;

    let map_dir = path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    let mut tilesets = Vec::with_capacity(j.tilesets.len());
    let mut first_gids = Vec::with_capacity(j.tilesets.len());
    for entry in j.tilesets {
        let first_gid = entry.get("firstgid").and_then(JsonValue::as_u64).unwrap_or(1) as u32;
        let source = entry
            .get("source")
            .and_then(JsonValue::as_str)
            .map(PathBuf::from);
        let doc = match source {
            Some(source) => {
                let ts: JsonTileset = read_json(&map_dir.join(&source), assets)?;
                tileset_to_document(ts, source.parent().unwrap_or(Path::new("")))
            }
            None => {
                let ts: JsonTileset =
                    serde_json::from_value(entry).map_err(|source| MapError::Json {
                        path: path.to_path_buf(),
                        source,
                    })?;
                tileset_to_document(ts, Path::new(""))
            }
        };
        first_gids.push(first_gid);
        tilesets.push(doc);
    }

    // Only the first tileset is drawn from, so its firstgid anchors local ids.
    let first_gid = first_gids.first().copied().unwrap_or(1);

    let mut layers = Vec::with_capacity(j.layers.len());
    for l in j.layers {
        match l.kind.as_deref().unwrap_or("tilelayer") {
            "tilelayer" => {
                let cells = l
                    .data
                    .iter()
                    .map(|&raw| layer_cell(raw, first_gid, &l.name))
                    .collect::<Result<Vec<_>, _>>()?;
                layers.push(LayerDocument {
                    name: l.name,
                    width: l.width,
                    height: l.height,
                    cells,
                });
            }
            other => {
                tracing::debug!(layer = %l.name, kind = other, "skipping non-tile layer");
            }
        }
    }

    Ok(TilemapDocument {
        width: j.width,
        height: j.height,
        tile_width: j.tilewidth,
        tile_height: j.tileheight,
        layers,
        tilesets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{DirAssets, MemoryAssets};
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("mq_tiled_scene_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    const EMBEDDED_MAP: &str = r##"{
      "width": 2,
      "height": 2,
      "tilewidth": 8,
      "tileheight": 8,
      "layers": [
        {"type":"tilelayer","name":"ground","width":2,"height":2,"data":[2,0,2147483651,0]},
        {"type":"objectgroup","name":"spawns","objects":[]}
      ],
      "tilesets": [{
        "firstgid": 1,
        "name": "world",
        "tilewidth": 8,
        "tileheight": 8,
        "columns": 4,
        "spacing": 1,
        "margin": 2,
        "image": "tiles.png",
        "transparentcolor": "#ff00ff",
        "tiles": [
          {
            "id": 1,
            "properties": [
              {"name":"solid","type":"bool","value":true},
              {"name":"label","type":"string","value":"rock"}
            ],
            "objectgroup": {"objects":[{"id":1,"x":1,"y":2,"width":6,"height":5}]}
          },
          {
            "id": 4,
            "animation": [{"tileid":4,"duration":100},{"tileid":5,"duration":150}]
          }
        ]
      }]
    }"##;

    #[test]
    fn parses_embedded_tileset_and_layer_cells() {
        let assets = MemoryAssets::new().with("maps/level.json", EMBEDDED_MAP);
        let doc = decode_map_file(Path::new("maps/level.json"), &assets).expect("decode");

        assert_eq!((doc.width, doc.height), (2, 2));
        assert_eq!(doc.layers.len(), 1, "object layers are skipped");

        let layer = &doc.layers[0];
        assert_eq!(layer.name, "ground");
        assert_eq!(layer.cells[0], Some(LayerTile::new(1)));
        assert_eq!(layer.cells[1], None);
        assert_eq!(
            layer.cells[2],
            Some(LayerTile {
                id: 2,
                flip_h: true,
                flip_v: false,
                flip_d: false
            })
        );

        let ts = &doc.tilesets[0];
        assert_eq!(ts.image, "tiles.png");
        assert_eq!((ts.columns, ts.spacing, ts.margin), (4, 1, 2));
        assert_eq!(ts.transparent_color.as_deref(), Some("#ff00ff"));

        let rock = &ts.tiles[0];
        assert_eq!(rock.properties[0].value, "true");
        assert_eq!(rock.properties[1].value, "rock");
        assert_eq!(
            rock.object_groups[0].objects[0],
            ShapeDocument {
                x: 1.0,
                y: 2.0,
                width: 6.0,
                height: 5.0
            }
        );

        let water = &ts.tiles[1];
        assert_eq!(
            water.animation,
            vec![
                FrameDocument {
                    tile_id: 4,
                    duration_ms: 100
                },
                FrameDocument {
                    tile_id: 5,
                    duration_ms: 150
                }
            ]
        );
    }

    #[test]
    fn resolves_external_tileset_relative_to_map() {
        let dir = temp_dir();
        fs::create_dir_all(dir.join("sets")).expect("failed to create sets dir");
        let map_json = r#"{
          "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
          "layers": [{"name":"L","width":1,"height":1,"data":[11]}],
          "tilesets": [{"firstgid": 10, "source": "sets/world.json"}]
        }"#;
        let tileset_json = r#"{
          "tilewidth": 16, "tileheight": 16, "columns": 2, "image": "world.png"
        }"#;
        fs::write(dir.join("map.json"), map_json).expect("failed to write map");
        fs::write(dir.join("sets/world.json"), tileset_json).expect("failed to write tileset");

        let doc = decode_map_file(&dir.join("map.json"), &DirAssets::default()).expect("decode");
        assert_eq!(doc.tilesets[0].image, Path::new("sets").join("world.png").to_string_lossy());
        assert_eq!(doc.layers[0].cells[0], Some(LayerTile::new(1)));
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let assets = MemoryAssets::new().with("map.json", "{ not json");
        let err = decode_map_file(Path::new("map.json"), &assets).unwrap_err();
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_tileset_file() {
        let map_json = r#"{
          "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
          "layers": [],
          "tilesets": [{"firstgid": 1, "source": "missing_tileset.json"}]
        }"#;
        let assets = MemoryAssets::new().with("map.json", map_json);
        let err = decode_map_file(Path::new("map.json"), &assets).unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn returns_typed_error_for_gid_below_first_gid() {
        let map_json = r#"{
          "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
          "layers": [{"name":"ground","width":1,"height":1,"data":[3]}],
          "tilesets": [{"firstgid": 5, "tilewidth": 16, "tileheight": 16, "columns": 1, "image": "t.png"}]
        }"#;
        let assets = MemoryAssets::new().with("map.json", map_json);
        let err = decode_map_file(Path::new("map.json"), &assets).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidTileGid { gid: 3, first_gid: 5, .. }
        ));
    }

    #[test]
    fn rejects_non_json_map_files() {
        let err = decode_map_file(Path::new("level.tmx"), &MemoryAssets::new()).unwrap_err();
        assert!(matches!(err, MapError::UnsupportedFormat(p) if p == "level.tmx"));
    }
}

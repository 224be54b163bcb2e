// src/loader/json_loader.rs
use crate::error::MapError;
use crate::map::*;
use crate::path::{directory_of, resolve};
use crate::texture::TextureCache;
use macroquad::prelude::*;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::Path;

#[derive(Deserialize)]
struct JsonMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

/// A map's tileset entry: either embedded, or a `source` pointing at a tileset file.
#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(flatten)]
    body: JsonValue,
}

#[derive(Deserialize)]
struct JsonTileset {
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    columns: Option<JsonValue>,
    #[serde(default)]
    tileoffset: Option<JsonTileOffset>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize, Default)]
struct JsonTileOffset {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
}

#[derive(Deserialize)]
struct JsonTile {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    objectgroup: Option<JsonObjectGroup>,
}

#[derive(Deserialize, Default)]
struct JsonObjectGroup {
    #[serde(default)]
    objects: Vec<JsonObject>,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    height: Option<f32>,
    #[serde(default)]
    ellipse: bool,
    #[serde(default)]
    polygon: Option<Vec<JsonObjectPoint>>,
    #[serde(default)]
    polyline: Option<Vec<JsonObjectPoint>>,
}

#[derive(Deserialize)]
struct JsonObjectPoint {
    x: f32,
    y: f32,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum JsonLayer {
    #[serde(rename = "group")]
    Group {
        #[serde(default)]
        name: String,
        #[serde(default)]
        offsetx: f32,
        #[serde(default)]
        offsety: f32,
        #[serde(default)]
        layers: Vec<JsonLayer>,
    },
    #[serde(rename = "tilelayer")]
    Tiles {
        #[serde(default)]
        name: String,
        #[serde(default)]
        offsetx: f32,
        #[serde(default)]
        offsety: f32,
        width: usize,
        height: usize,
        data: Vec<u32>,
    },
    #[serde(other)]
    Other,
}

const BACKGROUND_GROUP: &str = "Background";

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// `columns` falls back to 1 when absent, non-positive or not a whole number.
fn parse_columns(value: Option<&JsonValue>) -> u32 {
    let Some(value) = value else { return 1 };
    let whole = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|c| c.fract() == 0.0 && *c >= 1.0 && *c <= u32::MAX as f64)
            .map(|c| c as i64)
    });
    whole
        .filter(|&c| c > 0)
        .and_then(|c| u32::try_from(c).ok())
        .unwrap_or(1)
}

fn object_to_shape(
    obj: JsonObject,
    tileset: usize,
    tile: u32,
    object: usize,
) -> Result<CollisionShape, MapError> {
    let points = |pts: Vec<JsonObjectPoint>| -> Vec<Vec2> {
        pts.into_iter().map(|p| vec2(p.x, p.y)).collect()
    };

    let shape = if let Some(polygon) = obj.polygon {
        CollisionShape::Polygon(points(polygon))
    } else if let Some(polyline) = obj.polyline {
        CollisionShape::Polyline(points(polyline))
    } else if obj.ellipse {
        let missing = |field| MapError::MalformedShape {
            tileset,
            tile,
            object,
            field,
        };
        let w = obj.width.ok_or_else(|| missing("width"))?;
        let h = obj.height.ok_or_else(|| missing("height"))?;
        CollisionShape::Ellipse(Rect::new(obj.x, obj.y, w, h))
    } else if let (Some(w), Some(h)) = (obj.width, obj.height) {
        CollisionShape::Rectangle(Rect::new(obj.x, obj.y, w, h))
    } else {
        CollisionShape::Unknown
    };
    Ok(shape)
}

fn tileset_to_model(
    index: usize,
    first_gid: u32,
    ts: JsonTileset,
    base_dir: &str,
    textures: &mut TextureCache,
    collisions: &mut HashMap<u32, Vec<CollisionShape>>,
) -> Result<TileSet, MapError> {
    let images = match &ts.image {
        Some(image) => TilesetImages::Atlas(textures.load(resolve(base_dir, image))),
        None => {
            let mut per_tile = HashMap::new();
            for tile in &ts.tiles {
                if let (Some(id), Some(image)) = (tile.id, &tile.image) {
                    per_tile.insert(id, textures.load(resolve(base_dir, image)));
                }
            }
            TilesetImages::Collection(per_tile)
        }
    };

    let columns = parse_columns(ts.columns.as_ref());
    let offset = ts.tileoffset.unwrap_or_default();

    for tile in ts.tiles {
        let (Some(local_id), Some(group)) = (tile.id, tile.objectgroup) else {
            continue;
        };
        let shapes = group
            .objects
            .into_iter()
            .enumerate()
            .map(|(object, obj)| object_to_shape(obj, index, local_id, object))
            .collect::<Result<Vec<_>, _>>()?;
        if shapes.is_empty() {
            continue;
        }
        let gid = first_gid
            .checked_add(local_id)
            .ok_or(MapError::TileIdOverflow {
                tileset: index,
                tile: local_id,
            })?;
        collisions.insert(gid, shapes);
    }

    Ok(TileSet {
        first_gid,
        tile_width: ts.tilewidth,
        tile_height: ts.tileheight,
        columns,
        offset: vec2(offset.x, offset.y),
        images,
    })
}

fn collect_layers(
    layers: Vec<JsonLayer>,
    in_background: bool,
    parent_offset: Vec2,
    map: &mut Map,
) -> Result<(), MapError> {
    for layer in layers {
        match layer {
            JsonLayer::Group {
                name,
                offsetx,
                offsety,
                layers,
            } => {
                let background = in_background || name == BACKGROUND_GROUP;
                let offset = parent_offset + vec2(offsetx, offsety);
                collect_layers(layers, background, offset, map)?;
            }
            JsonLayer::Tiles {
                name,
                offsetx,
                offsety,
                width,
                height,
                data,
            } => {
                let Some(expected) = width.checked_mul(height) else {
                    return Err(MapError::LayerTooLarge {
                        layer: name,
                        width,
                        height,
                    });
                };
                if data.len() != expected {
                    return Err(MapError::InvalidLayerSize {
                        layer: name,
                        expected,
                        actual: data.len(),
                    });
                }
                let layer = TileLayer {
                    name,
                    width,
                    height,
                    offset: parent_offset + vec2(offsetx, offsety),
                    data,
                };
                if in_background {
                    map.background_layers.push(layer);
                } else {
                    map.other_layers.push(layer);
                }
            }
            JsonLayer::Other => {}
        }
    }
    Ok(())
}

/// Reads a Tiled JSON map (`.tmj` / `.json`) into the runtime model.
pub fn decode_map_file(path: &Path, textures: &mut TextureCache) -> Result<Map, MapError> {
    let j: JsonMap = read_json(path)?;

    let path_str = path.to_string_lossy();
    let map_dir = directory_of(&path_str);

    let mut map = Map {
        width: j.width,
        height: j.height,
        tile_width: j.tilewidth,
        tile_height: j.tileheight,
        ..Default::default()
    };

    for (index, entry) in j.tilesets.into_iter().enumerate() {
        let tileset = match entry.source {
            Some(source) => {
                if !(source.ends_with(".json") || source.ends_with(".tsj")) {
                    return Err(MapError::UnsupportedTileset { path: source });
                }
                let ts_path = resolve(map_dir, &source);
                let ext: JsonTileset = read_json(Path::new(&ts_path))?;
                tileset_to_model(
                    index,
                    entry.firstgid,
                    ext,
                    directory_of(&ts_path),
                    textures,
                    &mut map.tile_collisions,
                )?
            }
            None => {
                let embedded: JsonTileset =
                    serde_json::from_value(entry.body).map_err(|source| MapError::Json {
                        path: path.to_path_buf(),
                        source,
                    })?;
                tileset_to_model(
                    index,
                    entry.firstgid,
                    embedded,
                    map_dir,
                    textures,
                    &mut map.tile_collisions,
                )?
            }
        };
        map.tilesets.push(tileset);
    }

    // GID lookup scans in ascending order; Tiled already writes them that way.
    map.tilesets.sort_by_key(|t| t.first_gid);

    collect_layers(j.layers, false, Vec2::ZERO, &mut map)?;

    Ok(map)
}

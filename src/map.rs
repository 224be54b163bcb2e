use crate::error::MapError;
use crate::loader::json_loader::decode_map_file;
use crate::texture::{TextureCache, TextureId};
use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::Path;

pub const FLIP_H: u32 = 0x8000_0000; // bit 31
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
pub const GID_MASK: u32 = 0x1FFF_FFFF;

/// Strips Tiled's flip flags from a raw layer cell.
#[inline]
pub fn clean_gid(raw: u32) -> u32 {
    raw & GID_MASK
}

/// Index into [`Map::tilesets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilesetId(pub usize);

/// Where a tileset's pixels come from.
#[derive(Debug, Clone)]
pub enum TilesetImages {
    /// One shared spritesheet cut into a regular grid.
    Atlas(TextureId),
    /// One image per tile, keyed by local tile id.
    Collection(HashMap<u32, TextureId>),
}

#[derive(Debug, Clone)]
pub struct TileSet {
    pub first_gid: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Always at least 1.
    pub columns: u32,
    /// Applied to every tile drawn from this set.
    pub offset: Vec2,
    pub images: TilesetImages,
}

impl TileSet {
    pub fn is_atlas(&self) -> bool {
        matches!(self.images, TilesetImages::Atlas(_))
    }

    /// Per-tile image of an image-collection set.
    pub fn tile_image(&self, local_id: u32) -> Option<TextureId> {
        match &self.images {
            TilesetImages::Atlas(_) => None,
            TilesetImages::Collection(images) => images.get(&local_id).copied(),
        }
    }

    /// Size of a collection tile's image, if it loaded.
    pub fn tile_image_size(&self, local_id: u32, textures: &TextureCache) -> Option<(u32, u32)> {
        self.tile_image(local_id)
            .filter(|&id| textures.is_valid(id))
            .map(|id| textures.size(id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TileLayer {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Pixel offset, accumulated through parent groups.
    pub offset: Vec2,
    /// Row-major raw GIDs, `0` is an empty cell.
    pub data: Vec<u32>,
}

impl TileLayer {
    /// Non-empty cells as `(x, y, gid)` with flip flags removed.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        let width = self.width.max(1);
        self.data
            .iter()
            .take(self.width.saturating_mul(self.height))
            .enumerate()
            .map(move |(idx, &raw)| (idx % width, idx / width, clean_gid(raw)))
            .filter(|&(_, _, gid)| gid != 0)
    }
}

/// Collision template attached to a tile type, in tile-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    Rectangle(Rect),
    /// Bounding box of the ellipse.
    Ellipse(Rect),
    Polygon(Vec<Vec2>),
    /// Open chain, the last point does not connect back.
    Polyline(Vec<Vec2>),
    /// Kept for completeness, never collides or draws.
    Unknown,
}

/// Load counts, handed back so the caller decides whether to log them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapStats {
    pub tilesets: usize,
    pub collision_definitions: usize,
    pub background_layers: usize,
    pub object_layers: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Map {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Ascending `first_gid`.
    pub tilesets: Vec<TileSet>,
    pub background_layers: Vec<TileLayer>,
    pub other_layers: Vec<TileLayer>,
    /// Keyed by global tile id.
    pub tile_collisions: HashMap<u32, Vec<CollisionShape>>,
}

impl Map {
    /// Loads a Tiled JSON map, pulling every image through `textures`.
    pub fn load(path: impl AsRef<Path>, textures: &mut TextureCache) -> Result<Self, MapError> {
        decode_map_file(path.as_ref(), textures)
    }

    /// Like [`Map::load`], but any failure degrades to an empty map.
    ///
    /// The error is handed back so it can be shown to the player.
    pub fn load_or_empty(
        path: impl AsRef<Path>,
        textures: &mut TextureCache,
    ) -> (Self, Option<MapError>) {
        match Self::load(path, textures) {
            Ok(map) => (map, None),
            Err(err) => (Map::default(), Some(err)),
        }
    }

    /// The last tileset whose `first_gid <= gid`, relying on ascending order.
    pub fn find_tileset_for_gid(&self, gid: u32) -> Option<(TilesetId, &TileSet)> {
        let mut found = None;
        for (idx, tileset) in self.tilesets.iter().enumerate() {
            if gid >= tileset.first_gid {
                found = Some((TilesetId(idx), tileset));
            } else {
                break;
            }
        }
        found
    }

    pub fn tileset(&self, id: TilesetId) -> &TileSet {
        &self.tilesets[id.0]
    }

    /// Background layers followed by the other layers.
    pub fn all_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.background_layers.iter().chain(self.other_layers.iter())
    }

    /// True when there is nothing to draw and nothing to collide with.
    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty() && self.background_layers.is_empty() && self.other_layers.is_empty()
    }

    pub fn stats(&self) -> MapStats {
        MapStats {
            tilesets: self.tilesets.len(),
            collision_definitions: self.tile_collisions.values().map(Vec::len).sum(),
            background_layers: self.background_layers.len(),
            object_layers: self.other_layers.len(),
        }
    }
}

//! Expands layer grids into positioned draw instructions.

use crate::map::{Map, TileLayer, TileSet, TilesetId};
use crate::texture::TextureCache;
use macroquad::prelude::*;

/// One tile ready to blit.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Pixel rect inside the source image.
    pub source: Rect,
    /// World-space top-left.
    pub destination: Vec2,
    pub tileset: TilesetId,
    /// World Y used to order against the player.
    pub sorting_y: f32,
    pub local_id: u32,
    pub is_image_collection: bool,
    /// Total vertical shift applied to a collection tile (bottom alignment plus tileset offset).
    pub draw_offset_y: f32,
}

/// Top-left of grid cell `(x, y)` in a layer.
fn cell_origin(layer: &TileLayer, x: usize, y: usize, map: &Map) -> Vec2 {
    vec2(
        x as f32 * map.tile_width as f32,
        y as f32 * map.tile_height as f32,
    ) + layer.offset
}

fn make_tile(
    tileset_id: TilesetId,
    tileset: &TileSet,
    local_id: u32,
    origin: Vec2,
    map: &Map,
    textures: &TextureCache,
) -> Option<Tile> {
    if tileset.is_atlas() {
        // Float math: a stray GID far past the atlas must not overflow.
        let columns = tileset.columns.max(1);
        let sx = (local_id % columns) as f32 * tileset.tile_width as f32;
        let sy = (local_id / columns) as f32 * tileset.tile_height as f32;
        let destination = origin + tileset.offset;

        return Some(Tile {
            source: Rect::new(
                sx,
                sy,
                tileset.tile_width as f32,
                tileset.tile_height as f32,
            ),
            destination,
            tileset: tileset_id,
            sorting_y: destination.y + tileset.tile_height as f32,
            local_id,
            is_image_collection: false,
            draw_offset_y: 0.0,
        });
    }

    // Missing or broken per-tile art leaves a gap.
    let (w, h) = tileset.tile_image_size(local_id, textures)?;
    let (w, h) = (w as f32, h as f32);

    let align_y = map.tile_height as f32 - h;
    let destination = origin + vec2(0.0, align_y) + tileset.offset;

    Some(Tile {
        source: Rect::new(0.0, 0.0, w, h),
        destination,
        tileset: tileset_id,
        sorting_y: destination.y + h,
        local_id,
        is_image_collection: true,
        draw_offset_y: align_y + tileset.offset.y,
    })
}

/// Builds the tiles of `layers`, in layer then row-major order.
///
/// Cells whose GID has no owning tileset are skipped.
pub fn generate_tiles(layers: &[TileLayer], map: &Map, textures: &TextureCache) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(layers.iter().map(|l| l.data.len()).sum());

    for layer in layers {
        for (x, y, gid) in layer.cells() {
            let Some((tileset_id, tileset)) = map.find_tileset_for_gid(gid) else {
                continue;
            };
            let local_id = gid - tileset.first_gid;
            let origin = cell_origin(layer, x, y, map);
            if let Some(tile) = make_tile(tileset_id, tileset, local_id, origin, map, textures) {
                tiles.push(tile);
            }
        }
    }

    tiles
}

/// Orders object tiles back to front. Stable, so equal rows keep layer order.
pub fn sort_by_depth(tiles: &mut [Tile]) {
    tiles.sort_by(|a, b| a.sorting_y.total_cmp(&b.sorting_y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::atlas;
    use crate::map::TilesetImages;
    use crate::texture::tests::SizeOnlyLoader;
    use std::collections::HashMap;

    fn layer(width: usize, height: usize, data: Vec<u32>) -> TileLayer {
        TileLayer {
            width,
            height,
            data,
            ..Default::default()
        }
    }

    fn map_16(tilesets: Vec<TileSet>) -> Map {
        Map {
            width: 4,
            height: 4,
            tile_width: 16,
            tile_height: 16,
            tilesets,
            ..Default::default()
        }
    }

    fn empty_cache() -> TextureCache {
        TextureCache::new(SizeOnlyLoader::new(&[]))
    }

    #[test]
    fn all_zero_layer_yields_nothing() {
        let map = map_16(vec![atlas(1, 16, 4)]);
        let tiles = generate_tiles(&[layer(3, 3, vec![0; 9])], &map, &empty_cache());
        assert!(tiles.is_empty());
    }

    #[test]
    fn atlas_source_rect_follows_columns() {
        let map = map_16(vec![atlas(1, 16, 4)]);
        // local id 5 -> column 1, row 1
        let tiles = generate_tiles(&[layer(1, 1, vec![6])], &map, &empty_cache());

        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].local_id, 5);
        assert_eq!(tiles[0].source, Rect::new(16.0, 16.0, 16.0, 16.0));
        assert!(!tiles[0].is_image_collection);
    }

    #[test]
    fn atlas_destination_includes_offsets() {
        let mut ts = atlas(1, 16, 4);
        ts.offset = vec2(3.0, -2.0);
        let map = map_16(vec![ts]);
        let mut l = layer(3, 2, vec![0, 0, 0, 0, 0, 1]);
        l.offset = vec2(100.0, 0.0);

        let tiles = generate_tiles(&[l], &map, &empty_cache());

        assert_eq!(tiles[0].destination, vec2(2.0 * 16.0 + 100.0 + 3.0, 16.0 - 2.0));
        assert_eq!(tiles[0].sorting_y, 14.0 + 16.0);
        assert_eq!(tiles[0].draw_offset_y, 0.0);
    }

    #[test]
    fn collection_tiles_are_bottom_aligned() {
        let mut textures = TextureCache::new(SizeOnlyLoader::new(&[("bush.png", (24, 20))]));
        let bush = textures.load("bush.png");
        let mut images = HashMap::new();
        images.insert(0, bush);
        let map = Map {
            tile_height: 32,
            tile_width: 32,
            tilesets: vec![TileSet {
                first_gid: 1,
                tile_width: 24,
                tile_height: 20,
                columns: 1,
                offset: vec2(0.0, 5.0),
                images: TilesetImages::Collection(images),
            }],
            ..Default::default()
        };

        let tiles = generate_tiles(&[layer(1, 2, vec![0, 1])], &map, &textures);

        let tile = &tiles[0];
        assert!(tile.is_image_collection);
        assert_eq!(tile.source, Rect::new(0.0, 0.0, 24.0, 20.0));
        // 32 - 20 = 12 to reach the cell bottom, then the tileset's 5
        assert_eq!(tile.draw_offset_y, 12.0 + 5.0);
        assert_eq!(tile.destination, vec2(0.0, 32.0 + 12.0 + 5.0));
        assert_eq!(tile.sorting_y, tile.destination.y + 20.0);
    }

    #[test]
    fn collection_tiles_without_art_are_dropped() {
        let mut textures = TextureCache::new(SizeOnlyLoader::new(&[]));
        let broken = textures.load("broken.png");
        let mut images = HashMap::new();
        images.insert(1, broken);
        let map = map_16(vec![TileSet {
            first_gid: 1,
            tile_width: 16,
            tile_height: 16,
            columns: 1,
            offset: Vec2::ZERO,
            images: TilesetImages::Collection(images),
        }]);

        // local 0 has no image at all, local 1 failed to load
        let tiles = generate_tiles(&[layer(2, 1, vec![1, 2])], &map, &textures);
        assert!(tiles.is_empty());
    }

    #[test]
    fn unknown_gids_are_skipped() {
        let map = map_16(vec![atlas(10, 16, 4)]);
        let tiles = generate_tiles(&[layer(3, 1, vec![3, 10, 9])], &map, &empty_cache());
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].local_id, 0);
    }

    #[test]
    fn gid_far_past_the_atlas_does_not_overflow() {
        let map = map_16(vec![atlas(1, 16, 1)]);
        let tiles = generate_tiles(&[layer(1, 1, vec![300_000_000])], &map, &empty_cache());

        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].local_id, 299_999_999);
        assert_eq!(tiles[0].source.x, 0.0);
        assert_eq!(tiles[0].source.y, 299_999_999.0 * 16.0);
    }

    #[test]
    fn depth_sort_is_ascending_and_stable() {
        let map = map_16(vec![atlas(1, 16, 4)]);
        let mut tiles = generate_tiles(&[layer(2, 3, vec![1, 0, 0, 2, 3, 4])], &map, &empty_cache());
        tiles.reverse();
        sort_by_depth(&mut tiles);

        let ys: Vec<_> = tiles.iter().map(|t| t.sorting_y).collect();
        assert_eq!(ys, [16.0, 32.0, 48.0, 48.0]);
        // reversed input, so the two row-2 tiles stay reversed
        assert_eq!(tiles[2].local_id, 3);
        assert_eq!(tiles[3].local_id, 2);
    }
}

//! World-space collision geometry built from per-tile shape templates.
//!
//! Only rectangles and ellipses take part in movement checks. Ellipses are
//! tested as a circle whose radius is the mean of the two half-axes.
//! Polygons and polylines are carried along for the debug overlay only.

use crate::map::{CollisionShape, Map, TileLayer};
use crate::texture::TextureCache;
use macroquad::prelude::*;

/// A shape template placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedCollision {
    pub shape: CollisionShape,
    /// World-space anchor; the shape's local coordinates are relative to it.
    pub position: Vec2,
}

impl PositionedCollision {
    /// Shape rect (rectangle or ellipse bounds) moved into world space.
    pub fn world_rect(&self) -> Option<Rect> {
        match &self.shape {
            CollisionShape::Rectangle(r) | CollisionShape::Ellipse(r) => {
                Some(r.offset(self.position))
            }
            _ => None,
        }
    }

    /// True if `hitbox` touches this shape. Polygons, polylines and unknown shapes never do.
    pub fn intersects(&self, hitbox: &Rect) -> bool {
        match &self.shape {
            CollisionShape::Rectangle(r) => rects_intersect(hitbox, &r.offset(self.position)),
            CollisionShape::Ellipse(r) => {
                let center = self.position + r.point() + r.size() / 2.0;
                let radius = (r.w / 2.0 + r.h / 2.0) / 2.0;
                circle_intersects_rect(center, radius, hitbox)
            }
            CollisionShape::Polygon(_) | CollisionShape::Polyline(_) | CollisionShape::Unknown => {
                false
            }
        }
    }
}

/// Strict overlap: rectangles that only share an edge do not intersect.
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Circle against axis-aligned rectangle, edges inclusive.
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let half = rect.size() / 2.0;
    let d = (center - (rect.point() + half)).abs();

    if d.x > half.x + radius || d.y > half.y + radius {
        return false;
    }
    if d.x <= half.x || d.y <= half.y {
        return true;
    }
    (d - half).length_squared() <= radius * radius
}

/// Anchor for a tile's shapes: cell origin, tileset offset, and for image
/// collections the same bottom alignment the sprite gets.
fn anchor(
    layer: &TileLayer,
    x: usize,
    y: usize,
    gid: u32,
    map: &Map,
    textures: &TextureCache,
) -> Option<Vec2> {
    let (_, tileset) = map.find_tileset_for_gid(gid)?;
    let local_id = gid - tileset.first_gid;

    let align_y = if tileset.is_atlas() {
        0.0
    } else {
        tileset
            .tile_image_size(local_id, textures)
            .map(|(_, h)| map.tile_height as f32 - h as f32)
            .unwrap_or(0.0)
    };

    Some(
        vec2(
            x as f32 * map.tile_width as f32,
            y as f32 * map.tile_height as f32,
        ) + layer.offset
            + tileset.offset
            + vec2(0.0, align_y),
    )
}

/// One entry per registered shape per placed tile, background and other layers alike.
pub fn generate_collisions(map: &Map, textures: &TextureCache) -> Vec<PositionedCollision> {
    let mut collisions = Vec::new();

    for layer in map.all_layers() {
        for (x, y, gid) in layer.cells() {
            let Some(shapes) = map.tile_collisions.get(&gid) else {
                continue;
            };
            let Some(position) = anchor(layer, x, y, gid, map, textures) else {
                continue;
            };
            collisions.extend(shapes.iter().map(|shape| PositionedCollision {
                shape: shape.clone(),
                position,
            }));
        }
    }

    collisions
}

/// True if `hitbox` intersects any rectangle or ellipse entry.
pub fn check_player_collision(hitbox: &Rect, collisions: &[PositionedCollision]) -> bool {
    collisions.iter().any(|c| c.intersects(hitbox))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::atlas;
    use crate::map::{TileSet, TilesetImages};
    use crate::texture::tests::SizeOnlyLoader;
    use std::collections::HashMap;

    fn placed(shape: CollisionShape, x: f32, y: f32) -> PositionedCollision {
        PositionedCollision {
            shape,
            position: vec2(x, y),
        }
    }

    fn map_with_rect_tile() -> Map {
        let mut map = Map {
            width: 4,
            height: 3,
            tile_width: 16,
            tile_height: 16,
            tilesets: vec![atlas(1, 16, 4)],
            ..Default::default()
        };
        map.tile_collisions.insert(
            3,
            vec![CollisionShape::Rectangle(Rect::new(0.0, 0.0, 10.0, 10.0))],
        );
        map
    }

    #[test]
    fn rectangle_lands_on_its_cell() {
        let mut map = map_with_rect_tile();
        let mut data = vec![0; 12];
        data[4 + 2] = 3;
        map.other_layers.push(TileLayer {
            width: 4,
            height: 3,
            data,
            ..Default::default()
        });
        let textures = TextureCache::new(SizeOnlyLoader::new(&[]));

        let collisions = generate_collisions(&map, &textures);

        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].world_rect(), Some(Rect::new(32.0, 16.0, 10.0, 10.0)));
    }

    #[test]
    fn background_and_other_layers_both_count() {
        let mut map = map_with_rect_tile();
        map.tile_collisions.get_mut(&3).unwrap().push(CollisionShape::Unknown);
        let layer = TileLayer {
            width: 2,
            height: 1,
            data: vec![3, 1],
            ..Default::default()
        };
        map.background_layers.push(layer.clone());
        map.other_layers.push(layer);
        let textures = TextureCache::new(SizeOnlyLoader::new(&[]));

        let collisions = generate_collisions(&map, &textures);
        assert_eq!(collisions.len(), 4);
        assert!(collisions.iter().all(|c| c.position == Vec2::ZERO));
    }

    #[test]
    fn collection_anchor_follows_bottom_aligned_sprite() {
        let mut textures = TextureCache::new(SizeOnlyLoader::new(&[("rock.png", (16, 20))]));
        let rock = textures.load("rock.png");
        let mut images = HashMap::new();
        images.insert(1, rock);
        let mut map = Map {
            tile_width: 32,
            tile_height: 32,
            tilesets: vec![
                atlas(1, 32, 1),
                TileSet {
                    first_gid: 10,
                    tile_width: 16,
                    tile_height: 20,
                    columns: 1,
                    offset: vec2(2.0, 3.0),
                    images: TilesetImages::Collection(images),
                },
            ],
            ..Default::default()
        };
        map.tile_collisions
            .insert(11, vec![CollisionShape::Rectangle(Rect::new(0.0, 10.0, 16.0, 10.0))]);
        map.other_layers.push(TileLayer {
            width: 2,
            height: 1,
            data: vec![0, 11],
            ..Default::default()
        });

        let collisions = generate_collisions(&map, &textures);

        assert_eq!(collisions[0].position, vec2(32.0 + 2.0, 3.0 + 12.0));
    }

    #[test]
    fn rectangle_and_ellipse_block() {
        let rect = placed(CollisionShape::Rectangle(Rect::new(0.0, 0.0, 10.0, 10.0)), 100.0, 100.0);
        let ellipse = placed(CollisionShape::Ellipse(Rect::new(0.0, 0.0, 20.0, 10.0)), 200.0, 200.0);
        let collisions = vec![rect, ellipse];

        assert!(check_player_collision(&Rect::new(105.0, 105.0, 4.0, 4.0), &collisions));
        // circle centre (210, 205), radius 7.5
        assert!(check_player_collision(&Rect::new(214.0, 203.0, 4.0, 4.0), &collisions));
        assert!(!check_player_collision(&Rect::new(219.0, 203.0, 4.0, 4.0), &collisions));
        assert!(!check_player_collision(&Rect::new(150.0, 150.0, 4.0, 4.0), &collisions));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let rect = placed(CollisionShape::Rectangle(Rect::new(0.0, 0.0, 10.0, 10.0)), 0.0, 0.0);
        assert!(!check_player_collision(&Rect::new(10.0, 0.0, 5.0, 5.0), &[rect]));
    }

    #[test]
    fn polygons_polylines_and_unknown_never_block() {
        let square = vec![vec2(0.0, 0.0), vec2(50.0, 0.0), vec2(50.0, 50.0), vec2(0.0, 50.0)];
        let collisions = vec![
            placed(CollisionShape::Polygon(square.clone()), 0.0, 0.0),
            placed(CollisionShape::Polyline(square), 0.0, 0.0),
            placed(CollisionShape::Unknown, 0.0, 0.0),
        ];
        assert!(!check_player_collision(&Rect::new(10.0, 10.0, 20.0, 20.0), &collisions));
    }

    #[test]
    fn circle_corner_case() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        // distance from (13,13) to corner (10,10) is ~4.24
        assert!(!circle_intersects_rect(vec2(13.0, 13.0), 4.0, &rect));
        assert!(circle_intersects_rect(vec2(13.0, 13.0), 4.5, &rect));
    }
}

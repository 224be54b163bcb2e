//! Draw pipeline: background tiles, depth-sorted objects with the player
//! slotted in, then the debug overlay.

use crate::collision::PositionedCollision;
use crate::map::{CollisionShape, Map, TilesetImages};
use crate::player::Player;
use crate::texture::TextureCache;
use crate::tiles::Tile;
use macroquad::prelude::*;

/// One step of the object pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStep {
    /// Index into the sorted tile list.
    Tile(usize),
    Player,
}

/// The player goes right before the first tile whose sorting Y exceeds
/// `player_y`, or last when no tile does.
pub fn interleave(tiles: &[Tile], player_y: f32) -> Vec<DrawStep> {
    let split = tiles
        .iter()
        .position(|t| player_y < t.sorting_y)
        .unwrap_or(tiles.len());

    let mut steps: Vec<DrawStep> = (0..split).map(DrawStep::Tile).collect();
    steps.push(DrawStep::Player);
    steps.extend((split..tiles.len()).map(DrawStep::Tile));
    steps
}

pub fn draw_tile(tile: &Tile, map: &Map, textures: &TextureCache) {
    let tileset = map.tileset(tile.tileset);
    let texture_id = match &tileset.images {
        TilesetImages::Atlas(id) => Some(*id),
        TilesetImages::Collection(_) => tileset.tile_image(tile.local_id),
    };
    let Some(texture) = texture_id.and_then(|id| textures.texture(id)) else {
        return;
    };

    draw_texture_ex(
        texture,
        tile.destination.x,
        tile.destination.y,
        WHITE,
        DrawTextureParams {
            source: Some(tile.source),
            ..Default::default()
        },
    );
}

/// Draws in list order, no sorting.
pub fn draw_tiles(tiles: &[Tile], map: &Map, textures: &TextureCache) {
    for tile in tiles {
        draw_tile(tile, map, textures);
    }
}

/// `tiles` must already be depth sorted.
pub fn draw_tiles_with_player(tiles: &[Tile], player: &Player, map: &Map, textures: &TextureCache) {
    for step in interleave(tiles, player.sorting_y()) {
        match step {
            DrawStep::Tile(i) => draw_tile(&tiles[i], map, textures),
            DrawStep::Player => player.draw(textures),
        }
    }
}

pub fn draw_collision_shape(collision: &PositionedCollision) {
    let at = collision.position;
    match &collision.shape {
        CollisionShape::Rectangle(r) => {
            draw_rectangle_lines(r.x + at.x, r.y + at.y, r.w, r.h, 1.0, RED);
        }
        CollisionShape::Ellipse(r) => {
            let (rx, ry) = (r.w / 2.0, r.h / 2.0);
            draw_ellipse_lines(r.x + at.x + rx, r.y + at.y + ry, rx, ry, 0.0, 1.0, ORANGE);
        }
        CollisionShape::Polygon(points) if points.len() > 1 => {
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                draw_line(a.x + at.x, a.y + at.y, b.x + at.x, b.y + at.y, 1.0, BLUE);
            }
        }
        CollisionShape::Polyline(points) => {
            for pair in points.windows(2) {
                let (a, b) = (pair[0] + at, pair[1] + at);
                draw_line(a.x, a.y, b.x, b.y, 1.0, PURPLE);
            }
        }
        _ => {}
    }
}

pub fn draw_collision_debug(collisions: &[PositionedCollision]) {
    for collision in collisions {
        draw_collision_shape(collision);
    }
}

/// Fixed help lines, the FPS counter and the last map load error.
pub fn draw_debug_text(load_error: Option<&str>) {
    let lines = [
        "Debug Mode (F1 to toggle, F5 to reload map)",
        "Rect=Red | Ellipse=Orange | Poly=Blue | Polyline=Purple",
        "Use Arrow Keys to move, Space to attack",
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 10.0, 22.0 + 20.0 * i as f32, 20.0, DARKGRAY);
    }
    draw_text(&format!("FPS: {}", get_fps()), 10.0, 82.0, 20.0, DARKGREEN);

    if let Some(err) = load_error {
        draw_text(&format!("Map failed to load: {err}"), 10.0, 102.0, 20.0, RED);
    }
}

//! Top-down tile map demo on Macroquad.
//!
//! Loads a Tiled JSON map, expands it into depth-sorted tiles and world-space
//! collision shapes, and walks one animated character around it.

pub mod animation;
pub mod collision;
pub mod config;
mod error;
pub mod game;
pub mod input;
pub mod loader {
    pub mod json_loader;
}
pub mod map;
pub mod path;
pub mod player;
pub mod render;
pub mod texture;
pub mod tiles;

pub use collision::{check_player_collision, generate_collisions, PositionedCollision};
pub use error::MapError;
pub use game::Game;
pub use map::{CollisionShape, Map, MapStats, TileLayer, TileSet, TilesetId, TilesetImages};
pub use texture::{GpuTextureLoader, LoadedTexture, TextureCache, TextureId, TextureLoader};
pub use tiles::{generate_tiles, sort_by_depth, Tile};

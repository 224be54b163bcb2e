//! Tunables. Art-dependent numbers live here so movement and drawing code
//! never hard-codes them.

use anyhow::Context;
use macroquad::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Player geometry, speed and sprite sheet layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Pixels per second.
    pub speed: f32,
    pub start_x: f32,
    pub start_y: f32,
    /// Frames laid out horizontally in every sheet.
    pub frame_count: u32,
    /// Seconds per frame.
    pub frame_time: f32,
    pub hitbox_offset_x: f32,
    pub hitbox_offset_y: f32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
    /// Added to position.y to approximate the feet for depth sorting.
    pub sorting_offset_y: f32,
    pub draw_scale: f32,
    /// Root of the `IDLE/`, `RUN/`, `ATTACK 1/`, `ATTACK 2/` sheet folders.
    pub sprite_root: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            speed: 100.0,
            start_x: 200.0,
            start_y: 300.0,
            frame_count: 8,
            frame_time: 0.1,
            hitbox_offset_x: 38.0,
            hitbox_offset_y: 68.0,
            hitbox_width: 22.0,
            hitbox_height: 8.0,
            sorting_offset_y: 80.0,
            draw_scale: 2.0,
            sprite_root: "assets/player".to_owned(),
        }
    }
}

impl PlayerConfig {
    pub fn start(&self) -> Vec2 {
        vec2(self.start_x, self.start_y)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_title: String,
    pub window_width: i32,
    pub window_height: i32,
    pub map_path: String,
    /// Start with the collision overlay on.
    pub debug: bool,
    /// RGB, 0-255.
    pub clear_color: [u8; 3],
    pub player: PlayerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            window_title: "Tile Quest".to_owned(),
            window_width: 960,
            window_height: 640,
            map_path: "assets/maps/map.tmj".to_owned(),
            debug: true,
            clear_color: [245, 245, 245],
            player: PlayerConfig::default(),
        }
    }
}

/// Looked up in the working directory.
pub const CONFIG_FILE: &str = "tilequest.json";

impl GameConfig {
    /// Reads `path` if it exists, defaults otherwise. Missing keys keep their defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        serde_json::from_str(&txt).with_context(|| format!("Parsing config file {}", path.display()))
    }

    pub fn clear_color(&self) -> Color {
        let [r, g, b] = self.clear_color;
        Color::from_rgba(r, g, b, 255)
    }

    pub fn window_conf(&self) -> Conf {
        Conf {
            window_title: self.window_title.clone(),
            window_width: self.window_width,
            window_height: self.window_height,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = GameConfig::load_or_default("definitely/not/here.json").unwrap();
        assert_eq!(cfg.map_path, "assets/maps/map.tmj");
        assert_eq!(cfg.player.frame_count, 8);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"debug": false, "player": {"speed": 150.0}}"#).unwrap();

        let cfg = GameConfig::load_or_default(&path).unwrap();
        assert!(!cfg.debug);
        assert_eq!(cfg.player.speed, 150.0);
        assert_eq!(cfg.player.hitbox_width, 22.0);
        assert_eq!(cfg.window_width, 960);
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ nope").unwrap();
        assert!(GameConfig::load_or_default(&path).is_err());
    }
}

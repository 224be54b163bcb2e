use crate::collision::{generate_collisions, PositionedCollision};
use crate::config::GameConfig;
use crate::input::InputSnapshot;
use crate::map::Map;
use crate::player::Player;
use crate::render;
use crate::texture::TextureCache;
use crate::tiles::{generate_tiles, sort_by_depth, Tile};
use macroquad::prelude::*;

/// Everything one play session owns.
pub struct Game {
    config: GameConfig,
    textures: TextureCache,
    map: Map,
    player: Player,
    background_tiles: Vec<Tile>,
    object_tiles: Vec<Tile>,
    collisions: Vec<PositionedCollision>,
    debug: bool,
    load_error: Option<String>,
}

impl Game {
    /// Loads the map and the player. A map that fails to load leaves an
    /// empty, walkable world and the error on the debug overlay.
    pub fn new(config: GameConfig, mut textures: TextureCache) -> Self {
        let player = Player::new(&config.player, &mut textures);
        let mut game = Game {
            debug: config.debug,
            config,
            textures,
            map: Map::default(),
            player,
            background_tiles: Vec::new(),
            object_tiles: Vec::new(),
            collisions: Vec::new(),
            load_error: None,
        };
        game.reload_map();
        game
    }

    /// Re-reads the map file and rebuilds tiles and collisions.
    pub fn reload_map(&mut self) {
        let (map, err) = Map::load_or_empty(&self.config.map_path, &mut self.textures);
        match &err {
            Some(err) => log::error!("Map {}: {}", self.config.map_path, err),
            None => {
                let stats = map.stats();
                log::info!("Map loaded: {}x{}", map.width, map.height);
                log::info!("Tilesets: {}", stats.tilesets);
                log::info!("Collision definitions: {}", stats.collision_definitions);
                log::info!("Background layers: {}", stats.background_layers);
                log::info!("Object layers: {}", stats.object_layers);
            }
        }
        self.load_error = err.map(|e| e.to_string());
        self.map = map;

        self.background_tiles = generate_tiles(&self.map.background_layers, &self.map, &self.textures);
        self.object_tiles = generate_tiles(&self.map.other_layers, &self.map, &self.textures);
        sort_by_depth(&mut self.object_tiles);
        self.collisions = generate_collisions(&self.map, &self.textures);
        log::debug!(
            "Generated {} background tiles, {} object tiles, {} collisions",
            self.background_tiles.len(),
            self.object_tiles.len(),
            self.collisions.len()
        );
    }

    pub fn update(&mut self, input: &InputSnapshot, dt: f32) {
        if input.toggle_debug {
            self.debug = !self.debug;
        }
        if input.reload_map {
            self.reload_map();
        }
        self.player.update(input, dt, &self.collisions);
    }

    pub fn render(&self) {
        clear_background(self.config.clear_color());

        render::draw_tiles(&self.background_tiles, &self.map, &self.textures);
        render::draw_tiles_with_player(&self.object_tiles, &self.player, &self.map, &self.textures);

        if self.debug {
            render::draw_collision_debug(&self.collisions);
            self.player.draw_debug();
            render::draw_debug_text(self.load_error.as_deref());
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn collisions(&self) -> &[PositionedCollision] {
        &self.collisions
    }

    pub fn object_tiles(&self) -> &[Tile] {
        &self.object_tiles
    }

    pub fn background_tiles(&self) -> &[Tile] {
        &self.background_tiles
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Ends the session, releasing every texture exactly once.
    pub fn shutdown(self) {
        self.textures.teardown();
    }
}

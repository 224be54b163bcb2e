use macroquad::prelude::*;
use std::sync::OnceLock;
use tilequest::config::{GameConfig, CONFIG_FILE};
use tilequest::input::InputSnapshot;
use tilequest::{Game, GpuTextureLoader, TextureCache};

static CONFIG: OnceLock<GameConfig> = OnceLock::new();

/// Read once; the window setup and the game loop share the result.
fn config() -> &'static GameConfig {
    CONFIG.get_or_init(load_config)
}

fn load_config() -> GameConfig {
    let mut config = GameConfig::load_or_default(CONFIG_FILE).unwrap_or_else(|err| {
        log::error!("{err:#}; using defaults");
        GameConfig::default()
    });
    if let Some(map_path) = std::env::args().nth(1) {
        config.map_path = map_path;
    }
    config
}

fn window_conf() -> Conf {
    // Logging has to be up before the config is read.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    config().window_conf()
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = config().clone();
    log::info!("Starting with map {}", config.map_path);

    prevent_quit();
    let mut game = Game::new(config, TextureCache::new(GpuTextureLoader));

    loop {
        let input = InputSnapshot::sample();
        if input.quit {
            break;
        }

        game.update(&input, get_frame_time());
        game.render();

        next_frame().await;
    }

    game.shutdown();
}

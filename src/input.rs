use macroquad::prelude::*;

/// Keyboard state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub right: bool,
    pub left: bool,
    pub up: bool,
    pub down: bool,
    /// Pressed this frame, not merely held.
    pub attack: bool,
    pub toggle_debug: bool,
    pub reload_map: bool,
    pub quit: bool,
}

impl InputSnapshot {
    /// Polls macroquad. Arrows move, Space attacks, F1 toggles debug, F5 reloads, Escape quits.
    pub fn sample() -> Self {
        InputSnapshot {
            right: is_key_down(KeyCode::Right),
            left: is_key_down(KeyCode::Left),
            up: is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::Down),
            attack: is_key_pressed(KeyCode::Space),
            toggle_debug: is_key_pressed(KeyCode::F1),
            reload_map: is_key_pressed(KeyCode::F5),
            quit: is_key_pressed(KeyCode::Escape) || is_quit_requested(),
        }
    }
}

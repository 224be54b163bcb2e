use crate::animation::Animation;
use crate::collision::{check_player_collision, PositionedCollision};
use crate::config::PlayerConfig;
use crate::input::InputSnapshot;
use crate::path::join_paths;
use crate::texture::TextureCache;
use macroquad::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    Idle,
    Run,
    Attack1,
    Attack2,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 4] = [
        PlayerAction::Idle,
        PlayerAction::Run,
        PlayerAction::Attack1,
        PlayerAction::Attack2,
    ];

    /// Sheet folder and file prefix under the sprite root.
    fn sheet_prefix(self) -> &'static str {
        match self {
            PlayerAction::Idle => "IDLE/idle_",
            PlayerAction::Run => "RUN/run_",
            PlayerAction::Attack1 => "ATTACK 1/attack1_",
            PlayerAction::Attack2 => "ATTACK 2/attack2_",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Down, Direction::Left, Direction::Right, Direction::Up];

    fn sheet_suffix(self) -> &'static str {
        match self {
            Direction::Down => "down.png",
            Direction::Left => "left.png",
            Direction::Right => "right.png",
            Direction::Up => "up.png",
        }
    }
}

pub struct Player {
    pub position: Vec2,
    pub speed: f32,
    pub action: PlayerAction,
    pub direction: Direction,
    hitbox: Rect,
    animations: HashMap<(PlayerAction, Direction), Animation>,
    config: PlayerConfig,
}

impl Player {
    /// Places the player at the configured start and loads all 16 sheets.
    pub fn new(config: &PlayerConfig, textures: &mut TextureCache) -> Self {
        let mut animations = HashMap::new();
        for action in PlayerAction::ALL {
            for direction in Direction::ALL {
                let file = format!("{}{}", action.sheet_prefix(), direction.sheet_suffix());
                let texture = textures.load(join_paths(&config.sprite_root, &file));
                animations.insert(
                    (action, direction),
                    Animation::from_sheet(texture, config.frame_count, config.frame_time, textures),
                );
            }
        }

        let position = config.start();
        Player {
            position,
            speed: config.speed,
            action: PlayerAction::Idle,
            direction: Direction::Down,
            hitbox: Self::hitbox_at(position, config),
            animations,
            config: config.clone(),
        }
    }

    fn hitbox_at(position: Vec2, config: &PlayerConfig) -> Rect {
        Rect::new(
            position.x + config.hitbox_offset_x,
            position.y + config.hitbox_offset_y,
            config.hitbox_width,
            config.hitbox_height,
        )
    }

    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    pub fn animation(&self) -> &Animation {
        &self.animations[&(self.action, self.direction)]
    }

    /// One frame: read input, move, undo the move on collision, animate.
    pub fn update(&mut self, input: &InputSnapshot, dt: f32, collisions: &[PositionedCollision]) {
        let mut movement = Vec2::ZERO;
        let mut action = PlayerAction::Idle;

        // Later checks win the facing; every held key still moves.
        if input.right {
            movement.x += 1.0;
            self.direction = Direction::Right;
            action = PlayerAction::Run;
        }
        if input.left {
            movement.x -= 1.0;
            self.direction = Direction::Left;
            action = PlayerAction::Run;
        }
        if input.up {
            movement.y -= 1.0;
            self.direction = Direction::Up;
            action = PlayerAction::Run;
        }
        if input.down {
            movement.y += 1.0;
            self.direction = Direction::Down;
            action = PlayerAction::Run;
        }
        if input.attack {
            action = PlayerAction::Attack1;
        }
        self.action = action;

        let movement = movement.normalize_or_zero();

        let old_position = self.position;
        self.position += movement * self.speed * dt;
        self.hitbox = Self::hitbox_at(self.position, &self.config);

        if check_player_collision(&self.hitbox, collisions) {
            self.position = old_position;
            self.hitbox = Self::hitbox_at(self.position, &self.config);
        }

        if let Some(anim) = self.animations.get_mut(&(self.action, self.direction)) {
            anim.update(dt);
        }
    }

    /// Destination of the scaled sprite. The origin sits half an unscaled
    /// frame up and left of `position`, matching the hitbox offsets.
    pub fn sprite_dest(&self) -> Rect {
        let frame = self.animation().frame_size();
        let top_left = self.position - frame / 2.0;
        let size = frame * self.config.draw_scale;
        Rect::new(top_left.x, top_left.y, size.x, size.y)
    }

    pub fn draw(&self, textures: &TextureCache) {
        let anim = self.animation();
        let Some(texture) = textures.texture(anim.texture) else {
            return;
        };
        let dest = self.sprite_dest();
        draw_texture_ex(
            texture,
            dest.x,
            dest.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(dest.size()),
                source: Some(anim.frame_rect()),
                ..Default::default()
            },
        );
    }

    pub fn draw_debug(&self) {
        draw_rectangle_lines(self.hitbox.x, self.hitbox.y, self.hitbox.w, self.hitbox.h, 1.0, RED);
    }

    /// Approximate feet position, for ordering against object tiles.
    pub fn sorting_y(&self) -> f32 {
        self.position.y + self.config.sorting_offset_y
    }
}

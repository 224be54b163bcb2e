use crate::texture::{TextureCache, TextureId};
use macroquad::prelude::*;

/// A horizontal strip of equally sized frames.
#[derive(Debug, Clone)]
pub struct Animation {
    pub texture: TextureId,
    pub frame_count: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub current_frame: u32,
    /// Seconds per frame.
    pub frame_time: f32,
    /// Seconds since the last frame change.
    pub timer: f32,
}

impl Animation {
    /// Slices the sheet behind `texture`. An invalid sheet gets zero-sized frames.
    pub fn from_sheet(
        texture: TextureId,
        frame_count: u32,
        frame_time: f32,
        textures: &TextureCache,
    ) -> Self {
        let (w, h) = textures.size(texture);
        let frame_width = if frame_count > 0 { w / frame_count } else { 0 };
        Animation {
            texture,
            frame_count,
            frame_width,
            frame_height: h,
            current_frame: 0,
            frame_time,
            timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.timer += dt;
        if self.timer >= self.frame_time {
            self.timer = 0.0;
            self.current_frame = (self.current_frame + 1) % self.frame_count.max(1);
        }
    }

    /// Source rect of the current frame.
    pub fn frame_rect(&self) -> Rect {
        Rect::new(
            (self.current_frame * self.frame_width) as f32,
            0.0,
            self.frame_width as f32,
            self.frame_height as f32,
        )
    }

    pub fn frame_size(&self) -> Vec2 {
        vec2(self.frame_width as f32, self.frame_height as f32)
    }
}

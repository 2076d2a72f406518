//! Looping ground strip
//!
//! Two segments of one screen width each, scrolled by the world speed. A
//! segment that has slid a full width off the left edge jumps forward by two
//! widths, landing exactly behind its partner. Tiling holds for any speed of
//! at most one width per tick; faster speeds would open a gap and are
//! rejected by config validation instead of handled here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::Sprite;
use super::geom::Aabb;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundStrip {
    /// Left edge of the first segment
    pub x1: f32,
    /// Left edge of the second segment
    pub x2: f32,
    pub width: f32,
    /// Top of the strip (the ground line)
    pub y: f32,
    pub height: f32,
    /// Current scroll speed (px/tick)
    pub speed: f32,
}

impl GroundStrip {
    pub fn new(width: f32, y: f32, height: f32, speed: f32) -> Self {
        Self {
            x1: 0.0,
            x2: width,
            width,
            y,
            height,
            speed,
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn wrap(&self, x: f32) -> f32 {
        if x <= -self.width { x + 2.0 * self.width } else { x }
    }

    /// Bounds of both segments, for drawing
    pub fn segments(&self) -> [Aabb; 2] {
        let size = Vec2::new(self.width, self.height);
        [
            Aabb::from_top_left(Vec2::new(self.x1, self.y), size),
            Aabb::from_top_left(Vec2::new(self.x2, self.y), size),
        ]
    }
}

impl Sprite for GroundStrip {
    fn tick(&mut self) {
        self.x1 = self.wrap(self.x1 - self.speed);
        self.x2 = self.wrap(self.x2 - self.speed);
    }

    /// The strip always spans the visible width
    fn bounds(&self) -> Aabb {
        Aabb::from_top_left(Vec2::new(0.0, self.y), Vec2::new(self.width, self.height))
    }

    fn is_off_screen(&self) -> bool {
        false
    }
}

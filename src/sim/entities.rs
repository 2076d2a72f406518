//! Scrolling entities: obstacles and background decorations
//!
//! Everything here moves left at its own per-tick speed and is dropped in the
//! same tick its right edge reaches the left screen boundary, so collision
//! and render passes never see off-screen geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Aabb;
use crate::consts::*;

/// Shared capability of everything that lives in the world
pub trait Sprite {
    /// Advance one simulation tick
    fn tick(&mut self);
    /// Current screen-space bounds
    fn bounds(&self) -> Aabb;

    /// True once the sprite is entirely left of the screen
    fn is_off_screen(&self) -> bool {
        self.bounds().right() <= 0.0
    }
}

/// A ground obstacle (cactus)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Leftward speed (px/tick)
    pub speed: f32,
}

impl Sprite for Obstacle {
    fn tick(&mut self) {
        self.pos.x -= self.speed;
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_bottom_left(self.pos, self.size)
    }
}

/// A drifting background cloud. Never collides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decoration {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Sprite for Decoration {
    fn tick(&mut self) {
        self.pos.x -= self.speed;
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.pos, self.size)
    }
}

/// All scrolling entities of one run (kept sorted by id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollingSet {
    pub obstacles: Vec<Obstacle>,
    pub decorations: Vec<Decoration>,
    screen_width: f32,
    ground_y: f32,
    next_id: u32,
}

impl ScrollingSet {
    pub fn new(screen_width: f32, ground_y: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            decorations: Vec::new(),
            screen_width,
            ground_y,
            next_id: 1,
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// X at which obstacles enter (just past the right edge)
    pub fn obstacle_spawn_x(&self) -> f32 {
        self.screen_width + OBSTACLE_SPAWN_GAP
    }

    /// Spawn an obstacle standing on the ground at the right edge
    pub fn spawn_obstacle(&mut self, speed: f32) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(self.obstacle_spawn_x(), self.ground_y),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            speed,
        });
        id
    }

    /// Spawn a cloud at the right edge with its top at `y`
    pub fn spawn_decoration(&mut self, y: f32, speed: f32) -> u32 {
        let id = self.next_entity_id();
        self.decorations.push(Decoration {
            id,
            pos: Vec2::new(self.screen_width, y),
            size: Vec2::new(CLOUD_WIDTH, CLOUD_HEIGHT),
            speed,
        });
        id
    }

    /// Re-couple every live obstacle to a new world speed
    pub fn set_obstacle_speed(&mut self, speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.speed = speed;
        }
    }

    /// Move everything and drop what left the screen. Returns how many
    /// entities were removed.
    pub fn tick_all(&mut self) -> usize {
        let before = self.len();

        for obstacle in &mut self.obstacles {
            obstacle.tick();
        }
        for decoration in &mut self.decorations {
            decoration.tick();
        }
        self.obstacles.retain(|o| !o.is_off_screen());
        self.decorations.retain(|d| !d.is_off_screen());

        before - self.len()
    }

    pub fn obstacle_bounds(&self) -> impl Iterator<Item = Aabb> + '_ {
        self.obstacles.iter().map(Sprite::bounds)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len() + self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty() && self.decorations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set() -> ScrollingSet {
        ScrollingSet::new(SCREEN_WIDTH, 270.0)
    }

    #[test]
    fn test_spawn_obstacle_on_ground_at_right_edge() {
        let mut s = set();
        s.spawn_obstacle(5.0);
        let b = s.obstacles[0].bounds();
        assert_eq!(b.left(), SCREEN_WIDTH + OBSTACLE_SPAWN_GAP);
        assert_eq!(b.bottom(), 270.0);
        assert_eq!(b.top(), 230.0);
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut s = set();
        let a = s.spawn_obstacle(5.0);
        let b = s.spawn_decoration(40.0, 1.0);
        let c = s.spawn_obstacle(5.0);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_decoration_leaves_after_full_traversal() {
        let mut s = set();
        s.spawn_decoration(60.0, CLOUD_SPEED);
        // Right edge starts at 690 and moves 1 px per tick
        for _ in 0..689 {
            assert_eq!(s.tick_all(), 0);
        }
        assert_eq!(s.tick_all(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn test_live_speed_update() {
        let mut s = set();
        s.spawn_obstacle(5.0);
        s.spawn_obstacle(5.0);
        s.set_obstacle_speed(7.5);
        assert!(s.obstacles.iter().all(|o| o.speed == 7.5));
    }

    proptest! {
        #[test]
        fn prop_obstacle_removed_within_bound(halves in 1u32..40) {
            let speed = halves as f32 * 0.5;
            let mut s = set();
            s.spawn_obstacle(speed);

            // Distance the right edge covers to reach x = 0
            let travel = s.obstacle_spawn_x() + OBSTACLE_WIDTH;
            let bound = (travel / speed).ceil() as u32;

            let mut removed_at = None;
            for t in 1..=bound {
                s.tick_all();
                // Nothing off-screen may survive a tick
                prop_assert!(s.obstacle_bounds().all(|b| b.right() > 0.0));
                if s.obstacles.is_empty() {
                    removed_at = Some(t);
                    break;
                }
            }
            prop_assert_eq!(removed_at, Some(bound));
        }
    }
}

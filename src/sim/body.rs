//! Kinematic body for the player character
//!
//! Constant gravity, a single fixed jump impulse and a hard floor at the
//! ground line. All quantities are per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::Sprite;
use super::geom::Aabb;
use crate::consts::*;

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// x = left edge, y = feet
    pub pos: Vec2,
    /// Vertical velocity (negative is up)
    pub vel_y: f32,
    pub airborne: bool,
    /// Current run-cycle sprite index
    pub frame: u8,
    /// Ticks spent on the current sprite
    frame_ticks: u32,
    ground_y: f32,
    gravity: f32,
    jump_impulse: f32,
}

impl Player {
    pub fn new(spawn: Vec2, gravity: f32, jump_impulse: f32) -> Self {
        Self {
            pos: spawn,
            vel_y: 0.0,
            airborne: false,
            frame: 0,
            frame_ticks: 0,
            ground_y: spawn.y,
            gravity,
            jump_impulse,
        }
    }

    /// Start a jump. Ignored while already in the air.
    pub fn jump(&mut self) {
        if self.airborne {
            return;
        }
        self.vel_y = self.jump_impulse;
        self.airborne = true;
    }

    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    fn advance_frame(&mut self) {
        if self.airborne {
            return;
        }
        self.frame_ticks += 1;
        if self.frame_ticks >= TICKS_PER_RUN_FRAME {
            self.frame_ticks = 0;
            self.frame = (self.frame + 1) % RUN_FRAMES;
        }
    }
}

impl Sprite for Player {
    fn tick(&mut self) {
        self.vel_y += self.gravity;
        self.pos.y += self.vel_y;

        if self.pos.y >= self.ground_y {
            self.pos.y = self.ground_y;
            self.vel_y = 0.0;
            self.airborne = false;
        }

        self.advance_frame();
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_bottom_left(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(Vec2::new(PLAYER_SPAWN_X, 270.0), GRAVITY, JUMP_IMPULSE)
    }

    #[test]
    fn test_jump_arc_lands_on_ground() {
        let mut p = player();
        p.jump();
        assert!(p.airborne);
        assert_eq!(p.vel_y, JUMP_IMPULSE);

        let mut ticks = 0;
        while p.airborne {
            p.tick();
            ticks += 1;
            assert!(ticks < 200, "player never landed");
        }
        // Displacement -12n + n(n+1)/4 returns to zero at n = 47
        assert_eq!(ticks, 47);
        assert_eq!(p.pos.y, 270.0);
        assert_eq!(p.vel_y, 0.0);
    }

    #[test]
    fn test_no_air_jump() {
        let mut p = player();
        p.jump();
        p.tick();
        p.tick();
        let (vel, airborne) = (p.vel_y, p.airborne);
        p.jump();
        assert_eq!(p.vel_y, vel);
        assert_eq!(p.airborne, airborne);
    }

    #[test]
    fn test_resting_player_stays_grounded() {
        let mut p = player();
        for _ in 0..10 {
            p.tick();
        }
        assert!(!p.airborne);
        assert_eq!(p.vel_y, 0.0);
        assert_eq!(p.pos.y, 270.0);
    }

    #[test]
    fn test_run_cycle_freezes_in_air() {
        let mut p = player();
        for _ in 0..TICKS_PER_RUN_FRAME {
            p.tick();
        }
        assert_eq!(p.frame, 1);

        p.jump();
        let frame = p.frame;
        for _ in 0..TICKS_PER_RUN_FRAME * 3 {
            p.tick();
        }
        assert_eq!(p.frame, frame);
    }

    proptest! {
        #[test]
        fn prop_feet_never_below_ground(jumps in proptest::collection::vec(any::<bool>(), 1..400)) {
            let mut p = player();
            for jump in jumps {
                if jump {
                    p.jump();
                }
                p.tick();
                prop_assert!(p.pos.y <= p.ground_y());
                // Grounded exactly when resting on the floor with no velocity
                prop_assert_eq!(!p.airborne, p.vel_y == 0.0 && p.pos.y == p.ground_y());
            }
        }
    }
}

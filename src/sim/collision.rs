//! Collision detection between the player and obstacles
//!
//! Plain AABB overlap. Must run after the tick's movement so it sees
//! post-motion positions.

use super::geom::Aabb;

/// True if the player box overlaps any obstacle box
pub fn check<I>(player: &Aabb, obstacles: I) -> bool
where
    I: IntoIterator<Item = Aabb>,
{
    obstacles.into_iter().any(|o| player.intersects(&o))
}

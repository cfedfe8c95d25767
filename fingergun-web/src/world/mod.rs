//! World module - room collision, first-person movement and the target arena
//!
//! Re-exports only. All logic in submodules.

mod room;
mod movement;
mod arena;

pub use room::{player_capsule, Aabb, RoomBounds};
pub use movement::{MoveIntent, MovementController, Viewpoint};
pub use arena::{Arena, ArenaStep, Projectile, RandomSource, Target};

//! Room geometry - six solid slabs around a box-shaped room
//!
//! Each slab starts slightly inside the room surface and extends outward,
//! so a thin room surface becomes a volume the player box cannot slip through.

use nalgebra::Vector3;

use crate::config::{MovementConfig, RoomConfig};

/// Axis-aligned box. Intersection is inclusive: touching faces collide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }
}

/// Box approximating the player's body around the eye point
pub fn player_capsule(eye: Vector3<f32>, movement: &MovementConfig) -> Aabb {
    let r = movement.player_radius;
    Aabb::new(
        Vector3::new(eye.x - r, eye.y - movement.below_eye, eye.z - r),
        Vector3::new(eye.x + r, eye.y + movement.above_eye, eye.z + r),
    )
}

/// Collision volumes for the room: floor, ceiling, back, front, left, right
#[derive(Clone, Debug, PartialEq)]
pub struct RoomBounds {
    slabs: [Aabb; 6],
    width: f32,
    height: f32,
    depth: f32,
}

impl RoomBounds {
    pub fn new(room: &RoomConfig) -> Self {
        let hw = room.width / 2.0;
        let hd = room.depth / 2.0;
        let h = room.height;
        let t = room.wall_thickness;
        let i = room.wall_inset;

        let slabs = [
            // floor
            Aabb::new(Vector3::new(-hw, -t, -hd), Vector3::new(hw, i, hd)),
            // ceiling
            Aabb::new(Vector3::new(-hw, h - i, -hd), Vector3::new(hw, h + t, hd)),
            // back (-Z)
            Aabb::new(Vector3::new(-hw, 0.0, -hd - t), Vector3::new(hw, h, -hd + i)),
            // front (+Z)
            Aabb::new(Vector3::new(-hw, 0.0, hd - i), Vector3::new(hw, h, hd + t)),
            // left (-X)
            Aabb::new(Vector3::new(-hw - t, 0.0, -hd), Vector3::new(-hw + i, h, hd)),
            // right (+X)
            Aabb::new(Vector3::new(hw - i, 0.0, -hd), Vector3::new(hw + t, h, hd)),
        ];

        Self {
            slabs,
            width: room.width,
            height: room.height,
            depth: room.depth,
        }
    }

    pub fn slabs(&self) -> &[Aabb; 6] {
        &self.slabs
    }

    /// Does `volume` touch any slab?
    pub fn collides(&self, volume: &Aabb) -> bool {
        self.slabs.iter().any(|slab| slab.intersects(volume))
    }

    /// (width, height, depth)
    pub fn dimensions(&self) -> (f32, f32, f32) {
        (self.width, self.height, self.depth)
    }
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self::new(&RoomConfig::default())
    }
}

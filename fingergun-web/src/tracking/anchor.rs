//! Hand anchor - where a hand model floats in the room
//!
//! Joint positions are tracked in a hand-local frame. The anchor places that
//! frame a fixed distance in front of the viewer, clamped inside the room, and
//! eases both position and rotation so head motion does not snap the hands.

use nalgebra::{UnitQuaternion, Vector3};

use crate::config::{MovementConfig, RoomConfig};
use crate::world::Viewpoint;

use super::smoothing::smooth_value;

#[derive(Clone, Debug)]
pub struct HandAnchor {
    position: Vector3<f32>,
    rotation: UnitQuaternion<f32>,
    initialized: bool,
}

impl HandAnchor {
    pub fn new() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            initialized: false,
        }
    }

    /// Move toward the spot in front of the viewer
    pub fn update(&mut self, viewer: &Viewpoint, movement: &MovementConfig, room: &RoomConfig) {
        let target = clamp_to_room(
            viewer.position + viewer.forward() * movement.hand_distance,
            room,
            movement.hand_margin,
        );

        if !self.initialized {
            self.position = target;
            self.rotation = viewer.orientation;
            self.initialized = true;
            return;
        }

        let t = movement.anchor_position_smoothing;
        self.position = Vector3::new(
            smooth_value(self.position.x, target.x, t),
            smooth_value(self.position.y, target.y, t),
            smooth_value(self.position.z, target.z, t),
        );
        self.rotation = self
            .rotation
            .try_slerp(&viewer.orientation, movement.anchor_rotation_smoothing, 1e-6)
            .unwrap_or(viewer.orientation);
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> UnitQuaternion<f32> {
        self.rotation
    }

    /// Hand-local point -> world
    pub fn to_world(&self, local: Vector3<f32>) -> Vector3<f32> {
        self.position + self.rotation * local
    }

    /// World point -> hand-local
    pub fn to_local(&self, world: Vector3<f32>) -> Vector3<f32> {
        self.rotation.inverse() * (world - self.position)
    }

    /// Hand-local direction -> world
    pub fn direction_to_world(&self, local: Vector3<f32>) -> Vector3<f32> {
        self.rotation * local
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for HandAnchor {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp to [lo, hi]; an empty range collapses to its midpoint
fn clamp_axis(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        value.max(lo).min(hi)
    }
}

/// Keep a point at least `margin` away from every room surface.
/// On an axis too short for the margin the point is centred.
pub fn clamp_to_room(position: Vector3<f32>, room: &RoomConfig, margin: f32) -> Vector3<f32> {
    let half_w = room.width / 2.0;
    let half_d = room.depth / 2.0;
    Vector3::new(
        clamp_axis(position.x, -half_w + margin, half_w - margin),
        clamp_axis(position.y, margin, room.height - margin),
        clamp_axis(position.z, -half_d + margin, half_d - margin),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_keeps_margin() {
        let room = RoomConfig::default();
        let p = clamp_to_room(Vector3::new(50.0, -3.0, -12.0), &room, 1.0);
        assert_eq!(p, Vector3::new(9.0, 1.0, -9.0));
    }

    #[test]
    fn test_clamp_centres_axis_narrower_than_margin() {
        let room = RoomConfig { width: 1.5, ..RoomConfig::default() };
        let p = clamp_to_room(Vector3::new(3.0, 1.7, 2.0), &room, 1.0);
        assert_eq!(p, Vector3::new(0.0, 1.7, 2.0));
    }

    #[test]
    fn test_first_update_snaps_in_front_of_viewer() {
        let viewer = Viewpoint::new(Vector3::new(0.0, 1.7, 5.0));
        let mut anchor = HandAnchor::new();
        anchor.update(&viewer, &MovementConfig::default(), &RoomConfig::default());
        // default orientation looks down -Z
        assert!((anchor.position() - Vector3::new(0.0, 1.7, 3.0)).norm() < 1e-5);
    }

    #[test]
    fn test_anchor_eases_after_first_update() {
        let mut viewer = Viewpoint::new(Vector3::new(0.0, 1.7, 5.0));
        let mut anchor = HandAnchor::new();
        let movement = MovementConfig::default();
        let room = RoomConfig::default();
        anchor.update(&viewer, &movement, &room);

        viewer.position.x = 1.0;
        anchor.update(&viewer, &movement, &room);
        assert!((anchor.position().x - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_snaps_then_slerps() {
        let mut viewer = Viewpoint::new(Vector3::new(0.0, 1.7, 5.0));
        viewer.orientation = UnitQuaternion::from_euler_angles(0.0, 0.5, 0.0);
        let mut anchor = HandAnchor::new();
        let movement = MovementConfig::default();
        let room = RoomConfig::default();
        anchor.update(&viewer, &movement, &room);
        assert!(anchor.rotation().angle_to(&viewer.orientation) < 1e-5);

        viewer.orientation = UnitQuaternion::from_euler_angles(0.0, 1.5, 0.0);
        anchor.update(&viewer, &movement, &room);
        // 0.1 of the way from yaw 0.5 to 1.5
        assert!((anchor.rotation().angle() - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_anchor_stays_inside_room_near_wall() {
        let viewer = Viewpoint::new(Vector3::new(0.0, 1.7, -9.0));
        let mut anchor = HandAnchor::new();
        anchor.update(&viewer, &MovementConfig::default(), &RoomConfig::default());
        assert!((anchor.position().z + 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_local_world_round_trip() {
        let mut viewer = Viewpoint::new(Vector3::new(2.0, 1.7, 0.0));
        viewer.orientation = UnitQuaternion::from_euler_angles(0.0, 0.8, 0.0);
        let mut anchor = HandAnchor::new();
        anchor.update(&viewer, &MovementConfig::default(), &RoomConfig::default());

        let local = Vector3::new(0.3, -0.2, 0.5);
        let back = anchor.to_local(anchor.to_world(local));
        assert!((back - local).norm() < 1e-5);
    }
}

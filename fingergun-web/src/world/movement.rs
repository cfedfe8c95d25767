//! First-person WASD movement with per-axis wall sliding
//!
//! X and Z displacement are tested and committed independently, so walking
//! diagonally into a wall keeps the component parallel to it.

use nalgebra::{UnitQuaternion, Vector3};

use crate::config::MovementConfig;

use super::room::{player_capsule, RoomBounds};

/// Viewer eye position and look orientation (three.js camera convention:
/// looks down -Z, +X is right, +Y is up)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewpoint {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl Viewpoint {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Spawn point for a room described by `movement`
    pub fn spawn(movement: &MovementConfig) -> Self {
        Self::new(Vector3::new(0.0, movement.eye_height, movement.start_depth))
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.orientation * Vector3::new(0.0, 0.0, -1.0)
    }

    pub fn right(&self) -> Vector3<f32> {
        self.orientation * Vector3::new(1.0, 0.0, 0.0)
    }
}

/// Latched WASD state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// KeyboardEvent.code down edge; returns false for keys we ignore
    pub fn key_down(&mut self, code: &str) -> bool {
        self.set(code, true)
    }

    /// KeyboardEvent.code up edge
    pub fn key_up(&mut self, code: &str) -> bool {
        self.set(code, false)
    }

    fn set(&mut self, code: &str, pressed: bool) -> bool {
        let slot = match code {
            "KeyW" => &mut self.forward,
            "KeyS" => &mut self.backward,
            "KeyA" => &mut self.left,
            "KeyD" => &mut self.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Drop the vertical component and normalize; zero stays zero
fn flatten(v: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.x, 0.0, v.z)
        .try_normalize(1e-6)
        .unwrap_or_else(Vector3::zeros)
}

#[derive(Clone, Debug)]
pub struct MovementController {
    config: MovementConfig,
}

impl MovementController {
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    /// Horizontal displacement requested for one tick (before collision)
    pub fn desired_step(&self, viewer: &Viewpoint, intent: &MoveIntent) -> Vector3<f32> {
        let forward = flatten(viewer.forward());
        let right = flatten(viewer.right());

        let mut direction = Vector3::zeros();
        if intent.forward {
            direction += forward;
        }
        if intent.backward {
            direction -= forward;
        }
        if intent.right {
            direction += right;
        }
        if intent.left {
            direction -= right;
        }

        direction
            .try_normalize(1e-6)
            .map(|d| d * self.config.speed)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Apply one tick of movement; returns the displacement actually committed
    pub fn step(&self, viewer: &mut Viewpoint, intent: &MoveIntent, room: &RoomBounds) -> Vector3<f32> {
        let step = self.desired_step(viewer, intent);
        self.apply(viewer, step, room)
    }

    /// Commit X, then Z, each only if the player box stays clear of the room slabs
    pub fn apply(&self, viewer: &mut Viewpoint, step: Vector3<f32>, room: &RoomBounds) -> Vector3<f32> {
        let start = viewer.position;
        let mut current = viewer.position;

        let mut candidate = current;
        candidate.x += step.x;
        if !room.collides(&player_capsule(candidate, &self.config)) {
            current.x = candidate.x;
        }

        let mut candidate = current;
        candidate.z += step.z;
        if !room.collides(&player_capsule(candidate, &self.config)) {
            current.z = candidate.z;
        }

        viewer.position = current;
        current - start
    }

    pub fn set_config(&mut self, config: MovementConfig) {
        self.config = config;
    }
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_keys_latch_until_release() {
        let mut intent = MoveIntent::default();
        assert!(intent.key_down("KeyW"));
        assert!(intent.forward);
        assert!(!intent.key_down("KeyQ"));
        assert!(intent.forward);
        intent.key_up("KeyW");
        assert!(!intent.forward);
    }

    #[test]
    fn test_forward_moves_down_negative_z() {
        let controller = MovementController::default();
        let mut viewer = Viewpoint::new(Vector3::new(0.0, 1.7, 5.0));
        let intent = MoveIntent { forward: true, ..Default::default() };
        let moved = controller.step(&mut viewer, &intent, &RoomBounds::default());
        assert!((moved - Vector3::new(0.0, 0.0, -0.1)).norm() < 1e-6);
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let controller = MovementController::default();
        let viewer = Viewpoint::new(Vector3::new(0.0, 1.7, 0.0));
        let intent = MoveIntent { forward: true, right: true, ..Default::default() };
        let step = controller.desired_step(&viewer, &intent);
        assert!((step.norm() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_does_not_change_height() {
        let controller = MovementController::default();
        let mut viewer = Viewpoint::new(Vector3::new(0.0, 1.7, 0.0));
        viewer.orientation = UnitQuaternion::from_euler_angles(-0.6, 0.0, 0.0);
        let intent = MoveIntent { forward: true, ..Default::default() };
        let moved = controller.step(&mut viewer, &intent, &RoomBounds::default());
        assert_eq!(moved.y, 0.0);
        assert!((moved.norm() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let controller = MovementController::default();
        let viewer = Viewpoint::new(Vector3::new(0.0, 1.7, 0.0));
        let intent = MoveIntent { forward: true, backward: true, ..Default::default() };
        assert_eq!(controller.desired_step(&viewer, &intent), Vector3::zeros());
    }

    #[test]
    fn test_slides_along_wall() {
        let controller = MovementController::default();
        let room = RoomBounds::default();
        // pressed against the right wall (slab starts at x = 9.9)
        let mut viewer = Viewpoint::new(Vector3::new(9.35, 1.7, 0.0));
        let moved = controller.apply(&mut viewer, Vector3::new(0.1, 0.0, -0.1), &room);
        assert_eq!(moved.x, 0.0);
        assert!((moved.z + 0.1).abs() < 1e-6);
        assert!((viewer.position.x - 9.35).abs() < 1e-6);
    }

    #[test]
    fn test_cannot_leave_room() {
        let controller = MovementController::default();
        let room = RoomBounds::default();
        let mut viewer = Viewpoint::new(Vector3::new(0.0, 1.7, 5.0));

        let headings = [0.0, FRAC_PI_4, 2.0, -1.3, 3.1];
        for (i, yaw) in headings.iter().enumerate() {
            viewer.orientation = UnitQuaternion::from_euler_angles(0.0, *yaw, 0.0);
            let intent = MoveIntent {
                forward: i % 2 == 0,
                left: i % 3 == 0,
                right: i % 3 == 1,
                backward: i == 3,
            };
            for _ in 0..400 {
                controller.step(&mut viewer, &intent, &room);
                let p = viewer.position;
                assert!(p.x.abs() < 10.0);
                assert!(p.z.abs() < 10.0);
                assert!(p.y > 0.0 && p.y < 10.0);
            }
        }
    }
}

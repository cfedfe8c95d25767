//! Hand state - everything the pipeline remembers about one hand
//!
//! Allocated once per session for each handedness. Frames where the hand is
//! missing (or arrives incomplete) leave it untouched and only hide it.

use nalgebra::Vector3;

use crate::classifier::GestureDebouncer;
use crate::config::InteractionConfig;

use super::aim::AimEstimator;
use super::anchor::HandAnchor;
use super::landmarks::{Handedness, RawLandmark, LANDMARK_COUNT};
use super::shot::ShotDetector;
use super::smoothing::JointFilter;

#[derive(Clone, Debug)]
pub struct HandState {
    pub handedness: Handedness,
    /// Smoothed joint positions in the hand-local frame
    pub joints: [JointFilter; LANDMARK_COUNT],
    pub gesture: GestureDebouncer,
    pub shot: ShotDetector,
    pub aim: AimEstimator,
    pub anchor: HandAnchor,
    /// Shown this frame (detected and usable)
    pub visible: bool,
    /// Debounced finger-gun state after the last processed frame
    pub gesture_active: bool,
    /// Time of the last frame this hand was processed
    pub last_seen: Option<f64>,
}

impl HandState {
    pub fn new(handedness: Handedness, config: &InteractionConfig) -> Self {
        Self {
            handedness,
            joints: [JointFilter::new(config.smoothing.lateral, config.smoothing.depth); LANDMARK_COUNT],
            gesture: GestureDebouncer::new(config.gesture.history_length),
            shot: ShotDetector::new(config.shot.clone()),
            aim: AimEstimator::new(config.aim.clone()),
            anchor: HandAnchor::new(),
            visible: false,
            gesture_active: false,
            last_seen: None,
        }
    }

    /// Smooth a complete set of raw landmarks into the joint filters
    pub fn apply_landmarks(&mut self, raw: &[RawLandmark; LANDMARK_COUNT], scale: f32) {
        for (filter, lm) in self.joints.iter_mut().zip(raw.iter()) {
            filter.filter(lm.to_world(scale));
        }
    }

    /// Smoothed joints, None until the hand has been seen once
    pub fn joint_positions(&self) -> Option<[Vector3<f32>; LANDMARK_COUNT]> {
        let mut out = [Vector3::zeros(); LANDMARK_COUNT];
        for (slot, filter) in out.iter_mut().zip(self.joints.iter()) {
            *slot = filter.position()?;
        }
        Some(out)
    }

    /// Joints placed in the room through the anchor
    pub fn world_joints(&self) -> Option<[Vector3<f32>; LANDMARK_COUNT]> {
        let mut joints = self.joint_positions()?;
        for joint in joints.iter_mut() {
            *joint = self.anchor.to_world(*joint);
        }
        Some(joints)
    }

    /// Finger gun currently held by a hand that is on screen
    pub fn gun_held(&self) -> bool {
        self.visible && self.gesture_active
    }

    /// Push new tuning into every stage without losing tracked state
    pub fn reconfigure(&mut self, config: &InteractionConfig) {
        for filter in self.joints.iter_mut() {
            filter.set_factors(config.smoothing.lateral, config.smoothing.depth);
        }
        self.gesture.set_capacity(config.gesture.history_length);
        self.shot.set_config(config.shot.clone());
        self.aim.set_config(config.aim.clone());
    }

    pub fn reset(&mut self) {
        for filter in self.joints.iter_mut() {
            filter.reset();
        }
        self.gesture.clear();
        self.shot.reset();
        self.aim.reset();
        self.anchor.reset();
        self.visible = false;
        self.gesture_active = false;
        self.last_seen = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joints_unknown_until_first_frame() {
        let mut hand = HandState::new(Handedness::Left, &InteractionConfig::default());
        assert!(hand.joint_positions().is_none());

        let raw = [RawLandmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        hand.apply_landmarks(&raw, 4.0);
        let joints = hand.joint_positions().unwrap();
        assert!(joints.iter().all(|j| j.norm() < 1e-6));
    }

    #[test]
    fn test_hidden_hand_does_not_hold_gun() {
        let mut hand = HandState::new(Handedness::Left, &InteractionConfig::default());
        hand.visible = true;
        hand.gesture_active = true;
        assert!(hand.gun_held());

        hand.visible = false;
        assert!(!hand.gun_held());
        assert!(hand.gesture_active);
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut hand = HandState::new(Handedness::Right, &InteractionConfig::default());
        hand.apply_landmarks(&[RawLandmark::new(0.1, 0.2, 0.3); LANDMARK_COUNT], 4.0);
        hand.gesture.push(true);
        hand.visible = true;
        hand.reset();
        assert!(hand.joint_positions().is_none());
        assert!(hand.gesture.is_empty());
        assert!(!hand.visible);
    }
}

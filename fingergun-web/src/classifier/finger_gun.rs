//! Finger-gun pose test
//!
//! Index out, thumb cocked away from it, middle/ring/pinky folded back.
//! A finger counts as folded when its first and last segments point in
//! roughly opposite directions. When the hand points along the view ray the
//! folded fingers hide behind the palm and their segment directions turn to
//! noise, so the thumb alone decides.

use nalgebra::{Unit, Vector3};

use crate::config::GestureConfig;
use crate::tracking::landmarks::*;

const MIN_SEGMENT: f32 = 1e-6;

fn segment(joints: &[Vector3<f32>; LANDMARK_COUNT], start: usize, end: usize) -> Option<Unit<Vector3<f32>>> {
    Unit::try_new(joints[end] - joints[start], MIN_SEGMENT)
}

/// Dot product of a finger's proximal and distal segment directions
fn curl_dot(joints: &[Vector3<f32>; LANDMARK_COUNT], mcp: usize, pip: usize, dip: usize, tip: usize) -> Option<f32> {
    Some(segment(joints, mcp, pip)?.into_inner().dot(&segment(joints, dip, tip)?.into_inner()))
}

fn is_curled(joints: &[Vector3<f32>; LANDMARK_COUNT], chain: [usize; 4], threshold: f32) -> bool {
    curl_dot(joints, chain[0], chain[1], chain[2], chain[3]).is_some_and(|dot| dot < threshold)
}

#[derive(Clone, Debug, Default)]
pub struct FingerGunClassifier {
    config: GestureConfig,
}

impl FingerGunClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    /// Thumb tip far enough from the index tip, relative to palm length
    pub fn is_thumb_positioned(&self, joints: &[Vector3<f32>; LANDMARK_COUNT]) -> bool {
        let palm_length = (joints[INDEX_MCP] - joints[WRIST]).norm();
        if palm_length < MIN_SEGMENT {
            return false;
        }
        let thumb_to_index = (joints[INDEX_TIP] - joints[THUMB_TIP]).norm();
        thumb_to_index > palm_length * self.config.thumb_extension_ratio
    }

    /// Hand points along the view ray (viewer -> wrist)
    pub fn is_facing_camera(&self, joints: &[Vector3<f32>; LANDMARK_COUNT], viewer: Vector3<f32>) -> bool {
        let view_ray = Unit::try_new(joints[WRIST] - viewer, MIN_SEGMENT);
        let hand_dir = segment(joints, WRIST, MIDDLE_MCP);
        match (view_ray, hand_dir) {
            (Some(view), Some(hand)) => view.into_inner().dot(&hand.into_inner()) > self.config.camera_facing_dot,
            _ => false,
        }
    }

    /// Verdict for one frame. `viewer` is the eye position in the same frame as `joints`;
    /// `None` joints (hand never seen) is never a finger gun.
    pub fn classify(&self, joints: Option<&[Vector3<f32>; LANDMARK_COUNT]>, viewer: Vector3<f32>) -> bool {
        let Some(joints) = joints else {
            return false;
        };
        if joints.iter().any(|j| !j.iter().all(|c| c.is_finite())) {
            return false;
        }

        let thumb = self.is_thumb_positioned(joints);
        if self.is_facing_camera(joints, viewer) {
            return thumb;
        }

        let middle = is_curled(joints, [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP], self.config.middle_curl_dot);
        let ring = is_curled(joints, [RING_MCP, RING_PIP, RING_DIP, RING_TIP], self.config.ring_curl_dot);
        let pinky = is_curled(joints, [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP], self.config.pinky_curl_dot);

        middle && ring && pinky && thumb
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

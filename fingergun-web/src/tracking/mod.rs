//! Tracking module - per-hand pipeline from raw landmarks to shot events
//!
//! Re-exports only in mod.rs, logic in submodules.

pub mod landmarks;
mod smoothing;
mod shot;
mod aim;
mod anchor;
mod hand_state;
mod tracker;

pub use landmarks::{
    DetectedHand, FrameParseError, Handedness, PoseFrame, RawLandmark,
    HAND_CONNECTIONS, LANDMARK_COUNT, FLOATS_PER_HAND,
};
pub use smoothing::{smooth_value, ExponentialFilter, JointFilter};
pub use shot::{ShotDetector, ShotState, ThumbSample};
pub use aim::AimEstimator;
pub use anchor::{clamp_to_room, HandAnchor};
pub use hand_state::HandState;
pub use tracker::{HandTracker, ShotEvent};

#[cfg(test)]
pub(crate) use tracker::tests::{finger_gun_hand, unsmoothed_config};

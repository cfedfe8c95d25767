//! Tunable thresholds for tracking, shot detection and movement
//!
//! Every magic number of the interaction pipeline lives here as a named
//! constant, and every constant is also a field of a config struct so JS can
//! override it with a JSON blob (see `bridge::configure`).

use serde::Deserialize;

// ============================================================================
// DEFAULTS
// ============================================================================

/// Scale applied when mapping normalized landmarks into world units
pub const LANDMARK_SCALE: f32 = 4.0;
/// Lateral (X/Y) smoothing factor per pose frame
pub const LATERAL_SMOOTHING: f32 = 0.2;
/// Depth (Z) smoothing factor - depth from the backend is noisier
pub const DEPTH_SMOOTHING: f32 = 0.1;

pub const MIDDLE_CURL_DOT: f32 = -0.15;
pub const RING_CURL_DOT: f32 = 0.0;
pub const PINKY_CURL_DOT: f32 = 0.0;
/// Thumb-tip to index-tip distance, as a fraction of palm length
pub const THUMB_EXTENSION_RATIO: f32 = 0.45;
/// Above this the hand is viewed edge-on and curl tests are skipped
pub const CAMERA_FACING_DOT: f32 = 0.4;
/// Frames in the debounce window
pub const GESTURE_HISTORY_LENGTH: usize = 3;

/// Samples kept in the thumb-motion window
pub const THUMB_HISTORY_LENGTH: usize = 5;
pub const ARM_MOVEMENT: f32 = 0.008;
pub const FIRE_MOVEMENT: f32 = 0.015;
/// Seconds a pull may take before it is abandoned
pub const PULL_TIMEOUT: f64 = 0.6;
/// Seconds between two shots of the same hand
pub const REFRACTORY_PERIOD: f64 = 0.4;
/// Fraction of frame deltas that must agree with the net movement
pub const MOTION_CONSISTENCY: f32 = 0.7;

pub const AIM_BUFFER_SIZE: usize = 5;
pub const AIM_BLEND: f32 = 0.7;

pub const MOVE_SPEED: f32 = 0.1;
pub const PLAYER_RADIUS: f32 = 0.5;
/// Capsule extent below the eye point
pub const PLAYER_BELOW_EYE: f32 = 1.0;
/// Capsule extent above the eye point
pub const PLAYER_ABOVE_EYE: f32 = 0.5;
pub const EYE_HEIGHT: f32 = 1.7;
pub const START_DEPTH: f32 = 5.0;

pub const ROOM_WIDTH: f32 = 20.0;
pub const ROOM_HEIGHT: f32 = 10.0;
pub const ROOM_DEPTH: f32 = 20.0;
/// How far each slab extends outside the room surface
pub const WALL_THICKNESS: f32 = 1.0;
/// How far each slab reaches into the room
pub const WALL_INSET: f32 = 0.1;

/// Distance in front of the viewer at which hand models float
pub const HAND_DISTANCE: f32 = 2.0;
/// Keep-out margin between hand models and room surfaces
pub const HAND_MARGIN: f32 = 1.0;
pub const ANCHOR_POSITION_SMOOTHING: f32 = 0.1;
pub const ANCHOR_ROTATION_SMOOTHING: f32 = 0.1;

pub const TARGET_COUNT: usize = 5;
pub const TARGET_RESPAWN_SECONDS: f64 = 1.0;
pub const TARGET_HIT_RADIUS: f32 = 0.5;
pub const TARGET_MIN_DISTANCE: f32 = 5.0;
pub const TARGET_DISTANCE_SPREAD: f32 = 10.0;
pub const TARGET_MIN_HEIGHT: f32 = 1.0;
pub const TARGET_HEIGHT_SPREAD: f32 = 3.0;
pub const PROJECTILE_SPEED: f32 = 1.5;
pub const PROJECTILE_RANGE: f32 = 20.0;
pub const HIT_SCORE: u32 = 100;

// ============================================================================
// CONFIG STRUCTS
// ============================================================================

/// Landmark smoothing factors
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingConfig {
    pub landmark_scale: f32,
    pub lateral: f32,
    pub depth: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            landmark_scale: LANDMARK_SCALE,
            lateral: LATERAL_SMOOTHING,
            depth: DEPTH_SMOOTHING,
        }
    }
}

/// Finger-gun pose thresholds
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    pub middle_curl_dot: f32,
    pub ring_curl_dot: f32,
    pub pinky_curl_dot: f32,
    pub thumb_extension_ratio: f32,
    pub camera_facing_dot: f32,
    pub history_length: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            middle_curl_dot: MIDDLE_CURL_DOT,
            ring_curl_dot: RING_CURL_DOT,
            pinky_curl_dot: PINKY_CURL_DOT,
            thumb_extension_ratio: THUMB_EXTENSION_RATIO,
            camera_facing_dot: CAMERA_FACING_DOT,
            history_length: GESTURE_HISTORY_LENGTH,
        }
    }
}

/// Hammer-drop detection thresholds (heights in world units, times in seconds)
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShotConfig {
    pub history_length: usize,
    pub arm_movement: f32,
    pub fire_movement: f32,
    pub pull_timeout: f64,
    pub refractory_period: f64,
    pub consistency: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            history_length: THUMB_HISTORY_LENGTH,
            arm_movement: ARM_MOVEMENT,
            fire_movement: FIRE_MOVEMENT,
            pull_timeout: PULL_TIMEOUT,
            refractory_period: REFRACTORY_PERIOD,
            consistency: MOTION_CONSISTENCY,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AimConfig {
    pub buffer_size: usize,
    pub blend: f32,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            buffer_size: AIM_BUFFER_SIZE,
            blend: AIM_BLEND,
        }
    }
}

/// First-person locomotion and hand placement
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    pub speed: f32,
    pub player_radius: f32,
    pub below_eye: f32,
    pub above_eye: f32,
    pub eye_height: f32,
    pub start_depth: f32,
    pub hand_distance: f32,
    pub hand_margin: f32,
    pub anchor_position_smoothing: f32,
    pub anchor_rotation_smoothing: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: MOVE_SPEED,
            player_radius: PLAYER_RADIUS,
            below_eye: PLAYER_BELOW_EYE,
            above_eye: PLAYER_ABOVE_EYE,
            eye_height: EYE_HEIGHT,
            start_depth: START_DEPTH,
            hand_distance: HAND_DISTANCE,
            hand_margin: HAND_MARGIN,
            anchor_position_smoothing: ANCHOR_POSITION_SMOOTHING,
            anchor_rotation_smoothing: ANCHOR_ROTATION_SMOOTHING,
        }
    }
}

/// Room dimensions, shared with the JS scene builder
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoomConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub wall_thickness: f32,
    pub wall_inset: f32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: ROOM_WIDTH,
            height: ROOM_HEIGHT,
            depth: ROOM_DEPTH,
            wall_thickness: WALL_THICKNESS,
            wall_inset: WALL_INSET,
        }
    }
}

/// Targets, projectiles and scoring
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    pub target_count: usize,
    pub respawn_seconds: f64,
    pub hit_radius: f32,
    pub min_distance: f32,
    pub distance_spread: f32,
    pub min_height: f32,
    pub height_spread: f32,
    pub projectile_speed: f32,
    pub projectile_range: f32,
    pub hit_score: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            target_count: TARGET_COUNT,
            respawn_seconds: TARGET_RESPAWN_SECONDS,
            hit_radius: TARGET_HIT_RADIUS,
            min_distance: TARGET_MIN_DISTANCE,
            distance_spread: TARGET_DISTANCE_SPREAD,
            min_height: TARGET_MIN_HEIGHT,
            height_spread: TARGET_HEIGHT_SPREAD,
            projectile_speed: PROJECTILE_SPEED,
            projectile_range: PROJECTILE_RANGE,
            hit_score: HIT_SCORE,
        }
    }
}

/// Everything the session needs, in one tree
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    pub smoothing: SmoothingConfig,
    pub gesture: GestureConfig,
    pub shot: ShotConfig,
    pub aim: AimConfig,
    pub movement: MovementConfig,
    pub room: RoomConfig,
    pub arena: ArenaConfig,
}

fn negative_or_nan(value: f32) -> bool {
    value.is_nan() || value < 0.0
}

impl InteractionConfig {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values the room, movement and anchor math cannot work with
    pub fn validate(&self) -> Result<(), String> {
        let room = &self.room;
        let movement = &self.movement;

        for (name, value) in [("width", room.width), ("height", room.height), ("depth", room.depth)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("room {} must be positive, got {}", name, value));
            }
        }
        if negative_or_nan(room.wall_thickness) || negative_or_nan(room.wall_inset) {
            return Err("room wall thickness and inset must not be negative".to_string());
        }
        if negative_or_nan(movement.speed) {
            return Err(format!("movement speed must not be negative, got {}", movement.speed));
        }
        if negative_or_nan(movement.hand_margin) {
            return Err(format!("hand margin must not be negative, got {}", movement.hand_margin));
        }
        let span = 2.0 * movement.hand_margin;
        if room.width <= span || room.height <= span || room.depth <= span {
            return Err(format!(
                "room {}x{}x{} is too small for a hand margin of {}",
                room.width, room.height, room.depth, movement.hand_margin
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = InteractionConfig::from_json(r#"{ "shot": { "refractory_period": 0.5 } }"#)
            .unwrap();
        assert_eq!(config.shot.refractory_period, 0.5);
        assert_eq!(config.shot.pull_timeout, PULL_TIMEOUT);
        assert_eq!(config.room, RoomConfig::default());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = InteractionConfig::from_json("{}").unwrap();
        assert_eq!(config, InteractionConfig::default());
    }

    #[test]
    fn test_defaults_validate() {
        assert_eq!(InteractionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_room_narrower_than_hand_margin_rejected() {
        let config = InteractionConfig::from_json(r#"{ "room": { "width": 1.5 } }"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_room_and_negative_speed_rejected() {
        let mut config = InteractionConfig::default();
        config.room.depth = 0.0;
        assert!(config.validate().is_err());

        let mut config = InteractionConfig::default();
        config.movement.speed = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(InteractionConfig::from_json("{ \"room\": 3 }").is_err());
    }
}

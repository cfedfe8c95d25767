//! Hand tracker - runs the per-frame pipeline for every detected hand
//!
//! smooth -> anchor -> classify -> debounce -> aim -> shot detection.
//! Shot detection only sees frames where the debounced gesture is active;
//! losing the gesture resets the thumb window.

use nalgebra::{Unit, Vector3};

use crate::classifier::FingerGunClassifier;
use crate::config::InteractionConfig;
use crate::world::Viewpoint;

use super::hand_state::HandState;
use super::landmarks::{DetectedHand, Handedness, PoseFrame, INDEX_MCP, INDEX_TIP, THUMB_TIP};

/// A shot fired by one hand, in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotEvent {
    pub hand: Handedness,
    /// Index fingertip position
    pub origin: Vector3<f32>,
    pub direction: Unit<Vector3<f32>>,
    /// Seconds
    pub time: f64,
}

pub struct HandTracker {
    config: InteractionConfig,
    classifier: FingerGunClassifier,
    hands: [HandState; 2],
}

impl HandTracker {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            classifier: FingerGunClassifier::new(config.gesture.clone()),
            hands: [
                HandState::new(Handedness::Left, &config),
                HandState::new(Handedness::Right, &config),
            ],
            config,
        }
    }

    /// Process one pose frame; returns the shots it produced
    pub fn process_frame(&mut self, frame: &PoseFrame, viewer: &Viewpoint) -> Vec<ShotEvent> {
        for hand in self.hands.iter_mut() {
            hand.visible = false;
        }

        let mut shots = Vec::new();
        for detected in &frame.hands {
            if let Some(shot) = self.process_hand(detected, frame.timestamp, viewer) {
                shots.push(shot);
            }
        }
        shots
    }

    fn process_hand(&mut self, detected: &DetectedHand, time: f64, viewer: &Viewpoint) -> Option<ShotEvent> {
        let Some(raw) = detected.complete_landmarks() else {
            log::debug!(
                "skipping {} hand: incomplete landmarks (required present: {})",
                detected.handedness.as_str(),
                detected.has_required()
            );
            return None;
        };

        let config = &self.config;
        let hand = &mut self.hands[detected.handedness.index()];

        hand.apply_landmarks(&raw, config.smoothing.landmark_scale);
        hand.anchor.update(viewer, &config.movement, &config.room);
        hand.visible = true;
        hand.last_seen = Some(time);

        let joints = hand.joint_positions()?;
        let viewer_local = hand.anchor.to_local(viewer.position);
        let verdict = self.classifier.classify(Some(&joints), viewer_local);

        let was_active = hand.gesture_active;
        hand.gesture_active = hand.gesture.push(verdict);
        if was_active != hand.gesture_active {
            log::debug!(
                "{} hand finger gun {}",
                hand.handedness.as_str(),
                if hand.gesture_active { "on" } else { "off" }
            );
        }
        if was_active && !hand.gesture_active {
            hand.shot.on_gesture_lost(time);
        }

        let aim = hand.aim.update(joints[INDEX_MCP], joints[INDEX_TIP]);

        if !hand.gesture_active {
            return None;
        }

        let relative_height = joints[THUMB_TIP].y - joints[INDEX_MCP].y;
        if !hand.shot.update(relative_height, time) {
            return None;
        }

        let Some(aim) = aim else {
            log::warn!("{} hand fired without an aim direction", hand.handedness.as_str());
            return None;
        };
        let direction = Unit::try_new(hand.anchor.direction_to_world(aim.into_inner()), 1e-6)?;
        let shot = ShotEvent {
            hand: hand.handedness,
            origin: hand.anchor.to_world(joints[INDEX_TIP]),
            direction,
            time,
        };
        log::info!("💥 {} hand fired at {:.3}s", hand.handedness.as_str(), time);
        Some(shot)
    }

    pub fn hand(&self, handedness: Handedness) -> &HandState {
        &self.hands[handedness.index()]
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: InteractionConfig) {
        self.classifier.set_config(config.gesture.clone());
        for hand in self.hands.iter_mut() {
            hand.reconfigure(&config);
        }
        self.config = config;
    }

    pub fn reset(&mut self) {
        for hand in self.hands.iter_mut() {
            hand.reset();
        }
    }
}

impl Default for HandTracker {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

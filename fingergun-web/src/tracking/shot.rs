//! Hammer-drop shot detection
//!
//! Watches the thumb tip's height relative to the index base over a short
//! window. A quick, consistent drop of the thumb fires one shot; a refractory
//! period keeps a held or wobbling thumb from firing again.

use std::collections::VecDeque;

use crate::config::ShotConfig;

/// Detector state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotState {
    /// Waiting for the thumb to start moving
    Ready,
    /// Thumb is moving, waiting for the pull to complete or time out
    Moving,
    /// Just fired, waiting out the refractory period
    Shot,
}

impl ShotState {
    pub fn name(&self) -> &'static str {
        match self {
            ShotState::Ready => "READY",
            ShotState::Moving => "MOVING",
            ShotState::Shot => "SHOT",
        }
    }
}

/// One thumb-height sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThumbSample {
    pub relative_height: f32,
    /// Seconds
    pub time: f64,
}

/// Per-hand shot state machine
#[derive(Clone, Debug)]
pub struct ShotDetector {
    config: ShotConfig,
    history: VecDeque<ThumbSample>,
    state: ShotState,
    last_state_change: f64,
    last_successful_shot: f64,
}

impl ShotDetector {
    pub fn new(config: ShotConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.history_length + 1),
            config,
            state: ShotState::Ready,
            last_state_change: 0.0,
            last_successful_shot: 0.0,
        }
    }

    /// Feed one sample; returns true exactly when a shot fires
    pub fn update(&mut self, relative_height: f32, time: f64) -> bool {
        self.history.push_back(ThumbSample { relative_height, time });
        while self.history.len() > self.config.history_length {
            self.history.pop_front();
        }

        let (oldest, newest) = match (self.history.front(), self.history.back()) {
            (Some(a), Some(b)) if self.history.len() >= 2 => (*a, *b),
            _ => return false,
        };

        let movement = newest.relative_height - oldest.relative_height;
        let elapsed = newest.time - oldest.time;

        match self.state {
            ShotState::Ready => {
                if movement > self.config.arm_movement {
                    self.transition(ShotState::Moving, time);
                }
            }
            ShotState::Moving => {
                if elapsed > self.config.pull_timeout {
                    self.transition(ShotState::Ready, time);
                    self.history.clear();
                } else if movement > self.config.fire_movement && self.is_consistent() {
                    self.transition(ShotState::Shot, time);
                    self.last_successful_shot = time;
                    self.history.clear();
                    return true;
                }
            }
            ShotState::Shot => {
                if time - self.last_successful_shot >= self.config.refractory_period {
                    self.transition(ShotState::Ready, time);
                    self.history.clear();
                }
            }
        }

        false
    }

    /// At least `consistency` of the frame deltas point the same way as a pull
    fn is_consistent(&self) -> bool {
        let deltas = self.history.len().saturating_sub(1);
        if deltas == 0 {
            return false;
        }
        let positive = self
            .history
            .iter()
            .zip(self.history.iter().skip(1))
            .filter(|(a, b)| b.relative_height - a.relative_height > 0.0)
            .count();
        positive as f32 >= deltas as f32 * self.config.consistency
    }

    fn transition(&mut self, next: ShotState, time: f64) {
        log::debug!("shot state {} -> {} at {:.3}s", self.state.name(), next.name(), time);
        self.state = next;
        self.last_state_change = time;
    }

    /// Gesture dropped: forget the window and abandon any pull in progress.
    /// A hand in SHOT stays there so the refractory period still applies.
    pub fn on_gesture_lost(&mut self, time: f64) {
        self.history.clear();
        if self.state == ShotState::Moving {
            self.transition(ShotState::Ready, time);
        }
    }

    pub fn state(&self) -> ShotState {
        self.state
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_state_change(&self) -> f64 {
        self.last_state_change
    }

    pub fn last_successful_shot(&self) -> f64 {
        self.last_successful_shot
    }

    pub fn set_config(&mut self, config: ShotConfig) {
        self.config = config;
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.state = ShotState::Ready;
        self.last_state_change = 0.0;
        self.last_successful_shot = 0.0;
    }
}

impl Default for ShotDetector {
    fn default() -> Self {
        Self::new(ShotConfig::default())
    }
}

//! Aim direction from the index finger
//!
//! A single frame's base->tip vector jitters too much to aim with, so each
//! sample is averaged through a small accumulator and blended into the
//! persisted estimate.

use nalgebra::{Unit, Vector3};

use crate::config::AimConfig;

/// Smallest segment length treated as a usable direction
const MIN_SEGMENT: f32 = 1e-6;

#[derive(Clone, Debug)]
pub struct AimEstimator {
    config: AimConfig,
    accumulator: Vector3<f32>,
    estimate: Option<Unit<Vector3<f32>>>,
}

impl AimEstimator {
    pub fn new(config: AimConfig) -> Self {
        Self {
            config,
            accumulator: Vector3::zeros(),
            estimate: None,
        }
    }

    /// Add one index base->tip sample and return the updated estimate.
    /// Degenerate segments leave the estimate as it was.
    pub fn update(&mut self, index_base: Vector3<f32>, index_tip: Vector3<f32>) -> Option<Unit<Vector3<f32>>> {
        let Some(direction) = Unit::try_new(index_tip - index_base, MIN_SEGMENT) else {
            return self.estimate;
        };

        self.accumulator += direction.into_inner();
        let size = self.config.buffer_size.max(1) as f32;
        let averaged = Unit::try_new(self.accumulator / size, MIN_SEGMENT);
        self.accumulator = Vector3::zeros();

        let Some(averaged) = averaged else {
            return self.estimate;
        };

        self.estimate = Some(match self.estimate {
            None => averaged,
            Some(prev) => {
                let blended = prev.into_inner().lerp(&averaged.into_inner(), self.config.blend);
                // opposite directions can cancel out; fall back to the new sample
                Unit::try_new(blended, MIN_SEGMENT).unwrap_or(averaged)
            }
        });
        self.estimate
    }

    pub fn estimate(&self) -> Option<Unit<Vector3<f32>>> {
        self.estimate
    }

    pub fn set_config(&mut self, config: AimConfig) {
        self.config = config;
    }

    pub fn reset(&mut self) {
        self.accumulator = Vector3::zeros();
        self.estimate = None;
    }
}

impl Default for AimEstimator {
    fn default() -> Self {
        Self::new(AimConfig::default())
    }
}

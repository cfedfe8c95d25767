//! Exponential landmark smoothing - single-pole low-pass per axis
//!
//! Lateral axes and depth get separate factors: MediaPipe depth is much
//! noisier than image-plane position. The first sample passes through
//! untouched so a freshly detected hand does not crawl in from the origin.

use nalgebra::Vector3;

/// `current + (target - current) * factor`
pub fn smooth_value(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Single-axis exponential filter
#[derive(Clone, Copy, Debug, Default)]
pub struct ExponentialFilter {
    factor: f32,
    value: f32,
    initialized: bool,
}

impl ExponentialFilter {
    pub fn new(factor: f32) -> Self {
        Self {
            factor,
            value: 0.0,
            initialized: false,
        }
    }

    /// Feed a new target, returns the smoothed value
    pub fn filter(&mut self, target: f32) -> f32 {
        if !self.initialized {
            self.value = target;
            self.initialized = true;
            return target;
        }

        self.value = smooth_value(self.value, target, self.factor);
        self.value
    }

    pub fn value(&self) -> Option<f32> {
        self.initialized.then_some(self.value)
    }

    pub fn set_factor(&mut self, factor: f32) {
        self.factor = factor;
    }

    pub fn reset(&mut self) {
        self.initialized = false;
    }
}

/// Three filters for one joint: shared lateral factor, separate depth factor
#[derive(Clone, Copy, Debug, Default)]
pub struct JointFilter {
    pub x: ExponentialFilter,
    pub y: ExponentialFilter,
    pub z: ExponentialFilter,
}

impl JointFilter {
    pub fn new(lateral: f32, depth: f32) -> Self {
        Self {
            x: ExponentialFilter::new(lateral),
            y: ExponentialFilter::new(lateral),
            z: ExponentialFilter::new(depth),
        }
    }

    pub fn filter(&mut self, target: Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            self.x.filter(target.x),
            self.y.filter(target.y),
            self.z.filter(target.z),
        )
    }

    /// Current smoothed position, None until the first sample
    pub fn position(&self) -> Option<Vector3<f32>> {
        Some(Vector3::new(self.x.value()?, self.y.value()?, self.z.value()?))
    }

    pub fn set_factors(&mut self, lateral: f32, depth: f32) {
        self.x.set_factor(lateral);
        self.y.set_factor(lateral);
        self.z.set_factor(depth);
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
        self.z.reset();
    }
}

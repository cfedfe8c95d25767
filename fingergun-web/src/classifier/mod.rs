//! Classifier module - finger-gun pose verdicts and debouncing
//!
//! Re-exports only. All logic in submodules.

mod finger_gun;
mod debounce;

pub use finger_gun::FingerGunClassifier;
pub use debounce::GestureDebouncer;

#[cfg(test)]
pub(crate) use finger_gun::tests::finger_gun_joints;

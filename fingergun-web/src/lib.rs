//! Finger Gun Web - hand-tracked finger-gun shooting in the browser
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod config;
pub mod tracking;
pub mod classifier;
pub mod world;
pub mod session;
mod bridge;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::*;

pub use config::InteractionConfig;
pub use session::{Session, SessionError, SessionState, TickReport};
pub use tracking::{Handedness, PoseFrame, ShotEvent};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    bridge::console::init(log::LevelFilter::Info);
    log::info!("✅ Finger gun core loaded");
}

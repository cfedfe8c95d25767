//! Session storage and the JS calls that drive it
//!
//! The pose callback calls `submit_hand_results`; the render loop calls
//! `render_tick`. Both only touch the session through `with_session`.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::session::{Session, SessionError};
use crate::tracking::Handedness;

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::default());
}

pub(super) fn with_session<R>(f: impl FnOnce(&Session) -> R) -> R {
    SESSION.with(|cell| f(&cell.borrow()))
}

pub(super) fn with_session_mut<R>(f: impl FnOnce(&mut Session) -> R) -> R {
    SESSION.with(|cell| f(&mut cell.borrow_mut()))
}

fn js_random() -> f32 {
    js_sys::Math::random() as f32
}

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Start a session; JS then boots the pose backend and reports back
#[wasm_bindgen]
pub fn start_session() -> Result<(), JsValue> {
    with_session_mut(|session| session.start())?;
    Ok(())
}

/// Pose backend and camera are up
#[wasm_bindgen]
pub fn backend_ready() -> Result<(), JsValue> {
    with_session_mut(|session| session.backend_ready(&mut js_random))?;
    Ok(())
}

/// Pose backend or camera failed to start; always returns the error
#[wasm_bindgen]
pub fn backend_failed(reason: &str) -> Result<(), JsValue> {
    Err(with_session_mut(|session| session.backend_failed(reason)).into())
}

#[wasm_bindgen]
pub fn stop_session() {
    with_session_mut(|session| session.stop());
}

/// Apply a JSON tuning document (missing fields keep their defaults)
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    with_session_mut(|session| session.configure(json))?;
    Ok(())
}

/// Set the console log level ("error", "warn", "info", "debug", "trace", "off")
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = super::console::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level '{}'", level)))?;
    log::set_max_level(filter);
    Ok(())
}

// ============================================================================
// POSE INPUT
// ============================================================================

/// Called from the pose callback with a flat Float32Array of
/// hands × 21 landmarks × (x, y, z); NaN marks a missing landmark.
/// `handedness` holds one code per hand (0 = left, 1 = right).
#[wasm_bindgen]
pub fn submit_hand_results(flat_data: &[f32], handedness: &[u8], timestamp_ms: f64) -> Result<(), JsValue> {
    match with_session_mut(|session| session.submit_flat(flat_data, handedness, timestamp_ms / 1000.0)) {
        Ok(()) => Ok(()),
        Err(SessionError::NotRunning) => {
            log::debug!("hand results ignored: session not running");
            Ok(())
        }
        Err(e) => {
            log::warn!("{}", e);
            Err(e.into())
        }
    }
}

/// Per-frame backend error; the frame is skipped
#[wasm_bindgen]
pub fn report_frame_error(message: &str) {
    with_session_mut(|session| session.report_frame_error(message));
}

/// Wire code for a MediaPipe handedness label
#[wasm_bindgen]
pub fn handedness_code(label: &str) -> Option<u8> {
    Handedness::from_label(label).map(|h| h.index() as u8)
}

// ============================================================================
// VIEWER INPUT
// ============================================================================

/// KeyboardEvent.code pressed; true if it is a movement key
#[wasm_bindgen]
pub fn key_down(code: &str) -> bool {
    with_session_mut(|session| session.key_down(code))
}

#[wasm_bindgen]
pub fn key_up(code: &str) -> bool {
    with_session_mut(|session| session.key_up(code))
}

#[wasm_bindgen]
pub fn set_pointer_locked(locked: bool) {
    with_session_mut(|session| session.set_pointer_locked(locked));
}

/// Camera quaternion from the look controls
#[wasm_bindgen]
pub fn set_view_rotation(x: f32, y: f32, z: f32, w: f32) {
    with_session_mut(|session| session.set_view_rotation(x, y, z, w));
}

// ============================================================================
// RENDER LOOP
// ============================================================================

/// Once per animation frame; `now_ms` from performance.now().
/// Returns the number of shots fired this tick.
#[wasm_bindgen]
pub fn render_tick(now_ms: f64) -> u32 {
    with_session_mut(|session| {
        let report = session.tick(now_ms / 1000.0, &mut js_random);
        report.shots as u32
    })
}

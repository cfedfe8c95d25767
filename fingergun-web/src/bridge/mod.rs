//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

pub mod console;
mod lifecycle;
mod scene;

pub use lifecycle::{
    // Lifecycle
    start_session,
    backend_ready,
    backend_failed,
    stop_session,
    configure,
    set_log_level,
    // Pose input
    submit_hand_results,
    report_frame_error,
    handedness_code,
    // Viewer input
    key_down,
    key_up,
    set_pointer_locked,
    set_view_rotation,
    // Render loop
    render_tick,
};

pub use scene::{
    take_shot_events,
    get_hand_joints,
    get_aim_direction,
    get_shot_state,
    hand_connections,
    get_viewpoint,
    get_targets,
    get_projectiles,
    get_score,
    get_room_dimensions,
    session_state,
    session_failure,
    SHOT_STRIDE,
};

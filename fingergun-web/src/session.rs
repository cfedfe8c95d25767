//! Session - lifecycle and per-tick orchestration
//!
//! The pose callback only enqueues frames; the render tick drains them, runs
//! the hand pipeline, moves the viewer and advances the arena. All mutation of
//! hand state happens on the render tick.

use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};

use nalgebra::{Quaternion, UnitQuaternion};
use wasm_bindgen::JsValue;

use crate::config::InteractionConfig;
use crate::tracking::{FrameParseError, HandTracker, PoseFrame, ShotEvent};
use crate::world::{Arena, MoveIntent, MovementController, RandomSource, RoomBounds, Viewpoint};

/// Session lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Waiting for the pose backend (model load, camera permission)
    Initializing,
    Running,
    /// Backend could not start; fatal until restarted
    Failed,
    Stopped,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Initializing => "initializing",
            SessionState::Running => "running",
            SessionState::Failed => "failed",
            SessionState::Stopped => "stopped",
        }
    }
}

/// Errors surfaced to the caller
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    NotRunning,
    InvalidState { expected: SessionState, actual: SessionState },
    BackendInit(String),
    MalformedFrame { expected: usize, actual: usize },
    UnknownHandedness(u8),
    Config(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotRunning => write!(f, "Session is not running"),
            SessionError::InvalidState { expected, actual } => {
                write!(f, "Session is {} (expected {})", actual.name(), expected.name())
            }
            SessionError::BackendInit(e) => write!(f, "Pose backend failed to start: {}", e),
            SessionError::MalformedFrame { expected, actual } => {
                write!(f, "Malformed hand frame: {} floats (expected {})", actual, expected)
            }
            SessionError::UnknownHandedness(code) => write!(f, "Unknown handedness code {}", code),
            SessionError::Config(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<FrameParseError> for SessionError {
    fn from(err: FrameParseError) -> Self {
        match err {
            FrameParseError::Length { expected, actual } => SessionError::MalformedFrame { expected, actual },
            FrameParseError::Handedness(code) => SessionError::UnknownHandedness(code),
        }
    }
}

impl From<SessionError> for JsValue {
    fn from(err: SessionError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// What one render tick did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub frames: usize,
    pub shots: usize,
    pub hits: Vec<u32>,
    pub respawned: usize,
}

pub struct Session {
    state: SessionState,
    config: InteractionConfig,
    tracker: HandTracker,
    movement: MovementController,
    room: RoomBounds,
    viewpoint: Viewpoint,
    intent: MoveIntent,
    pointer_locked: bool,
    arena: Arena,
    inbox_tx: Sender<PoseFrame>,
    inbox: Receiver<PoseFrame>,
    /// Shots not yet collected by the host
    shots: Vec<ShotEvent>,
    failure: Option<String>,
    frame_errors: u64,
}

impl Session {
    pub fn new(config: InteractionConfig) -> Self {
        let (inbox_tx, inbox) = channel();
        Self {
            state: SessionState::Idle,
            tracker: HandTracker::new(config.clone()),
            movement: MovementController::new(config.movement.clone()),
            room: RoomBounds::new(&config.room),
            viewpoint: Viewpoint::spawn(&config.movement),
            intent: MoveIntent::default(),
            pointer_locked: false,
            arena: Arena::new(config.arena.clone()),
            inbox_tx,
            inbox,
            shots: Vec::new(),
            failure: None,
            frame_errors: 0,
            config,
        }
    }

    /// Begin initializing; the host then starts the pose backend
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Initializing | SessionState::Running => {
                return Err(SessionError::InvalidState {
                    expected: SessionState::Idle,
                    actual: self.state,
                });
            }
            SessionState::Idle | SessionState::Failed | SessionState::Stopped => {}
        }

        self.drain_inbox();
        self.tracker.reset();
        self.arena.clear();
        self.shots.clear();
        self.intent.clear();
        self.viewpoint = Viewpoint::spawn(&self.config.movement);
        self.failure = None;
        self.frame_errors = 0;
        self.state = SessionState::Initializing;
        log::info!("⏳ Session initializing");
        Ok(())
    }

    /// Backend is up: place targets and start processing frames
    pub fn backend_ready(&mut self, random: RandomSource) -> Result<(), SessionError> {
        if self.state != SessionState::Initializing {
            return Err(SessionError::InvalidState {
                expected: SessionState::Initializing,
                actual: self.state,
            });
        }
        self.arena.populate(random);
        self.state = SessionState::Running;
        log::info!("✅ Session running with {} targets", self.arena.targets().len());
        Ok(())
    }

    /// Backend or camera init failed. Returns the error for the host to surface.
    /// Only an initializing session fails; late reports are logged and dropped.
    pub fn backend_failed(&mut self, reason: &str) -> SessionError {
        if self.state != SessionState::Initializing {
            log::warn!("⚠️ Ignoring backend failure while {}: {}", self.state.name(), reason);
            return SessionError::InvalidState {
                expected: SessionState::Initializing,
                actual: self.state,
            };
        }
        log::error!("❌ Pose backend failed: {}", reason);
        self.state = SessionState::Failed;
        self.failure = Some(reason.to_string());
        self.drain_inbox();
        SessionError::BackendInit(reason.to_string())
    }

    /// Halt processing; queued frames, projectiles and pending respawns are dropped
    pub fn stop(&mut self) {
        let dropped = self.drain_inbox();
        self.arena.cancel_pending();
        self.shots.clear();
        self.intent.clear();
        if self.state != SessionState::Stopped {
            log::info!("⏹️ Session stopped ({} queued frames dropped)", dropped);
        }
        self.state = SessionState::Stopped;
    }

    /// Replace the tuning; tracked state is kept
    pub fn configure(&mut self, json: &str) -> Result<(), SessionError> {
        let config = InteractionConfig::from_json(json).map_err(|e| SessionError::Config(e.to_string()))?;
        config.validate().map_err(SessionError::Config)?;
        self.apply_config(config);
        Ok(())
    }

    pub fn apply_config(&mut self, config: InteractionConfig) {
        self.tracker.set_config(config.clone());
        self.movement.set_config(config.movement.clone());
        self.arena.set_config(config.arena.clone());
        self.room = RoomBounds::new(&config.room);
        self.config = config;
        log::debug!("configuration updated");
    }

    /// Queue a frame from the pose callback
    pub fn submit_frame(&mut self, frame: PoseFrame) -> Result<(), SessionError> {
        if self.state != SessionState::Running {
            return Err(SessionError::NotRunning);
        }
        self.inbox_tx.send(frame).map_err(|_| SessionError::NotRunning)
    }

    /// Parse and queue a flat frame (see `PoseFrame::from_flat`)
    pub fn submit_flat(&mut self, flat_data: &[f32], handedness: &[u8], timestamp: f64) -> Result<(), SessionError> {
        if self.state != SessionState::Running {
            return Err(SessionError::NotRunning);
        }
        let frame = PoseFrame::from_flat(flat_data, handedness, timestamp)?;
        self.submit_frame(frame)
    }

    /// A frame the backend could not process; skipped, the session carries on
    pub fn report_frame_error(&mut self, message: &str) {
        self.frame_errors += 1;
        log::warn!("⚠️ Frame skipped: {}", message);
    }

    pub fn key_down(&mut self, code: &str) -> bool {
        self.intent.key_down(code)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.intent.key_up(code)
    }

    /// Movement only applies while the pointer is locked
    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
        if !locked {
            self.intent.clear();
        }
    }

    /// Viewer look rotation as a quaternion (x, y, z, w); non-finite input is ignored
    pub fn set_view_rotation(&mut self, x: f32, y: f32, z: f32, w: f32) -> bool {
        let q = Quaternion::new(w, x, y, z);
        if !q.coords.iter().all(|c| c.is_finite()) || q.norm() < 1e-6 {
            log::debug!("ignoring degenerate view rotation");
            return false;
        }
        self.viewpoint.orientation = UnitQuaternion::from_quaternion(q);
        true
    }

    /// One render tick: drain frames, move, advance the arena
    pub fn tick(&mut self, now: f64, random: RandomSource) -> TickReport {
        let mut report = TickReport::default();
        if self.state != SessionState::Running {
            return report;
        }

        while let Ok(frame) = self.inbox.try_recv() {
            report.frames += 1;
            for shot in self.tracker.process_frame(&frame, &self.viewpoint) {
                self.arena.fire(&shot);
                self.shots.push(shot);
                report.shots += 1;
            }
        }

        if self.pointer_locked {
            self.movement.step(&mut self.viewpoint, &self.intent, &self.room);
        }

        let step = self.arena.tick(now, random);
        report.hits = step.hits;
        report.respawned = step.respawned;
        report
    }

    /// Shots since the last call
    pub fn take_shots(&mut self) -> Vec<ShotEvent> {
        std::mem::take(&mut self.shots)
    }

    fn drain_inbox(&mut self) -> usize {
        self.inbox.try_iter().count()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn frame_errors(&self) -> u64 {
        self.frame_errors
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn tracker(&self) -> &HandTracker {
        &self.tracker
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        &self.viewpoint
    }

    pub fn intent(&self) -> &MoveIntent {
        &self.intent
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    pub fn room(&self) -> &RoomBounds {
        &self.room
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{finger_gun_hand, unsmoothed_config, Handedness};

    fn zero() -> impl FnMut() -> f32 {
        || 0.0
    }

    fn running() -> Session {
        let mut session = Session::new(unsmoothed_config());
        session.start().unwrap();
        session.backend_ready(&mut zero()).unwrap();
        session
    }

    fn gun_frame(time: f64, thumb_lift: f32) -> PoseFrame {
        PoseFrame {
            timestamp: time,
            hands: vec![finger_gun_hand(Handedness::Right, thumb_lift)],
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut session = Session::default();
        assert_eq!(session.state(), SessionState::Idle);
        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Initializing);
        assert!(session.start().is_err());
        session.backend_ready(&mut zero()).unwrap();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.arena().targets().len(), 5);
        session.stop();
        assert_eq!(session.state(), SessionState::Stopped);
        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Initializing);
    }

    #[test]
    fn test_backend_failure_is_fatal() {
        let mut session = Session::default();
        session.start().unwrap();
        let err = session.backend_failed("camera denied");
        assert_eq!(err, SessionError::BackendInit("camera denied".into()));
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.failure(), Some("camera denied"));
        assert_eq!(session.submit_frame(gun_frame(0.0, 0.0)), Err(SessionError::NotRunning));
        assert!(session.backend_ready(&mut zero()).is_err());
    }

    #[test]
    fn test_frames_wait_for_tick() {
        let mut session = running();
        session.submit_frame(gun_frame(0.0, 0.0)).unwrap();
        session.submit_frame(gun_frame(0.03, 0.0)).unwrap();
        assert!(session.tracker().hand(Handedness::Right).joint_positions().is_none());

        let report = session.tick(0.05, &mut zero());
        assert_eq!(report.frames, 2);
        assert!(session.tracker().hand(Handedness::Right).visible);
    }

    #[test]
    fn test_stop_drops_queued_frames() {
        let mut session = running();
        session.submit_frame(gun_frame(0.0, 0.0)).unwrap();
        session.stop();
        assert_eq!(session.tick(1.0, &mut zero()).frames, 0);
        assert!(session.tracker().hand(Handedness::Right).joint_positions().is_none());
        assert_eq!(session.arena().pending_respawns(), 0);
    }

    #[test]
    fn test_pull_produces_shot_and_projectile() {
        let mut session = running();
        let mut t = 0.0;
        for lift in [0.0, 0.0, 0.0, 0.02, 0.04] {
            session.submit_frame(gun_frame(t, lift)).unwrap();
            t += 0.033;
        }
        let report = session.tick(t, &mut zero());
        assert_eq!(report.shots, 1);
        assert_eq!(session.arena().projectiles().len(), 1);

        let shots = session.take_shots();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].hand, Handedness::Right);
        assert!(session.take_shots().is_empty());
    }

    #[test]
    fn test_malformed_frame_rejected() {
        let mut session = running();
        let err = session.submit_flat(&[0.5; 10], &[1], 0.0).unwrap_err();
        assert_eq!(err, SessionError::MalformedFrame { expected: 63, actual: 10 });
        let err = session.submit_flat(&[0.5; 63], &[7], 0.0).unwrap_err();
        assert_eq!(err, SessionError::UnknownHandedness(7));
    }

    #[test]
    fn test_frame_errors_do_not_stop_session() {
        let mut session = running();
        session.report_frame_error("inference timeout");
        assert_eq!(session.frame_errors(), 1);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_movement_needs_pointer_lock() {
        let mut session = running();
        let start = session.viewpoint().position;
        session.key_down("KeyW");
        session.tick(0.0, &mut zero());
        assert_eq!(session.viewpoint().position, start);

        session.set_pointer_locked(true);
        session.key_down("KeyW");
        session.tick(0.016, &mut zero());
        assert!((session.viewpoint().position.z - (start.z - 0.1)).abs() < 1e-5);

        session.set_pointer_locked(false);
        assert!(!session.intent().any());
    }

    #[test]
    fn test_configure_from_json() {
        let mut session = Session::default();
        session.configure(r#"{"movement": {"speed": 0.2}}"#).unwrap();
        assert_eq!(session.config().movement.speed, 0.2);
        assert!(matches!(session.configure("{not json"), Err(SessionError::Config(_))));
    }

    #[test]
    fn test_configure_rejects_room_smaller_than_hand_margin() {
        let mut session = running();
        let err = session.configure(r#"{"room": {"width": 1.5}}"#).unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
        assert_eq!(session.config().room.width, 20.0);

        session.submit_frame(gun_frame(0.0, 0.0)).unwrap();
        assert_eq!(session.tick(0.0, &mut zero()).frames, 1);
    }

    #[test]
    fn test_narrow_room_centres_hands_instead_of_panicking() {
        let mut session = running();
        let mut config = unsmoothed_config();
        config.room.width = 1.5;
        session.apply_config(config);

        session.submit_frame(gun_frame(0.0, 0.0)).unwrap();
        session.tick(0.0, &mut zero());
        let hand = session.tracker().hand(Handedness::Right);
        assert!(hand.visible);
        assert_eq!(hand.anchor.position().x, 0.0);
    }

    #[test]
    fn test_late_backend_failure_keeps_stopped() {
        let mut session = Session::default();
        session.start().unwrap();
        session.stop();
        let err = session.backend_failed("camera denied");
        assert!(matches!(err, SessionError::InvalidState { .. }));
        assert_eq!(session.state(), SessionState::Stopped);
        assert_eq!(session.failure(), None);
    }

    #[test]
    fn test_view_rotation_rejects_garbage() {
        let mut session = Session::default();
        assert!(!session.set_view_rotation(f32::NAN, 0.0, 0.0, 1.0));
        assert!(!session.set_view_rotation(0.0, 0.0, 0.0, 0.0));
        assert!(session.set_view_rotation(0.0, 0.7071, 0.0, 0.7071));
        // yawed 90 degrees left: forward is -X
        assert!((session.viewpoint().forward().x + 1.0).abs() < 1e-3);
    }
}

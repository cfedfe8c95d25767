//! Scene readout - flat arrays the JS renderer draws from

use wasm_bindgen::prelude::*;

use crate::tracking::{Handedness, HAND_CONNECTIONS};

use super::lifecycle::{with_session, with_session_mut};

/// Floats per shot in `take_shot_events`
pub const SHOT_STRIDE: usize = 8;

/// Shots since the last call, flattened as
/// [hand, origin x, y, z, direction x, y, z, time] per shot
#[wasm_bindgen]
pub fn take_shot_events() -> Vec<f32> {
    with_session_mut(|session| {
        let shots = session.take_shots();
        let mut flat = Vec::with_capacity(shots.len() * SHOT_STRIDE);
        for shot in shots {
            flat.push(shot.hand.index() as f32);
            flat.extend_from_slice(shot.origin.as_slice());
            flat.extend_from_slice(shot.direction.as_slice());
            flat.push(shot.time as f32);
        }
        flat
    })
}

/// 21 world-space joints (63 floats) for a visible hand
#[wasm_bindgen]
pub fn get_hand_joints(hand: u8) -> Option<Vec<f32>> {
    let hand = Handedness::from_code(hand)?;
    with_session(|session| {
        let state = session.tracker().hand(hand);
        if !state.visible {
            return None;
        }
        let joints = state.world_joints()?;
        Some(joints.iter().flat_map(|j| [j.x, j.y, j.z]).collect())
    })
}

/// Current world-space aim direction [x, y, z] and whether a visible hand holds the gun
#[wasm_bindgen]
pub fn get_aim_direction(hand: u8) -> Option<Vec<f32>> {
    let hand = Handedness::from_code(hand)?;
    with_session(|session| {
        let state = session.tracker().hand(hand);
        let aim = state.anchor.direction_to_world(state.aim.estimate()?.into_inner());
        let active = if state.gun_held() { 1.0 } else { 0.0 };
        Some(vec![aim.x, aim.y, aim.z, active])
    })
}

/// Shot state name ("READY", "MOVING", "SHOT") for a debug overlay
#[wasm_bindgen]
pub fn get_shot_state(hand: u8) -> Option<String> {
    let hand = Handedness::from_code(hand)?;
    with_session(|session| Some(session.tracker().hand(hand).shot.state().name().to_string()))
}

/// Skeleton edges as flat index pairs
#[wasm_bindgen]
pub fn hand_connections() -> Vec<u32> {
    HAND_CONNECTIONS
        .iter()
        .flat_map(|&(a, b)| [a as u32, b as u32])
        .collect()
}

/// [position x, y, z, rotation x, y, z, w]
#[wasm_bindgen]
pub fn get_viewpoint() -> Vec<f32> {
    with_session(|session| {
        let viewpoint = session.viewpoint();
        let q = viewpoint.orientation.quaternion();
        vec![
            viewpoint.position.x,
            viewpoint.position.y,
            viewpoint.position.z,
            q.i,
            q.j,
            q.k,
            q.w,
        ]
    })
}

/// [id, x, y, z] per live target
#[wasm_bindgen]
pub fn get_targets() -> Vec<f32> {
    with_session(|session| {
        session
            .arena()
            .targets()
            .iter()
            .flat_map(|t| [t.id as f32, t.position.x, t.position.y, t.position.z])
            .collect()
    })
}

/// [x, y, z] per projectile in flight
#[wasm_bindgen]
pub fn get_projectiles() -> Vec<f32> {
    with_session(|session| {
        session
            .arena()
            .projectiles()
            .iter()
            .flat_map(|p| [p.position.x, p.position.y, p.position.z])
            .collect()
    })
}

#[wasm_bindgen]
pub fn get_score() -> u32 {
    with_session(|session| session.arena().score())
}

/// [width, height, depth]
#[wasm_bindgen]
pub fn get_room_dimensions() -> Vec<f32> {
    with_session(|session| {
        let (width, height, depth) = session.room().dimensions();
        vec![width, height, depth]
    })
}

#[wasm_bindgen]
pub fn session_state() -> String {
    with_session(|session| session.state().name().to_string())
}

/// Error message of the last backend failure, if any
#[wasm_bindgen]
pub fn session_failure() -> Option<String> {
    with_session(|session| session.failure().map(str::to_string))
}

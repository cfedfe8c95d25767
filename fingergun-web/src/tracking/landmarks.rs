//! Hand landmark indices, skeleton connectivity and pose-frame parsing
//!
//! MediaPipe Hands reports 21 points per hand in normalized camera space.
//! JS hands them over as one flat Float32Array (63 floats per hand) with NaN
//! marking a landmark the backend did not deliver.

use nalgebra::Vector3;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

/// Floats per hand in the flat wire format
pub const FLOATS_PER_HAND: usize = LANDMARK_COUNT * 3;

/// Landmarks that aiming and classification cannot do without
pub const REQUIRED_LANDMARKS: [usize; 5] = [WRIST, INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP];

/// Hand skeleton connections for rendering (finger chains + knuckle line)
pub const HAND_CONNECTIONS: [(usize, usize); 23] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, RING_MCP), (RING_MCP, PINKY_MCP),
];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Which hand the backend says this is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const ALL: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    /// Slot in per-hand arrays
    pub fn index(self) -> usize {
        match self {
            Handedness::Left => 0,
            Handedness::Right => 1,
        }
    }

    /// Wire code used by the JS bridge (0 = left, 1 = right)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Handedness::Left),
            1 => Some(Handedness::Right),
            _ => None,
        }
    }

    /// MediaPipe classification label ("Left" / "Right")
    pub fn from_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("left") {
            Some(Handedness::Left)
        } else if label.eq_ignore_ascii_case("right") {
            Some(Handedness::Right)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

/// A single raw landmark in normalized camera space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawLandmark {
    pub x: f32, // 0-1 normalized
    pub y: f32, // 0-1 normalized
    pub z: f32, // relative depth
}

impl RawLandmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Mirror X, flip Y, scale everything into world units
    pub fn to_world(self, scale: f32) -> Vector3<f32> {
        Vector3::new((0.5 - self.x) * scale, (0.5 - self.y) * scale, self.z * scale)
    }
}

/// One detected hand as delivered by the backend
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedHand {
    pub handedness: Handedness,
    pub landmarks: [Option<RawLandmark>; LANDMARK_COUNT],
}

impl DetectedHand {
    /// All 21 landmarks, or None if any is missing
    pub fn complete_landmarks(&self) -> Option<[RawLandmark; LANDMARK_COUNT]> {
        let mut out = [RawLandmark::default(); LANDMARK_COUNT];
        for (slot, lm) in out.iter_mut().zip(self.landmarks.iter()) {
            *slot = (*lm)?;
        }
        Some(out)
    }

    /// True if the subset needed for aiming and classification is present
    pub fn has_required(&self) -> bool {
        REQUIRED_LANDMARKS.iter().all(|&i| self.landmarks[i].is_some())
    }
}

/// All hands reported for one video frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseFrame {
    /// Capture time in seconds
    pub timestamp: f64,
    pub hands: Vec<DetectedHand>,
}

/// Wire-format problems in a pose frame
#[derive(Clone, Debug, PartialEq)]
pub enum FrameParseError {
    /// Float count does not match the handedness count
    Length { expected: usize, actual: usize },
    /// Handedness code other than 0 or 1
    Handedness(u8),
}

impl PoseFrame {
    /// Parse the flat wire format: `handedness.len()` hands, 63 floats each.
    /// Non-finite coordinates mark a missing landmark.
    pub fn from_flat(
        flat_data: &[f32],
        handedness: &[u8],
        timestamp: f64,
    ) -> Result<Self, FrameParseError> {
        let expected = handedness.len() * FLOATS_PER_HAND;
        if flat_data.len() != expected {
            return Err(FrameParseError::Length { expected, actual: flat_data.len() });
        }

        let mut hands = Vec::with_capacity(handedness.len());
        for (h, &code) in handedness.iter().enumerate() {
            let label = Handedness::from_code(code).ok_or(FrameParseError::Handedness(code))?;
            let mut landmarks = [None; LANDMARK_COUNT];
            for (i, slot) in landmarks.iter_mut().enumerate() {
                let base = h * FLOATS_PER_HAND + i * 3;
                let (x, y, z) = (flat_data[base], flat_data[base + 1], flat_data[base + 2]);
                if x.is_finite() && y.is_finite() && z.is_finite() {
                    *slot = Some(RawLandmark::new(x, y, z));
                }
            }
            hands.push(DetectedHand { handedness: label, landmarks });
        }

        Ok(Self { timestamp, hands })
    }
}

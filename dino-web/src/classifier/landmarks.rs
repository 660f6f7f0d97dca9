//! Hand landmark frames as delivered by the landmark model
//!
//! One detected hand is 21 ordered points in frame pixel space. The host hands
//! them over as a flat `Float32Array`, either `[x, y]` or `[x, y, z]` per point.

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

/// Hand skeleton connections for the diagnostic overlay
pub const HAND_SKELETON: [(usize, usize); 23] = [
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

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
}

/// One detected hand for one detection cycle
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    pub landmarks: [HandLandmark; LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(landmarks: [HandLandmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Parse one hand from a flat buffer.
    ///
    /// The stride is inferred from the length: 42 values are `[x, y]` pairs,
    /// 63 values are `[x, y, z]` triples (z is dropped). Anything else, or a
    /// non-finite coordinate, yields `None`.
    pub fn from_flat(data: &[f32]) -> Option<Self> {
        let stride = match data.len() {
            n if n == LANDMARK_COUNT * 2 => 2,
            n if n == LANDMARK_COUNT * 3 => 3,
            _ => return None,
        };

        let mut landmarks = [HandLandmark::default(); LANDMARK_COUNT];
        for (i, point) in data.chunks_exact(stride).enumerate() {
            let (x, y) = (point[0], point[1]);
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            landmarks[i] = HandLandmark { x, y };
        }
        Some(Self { landmarks })
    }

    pub fn wrist(&self) -> HandLandmark {
        self.landmarks[WRIST]
    }
}

//! Landmark frame types: the boundary between the hand tracker and the
//! gesture engine.
//!
//! The hand tracker (MediaPipe or similar) runs outside this crate.  Once per
//! video frame it hands over a [`Frame`] holding zero to two
//! [`HandObservation`]s, each with the 21 standard hand keypoints:
//!
//! ```text
//!              8   12  16  20        tips
//!              7   11  15  19        DIP
//!          4   6   10  14  18        PIP
//!         3    5    9  13  17        MCP
//!          2
//!           1
//!               0                    wrist
//! ```
//!
//! Coordinates are normalised to the image (`x`, `y` in `[0, 1]`, `y`
//! growing downwards); `z` is relative depth and is ignored by the engine.
//!
//! # Quick start
//!
//! ```rust
//! use gesture_control::landmarks::Frame;
//!
//! let line = r#"{"timestamp_ms": 33, "hands": []}"#;
//! let frame: Frame = serde_json::from_str(line).unwrap();
//! assert!(frame.hands.is_empty());
//! ```

pub mod source;

#[cfg(test)]
pub(crate) mod fixtures;

pub use source::{FrameSource, JsonLinesSource, SourceError};

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Keypoint indices
// ---------------------------------------------------------------------------

/// Number of keypoints in one hand observation.
pub const LANDMARK_COUNT: usize = 21;

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

// ---------------------------------------------------------------------------
// Landmark
// ---------------------------------------------------------------------------

/// One keypoint in normalised image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar (x, y) Euclidean distance.  Depth is too noisy to be useful
    /// for the pose predicates.
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Handedness / HandId
// ---------------------------------------------------------------------------

/// Which hand the tracker believes it is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn label(&self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

/// Stable identity of a hand across frames.
///
/// Ordering is Left before Right, then by track id, which gives the engine
/// its deterministic per-frame processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandId {
    pub handedness: Handedness,
    pub track: u32,
}

impl HandId {
    pub fn new(handedness: Handedness, track: u32) -> Self {
        Self { handedness, track }
    }
}

impl std::fmt::Display for HandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.handedness.label(), self.track)
    }
}

// ---------------------------------------------------------------------------
// HandObservation / Frame
// ---------------------------------------------------------------------------

/// One detected hand in one frame, as delivered by the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub handedness: Handedness,
    /// Expected to hold [`LANDMARK_COUNT`] points; anything else is treated
    /// as a degenerate observation downstream.
    pub landmarks: Vec<Landmark>,
    /// Detection confidence reported by the tracker.
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    /// Tracker-assigned id, when the tracker can tell same-handed
    /// detections apart.
    #[serde(default)]
    pub track_id: Option<u32>,
}

fn default_confidence() -> f32 {
    1.0
}

impl HandObservation {
    /// Mirror the observation horizontally (`x → 1 − x`).
    pub fn mirrored(mut self) -> Self {
        for lm in &mut self.landmarks {
            lm.x = 1.0 - lm.x;
        }
        self
    }
}

/// Everything the tracker produced for one video frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Monotonic capture time in milliseconds.
    pub timestamp_ms: u64,
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl Frame {
    pub fn new(timestamp_ms: u64, hands: Vec<HandObservation>) -> Self {
        Self { timestamp_ms, hands }
    }

    pub fn timestamp(&self) -> Duration {
        Duration::from_millis(self.timestamp_ms)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Rule-based pose classifier.
//!
//! Rules are checked in a fixed priority order and the first match wins:
//!
//! | Priority | Gesture        | Rule                                                   |
//! |----------|----------------|--------------------------------------------------------|
//! | 1        | `Pinch`        | thumb/index tips closer than the pinch threshold, middle/ring/pinky curled |
//! | 2        | `Victory`      | index + middle extended, ring + pinky curled           |
//! | 3        | `ThreeFingers` | index + middle + ring extended, pinky curled           |
//! | 4        | `Palm`         | palm open, index + middle + ring extended              |
//! | 5        | `Fist`         | nothing extended                                       |
//! | 6        | `ThumbsUp`     | thumb only                                             |
//! | 7        | `Point`        | index extended, middle/ring/pinky curled               |
//!
//! Anything else, including unusable keypoints, is `None`.

use serde::{Deserialize, Serialize};

use super::features::{FeatureSet, Finger};
use crate::config::FeatureConfig;

// ---------------------------------------------------------------------------
// GestureKind
// ---------------------------------------------------------------------------

/// The closed set of hand poses the engine recognises.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum GestureKind {
    Point,
    Pinch,
    Victory,
    ThreeFingers,
    Palm,
    Fist,
    ThumbsUp,
    #[default]
    None,
}

impl GestureKind {
    pub fn label(&self) -> &'static str {
        match self {
            GestureKind::Point => "point",
            GestureKind::Pinch => "pinch",
            GestureKind::Victory => "victory",
            GestureKind::ThreeFingers => "three-fingers",
            GestureKind::Palm => "palm",
            GestureKind::Fist => "fist",
            GestureKind::ThumbsUp => "thumbs-up",
            GestureKind::None => "none",
        }
    }

    /// How to make the pose, for the overlay's help panel.
    pub fn description(&self) -> &'static str {
        match self {
            GestureKind::Point => "Index finger up, others curled",
            GestureKind::Pinch => "Touch thumb and index fingertips",
            GestureKind::Victory => "Index and middle fingers up (V sign)",
            GestureKind::ThreeFingers => "Index, middle and ring fingers up",
            GestureKind::Palm => "Open hand, all fingers spread",
            GestureKind::Fist => "Closed fist",
            GestureKind::ThumbsUp => "Thumb up, other fingers curled",
            GestureKind::None => "No recognised gesture",
        }
    }
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RawGesture
// ---------------------------------------------------------------------------

/// Unstabilised per-frame classification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawGesture {
    pub kind: GestureKind,
    /// Certainty in `[0, 1]`.
    pub confidence: f32,
}

impl RawGesture {
    pub fn new(kind: GestureKind, confidence: f32) -> Self {
        Self { kind, confidence }
    }
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

const LOWER_THREE: [Finger; 3] = [Finger::Middle, Finger::Ring, Finger::Pinky];

/// Classify one hand's features.
pub fn classify(features: &FeatureSet, config: &FeatureConfig) -> RawGesture {
    if !features.valid {
        return RawGesture::new(GestureKind::None, 0.0);
    }

    let f = &features.fingers;
    let kind = if features.pinch_distance < config.pinch_threshold && f.all_curled(&LOWER_THREE) {
        GestureKind::Pinch
    } else if f.all_extended(&[Finger::Index, Finger::Middle])
        && f.all_curled(&[Finger::Ring, Finger::Pinky])
    {
        GestureKind::Victory
    } else if f.all_extended(&[Finger::Index, Finger::Middle, Finger::Ring])
        && !f.is_extended(Finger::Pinky)
    {
        GestureKind::ThreeFingers
    } else if features.palm_open
        && f.all_extended(&[Finger::Index, Finger::Middle, Finger::Ring])
    {
        GestureKind::Palm
    } else if f.count() == 0 {
        GestureKind::Fist
    } else if f.is_extended(Finger::Thumb) && f.count() == 1 {
        GestureKind::ThumbsUp
    } else if f.is_extended(Finger::Index) && f.all_curled(&LOWER_THREE) {
        GestureKind::Point
    } else {
        GestureKind::None
    };

    RawGesture::new(kind, 1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

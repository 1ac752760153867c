//! Synthetic hands for unit tests.
//!
//! Builds an upright hand (fingers pointing towards the top of the image)
//! with each finger either fully extended or curled back towards the palm.
//! Palm width (index MCP ↔ pinky MCP) is ≈ 0.143.

use super::*;

const WRIST_POS: (f32, f32) = (0.50, 0.80);
const THUMB_BASE: [(f32, f32); 3] = [(0.45, 0.76), (0.41, 0.72), (0.38, 0.69)];
const THUMB_TIP_EXTENDED: (f32, f32) = (0.35, 0.66);
const THUMB_TIP_CURLED: (f32, f32) = (0.52, 0.68);
/// MCP positions for index, middle, ring, pinky.
const FINGER_MCPS: [(f32, f32); 4] = [(0.45, 0.62), (0.50, 0.60), (0.55, 0.62), (0.59, 0.65)];
/// y offsets of PIP, DIP, TIP relative to the MCP.
const EXTENDED_OFFSETS: [f32; 3] = [-0.05, -0.08, -0.10];
const CURLED_OFFSETS: [f32; 3] = [-0.04, -0.02, 0.02];

/// `fingers` is `[thumb, index, middle, ring, pinky]`.
pub(crate) fn hand(handedness: Handedness, fingers: [bool; 5]) -> HandObservation {
    let mut landmarks = vec![Landmark::default(); LANDMARK_COUNT];
    landmarks[WRIST] = Landmark::new(WRIST_POS.0, WRIST_POS.1);
    for (i, (x, y)) in THUMB_BASE.iter().enumerate() {
        landmarks[THUMB_CMC + i] = Landmark::new(*x, *y);
    }
    let tip = if fingers[0] {
        THUMB_TIP_EXTENDED
    } else {
        THUMB_TIP_CURLED
    };
    landmarks[THUMB_TIP] = Landmark::new(tip.0, tip.1);

    for (f, (mx, my)) in FINGER_MCPS.iter().enumerate() {
        let mcp = INDEX_MCP + f * 4;
        landmarks[mcp] = Landmark::new(*mx, *my);
        let offsets = if fingers[f + 1] {
            EXTENDED_OFFSETS
        } else {
            CURLED_OFFSETS
        };
        for (j, dy) in offsets.iter().enumerate() {
            landmarks[mcp + 1 + j] = Landmark::new(*mx, my + dy);
        }
    }

    HandObservation {
        handedness,
        landmarks,
        confidence: 0.95,
        track_id: None,
    }
}

pub(crate) fn point(handedness: Handedness) -> HandObservation {
    hand(handedness, [false, true, false, false, false])
}

pub(crate) fn victory(handedness: Handedness) -> HandObservation {
    hand(handedness, [false, true, true, false, false])
}

pub(crate) fn three_fingers(handedness: Handedness) -> HandObservation {
    hand(handedness, [false, true, true, true, false])
}

pub(crate) fn palm(handedness: Handedness) -> HandObservation {
    hand(handedness, [true, true, true, true, true])
}

pub(crate) fn fist(handedness: Handedness) -> HandObservation {
    hand(handedness, [false; 5])
}

pub(crate) fn thumbs_up(handedness: Handedness) -> HandObservation {
    hand(handedness, [true, false, false, false, false])
}

/// Index extended with the thumb tip touching it; other fingers curled.
pub(crate) fn pinch(handedness: Handedness) -> HandObservation {
    let mut obs = point(handedness);
    let index_tip = obs.landmarks[INDEX_TIP];
    obs.landmarks[THUMB_TIP] = Landmark::new(index_tip.x + 0.01, index_tip.y + 0.01);
    obs
}

/// Shift the whole hand so its index fingertip sits at `(x, y)`.
pub(crate) fn with_index_tip_at(mut obs: HandObservation, x: f32, y: f32) -> HandObservation {
    let tip = obs.landmarks[INDEX_TIP];
    let (dx, dy) = (x - tip.x, y - tip.y);
    for lm in &mut obs.landmarks {
        lm.x += dx;
        lm.y += dy;
    }
    obs
}

//! Geometric feature extraction.
//!
//! Turns the 21 keypoints of one hand into scale-free indicators: which
//! fingers are extended, how far apart the thumb and index tips are (in palm
//! widths), and whether the palm is open.  Everything here is a pure function
//! of a single observation.

use crate::config::FeatureConfig;
use crate::landmarks::{
    HandObservation, Landmark, INDEX_MCP, INDEX_PIP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP,
    MIDDLE_PIP, MIDDLE_TIP, PINKY_MCP, PINKY_PIP, PINKY_TIP, RING_MCP, RING_PIP, RING_TIP,
    THUMB_TIP, WRIST,
};

/// Palm widths below this are treated as a collapsed (unusable) detection.
const MIN_PALM_WIDTH: f32 = 1e-4;

// ---------------------------------------------------------------------------
// Finger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// `(pip, tip)` keypoint indices for the four long fingers.
    fn joints(self) -> Option<(usize, usize)> {
        match self {
            Finger::Thumb => None,
            Finger::Index => Some((INDEX_PIP, INDEX_TIP)),
            Finger::Middle => Some((MIDDLE_PIP, MIDDLE_TIP)),
            Finger::Ring => Some((RING_PIP, RING_TIP)),
            Finger::Pinky => Some((PINKY_PIP, PINKY_TIP)),
        }
    }
}

// ---------------------------------------------------------------------------
// FingerStates
// ---------------------------------------------------------------------------

/// Extended flag per finger, indexed in [`Finger::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates([bool; 5]);

impl FingerStates {
    pub fn new(flags: [bool; 5]) -> Self {
        Self(flags)
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// Number of extended fingers, thumb included.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }

    /// True when every listed finger is extended.
    pub fn all_extended(&self, fingers: &[Finger]) -> bool {
        fingers.iter().all(|&f| self.is_extended(f))
    }

    /// True when none of the listed fingers is extended.
    pub fn all_curled(&self, fingers: &[Finger]) -> bool {
        fingers.iter().all(|&f| !self.is_extended(f))
    }
}

// ---------------------------------------------------------------------------
// FeatureSet
// ---------------------------------------------------------------------------

/// Per-hand, per-frame geometric summary.  Never outlives the frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureSet {
    /// False when the keypoints could not be used; every flag is then false.
    pub valid: bool,
    pub fingers: FingerStates,
    /// Thumb tip ↔ index tip, in palm widths.
    pub pinch_distance: f32,
    pub palm_open: bool,
    pub palm_width: f32,
    pub index_tip: Landmark,
    /// Mean of the wrist and the four long-finger knuckles.
    pub palm_center: Landmark,
}

impl FeatureSet {
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn extended_count(&self) -> usize {
        self.fingers.count()
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Compute the [`FeatureSet`] for one hand.
///
/// Malformed input (wrong keypoint count, NaN/∞ coordinates, a collapsed
/// palm) yields [`FeatureSet::invalid`] rather than an error.
pub fn extract_features(obs: &HandObservation, config: &FeatureConfig) -> FeatureSet {
    if obs.landmarks.len() != LANDMARK_COUNT || !obs.landmarks.iter().all(Landmark::is_finite) {
        log::trace!(
            "features: unusable {} hand ({} keypoints)",
            obs.handedness.label(),
            obs.landmarks.len()
        );
        return FeatureSet::invalid();
    }

    let lm = &obs.landmarks;
    let wrist = lm[WRIST];
    let palm_width = lm[INDEX_MCP].distance(&lm[PINKY_MCP]);
    if palm_width < MIN_PALM_WIDTH {
        return FeatureSet::invalid();
    }

    let mut flags = [false; 5];
    for finger in Finger::ALL {
        let threshold = config.finger_extension.get(finger);
        flags[finger as usize] = match finger.joints() {
            None => lm[THUMB_TIP].distance(&lm[PINKY_MCP]) / palm_width > threshold,
            Some((pip, tip)) => {
                let base = lm[pip].distance(&wrist);
                base > f32::EPSILON && lm[tip].distance(&wrist) / base > threshold
            }
        };
    }
    let fingers = FingerStates::new(flags);

    let knuckles = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
    let (sx, sy) = knuckles
        .iter()
        .fold((wrist.x, wrist.y), |(sx, sy), &i| (sx + lm[i].x, sy + lm[i].y));
    let palm_center = Landmark::new(sx / 5.0, sy / 5.0);

    FeatureSet {
        valid: true,
        fingers,
        pinch_distance: lm[THUMB_TIP].distance(&lm[INDEX_TIP]) / palm_width,
        palm_open: fingers.count() >= config.palm_min_fingers,
        palm_width,
        index_tip: lm[INDEX_TIP],
        palm_center,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::fixtures;
    use crate::landmarks::Handedness::Right;

    fn features(obs: &HandObservation) -> FeatureSet {
        extract_features(obs, &FeatureConfig::default())
    }

    #[test]
    fn open_palm_has_all_fingers_extended() {
        let f = features(&fixtures::palm(Right));
        assert!(f.valid);
        assert_eq!(f.extended_count(), 5);
        assert!(f.palm_open);
    }

    #[test]
    fn fist_has_no_fingers_extended() {
        let f = features(&fixtures::fist(Right));
        assert!(f.valid);
        assert_eq!(f.extended_count(), 0);
        assert!(!f.palm_open);
        assert!(f.pinch_distance > 0.3);
    }

    #[test]
    fn point_extends_only_index() {
        let f = features(&fixtures::point(Right));
        assert!(f.fingers.is_extended(Finger::Index));
        assert!(f.fingers.all_curled(&[
            Finger::Thumb,
            Finger::Middle,
            Finger::Ring,
            Finger::Pinky
        ]));
    }

    #[test]
    fn thumb_uses_palm_width_ratio() {
        let up = features(&fixtures::thumbs_up(Right));
        assert!(up.fingers.is_extended(Finger::Thumb));
        assert_eq!(up.extended_count(), 1);
    }

    #[test]
    fn pinch_distance_is_scale_free() {
        let f = features(&fixtures::pinch(Right));
        assert!(f.pinch_distance < 0.15, "got {}", f.pinch_distance);
        assert!((f.palm_width - 0.1432).abs() < 1e-3);
    }

    #[test]
    fn wrong_keypoint_count_is_invalid() {
        let mut obs = fixtures::palm(Right);
        obs.landmarks.truncate(20);
        let f = features(&obs);
        assert!(!f.valid);
        assert_eq!(f.extended_count(), 0);
        assert!(!f.palm_open);
    }

    #[test]
    fn nan_coordinate_is_invalid() {
        let mut obs = fixtures::palm(Right);
        obs.landmarks[INDEX_TIP].y = f32::NAN;
        assert!(!features(&obs).valid);
    }

    #[test]
    fn collapsed_palm_is_invalid() {
        let mut obs = fixtures::palm(Right);
        obs.landmarks[PINKY_MCP] = obs.landmarks[INDEX_MCP];
        assert!(!features(&obs).valid);
    }

    #[test]
    fn palm_min_fingers_is_configurable() {
        let cfg = FeatureConfig {
            palm_min_fingers: 3,
            ..FeatureConfig::default()
        };
        let f = extract_features(&fixtures::three_fingers(Right), &cfg);
        assert!(f.palm_open);
    }
}

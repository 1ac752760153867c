//! Sliding-window quorum stabilizer.
//!
//! A hand's raw label only becomes a confirmed gesture once it appears at
//! least Q times among the last N frames.  The confirmed label is sticky: a
//! single outlier frame does not unconfirm it as long as it keeps its quorum.

use std::time::Duration;

use super::classifier::{GestureKind, RawGesture};
use super::window::RingBuffer;
use crate::config::StabilizerConfig;
use crate::landmarks::HandId;

// ---------------------------------------------------------------------------
// ConfirmedGesture
// ---------------------------------------------------------------------------

/// A stabilised gesture for one hand in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfirmedGesture {
    pub hand: HandId,
    pub kind: GestureKind,
    /// Mean raw confidence of the agreeing frames in the window.
    pub confidence: f32,
    /// Engine frame counter; strictly increasing.
    pub frame_index: u64,
    pub timestamp: Duration,
}

/// What [`Stabilizer::push`] decided for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    pub kind: GestureKind,
    pub confidence: f32,
    /// True on the frame the gesture became confirmed; false for the
    /// per-frame repeats of continuous gestures.
    pub onset: bool,
}

// ---------------------------------------------------------------------------
// Stabilizer
// ---------------------------------------------------------------------------

/// Per-hand label history plus the currently confirmed label.
#[derive(Debug, Clone)]
pub struct Stabilizer {
    window: RingBuffer<RawGesture>,
    quorum: usize,
    confirmed: GestureKind,
}

impl Stabilizer {
    pub fn new(config: &StabilizerConfig) -> Self {
        Self {
            window: RingBuffer::new(config.window_size),
            quorum: config.quorum,
            confirmed: GestureKind::None,
        }
    }

    /// Currently confirmed label (`None` when nothing holds a quorum).
    pub fn confirmed(&self) -> GestureKind {
        self.confirmed
    }

    /// Record one frame's raw label and decide whether to emit.
    ///
    /// `is_continuous` says whether a confirmed label keeps emitting on every
    /// frame it stays confirmed (cursor, scroll and drag bindings).
    pub fn push(
        &mut self,
        raw: RawGesture,
        is_continuous: impl Fn(GestureKind) -> bool,
    ) -> Option<Emission> {
        self.window.push(raw);

        let newest = raw.kind;
        let candidate = if self.votes(newest) >= self.quorum {
            newest
        } else if self.votes(self.confirmed) >= self.quorum {
            self.confirmed
        } else {
            GestureKind::None
        };

        let onset = candidate != self.confirmed;
        if onset {
            log::debug!(
                "stabilizer: {} -> {}",
                self.confirmed.label(),
                candidate.label()
            );
            self.confirmed = candidate;
        }

        if candidate == GestureKind::None || !(onset || is_continuous(candidate)) {
            return None;
        }

        Some(Emission {
            kind: candidate,
            confidence: self.mean_confidence(candidate),
            onset,
        })
    }

    fn votes(&self, kind: GestureKind) -> usize {
        self.window.count(|g| g.kind == kind)
    }

    fn mean_confidence(&self, kind: GestureKind) -> f32 {
        let (sum, n) = self
            .window
            .iter()
            .filter(|g| g.kind == kind)
            .fold((0.0, 0usize), |(s, n), g| (s + g.confidence, n + 1));
        if n == 0 {
            0.0
        } else {
            sum / n as f32
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use GestureKind as G;

    fn stabilizer() -> Stabilizer {
        Stabilizer::new(&StabilizerConfig::default())
    }

    fn never(_: GestureKind) -> bool {
        false
    }

    fn raw(kind: GestureKind) -> RawGesture {
        RawGesture::new(kind, 1.0)
    }

    /// Feed `labels` and collect the emitted kinds per frame.
    fn run(
        s: &mut Stabilizer,
        labels: &[GestureKind],
        continuous: impl Fn(GestureKind) -> bool + Copy,
    ) -> Vec<Option<GestureKind>> {
        labels
            .iter()
            .map(|&k| s.push(raw(k), continuous).map(|e| e.kind))
            .collect()
    }

    #[test]
    fn confirms_on_quorum_and_emits_once() {
        let mut s = stabilizer();
        let out = run(&mut s, &[G::Victory; 5], never);
        assert_eq!(out, vec![None, None, Some(G::Victory), None, None]);
        assert_eq!(s.confirmed(), G::Victory);
    }

    #[test]
    fn below_quorum_never_confirms() {
        let mut s = stabilizer();
        let out = run(&mut s, &[G::Pinch, G::Fist, G::Pinch, G::Fist, G::Point], never);
        assert!(out.iter().all(Option::is_none));
        assert_eq!(s.confirmed(), G::None);
    }

    #[test]
    fn single_outlier_does_not_unconfirm() {
        let mut s = stabilizer();
        run(&mut s, &[G::Fist; 5], never);
        let out = run(&mut s, &[G::Palm], never);
        assert_eq!(out, vec![None]);
        assert_eq!(s.confirmed(), G::Fist);
    }

    #[test]
    fn newest_label_wins_when_both_hold_quorum() {
        let cfg = StabilizerConfig {
            window_size: 6,
            quorum: 3,
            grace_frames: 5,
        };
        let mut s = Stabilizer::new(&cfg);
        run(&mut s, &[G::Fist, G::Fist, G::Fist], never);
        let out = run(&mut s, &[G::Palm, G::Palm, G::Palm], never);
        assert_eq!(out, vec![None, None, Some(G::Palm)]);
    }

    #[test]
    fn continuous_gesture_repeats_every_frame() {
        let mut s = stabilizer();
        let continuous = |k: GestureKind| k == G::Point;
        let out = run(&mut s, &[G::Point; 5], continuous);
        assert_eq!(out, vec![None, None, Some(G::Point), Some(G::Point), Some(G::Point)]);
    }

    #[test]
    fn onset_flag_marks_first_emission_only() {
        let mut s = stabilizer();
        let continuous = |_: GestureKind| true;
        let emissions: Vec<_> = (0..4)
            .filter_map(|_| s.push(raw(G::Point), continuous))
            .collect();
        assert_eq!(emissions.len(), 2);
        assert!(emissions[0].onset);
        assert!(!emissions[1].onset);
    }

    #[test]
    fn losing_quorum_falls_back_to_none_silently() {
        let mut s = stabilizer();
        run(&mut s, &[G::Victory; 3], never);
        let out = run(&mut s, &[G::Point, G::Fist, G::Pinch], never);
        assert!(out.iter().all(Option::is_none));
        assert_eq!(s.confirmed(), G::None);
    }

    #[test]
    fn reconfirming_after_a_gap_emits_again() {
        let mut s = stabilizer();
        run(&mut s, &[G::Pinch; 3], never);
        run(&mut s, &[G::None; 3], never);
        let out = run(&mut s, &[G::Pinch; 3], never);
        assert_eq!(out, vec![None, None, Some(G::Pinch)]);
    }

    #[test]
    fn confidence_is_mean_of_agreeing_frames() {
        let mut s = stabilizer();
        s.push(RawGesture::new(G::Fist, 0.5), never);
        s.push(RawGesture::new(G::Fist, 1.0), never);
        let e = s.push(RawGesture::new(G::Fist, 0.9), never).unwrap();
        assert!((e.confidence - 0.8).abs() < 1e-6);
    }
}

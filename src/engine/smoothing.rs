//! Cursor mapping and exponential smoothing.

use crate::landmarks::{HandId, Landmark};

/// Map a fingertip in camera space to normalised screen space.
///
/// `margin` is cropped from every side of the camera frame so the screen
/// edges are reachable without the hand leaving the image.  The result is
/// clamped to `[0, 1]`.
pub fn map_to_screen(tip: Landmark, margin: f32) -> (f32, f32) {
    let span = 1.0 - 2.0 * margin;
    let scale = |v: f32| ((v - margin) / span).clamp(0.0, 1.0);
    (scale(tip.x), scale(tip.y))
}

/// Which gesture is steering the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorSource {
    Pointer,
    Drag,
}

/// Single-pole low-pass filter over cursor positions:
/// `s = α·raw + (1 − α)·s_prev`.
///
/// The filter re-seeds with the raw position when the previous frame did not
/// move the cursor, or when a different hand or source takes over, so a new
/// cursor session never glides in from a stale position.
#[derive(Debug, Clone, Default)]
pub struct CursorSmoother {
    last: Option<(f32, f32)>,
    owner: Option<(HandId, CursorSource)>,
    used_last_frame: bool,
    used_this_frame: bool,
}

impl CursorSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once before any [`smooth`](Self::smooth) of a new frame.
    pub fn begin_frame(&mut self) {
        self.used_last_frame = self.used_this_frame;
        self.used_this_frame = false;
    }

    /// True when some hand already moved the cursor this frame.
    pub fn claimed(&self) -> bool {
        self.used_this_frame
    }

    pub fn smooth(
        &mut self,
        hand: HandId,
        source: CursorSource,
        raw: (f32, f32),
        alpha: f32,
    ) -> (f32, f32) {
        let owner = (hand, source);
        let next = match self.last {
            Some((px, py)) if self.used_last_frame && self.owner == Some(owner) => (
                alpha * raw.0 + (1.0 - alpha) * px,
                alpha * raw.1 + (1.0 - alpha) * py,
            ),
            _ => raw,
        };
        self.last = Some(next);
        self.owner = Some(owner);
        self.used_this_frame = true;
        next
    }
}

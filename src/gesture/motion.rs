//! Per-hand motion tracking: horizontal swipes and vertical scroll deltas.
//!
//! The tracker follows the index fingertip.  Which measurement is taken on a
//! given frame depends on the hand's confirmed gesture ([`MotionMode`]); the
//! two modes never run at the same time and switching away from a mode
//! discards its history.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::MotionConfig;
use crate::landmarks::Landmark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
        }
    }
}

/// Which measurement the tracker takes this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    Swipe,
    Scroll,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    Swipe(SwipeDirection),
    /// Positive scrolls down.
    Scroll { delta: i32 },
}

/// Fingertip history for one hand.
#[derive(Debug, Clone, Default)]
pub struct MotionTracker {
    /// `(timestamp, x)` samples inside the swipe window, oldest first.
    swipe: VecDeque<(Duration, f32)>,
    /// Fingertip y on the previous scroll-mode frame.
    last_scroll_y: Option<f32>,
}

impl MotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        now: Duration,
        mode: MotionMode,
        tip: Landmark,
        config: &MotionConfig,
    ) -> Option<MotionEvent> {
        match mode {
            MotionMode::Swipe => {
                self.last_scroll_y = None;
                self.track_swipe(now, tip.x, config)
            }
            MotionMode::Scroll => {
                self.swipe.clear();
                self.track_scroll(tip.y, config)
            }
            MotionMode::Idle => {
                self.reset();
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.swipe.clear();
        self.last_scroll_y = None;
    }

    fn track_swipe(&mut self, now: Duration, x: f32, config: &MotionConfig) -> Option<MotionEvent> {
        let window = config.swipe_window();
        while self
            .swipe
            .front()
            .is_some_and(|&(t, _)| now.saturating_sub(t) > window)
        {
            self.swipe.pop_front();
        }
        self.swipe.push_back((now, x));

        let &(_, oldest) = self.swipe.front()?;
        let dx = x - oldest;
        if dx.abs() < config.swipe_threshold {
            return None;
        }

        let direction = if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        };
        log::debug!("motion: swipe {} (dx = {dx:.3})", direction.label());
        self.swipe.clear();
        Some(MotionEvent::Swipe(direction))
    }

    fn track_scroll(&mut self, y: f32, config: &MotionConfig) -> Option<MotionEvent> {
        let prev = self.last_scroll_y.replace(y)?;
        let dy = y - prev;
        if dy.abs() <= config.scroll_deadzone {
            return None;
        }
        let delta = ((dy * config.scroll_sensitivity).round() as i32)
            .clamp(-config.scroll_max, config.scroll_max);
        (delta != 0).then_some(MotionEvent::Scroll { delta })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Pause / resume state machine.
//!
//! ```text
//! Active ──thumbs-up (cooldown)──▶ RegularPaused
//! RegularPaused ──thumbs-up (cooldown)──▶ Active
//! Active | RegularPaused ──two open hands (immediate)──▶ HarshPaused
//! HarshPaused ──thumbs-up (cooldown)──▶ Active
//! ```
//!
//! The harsh pause is evaluated on raw per-frame features and wins over a
//! thumbs-up confirmed in the same frame.  The manual hotkey toggle follows
//! the same edges but ignores the toggle cooldown.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::PauseConfig;

// ---------------------------------------------------------------------------
// PauseState
// ---------------------------------------------------------------------------

/// Whether gestures are currently turned into actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PauseState {
    /// Gestures are dispatched.
    #[default]
    Active,
    /// Paused by a thumbs-up; another thumbs-up resumes.
    RegularPaused,
    /// Paused by two open hands; only a thumbs-up resumes.
    HarshPaused,
}

impl PauseState {
    pub fn is_paused(&self) -> bool {
        !matches!(self, PauseState::Active)
    }

    /// Short label for the status overlay.
    ///
    /// ```
    /// use gesture_control::engine::PauseState;
    ///
    /// assert_eq!(PauseState::Active.label(), "Active");
    /// assert_eq!(PauseState::HarshPaused.label(), "Paused (hands)");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            PauseState::Active => "Active",
            PauseState::RegularPaused => "Paused",
            PauseState::HarshPaused => "Paused (hands)",
        }
    }
}

// ---------------------------------------------------------------------------
// PauseMachine
// ---------------------------------------------------------------------------

/// Owns the [`PauseState`] and the toggle cooldown bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct PauseMachine {
    state: PauseState,
    /// Frame timestamp of the last accepted thumbs-up toggle.
    last_toggle: Option<Duration>,
}

impl PauseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PauseState {
        self.state
    }

    /// Feed one frame's pause inputs.
    ///
    /// `thumbs_up` is true when a thumbs-up was confirmed this frame;
    /// `both_hands_open` when two hands each showed enough extended fingers.
    /// Returns the new state when it changed.
    pub fn observe(
        &mut self,
        now: Duration,
        thumbs_up: bool,
        both_hands_open: bool,
        config: &PauseConfig,
    ) -> Option<PauseState> {
        if config.harsh_pause_enabled && both_hands_open {
            if self.state == PauseState::HarshPaused {
                return None;
            }
            log::info!("pause: two open hands, harsh pause");
            return self.transition(PauseState::HarshPaused);
        }

        if !thumbs_up {
            return None;
        }

        if let Some(last) = self.last_toggle {
            if now < last + config.toggle_cooldown() {
                log::debug!(
                    "pause: thumbs-up ignored, toggle cooldown ({:?} since last)",
                    now.saturating_sub(last)
                );
                return None;
            }
        }

        self.last_toggle = Some(now);
        let next = Self::toggled(self.state);
        log::info!("pause: thumbs-up, {} -> {}", self.state.label(), next.label());
        self.transition(next)
    }

    /// Hotkey toggle.  Ignores the cooldown but records the toggle time so a
    /// thumbs-up right after does not immediately undo it.
    pub fn manual_toggle(&mut self, now: Duration) -> PauseState {
        self.last_toggle = Some(now);
        let next = Self::toggled(self.state);
        log::info!("pause: manual toggle, {} -> {}", self.state.label(), next.label());
        self.state = next;
        next
    }

    fn toggled(state: PauseState) -> PauseState {
        match state {
            PauseState::Active => PauseState::RegularPaused,
            PauseState::RegularPaused | PauseState::HarshPaused => PauseState::Active,
        }
    }

    fn transition(&mut self, next: PauseState) -> Option<PauseState> {
        if next == self.state {
            return None;
        }
        self.state = next;
        Some(next)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn default_is_active() {
        assert_eq!(PauseMachine::new().state(), PauseState::Active);
        assert!(!PauseState::Active.is_paused());
        assert!(PauseState::RegularPaused.is_paused());
        assert!(PauseState::HarshPaused.is_paused());
    }

    #[test]
    fn thumbs_up_toggles_with_cooldown() {
        let cfg = PauseConfig::default();
        let mut m = PauseMachine::new();

        assert_eq!(
            m.observe(ms(0), true, false, &cfg),
            Some(PauseState::RegularPaused)
        );
        // 400 ms later: inside the 1 s cooldown, ignored.
        assert_eq!(m.observe(ms(400), true, false, &cfg), None);
        assert_eq!(m.state(), PauseState::RegularPaused);
        // 1200 ms after the first toggle: accepted.
        assert_eq!(m.observe(ms(1200), true, false, &cfg), Some(PauseState::Active));
    }

    #[test]
    fn harsh_pause_is_immediate_and_overrides_thumbs_up() {
        let cfg = PauseConfig::default();
        let mut m = PauseMachine::new();

        assert_eq!(
            m.observe(ms(0), true, true, &cfg),
            Some(PauseState::HarshPaused)
        );
        // Still two open hands: no repeated transition.
        assert_eq!(m.observe(ms(33), false, true, &cfg), None);
    }

    #[test]
    fn harsh_pause_from_regular_pause_ignores_cooldown() {
        let cfg = PauseConfig::default();
        let mut m = PauseMachine::new();
        m.observe(ms(0), true, false, &cfg);
        assert_eq!(
            m.observe(ms(10), false, true, &cfg),
            Some(PauseState::HarshPaused)
        );
    }

    #[test]
    fn harsh_pause_resumes_only_on_thumbs_up() {
        let cfg = PauseConfig::default();
        let mut m = PauseMachine::new();
        m.observe(ms(0), false, true, &cfg);

        assert_eq!(m.observe(ms(100), false, false, &cfg), None);
        assert_eq!(m.state(), PauseState::HarshPaused);
        assert_eq!(m.observe(ms(200), true, false, &cfg), Some(PauseState::Active));
    }

    #[test]
    fn harsh_pause_can_be_disabled() {
        let cfg = PauseConfig {
            harsh_pause_enabled: false,
            ..PauseConfig::default()
        };
        let mut m = PauseMachine::new();
        assert_eq!(m.observe(ms(0), false, true, &cfg), None);
        assert_eq!(m.state(), PauseState::Active);
    }

    #[test]
    fn manual_toggle_bypasses_cooldown() {
        let cfg = PauseConfig::default();
        let mut m = PauseMachine::new();
        m.observe(ms(0), true, false, &cfg);
        assert_eq!(m.manual_toggle(ms(100)), PauseState::Active);
        assert_eq!(m.manual_toggle(ms(150)), PauseState::RegularPaused);
        // Gesture toggle right after a manual one still waits out the cooldown.
        assert_eq!(m.observe(ms(500), true, false, &cfg), None);
    }
}

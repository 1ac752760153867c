//! Action dispatcher: confirmed gestures and motion events in, commands out.
//!
//! The dispatcher is the only place that knows about cooldowns, cursor
//! smoothing and drag sessions.  It never touches the OS; the commands it
//! returns are executed by an [`Actuator`](crate::actuator::Actuator).

use std::collections::HashMap;
use std::time::Duration;

use super::action::{ActionBinding, ActionCommand, ActionKind};
use super::pause::PauseState;
use super::smoothing::{map_to_screen, CursorSmoother, CursorSource};
use crate::config::AppConfig;
use crate::gesture::{ConfirmedGesture, SwipeDirection};
use crate::landmarks::{HandId, Landmark};

// ---------------------------------------------------------------------------
// DispatchEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchInput {
    Gesture(ConfirmedGesture),
    Scroll { delta: i32 },
    Swipe(SwipeDirection),
}

impl DispatchInput {
    /// Tie-break within one hand: pose first, then motion.
    fn rank(&self) -> u8 {
        match self {
            DispatchInput::Gesture(_) => 0,
            DispatchInput::Scroll { .. } => 1,
            DispatchInput::Swipe(_) => 2,
        }
    }
}

/// One thing that happened to one hand this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchEvent {
    pub hand: HandId,
    /// Index fingertip this frame; drives the cursor.
    pub pointer: Landmark,
    pub input: DispatchInput,
}

// ---------------------------------------------------------------------------
// CooldownTable
// ---------------------------------------------------------------------------

/// Earliest frame time at which each action kind may fire again.
#[derive(Debug, Clone, Default)]
pub struct CooldownTable {
    ready_at: HashMap<ActionKind, Duration>,
}

impl CooldownTable {
    pub fn is_ready(&self, kind: ActionKind, now: Duration) -> bool {
        self.ready_at.get(&kind).map_or(true, |&ready| now >= ready)
    }

    pub fn arm(&mut self, kind: ActionKind, now: Duration, cooldown: Duration) {
        self.ready_at.insert(kind, now + cooldown);
    }

    /// Fire `kind` if it is ready, arming its cooldown.  Returns whether it
    /// fired.
    pub fn try_fire(&mut self, kind: ActionKind, now: Duration, cooldown: Duration) -> bool {
        if !self.is_ready(kind, now) {
            return false;
        }
        self.arm(kind, now, cooldown);
        true
    }
}

// ---------------------------------------------------------------------------
// DragSession
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    hand: HandId,
    /// When the drag gesture was first seen.
    since: Duration,
    /// Mouse button is down.
    active: bool,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    cooldowns: CooldownTable,
    smoother: CursorSmoother,
    drag: Option<DragSession>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand currently holding the mouse button, if any.
    pub fn dragging(&self) -> Option<HandId> {
        self.drag.filter(|s| s.active).map(|s| s.hand)
    }

    /// Turn this frame's events into commands.
    ///
    /// Nothing is emitted unless `pause` is [`PauseState::Active`].  Events
    /// are processed in `(hand, kind)` order regardless of input order.
    pub fn dispatch(
        &mut self,
        now: Duration,
        pause: PauseState,
        mut events: Vec<DispatchEvent>,
        config: &AppConfig,
    ) -> Vec<ActionCommand> {
        self.smoother.begin_frame();
        if pause.is_paused() {
            if !events.is_empty() {
                log::trace!("dispatch: {} event(s) dropped, {}", events.len(), pause.label());
            }
            return Vec::new();
        }

        events.sort_by_key(|e| (e.hand, e.input.rank()));

        let mut out = Vec::new();
        for event in events {
            match event.input {
                DispatchInput::Gesture(g) => {
                    if let Some(binding) = config.bindings.for_gesture(g.kind) {
                        self.apply_binding(now, &event, binding, config, &mut out);
                    }
                }
                DispatchInput::Swipe(direction) => {
                    let binding = config.bindings.for_swipe(direction);
                    self.fire_one_shot(now, binding, config, &mut out);
                }
                DispatchInput::Scroll { delta } => out.push(ActionCommand::ScrollBy { delta }),
            }
        }
        out
    }

    /// End the drag session, returning `DragEnd` when the button was down.
    pub fn release_drag(&mut self) -> Option<ActionCommand> {
        let session = self.drag.take()?;
        if session.active {
            log::debug!("dispatch: drag released ({})", session.hand);
            Some(ActionCommand::DragEnd)
        } else {
            None
        }
    }

    /// Release the drag unless `still_dragging` holds for its hand.
    pub fn retain_drag(&mut self, still_dragging: impl Fn(HandId) -> bool) -> Option<ActionCommand> {
        match self.drag {
            Some(session) if !still_dragging(session.hand) => self.release_drag(),
            _ => None,
        }
    }

    fn apply_binding(
        &mut self,
        now: Duration,
        event: &DispatchEvent,
        binding: ActionBinding,
        config: &AppConfig,
        out: &mut Vec<ActionCommand>,
    ) {
        match binding {
            ActionBinding::MoveCursor => {
                if let Some((x, y)) = self.cursor(event, CursorSource::Pointer, config) {
                    out.push(ActionCommand::MoveCursor { x, y });
                }
            }
            ActionBinding::Drag => self.drag_step(now, event, config, out),
            // Scroll deltas arrive as their own motion events.
            ActionBinding::Scroll | ActionBinding::Disabled => {}
            _ => self.fire_one_shot(now, binding, config, out),
        }
    }

    fn fire_one_shot(
        &mut self,
        now: Duration,
        binding: ActionBinding,
        config: &AppConfig,
        out: &mut Vec<ActionCommand>,
    ) {
        let Some(command) = binding.one_shot() else {
            return;
        };
        let kind = command.kind();
        if self
            .cooldowns
            .try_fire(kind, now, config.dispatch.cooldown(kind))
        {
            log::debug!("dispatch: {}", kind.label());
            out.push(command);
        } else {
            log::trace!("dispatch: {} suppressed by cooldown", kind.label());
        }
    }

    fn drag_step(
        &mut self,
        now: Duration,
        event: &DispatchEvent,
        config: &AppConfig,
        out: &mut Vec<ActionCommand>,
    ) {
        let session = match self.drag {
            Some(s) if s.hand != event.hand => return,
            Some(s) => s,
            None => {
                let s = DragSession {
                    hand: event.hand,
                    since: now,
                    active: false,
                };
                self.drag = Some(s);
                s
            }
        };

        if !session.active && now.saturating_sub(session.since) < config.dispatch.drag_hold() {
            return;
        }
        let Some((x, y)) = self.cursor(event, CursorSource::Drag, config) else {
            return;
        };
        if session.active {
            out.push(ActionCommand::DragMove { x, y });
        } else {
            log::debug!("dispatch: drag start ({})", event.hand);
            self.drag = Some(DragSession {
                active: true,
                ..session
            });
            out.push(ActionCommand::DragStart { x, y });
        }
    }

    /// Smoothed screen position for `event`, or `None` when another hand
    /// already moved the cursor this frame.
    fn cursor(
        &mut self,
        event: &DispatchEvent,
        source: CursorSource,
        config: &AppConfig,
    ) -> Option<(f32, f32)> {
        if self.smoother.claimed() {
            return None;
        }
        let raw = map_to_screen(event.pointer, config.cursor.frame_margin);
        Some(
            self.smoother
                .smooth(event.hand, source, raw, config.cursor.smoothing),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::KeyCombo;
    use crate::gesture::GestureKind;
    use crate::landmarks::Handedness;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn right() -> HandId {
        HandId::new(Handedness::Right, 0)
    }

    fn left() -> HandId {
        HandId::new(Handedness::Left, 0)
    }

    fn gesture(hand: HandId, kind: GestureKind, at: (f32, f32)) -> DispatchEvent {
        DispatchEvent {
            hand,
            pointer: Landmark::new(at.0, at.1),
            input: DispatchInput::Gesture(ConfirmedGesture {
                hand,
                kind,
                confidence: 1.0,
                frame_index: 0,
                timestamp: Duration::ZERO,
            }),
        }
    }

    fn swipe(hand: HandId, direction: SwipeDirection) -> DispatchEvent {
        DispatchEvent {
            hand,
            pointer: Landmark::default(),
            input: DispatchInput::Swipe(direction),
        }
    }

    #[test]
    fn cooldown_table_blocks_until_ready() {
        let mut t = CooldownTable::default();
        assert!(t.try_fire(ActionKind::Click, ms(0), ms(500)));
        assert!(!t.try_fire(ActionKind::Click, ms(499), ms(500)));
        assert!(t.try_fire(ActionKind::Click, ms(500), ms(500)));
        // Independent per kind.
        assert!(t.try_fire(ActionKind::RightClick, ms(510), ms(500)));
    }

    #[test]
    fn click_respects_cooldown() {
        let cfg = AppConfig::default();
        let mut d = Dispatcher::new();
        let pinch = || vec![gesture(right(), GestureKind::Pinch, (0.5, 0.5))];

        assert_eq!(
            d.dispatch(ms(0), PauseState::Active, pinch(), &cfg),
            vec![ActionCommand::Click]
        );
        assert!(d.dispatch(ms(200), PauseState::Active, pinch(), &cfg).is_empty());
        assert_eq!(
            d.dispatch(ms(600), PauseState::Active, pinch(), &cfg),
            vec![ActionCommand::Click]
        );
    }

    #[test]
    fn paused_drops_everything() {
        let cfg = AppConfig::default();
        let mut d = Dispatcher::new();
        for state in [PauseState::RegularPaused, PauseState::HarshPaused] {
            let events = vec![
                gesture(right(), GestureKind::Pinch, (0.5, 0.5)),
                gesture(left(), GestureKind::Point, (0.5, 0.5)),
                swipe(right(), SwipeDirection::Left),
            ];
            assert!(d.dispatch(ms(0), state, events, &cfg).is_empty());
        }
    }

    #[test]
    fn events_processed_in_hand_order() {
        let cfg = AppConfig::default();
        let mut d = Dispatcher::new();
        let events = vec![
            gesture(right(), GestureKind::Pinch, (0.5, 0.5)),
            gesture(left(), GestureKind::Palm, (0.5, 0.5)),
        ];
        assert_eq!(
            d.dispatch(ms(0), PauseState::Active, events, &cfg),
            vec![ActionCommand::RightClick, ActionCommand::Click]
        );
    }

    #[test]
    fn only_first_hand_moves_cursor() {
        let cfg = AppConfig::default();
        let mut d = Dispatcher::new();
        let events = vec![
            gesture(right(), GestureKind::Point, (0.9, 0.9)),
            gesture(left(), GestureKind::Point, (0.5, 0.5)),
        ];
        let out = d.dispatch(ms(0), PauseState::Active, events, &cfg);
        assert_eq!(out, vec![ActionCommand::MoveCursor { x: 0.5, y: 0.5 }]);
    }

    #[test]
    fn swipe_maps_through_bindings() {
        let mut cfg = AppConfig::default();
        cfg.bindings.swipe_left = ActionBinding::KeyCombo(KeyCombo::Undo);
        let mut d = Dispatcher::new();
        let out = d.dispatch(
            ms(0),
            PauseState::Active,
            vec![
                swipe(right(), SwipeDirection::Left),
                swipe(left(), SwipeDirection::Right),
            ],
            &cfg,
        );
        assert_eq!(
            out,
            vec![
                ActionCommand::NavigateForward,
                ActionCommand::KeyCombo {
                    combo: KeyCombo::Undo
                }
            ]
        );
    }

    #[test]
    fn disabled_binding_emits_nothing() {
        let mut cfg = AppConfig::default();
        cfg.bindings.pinch = ActionBinding::Disabled;
        let mut d = Dispatcher::new();
        let out = d.dispatch(
            ms(0),
            PauseState::Active,
            vec![gesture(right(), GestureKind::Pinch, (0.5, 0.5))],
            &cfg,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn drag_waits_for_hold_then_moves() {
        let cfg = AppConfig::default();
        let mut d = Dispatcher::new();
        let fist = |x| vec![gesture(right(), GestureKind::Fist, (x, 0.5))];

        assert!(d.dispatch(ms(0), PauseState::Active, fist(0.5), &cfg).is_empty());
        assert!(d.dispatch(ms(150), PauseState::Active, fist(0.5), &cfg).is_empty());
        assert_eq!(
            d.dispatch(ms(300), PauseState::Active, fist(0.5), &cfg),
            vec![ActionCommand::DragStart { x: 0.5, y: 0.5 }]
        );
        assert_eq!(d.dragging(), Some(right()));
        let out = d.dispatch(ms(333), PauseState::Active, fist(0.5), &cfg);
        assert!(matches!(out.as_slice(), [ActionCommand::DragMove { .. }]));

        assert_eq!(d.retain_drag(|_| false), Some(ActionCommand::DragEnd));
        assert_eq!(d.dragging(), None);
    }

    #[test]
    fn short_fist_never_presses_button() {
        let cfg = AppConfig::default();
        let mut d = Dispatcher::new();
        d.dispatch(
            ms(0),
            PauseState::Active,
            vec![gesture(right(), GestureKind::Fist, (0.5, 0.5))],
            &cfg,
        );
        assert_eq!(d.retain_drag(|_| false), None);
    }

    #[test]
    fn scroll_event_becomes_scroll_command() {
        let cfg = AppConfig::default();
        let mut d = Dispatcher::new();
        let out = d.dispatch(
            ms(0),
            PauseState::Active,
            vec![
                DispatchEvent {
                    hand: right(),
                    pointer: Landmark::default(),
                    input: DispatchInput::Scroll { delta: -2 },
                },
                gesture(right(), GestureKind::ThreeFingers, (0.5, 0.5)),
            ],
            &cfg,
        );
        assert_eq!(out, vec![ActionCommand::ScrollBy { delta: -2 }]);
    }
}

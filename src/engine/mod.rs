//! Gesture engine: one frame of landmarks in, a list of actions out.
//!
//! # Quick start
//!
//! ```rust
//! use gesture_control::config::AppConfig;
//! use gesture_control::engine::GestureEngine;
//! use gesture_control::landmarks::Frame;
//!
//! let mut engine = GestureEngine::new(AppConfig::default());
//! let commands = engine.process_frame(&Frame::new(0, Vec::new()));
//! assert!(commands.is_empty());
//! ```
//!
//! # Architecture
//!
//! ```text
//! Frame ──▶ ingest (mirror, confidence filter, HandId)
//!             │
//!             ▼  per hand, in HandId order
//!        features ─▶ classify ─▶ Stabilizer ─▶ MotionTracker
//!             │                      │              │
//!             │ open-hand count      │ thumbs-up    │ swipe / scroll
//!             ▼                      ▼              ▼
//!        PauseMachine ◀──────────────┘        Dispatcher ──▶ Vec<ActionCommand>
//!             └──────────── gates ───────────────▲
//! ```
//!
//! All mutable state lives in [`EngineState`] and is threaded through
//! [`step`]; [`GestureEngine`] is a convenience owner for callers that do
//! not want to carry it themselves.

pub mod action;
pub mod dispatch;
pub mod pause;
pub mod smoothing;

pub use action::{ActionBinding, ActionCommand, ActionKind, KeyCombo};
pub use dispatch::{CooldownTable, DispatchEvent, DispatchInput, Dispatcher};
pub use pause::{PauseMachine, PauseState};
pub use smoothing::{map_to_screen, CursorSmoother, CursorSource};

use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::AppConfig;
use crate::gesture::{
    classify, extract_features, ConfirmedGesture, GestureKind, MotionEvent, MotionMode,
    MotionTracker, Stabilizer,
};
use crate::landmarks::{Frame, HandId, HandObservation};

// ---------------------------------------------------------------------------
// HandTrack
// ---------------------------------------------------------------------------

/// Everything the engine remembers about one hand between frames.
#[derive(Debug, Clone)]
struct HandTrack {
    stabilizer: Stabilizer,
    motion: MotionTracker,
    /// Consecutive frames this hand has not been seen.
    missing: u32,
}

impl HandTrack {
    fn new(config: &AppConfig) -> Self {
        Self {
            stabilizer: Stabilizer::new(&config.stabilizer),
            motion: MotionTracker::new(),
            missing: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// EngineState
// ---------------------------------------------------------------------------

/// All state carried from one frame to the next.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    frame_index: u64,
    last_timestamp: Duration,
    tracks: BTreeMap<HandId, HandTrack>,
    pause: PauseMachine,
    dispatcher: Dispatcher,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause_state(&self) -> PauseState {
        self.pause.state()
    }

    /// Number of frames processed so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// True while a drag holds the mouse button down.
    pub fn is_dragging(&self) -> bool {
        self.dispatcher.dragging().is_some()
    }

    /// Confirmed gesture per tracked hand, in `HandId` order.
    pub fn hands(&self) -> Vec<(HandId, GestureKind)> {
        self.tracks
            .iter()
            .map(|(id, t)| (*id, t.stabilizer.confirmed()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// step
// ---------------------------------------------------------------------------

/// Advance the engine by one frame.
///
/// Pure with respect to the outside world: the only effects are the returned
/// state and commands.
pub fn step(
    mut state: EngineState,
    config: &AppConfig,
    frame: &Frame,
) -> (EngineState, Vec<ActionCommand>) {
    let now = frame.timestamp();
    state.frame_index += 1;
    state.last_timestamp = now;

    let hands = ingest(&state, config, frame);

    let mut commands = Vec::new();
    let mut events = Vec::new();
    let mut thumbs_up = false;
    let mut open_hands = 0usize;

    for (id, obs) in &hands {
        let features = extract_features(obs, &config.features);
        let raw = classify(&features, &config.features);
        if features.valid && features.extended_count() >= config.pause.two_hand_min_fingers {
            open_hands += 1;
        }

        let track = state
            .tracks
            .entry(*id)
            .or_insert_with(|| HandTrack::new(config));
        track.missing = 0;

        let emission = track
            .stabilizer
            .push(raw, |g| config.bindings.is_continuous(g));
        let confirmed = track.stabilizer.confirmed();

        // An unusable frame keeps the window's verdict but carries no
        // position, so nothing pointer-driven may come out of it.
        let mode = if !features.valid {
            MotionMode::Idle
        } else if confirmed == GestureKind::Point {
            MotionMode::Swipe
        } else if config.bindings.for_gesture(confirmed) == Some(ActionBinding::Scroll) {
            MotionMode::Scroll
        } else {
            MotionMode::Idle
        };
        let motion = track
            .motion
            .update(now, mode, features.index_tip, &config.motion);

        if let Some(e) = emission.filter(|_| features.valid) {
            if e.onset {
                log::debug!("engine: {id} confirmed {} ({:.2})", e.kind, e.confidence);
            }
            if e.kind == GestureKind::ThumbsUp {
                thumbs_up = true;
            } else {
                // A fist's index tip folds under the palm; drag follows the palm.
                let pointer = if config.bindings.for_gesture(e.kind) == Some(ActionBinding::Drag) {
                    features.palm_center
                } else {
                    features.index_tip
                };
                events.push(DispatchEvent {
                    hand: *id,
                    pointer,
                    input: DispatchInput::Gesture(ConfirmedGesture {
                        hand: *id,
                        kind: e.kind,
                        confidence: e.confidence,
                        frame_index: state.frame_index,
                        timestamp: now,
                    }),
                });
            }
        }

        if let Some(m) = motion {
            let input = match m {
                MotionEvent::Swipe(direction) => DispatchInput::Swipe(direction),
                MotionEvent::Scroll { delta } => DispatchInput::Scroll { delta },
            };
            events.push(DispatchEvent {
                hand: *id,
                pointer: features.index_tip,
                input,
            });
        }
    }

    // Age out hands that were not seen this frame.
    let grace = config.stabilizer.grace_frames;
    state.tracks.retain(|id, track| {
        if hands.contains_key(id) {
            return true;
        }
        track.missing += 1;
        if track.missing > grace {
            log::debug!("engine: hand {id} lost");
            false
        } else {
            true
        }
    });

    let tracks = &state.tracks;
    if let Some(end) = state.dispatcher.retain_drag(|hand| {
        tracks.get(&hand).is_some_and(|t| {
            config.bindings.for_gesture(t.stabilizer.confirmed()) == Some(ActionBinding::Drag)
        })
    }) {
        commands.push(end);
    }

    if let Some(next) = state
        .pause
        .observe(now, thumbs_up, open_hands >= 2, &config.pause)
    {
        if next.is_paused() {
            commands.extend(state.dispatcher.release_drag());
        }
        commands.push(ActionCommand::TogglePause { state: next });
    }

    let pause = state.pause.state();
    commands.extend(state.dispatcher.dispatch(now, pause, events, config));

    (state, commands)
}

/// Apply mirroring, the confidence filter and the hand limit, and assign a
/// [`HandId`] to every surviving observation.
fn ingest(
    state: &EngineState,
    config: &AppConfig,
    frame: &Frame,
) -> BTreeMap<HandId, HandObservation> {
    let detection = &config.detection;

    let mut same_handed = [0u32; 2];
    let mut candidates: Vec<(HandId, HandObservation)> = frame
        .hands
        .iter()
        .map(|obs| {
            let slot = &mut same_handed[obs.handedness as usize];
            let track = obs.track_id.unwrap_or(*slot);
            *slot += 1;
            let obs = if detection.mirror_x {
                obs.clone().mirrored()
            } else {
                obs.clone()
            };
            (HandId::new(obs.handedness, track), obs)
        })
        .filter(|(id, obs)| {
            let min = if state.tracks.contains_key(id) {
                detection.min_tracking_confidence
            } else {
                detection.min_detection_confidence
            };
            obs.confidence >= min
        })
        .collect();

    candidates.sort_by(|a, b| b.1.confidence.total_cmp(&a.1.confidence));
    candidates.truncate(detection.max_hands);

    let mut hands = BTreeMap::new();
    for (id, obs) in candidates {
        hands.entry(id).or_insert(obs);
    }
    hands
}

// ---------------------------------------------------------------------------
// GestureEngine
// ---------------------------------------------------------------------------

/// Owns an [`EngineState`] and the configuration it runs with.
pub struct GestureEngine {
    config: AppConfig,
    state: EngineState,
}

impl GestureEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: EngineState::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn pause_state(&self) -> PauseState {
        self.state.pause_state()
    }

    /// Run one frame through the engine.
    pub fn process_frame(&mut self, frame: &Frame) -> Vec<ActionCommand> {
        let state = std::mem::take(&mut self.state);
        let (state, commands) = step(state, &self.config, frame);
        self.state = state;
        if !commands.is_empty() {
            log::debug!(
                "engine: frame {} -> {} command(s)",
                self.state.frame_index,
                commands.len()
            );
        }
        commands
    }

    /// End any drag session, returning `DragEnd` when the button was held.
    pub fn release_drag(&mut self) -> Vec<ActionCommand> {
        self.state.dispatcher.release_drag().into_iter().collect()
    }

    /// Toggle pause from outside the gesture stream (hotkey).  Uses the last
    /// frame's timestamp as "now".
    pub fn toggle_pause(&mut self) -> Vec<ActionCommand> {
        let now = self.state.last_timestamp;
        let next = self.state.pause.manual_toggle(now);
        let mut commands = Vec::new();
        if next.is_paused() {
            commands.extend(self.state.dispatcher.release_drag());
        }
        commands.push(ActionCommand::TogglePause { state: next });
        commands
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

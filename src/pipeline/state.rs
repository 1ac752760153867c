//! Processor phase and the shared status snapshot.
//!
//! [`EngineStatus`] is what a host overlay needs to draw: pause state, the
//! confirmed gesture per hand, and running counters.  [`SharedStatus`] is a
//! type alias for `Arc<Mutex<EngineStatus>>`, cheap to clone and safe to
//! share across threads.

use std::sync::{Arc, Mutex};

use crate::engine::{ActionCommand, EngineState, PauseState};
use crate::gesture::GestureKind;
use crate::landmarks::HandId;

// ---------------------------------------------------------------------------
// ProcessorPhase
// ---------------------------------------------------------------------------

/// Lifecycle of the frame processor.
///
/// ```text
/// Starting ──run()──▶ Running ──frames end / quit──▶ Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessorPhase {
    #[default]
    Starting,
    Running,
    Stopped,
}

impl ProcessorPhase {
    /// ```
    /// use gesture_control::pipeline::ProcessorPhase;
    ///
    /// assert!(!ProcessorPhase::Starting.is_running());
    /// assert!(ProcessorPhase::Running.is_running());
    /// assert!(!ProcessorPhase::Stopped.is_running());
    /// ```
    pub fn is_running(&self) -> bool {
        matches!(self, ProcessorPhase::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcessorPhase::Starting => "Starting",
            ProcessorPhase::Running => "Running",
            ProcessorPhase::Stopped => "Stopped",
        }
    }
}

// ---------------------------------------------------------------------------
// EngineStatus
// ---------------------------------------------------------------------------

/// Snapshot of the controller for display.  Updated once per frame.
#[derive(Debug, Clone, Default)]
pub struct EngineStatus {
    pub phase: ProcessorPhase,
    pub pause: PauseState,
    /// Confirmed gesture per tracked hand, in `HandId` order.
    pub hands: Vec<(HandId, GestureKind)>,
    /// Mouse button held by a drag.
    pub dragging: bool,
    pub frames_processed: u64,
    /// Frames the source could not decode.
    pub frames_rejected: u64,
    pub commands_executed: u64,
    pub actuation_failures: u64,
    pub last_command: Option<ActionCommand>,
    /// Most recent actuation or source error.
    pub last_error: Option<String>,
}

impl EngineStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the engine-derived fields from `state`.
    pub fn sync_engine(&mut self, state: &EngineState) {
        self.pause = state.pause_state();
        self.hands = state.hands();
        self.dragging = state.is_dragging();
        self.frames_processed = state.frame_index();
    }

    /// One-line summary for logs and terminal overlays.
    pub fn summary(&self) -> String {
        let hands = if self.hands.is_empty() {
            "no hands".to_string()
        } else {
            self.hands
                .iter()
                .map(|(id, g)| format!("{id}={g}"))
                .collect::<Vec<_>>()
                .join(" ")
        };
        format!(
            "[{}] {} | {} | frames {} | actions {} | failures {}",
            self.phase.label(),
            self.pause.label(),
            hands,
            self.frames_processed,
            self.commands_executed,
            self.actuation_failures
        )
    }
}

// ---------------------------------------------------------------------------
// SharedStatus
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`EngineStatus`].
///
/// Lock for a short critical section; do **not** hold the lock across
/// `.await` points.
pub type SharedStatus = Arc<Mutex<EngineStatus>>;

pub fn new_shared_status() -> SharedStatus {
    Arc::new(Mutex::new(EngineStatus::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

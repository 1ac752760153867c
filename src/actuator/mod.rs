//! OS input actuation.
//!
//! # Overview
//!
//! [`Actuator`] is the seam between the engine and the operating system.  It
//! is object-safe and `Send + Sync` so the frame processor can hold it behind
//! an `Arc<dyn Actuator>` and call it from tokio's blocking pool.
//!
//! * [`EnigoActuator`] drives the real mouse and keyboard through `enigo`.
//! * [`LogActuator`] only logs each command (dry runs, headless machines).
//! * `RecordingActuator` (available under `#[cfg(test)]`) records every
//!   command and can be told to fail.

pub mod desktop;

pub use desktop::EnigoActuator;

use thiserror::Error;

use crate::engine::ActionCommand;

// ---------------------------------------------------------------------------
// ActuatorError
// ---------------------------------------------------------------------------

/// Errors from the OS input layer.  Logged and counted by the caller, never
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActuatorError {
    /// The input backend could not be opened (no display, missing
    /// accessibility permission, ...).
    #[error("cannot open input backend: {0}")]
    Backend(String),

    /// The screen size could not be queried.
    #[error("cannot query display size: {0}")]
    Display(String),

    /// A mouse or key event was rejected.
    #[error("cannot deliver {action}: {message}")]
    Injection {
        action: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Actuator trait
// ---------------------------------------------------------------------------

/// Performs one [`ActionCommand`] against the operating system.
pub trait Actuator: Send + Sync {
    fn execute(&self, command: &ActionCommand) -> Result<(), ActuatorError>;
}

// ---------------------------------------------------------------------------
// LogActuator
// ---------------------------------------------------------------------------

/// Logs commands at `info` level instead of performing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogActuator;

impl Actuator for LogActuator {
    fn execute(&self, command: &ActionCommand) -> Result<(), ActuatorError> {
        log::info!("actuator (dry-run): {command:?}");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingActuator  (test-only)
// ---------------------------------------------------------------------------

/// A test double that records every command it receives.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingActuator {
    executed: std::sync::Mutex<Vec<ActionCommand>>,
    fail_with: Option<ActuatorError>,
}

#[cfg(test)]
impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records nothing and fails every call with `error`.
    pub fn failing(error: ActuatorError) -> Self {
        Self {
            executed: Default::default(),
            fail_with: Some(error),
        }
    }

    pub fn executed(&self) -> Vec<ActionCommand> {
        self.executed.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Actuator for RecordingActuator {
    fn execute(&self, command: &ActionCommand) -> Result<(), ActuatorError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.executed.lock().unwrap().push(*command);
        Ok(())
    }
}

//! Hand-gesture input controller.
//!
//! Turns per-frame hand landmarks into mouse and keyboard actions:
//!
//! ```text
//! landmarks ─▶ gesture (features, classify, stabilize, motion)
//!           ─▶ engine  (pause machine, dispatcher, smoothing)
//!           ─▶ actuator (enigo)
//! ```
//!
//! [`pipeline`] wires these together on a tokio runtime; [`hotkey`] adds
//! global pause and quit keys.

pub mod actuator;
pub mod config;
pub mod engine;
pub mod gesture;
pub mod hotkey;
pub mod landmarks;
pub mod pipeline;

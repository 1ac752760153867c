//! Frame pipeline: landmark source → gesture engine → OS actuator.
//!
//! # Architecture
//!
//! ```text
//! FrameSource (JSON lines, stdin or file)
//!        │ forward_frames()
//!        ▼
//! mpsc::Sender<Frame> ──▶ FrameProcessor::run()  ← async tokio task
//!                              │
//!  HotkeyEvent (mpsc) ─────────┤  biased: hotkeys before frames
//!                              │
//!                              ├─ GestureEngine::process_frame   [under lock]
//!                              └─ spawn_blocking(Actuator::execute × N)
//!
//! SharedStatus (Arc<Mutex<EngineStatus>>) ←── updated after every frame
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::{Arc, Mutex};
//! use tokio::sync::mpsc;
//! use gesture_control::actuator::LogActuator;
//! use gesture_control::config::AppConfig;
//! use gesture_control::engine::GestureEngine;
//! use gesture_control::landmarks::JsonLinesSource;
//! use gesture_control::pipeline::{forward_frames, new_shared_status, FrameProcessor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = Arc::new(Mutex::new(GestureEngine::new(AppConfig::default())));
//!     let status = new_shared_status();
//!
//!     let (frame_tx, frame_rx) = mpsc::channel(64);
//!     let (_hotkey_tx, hotkey_rx) = mpsc::channel(16);
//!
//!     let source = JsonLinesSource::new(tokio::io::BufReader::new(tokio::io::stdin()));
//!     tokio::spawn(forward_frames(source, frame_tx, status.clone()));
//!
//!     FrameProcessor::new(engine, Arc::new(LogActuator), status)
//!         .run(frame_rx, hotkey_rx)
//!         .await;
//! }
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{forward_frames, FrameProcessor, SharedEngine};
pub use state::{new_shared_status, EngineStatus, ProcessorPhase, SharedStatus};

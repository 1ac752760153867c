//! Frame processor: drives the gesture engine from async channels.
//!
//! [`FrameProcessor`] owns the engine and the actuator and responds to
//! [`Frame`]s and [`HotkeyEvent`]s received over `tokio::sync::mpsc`
//! channels.
//!
//! # Flow
//!
//! ```text
//! Frame
//!   └─▶ lock engine, process_frame, unlock        [one frame at a time]
//!         └─▶ spawn_blocking(actuator.execute × N) [in command order]
//!
//! HotkeyEvent::TogglePause
//!   └─▶ engine.toggle_pause → spawn_blocking(actuate)
//! HotkeyEvent::Quit
//!   └─▶ stop
//! ```
//!
//! OS input calls block, so they are pushed onto `spawn_blocking` and the
//! engine lock is never held while they run.  Actuator failures are logged
//! and counted; processing always continues with the next frame.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::actuator::{Actuator, ActuatorError};
use crate::engine::{ActionCommand, GestureEngine};
use crate::hotkey::HotkeyEvent;
use crate::landmarks::{Frame, FrameSource, SourceError};

use super::state::{ProcessorPhase, SharedStatus};

/// Engine handle shared between the processor and anything that wants to
/// inspect it between frames.
pub type SharedEngine = Arc<Mutex<GestureEngine>>;

// ---------------------------------------------------------------------------
// FrameProcessor
// ---------------------------------------------------------------------------

/// Drives the gesture engine.
///
/// Create with [`FrameProcessor::new`], then call [`run`](Self::run) inside a
/// tokio task.
///
/// ```rust,no_run
/// use std::sync::{Arc, Mutex};
/// use gesture_control::actuator::LogActuator;
/// use gesture_control::config::AppConfig;
/// use gesture_control::engine::GestureEngine;
/// use gesture_control::pipeline::{new_shared_status, FrameProcessor};
///
/// # async fn example() {
/// let engine = Arc::new(Mutex::new(GestureEngine::new(AppConfig::default())));
/// let processor = FrameProcessor::new(engine, Arc::new(LogActuator), new_shared_status());
///
/// let (frame_tx, frame_rx) = tokio::sync::mpsc::channel(64);
/// let (hotkey_tx, hotkey_rx) = tokio::sync::mpsc::channel(16);
/// processor.run(frame_rx, hotkey_rx).await;
/// # let _ = (frame_tx, hotkey_tx);
/// # }
/// ```
pub struct FrameProcessor {
    engine: SharedEngine,
    actuator: Arc<dyn Actuator>,
    status: SharedStatus,
}

impl FrameProcessor {
    pub fn new(engine: SharedEngine, actuator: Arc<dyn Actuator>, status: SharedStatus) -> Self {
        Self {
            engine,
            actuator,
            status,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until the frame channel closes or a quit hotkey arrives.
    ///
    /// Hotkeys are checked before frames on every turn so a quit is never
    /// stuck behind a backlog of frames.  A closed hotkey channel is not an
    /// error; frames keep flowing.
    pub async fn run(
        self,
        mut frames_rx: mpsc::Receiver<Frame>,
        mut hotkey_rx: mpsc::Receiver<HotkeyEvent>,
    ) {
        self.set_phase(ProcessorPhase::Running);
        let mut hotkeys_open = true;

        loop {
            tokio::select! {
                biased;

                hotkey = hotkey_rx.recv(), if hotkeys_open => match hotkey {
                    Some(HotkeyEvent::TogglePause) => {
                        let commands = self.with_engine(|engine| engine.toggle_pause());
                        self.actuate(commands).await;
                    }
                    Some(HotkeyEvent::Quit) => {
                        log::info!("pipeline: quit hotkey");
                        break;
                    }
                    None => {
                        log::debug!("pipeline: hotkey channel closed");
                        hotkeys_open = false;
                    }
                },

                frame = frames_rx.recv() => match frame {
                    Some(frame) => self.handle_frame(&frame).await,
                    None => {
                        log::info!("pipeline: frame channel closed, processor shutting down");
                        break;
                    }
                },
            }
        }

        self.release().await;
        self.set_phase(ProcessorPhase::Stopped);
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    async fn handle_frame(&self, frame: &Frame) {
        let commands = self.with_engine(|engine| engine.process_frame(frame));
        self.actuate(commands).await;
    }

    /// Run `f` with the engine locked and mirror the engine state into the
    /// status snapshot.  The lock is released before returning.
    fn with_engine(&self, f: impl FnOnce(&mut GestureEngine) -> Vec<ActionCommand>) -> Vec<ActionCommand> {
        let mut engine = match self.engine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("pipeline: engine lock poisoned, continuing");
                poisoned.into_inner()
            }
        };
        let commands = f(&mut *engine);
        if let Ok(mut st) = self.status.lock() {
            st.sync_engine(engine.state());
        }
        commands
    }

    /// Execute `commands` in order on the blocking pool and record outcomes.
    async fn actuate(&self, commands: Vec<ActionCommand>) {
        if commands.is_empty() {
            return;
        }
        let actuator = Arc::clone(&self.actuator);
        let joined = tokio::task::spawn_blocking(move || {
            commands
                .into_iter()
                .map(|c| {
                    let result = actuator.execute(&c);
                    (c, result)
                })
                .collect::<Vec<_>>()
        })
        .await;

        match joined {
            Ok(results) => results.into_iter().for_each(|(c, r)| self.record(c, r)),
            Err(e) => {
                log::warn!("pipeline: actuation task panicked: {e}");
                if let Ok(mut st) = self.status.lock() {
                    st.actuation_failures += 1;
                    st.last_error = Some(e.to_string());
                }
            }
        }
    }

    fn record(&self, command: ActionCommand, result: Result<(), ActuatorError>) {
        let Ok(mut st) = self.status.lock() else {
            return;
        };
        match result {
            Ok(()) => {
                st.commands_executed += 1;
                st.last_command = Some(command);
            }
            Err(e) => {
                log::warn!("pipeline: {} failed: {e}", command.kind().label());
                st.actuation_failures += 1;
                st.last_error = Some(e.to_string());
            }
        }
    }

    /// Let go of a held mouse button before exiting.
    async fn release(&self) {
        let commands = self.with_engine(|engine| engine.release_drag());
        self.actuate(commands).await;
    }

    fn set_phase(&self, phase: ProcessorPhase) {
        if let Ok(mut st) = self.status.lock() {
            st.phase = phase;
        }
    }
}

// ---------------------------------------------------------------------------
// forward_frames
// ---------------------------------------------------------------------------

/// Pull frames from `source` into `tx` until the source ends or the receiver
/// goes away.  Malformed frames are logged, counted in `status` and skipped;
/// an I/O error ends forwarding.
///
/// Returns the number of frames forwarded.
pub async fn forward_frames<S: FrameSource>(
    mut source: S,
    tx: mpsc::Sender<Frame>,
    status: SharedStatus,
) -> Result<u64, SourceError> {
    let mut forwarded = 0u64;
    loop {
        match source.next_frame().await {
            Ok(Some(frame)) => {
                if tx.send(frame).await.is_err() {
                    log::debug!("pipeline: processor gone, stop reading frames");
                    break;
                }
                forwarded += 1;
            }
            Ok(None) => break,
            Err(SourceError::Parse { line, message }) => {
                log::warn!("pipeline: skipping malformed frame on line {line}: {message}");
                if let Ok(mut st) = status.lock() {
                    st.frames_rejected += 1;
                    st.last_error = Some(message);
                }
            }
            Err(e) => return Err(e),
        }
    }
    Ok(forwarded)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::RecordingActuator;
    use crate::config::AppConfig;
    use crate::engine::PauseState;
    use crate::landmarks::fixtures;
    use crate::landmarks::{HandObservation, Handedness::Right, JsonLinesSource};
    use crate::pipeline::state::new_shared_status;

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn make_processor(
        actuator: Arc<RecordingActuator>,
    ) -> (FrameProcessor, SharedEngine, SharedStatus) {
        let engine = Arc::new(Mutex::new(GestureEngine::new(AppConfig::default())));
        let status = new_shared_status();
        let processor = FrameProcessor::new(Arc::clone(&engine), actuator, Arc::clone(&status));
        (processor, engine, status)
    }

    fn count_drag_ends(commands: &[ActionCommand]) -> usize {
        commands.iter().filter(|c| **c == ActionCommand::DragEnd).count()
    }

    fn frames(n: u64, hand: impl Fn() -> HandObservation) -> Vec<Frame> {
        (0..n).map(|i| Frame::new(i * 33, vec![hand()])).collect()
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn victory_frames_double_click_once() {
        let actuator = Arc::new(RecordingActuator::new());
        let (processor, _engine, status) = make_processor(Arc::clone(&actuator));
        let (frame_tx, frame_rx) = mpsc::channel(16);
        let (_hotkey_tx, hotkey_rx) = mpsc::channel(4);

        for f in frames(5, || fixtures::victory(Right)) {
            frame_tx.send(f).await.unwrap();
        }
        drop(frame_tx);

        processor.run(frame_rx, hotkey_rx).await;

        assert_eq!(actuator.executed(), vec![ActionCommand::DoubleClick]);
        let st = status.lock().unwrap();
        assert_eq!(st.phase, ProcessorPhase::Stopped);
        assert_eq!(st.frames_processed, 5);
        assert_eq!(st.commands_executed, 1);
        assert_eq!(st.last_command, Some(ActionCommand::DoubleClick));
    }

    #[tokio::test]
    async fn pause_hotkey_toggles_and_is_actuated() {
        let actuator = Arc::new(RecordingActuator::new());
        let (processor, engine, status) = make_processor(Arc::clone(&actuator));
        let (frame_tx, frame_rx) = mpsc::channel(16);
        let (hotkey_tx, hotkey_rx) = mpsc::channel(4);

        hotkey_tx.send(HotkeyEvent::TogglePause).await.unwrap();
        drop(hotkey_tx);
        // Biased select drains the hotkey before any frame.
        for f in frames(5, || fixtures::victory(Right)) {
            frame_tx.send(f).await.unwrap();
        }
        drop(frame_tx);

        processor.run(frame_rx, hotkey_rx).await;

        assert_eq!(
            actuator.executed(),
            vec![ActionCommand::TogglePause {
                state: PauseState::RegularPaused
            }]
        );
        assert_eq!(engine.lock().unwrap().pause_state(), PauseState::RegularPaused);
        assert_eq!(status.lock().unwrap().pause, PauseState::RegularPaused);
    }

    #[tokio::test]
    async fn quit_hotkey_stops_processing() {
        let actuator = Arc::new(RecordingActuator::new());
        let (processor, _engine, status) = make_processor(Arc::clone(&actuator));
        let (frame_tx, frame_rx) = mpsc::channel(16);
        let (hotkey_tx, hotkey_rx) = mpsc::channel(4);

        hotkey_tx.send(HotkeyEvent::Quit).await.unwrap();
        for f in frames(5, || fixtures::victory(Right)) {
            frame_tx.send(f).await.unwrap();
        }

        // Both senders are still alive: only the quit can end the loop.
        processor.run(frame_rx, hotkey_rx).await;

        assert!(actuator.executed().is_empty());
        assert_eq!(status.lock().unwrap().phase, ProcessorPhase::Stopped);
        drop((frame_tx, hotkey_tx));
    }

    #[tokio::test]
    async fn actuator_failure_is_counted_not_fatal() {
        let actuator = Arc::new(RecordingActuator::failing(ActuatorError::Backend(
            "no display".into(),
        )));
        let (processor, _engine, status) = make_processor(actuator);
        let (frame_tx, frame_rx) = mpsc::channel(32);
        let (_hotkey_tx, hotkey_rx) = mpsc::channel(4);

        let mut all = frames(5, || fixtures::victory(Right));
        all.extend(
            frames(5, || fixtures::pinch(Right))
                .into_iter()
                .map(|f| Frame::new(f.timestamp_ms + 1_000, f.hands)),
        );
        for f in all {
            frame_tx.send(f).await.unwrap();
        }
        drop(frame_tx);

        processor.run(frame_rx, hotkey_rx).await;

        let st = status.lock().unwrap();
        assert_eq!(st.frames_processed, 10);
        assert_eq!(st.actuation_failures, 2);
        assert_eq!(st.commands_executed, 0);
        assert_eq!(
            st.last_error.as_deref(),
            Some("cannot open input backend: no display")
        );
    }

    #[tokio::test]
    async fn drag_is_released_on_shutdown() {
        let actuator = Arc::new(RecordingActuator::new());
        let (processor, engine, status) = make_processor(Arc::clone(&actuator));
        let (frame_tx, frame_rx) = mpsc::channel(32);
        let (_hotkey_tx, hotkey_rx) = mpsc::channel(4);

        for f in frames(15, || fixtures::fist(Right)) {
            frame_tx.send(f).await.unwrap();
        }
        drop(frame_tx);

        processor.run(frame_rx, hotkey_rx).await;

        let executed = actuator.executed();
        assert!(matches!(executed.first(), Some(ActionCommand::DragStart { .. })));
        assert_eq!(executed.last(), Some(&ActionCommand::DragEnd));
        assert_eq!(count_drag_ends(&executed), 1);
        assert!(!engine.lock().unwrap().state().is_dragging());
        assert!(!status.lock().unwrap().dragging);
    }

    #[tokio::test]
    async fn forward_frames_skips_malformed_lines() {
        let input: &'static [u8] =
            b"{\"timestamp_ms\": 0}\nnot json\n# comment\n{\"timestamp_ms\": 33, \"hands\": []}\n";
        let source = JsonLinesSource::new(tokio::io::BufReader::new(input));
        let status = new_shared_status();
        let (tx, mut rx) = mpsc::channel(8);

        let forwarded = forward_frames(source, tx, Arc::clone(&status)).await.unwrap();

        assert_eq!(forwarded, 2);
        assert_eq!(rx.recv().await.map(|f| f.timestamp_ms), Some(0));
        assert_eq!(rx.recv().await.map(|f| f.timestamp_ms), Some(33));
        assert_eq!(status.lock().unwrap().frames_rejected, 1);
    }

    #[tokio::test]
    async fn forward_frames_stops_when_receiver_dropped() {
        let input: &'static [u8] = b"{\"timestamp_ms\": 0}\n{\"timestamp_ms\": 33}\n";
        let source = JsonLinesSource::new(tokio::io::BufReader::new(input));
        let (tx, rx) = mpsc::channel(8);
        drop(rx);

        let forwarded = forward_frames(source, tx, new_shared_status()).await.unwrap();
        assert_eq!(forwarded, 0);
    }
}

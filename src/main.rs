//! Application entry point: hand-gesture input controller.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] (defaults on first run) and validate it.
//! 3. Resolve the hotkey bindings.
//! 4. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Spawn the hotkey listener thread.
//! 6. Spawn the frame reader (`input.frames_path` or stdin).
//! 7. Run the [`FrameProcessor`] until frames end or the quit key is pressed.
//!
//! # Usage
//!
//! ```text
//! gesture-control [--config <settings.toml>] [--frames <frames.jsonl>] [--dry-run]
//! ```
//!
//! `--dry-run` logs actions instead of moving the real mouse.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use gesture_control::{
    actuator::{Actuator, EnigoActuator, LogActuator},
    config::AppConfig,
    engine::GestureEngine,
    hotkey::{HotkeyBindings, HotkeyEvent, HotkeyListener},
    landmarks::JsonLinesSource,
    pipeline::{forward_frames, new_shared_status, FrameProcessor, SharedStatus},
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Default)]
#[command(name = "gesture-control", about = "Hand-gesture mouse and keyboard control")]
struct CliArgs {
    /// Settings file to load instead of the per-user one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON-lines landmark frames; stdin when omitted
    #[arg(long, value_name = "PATH")]
    frames: Option<PathBuf>,

    /// Log actions instead of performing them
    #[arg(long)]
    dry_run: bool,
}

fn load_config(cli: &CliArgs) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            if AppConfig::is_first_run() {
                let config = AppConfig::default();
                match config.save() {
                    Ok(()) => log::info!("Wrote default settings"),
                    Err(e) => log::warn!("Could not write default settings: {e}"),
                }
                config
            } else {
                AppConfig::load().unwrap_or_else(|e| {
                    log::warn!("Failed to load config ({e}); using defaults");
                    AppConfig::default()
                })
            }
        }
    };
    if cli.frames.is_some() {
        config.input.frames_path = cli.frames.clone();
    }
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Spawn the frame reader for `path`, or stdin when `None`.
async fn spawn_reader(
    path: Option<PathBuf>,
    tx: mpsc::Sender<gesture_control::landmarks::Frame>,
    status: SharedStatus,
) -> Result<()> {
    let reader = match path {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("opening frames file {}", path.display()))?;
            log::info!("Reading frames from {}", path.display());
            let source = JsonLinesSource::new(BufReader::new(file));
            tokio::spawn(forward_frames(source, tx, status))
        }
        None => {
            log::info!("Reading frames from stdin");
            let source = JsonLinesSource::new(BufReader::new(tokio::io::stdin()));
            tokio::spawn(forward_frames(source, tx, status))
        }
    };

    tokio::spawn(async move {
        match reader.await {
            Ok(Ok(n)) => log::info!("Frame source finished after {n} frame(s)"),
            Ok(Err(e)) => log::error!("Frame source failed: {e}"),
            Err(e) => log::error!("Frame reader task panicked: {e}"),
        }
    });
    Ok(())
}

/// Log the status line at debug level every few seconds.
fn spawn_status_log(status: SharedStatus) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(5));
        loop {
            tick.tick().await;
            let Ok(st) = status.lock() else { break };
            log::debug!("{}", st.summary());
            if st.phase == gesture_control::pipeline::ProcessorPhase::Stopped {
                break;
            }
        }
    });
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Gesture control starting up");

    // 2. Configuration (invalid settings are fatal)
    let cli = CliArgs::parse();
    let config = load_config(&cli)?;

    // 3. Hotkeys
    let bindings = HotkeyBindings::from_config(&config.hotkey)?;

    // 4. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let (frame_tx, frame_rx) = mpsc::channel(64);
    let (hotkey_tx, hotkey_rx) = mpsc::channel::<HotkeyEvent>(16);

    // 5. Hotkey listener thread (optional: the controller works without it)
    let _hotkey_listener = match HotkeyListener::start(bindings, hotkey_tx) {
        Ok(listener) => {
            log::info!(
                "Hotkeys: {} toggles pause, {} quits",
                config.hotkey.pause_key,
                config.hotkey.quit_key
            );
            Some(listener)
        }
        Err(e) => {
            log::warn!("Hotkey listener unavailable: {e}");
            None
        }
    };

    let actuator: Arc<dyn Actuator> = if cli.dry_run {
        log::info!("Dry run: actions are logged, not performed");
        Arc::new(LogActuator)
    } else {
        Arc::new(EnigoActuator::new())
    };

    let status = new_shared_status();
    let frames_path = config.input.frames_path.clone();
    let engine = Arc::new(Mutex::new(GestureEngine::new(config)));
    let processor = FrameProcessor::new(engine, actuator, Arc::clone(&status));

    // 6 + 7. Reader and processor
    rt.block_on(async {
        spawn_reader(frames_path, frame_tx, Arc::clone(&status)).await?;
        spawn_status_log(Arc::clone(&status));
        processor.run(frame_rx, hotkey_rx).await;
        anyhow::Ok(())
    })?;

    if let Ok(st) = status.lock() {
        log::info!("{}", st.summary());
    }

    // A stdin read may still be parked on the blocking pool.
    rt.shutdown_timeout(Duration::from_millis(500));
    Ok(())
}

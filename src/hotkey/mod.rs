//! Global keyboard shortcuts for pausing and quitting, backed by `rdev`.
//!
//! # Design
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive.  It must run on a **dedicated OS thread** and cannot be
//! used inside a tokio task.
//!
//! [`HotkeyListener::start`] spawns that dedicated thread and returns a
//! handle.  Dropping the handle sets a stop flag so the callback silently
//! discards further events.
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use gesture_control::config::HotkeyConfig;
//! use gesture_control::hotkey::{HotkeyBindings, HotkeyListener};
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let bindings = HotkeyBindings::from_config(&HotkeyConfig::default()).expect("unknown key");
//! let _listener = HotkeyListener::start(bindings, tx);
//!
//! // In your async loop:
//! // while let Some(ev) = rx.recv().await { ... }
//! ```

pub mod listener;

pub use listener::HotkeyListener;

use thiserror::Error;

use crate::config::HotkeyConfig;

// ---------------------------------------------------------------------------
// HotkeyEvent
// ---------------------------------------------------------------------------

/// Events emitted by the hotkey listener thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// Flip between active and paused, ignoring the gesture cooldown.
    TogglePause,
    /// Stop the controller.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotkeyError {
    #[error("unknown key name {name:?} for hotkey.{field}")]
    UnknownKey { field: &'static str, name: String },

    #[error("hotkey.pause_key and hotkey.quit_key are both {0:?}")]
    Conflict(String),
}

// ---------------------------------------------------------------------------
// HotkeyBindings
// ---------------------------------------------------------------------------

/// Resolved keys for each [`HotkeyEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotkeyBindings {
    pub pause: rdev::Key,
    pub quit: rdev::Key,
}

impl HotkeyBindings {
    pub fn from_config(config: &HotkeyConfig) -> Result<Self, HotkeyError> {
        let resolve = |field: &'static str, name: &str| {
            parse_key(name).ok_or_else(|| HotkeyError::UnknownKey {
                field,
                name: name.to_string(),
            })
        };
        let pause = resolve("pause_key", &config.pause_key)?;
        let quit = resolve("quit_key", &config.quit_key)?;
        if pause == quit {
            return Err(HotkeyError::Conflict(config.pause_key.clone()));
        }
        Ok(Self { pause, quit })
    }

    fn event_for(&self, key: rdev::Key) -> Option<HotkeyEvent> {
        if key == self.pause {
            Some(HotkeyEvent::TogglePause)
        } else if key == self.quit {
            Some(HotkeyEvent::Quit)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// KeyLatch
// ---------------------------------------------------------------------------

/// Turns raw key press/release events into one [`HotkeyEvent`] per physical
/// press.  OS auto-repeat delivers a stream of presses while a key is held;
/// only the first one counts.
#[derive(Debug)]
pub struct KeyLatch {
    bindings: HotkeyBindings,
    held: Vec<rdev::Key>,
}

impl KeyLatch {
    pub fn new(bindings: HotkeyBindings) -> Self {
        Self {
            bindings,
            held: Vec::new(),
        }
    }

    pub fn feed(&mut self, event: &rdev::EventType) -> Option<HotkeyEvent> {
        match *event {
            rdev::EventType::KeyPress(key) => {
                let hotkey = self.bindings.event_for(key)?;
                if self.held.contains(&key) {
                    return None;
                }
                self.held.push(key);
                Some(hotkey)
            }
            rdev::EventType::KeyRelease(key) => {
                self.held.retain(|k| *k != key);
                None
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

const NAMED_KEYS: &[(&str, rdev::Key)] = &[
    ("F1", rdev::Key::F1),
    ("F2", rdev::Key::F2),
    ("F3", rdev::Key::F3),
    ("F4", rdev::Key::F4),
    ("F5", rdev::Key::F5),
    ("F6", rdev::Key::F6),
    ("F7", rdev::Key::F7),
    ("F8", rdev::Key::F8),
    ("F9", rdev::Key::F9),
    ("F10", rdev::Key::F10),
    ("F11", rdev::Key::F11),
    ("F12", rdev::Key::F12),
    ("Escape", rdev::Key::Escape),
    ("Esc", rdev::Key::Escape),
    ("Space", rdev::Key::Space),
    ("Pause", rdev::Key::Pause),
    ("ScrollLock", rdev::Key::ScrollLock),
    ("PrintScreen", rdev::Key::PrintScreen),
    ("Insert", rdev::Key::Insert),
    ("Home", rdev::Key::Home),
    ("End", rdev::Key::End),
    ("PageUp", rdev::Key::PageUp),
    ("PageDown", rdev::Key::PageDown),
];

const LETTER_KEYS: [rdev::Key; 26] = [
    rdev::Key::KeyA,
    rdev::Key::KeyB,
    rdev::Key::KeyC,
    rdev::Key::KeyD,
    rdev::Key::KeyE,
    rdev::Key::KeyF,
    rdev::Key::KeyG,
    rdev::Key::KeyH,
    rdev::Key::KeyI,
    rdev::Key::KeyJ,
    rdev::Key::KeyK,
    rdev::Key::KeyL,
    rdev::Key::KeyM,
    rdev::Key::KeyN,
    rdev::Key::KeyO,
    rdev::Key::KeyP,
    rdev::Key::KeyQ,
    rdev::Key::KeyR,
    rdev::Key::KeyS,
    rdev::Key::KeyT,
    rdev::Key::KeyU,
    rdev::Key::KeyV,
    rdev::Key::KeyW,
    rdev::Key::KeyX,
    rdev::Key::KeyY,
    rdev::Key::KeyZ,
];

/// Parse a hotkey name from a config string into an [`rdev::Key`].
///
/// Accepts F1–F12, a handful of keys that are rarely used for typing, and
/// single ASCII letters.  Names are case-insensitive.
///
/// ```
/// use gesture_control::hotkey::parse_key;
///
/// assert_eq!(parse_key("F8"),     Some(rdev::Key::F8));
/// assert_eq!(parse_key("pause"),  Some(rdev::Key::Pause));
/// assert_eq!(parse_key("q"),      Some(rdev::Key::KeyQ));
/// assert_eq!(parse_key("Ctrl+Q"), None);
/// ```
pub fn parse_key(name: &str) -> Option<rdev::Key> {
    let name = name.trim();
    if let Some((_, key)) = NAMED_KEYS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
    {
        return Some(*key);
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize;
            Some(LETTER_KEYS[idx])
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

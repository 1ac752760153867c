//! Action commands: the engine's output vocabulary.
//!
//! An [`ActionCommand`] is built by the dispatcher, handed to an
//! [`Actuator`](crate::actuator::Actuator) and discarded.  [`ActionKind`]
//! is the payload-free tag used for cooldown bookkeeping, and
//! [`ActionBinding`] is what a gesture can be bound to in the config.

use serde::{Deserialize, Serialize};

use super::pause::PauseState;

// ---------------------------------------------------------------------------
// KeyCombo
// ---------------------------------------------------------------------------

/// Keyboard shortcuts a gesture can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCombo {
    Copy,
    Paste,
    Undo,
    Redo,
    VolumeUp,
    VolumeDown,
}

impl KeyCombo {
    pub fn label(&self) -> &'static str {
        match self {
            KeyCombo::Copy => "copy",
            KeyCombo::Paste => "paste",
            KeyCombo::Undo => "undo",
            KeyCombo::Redo => "redo",
            KeyCombo::VolumeUp => "volume_up",
            KeyCombo::VolumeDown => "volume_down",
        }
    }
}

// ---------------------------------------------------------------------------
// ActionCommand
// ---------------------------------------------------------------------------

/// One side effect for the actuator to perform.
///
/// Cursor coordinates are normalised screen coordinates in `[0, 1]`; the
/// actuator scales them to the display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionCommand {
    MoveCursor { x: f32, y: f32 },
    Click,
    DoubleClick,
    RightClick,
    /// Positive scrolls down.
    ScrollBy { delta: i32 },
    DragStart { x: f32, y: f32 },
    DragMove { x: f32, y: f32 },
    DragEnd,
    KeyCombo { combo: KeyCombo },
    NavigateBack,
    NavigateForward,
    /// The pause state changed; `state` is the new state.
    TogglePause { state: PauseState },
}

impl ActionCommand {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionCommand::MoveCursor { .. } => ActionKind::MoveCursor,
            ActionCommand::Click => ActionKind::Click,
            ActionCommand::DoubleClick => ActionKind::DoubleClick,
            ActionCommand::RightClick => ActionKind::RightClick,
            ActionCommand::ScrollBy { .. } => ActionKind::ScrollBy,
            ActionCommand::DragStart { .. } => ActionKind::DragStart,
            ActionCommand::DragMove { .. } => ActionKind::DragMove,
            ActionCommand::DragEnd => ActionKind::DragEnd,
            ActionCommand::KeyCombo { .. } => ActionKind::KeyCombo,
            ActionCommand::NavigateBack => ActionKind::NavigateBack,
            ActionCommand::NavigateForward => ActionKind::NavigateForward,
            ActionCommand::TogglePause { .. } => ActionKind::TogglePause,
        }
    }
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// Payload-free action tag; the key of the cooldown table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    MoveCursor,
    Click,
    DoubleClick,
    RightClick,
    ScrollBy,
    DragStart,
    DragMove,
    DragEnd,
    KeyCombo,
    NavigateBack,
    NavigateForward,
    TogglePause,
}

impl ActionKind {
    /// Continuous kinds run every frame and never have a cooldown.
    pub fn is_continuous(&self) -> bool {
        matches!(
            self,
            ActionKind::MoveCursor
                | ActionKind::ScrollBy
                | ActionKind::DragStart
                | ActionKind::DragMove
                | ActionKind::DragEnd
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::MoveCursor => "move-cursor",
            ActionKind::Click => "click",
            ActionKind::DoubleClick => "double-click",
            ActionKind::RightClick => "right-click",
            ActionKind::ScrollBy => "scroll",
            ActionKind::DragStart => "drag-start",
            ActionKind::DragMove => "drag-move",
            ActionKind::DragEnd => "drag-end",
            ActionKind::KeyCombo => "key-combo",
            ActionKind::NavigateBack => "navigate-back",
            ActionKind::NavigateForward => "navigate-forward",
            ActionKind::TogglePause => "toggle-pause",
        }
    }
}

// ---------------------------------------------------------------------------
// ActionBinding
// ---------------------------------------------------------------------------

/// What a gesture or swipe is bound to in `[bindings]`.
///
/// In TOML, unit variants are plain strings and `key_combo` is an inline
/// table:
///
/// ```toml
/// [bindings]
/// victory = { key_combo = "copy" }
/// palm = "disabled"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionBinding {
    MoveCursor,
    Click,
    DoubleClick,
    RightClick,
    Scroll,
    Drag,
    NavigateBack,
    NavigateForward,
    KeyCombo(KeyCombo),
    Disabled,
}

impl ActionBinding {
    /// Bindings whose gesture keeps re-emitting every frame while held.
    pub fn is_continuous(&self) -> bool {
        matches!(
            self,
            ActionBinding::MoveCursor | ActionBinding::Scroll | ActionBinding::Drag
        )
    }

    /// The one-shot command for discrete bindings; `None` for continuous or
    /// disabled ones, which the dispatcher handles itself.
    pub fn one_shot(&self) -> Option<ActionCommand> {
        match self {
            ActionBinding::Click => Some(ActionCommand::Click),
            ActionBinding::DoubleClick => Some(ActionCommand::DoubleClick),
            ActionBinding::RightClick => Some(ActionCommand::RightClick),
            ActionBinding::NavigateBack => Some(ActionCommand::NavigateBack),
            ActionBinding::NavigateForward => Some(ActionCommand::NavigateForward),
            ActionBinding::KeyCombo(combo) => Some(ActionCommand::KeyCombo { combo: *combo }),
            ActionBinding::MoveCursor
            | ActionBinding::Scroll
            | ActionBinding::Drag
            | ActionBinding::Disabled => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_kinds() {
        assert!(ActionKind::MoveCursor.is_continuous());
        assert!(ActionKind::ScrollBy.is_continuous());
        assert!(ActionKind::DragMove.is_continuous());
        assert!(!ActionKind::Click.is_continuous());
        assert!(!ActionKind::NavigateForward.is_continuous());
    }

    #[test]
    fn command_kind_matches_variant() {
        assert_eq!(
            ActionCommand::MoveCursor { x: 0.1, y: 0.2 }.kind(),
            ActionKind::MoveCursor
        );
        assert_eq!(
            ActionCommand::KeyCombo {
                combo: KeyCombo::Paste
            }
            .kind(),
            ActionKind::KeyCombo
        );
        assert_eq!(
            ActionCommand::TogglePause {
                state: PauseState::HarshPaused
            }
            .kind(),
            ActionKind::TogglePause
        );
    }

    #[test]
    fn one_shot_only_for_discrete_bindings() {
        assert_eq!(ActionBinding::Click.one_shot(), Some(ActionCommand::Click));
        assert_eq!(
            ActionBinding::KeyCombo(KeyCombo::Undo).one_shot(),
            Some(ActionCommand::KeyCombo {
                combo: KeyCombo::Undo
            })
        );
        assert_eq!(ActionBinding::MoveCursor.one_shot(), None);
        assert_eq!(ActionBinding::Drag.one_shot(), None);
        assert_eq!(ActionBinding::Disabled.one_shot(), None);
    }
}

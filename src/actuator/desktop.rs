//! Mouse and keyboard simulation backed by the `enigo` crate.
//!
//! | Command            | Windows / Linux      | macOS          |
//! |--------------------|----------------------|----------------|
//! | `NavigateBack`     | Alt+Left             | ⌘[             |
//! | `NavigateForward`  | Alt+Right            | ⌘]             |
//! | `KeyCombo` copy    | Ctrl+C               | ⌘C             |
//! | `KeyCombo` paste   | Ctrl+V               | ⌘V             |
//! | `KeyCombo` undo    | Ctrl+Z               | ⌘Z             |
//! | `KeyCombo` redo    | Ctrl+Y               | ⌘⇧Z            |
//! | `KeyCombo` volume  | Volume Up / Down     | Volume Up / Down |
//!
//! Cursor commands carry normalised coordinates; they are scaled to the main
//! display's pixel size on every call.

use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

use super::{Actuator, ActuatorError};
use crate::engine::{ActionCommand, KeyCombo};

#[cfg(target_os = "macos")]
const COMMAND_KEY: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const COMMAND_KEY: Key = Key::Control;

/// Production [`Actuator`].
///
/// A new [`Enigo`] instance is created for each command because `Enigo` is
/// not `Send` and the handle is cheap to construct.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoActuator;

impl EnigoActuator {
    pub fn new() -> Self {
        Self
    }
}

impl Actuator for EnigoActuator {
    fn execute(&self, command: &ActionCommand) -> Result<(), ActuatorError> {
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| ActuatorError::Backend(e.to_string()))?;
        let action = command.kind().label();
        let fail = |e: enigo::InputError| ActuatorError::Injection {
            action,
            message: e.to_string(),
        };

        match *command {
            ActionCommand::MoveCursor { x, y } | ActionCommand::DragMove { x, y } => {
                move_to(&mut enigo, x, y)?;
            }
            ActionCommand::Click => enigo.button(Button::Left, Direction::Click).map_err(fail)?,
            ActionCommand::DoubleClick => {
                enigo.button(Button::Left, Direction::Click).map_err(fail)?;
                enigo.button(Button::Left, Direction::Click).map_err(fail)?;
            }
            ActionCommand::RightClick => {
                enigo.button(Button::Right, Direction::Click).map_err(fail)?
            }
            ActionCommand::ScrollBy { delta } => {
                enigo.scroll(delta, Axis::Vertical).map_err(fail)?
            }
            ActionCommand::DragStart { x, y } => {
                move_to(&mut enigo, x, y)?;
                enigo.button(Button::Left, Direction::Press).map_err(fail)?;
            }
            ActionCommand::DragEnd => enigo.button(Button::Left, Direction::Release).map_err(fail)?,
            ActionCommand::KeyCombo { combo } => {
                let (modifiers, key) = combo_keys(combo);
                chord(&mut enigo, modifiers, key).map_err(fail)?;
            }
            ActionCommand::NavigateBack => {
                navigate(&mut enigo, false).map_err(fail)?;
            }
            ActionCommand::NavigateForward => {
                navigate(&mut enigo, true).map_err(fail)?;
            }
            ActionCommand::TogglePause { state } => {
                log::info!("actuator: gesture control {}", state.label());
            }
        }
        Ok(())
    }
}

/// Move the pointer to normalised `(x, y)` on the main display.
fn move_to(enigo: &mut Enigo, x: f32, y: f32) -> Result<(), ActuatorError> {
    let (width, height) = enigo
        .main_display()
        .map_err(|e| ActuatorError::Display(e.to_string()))?;
    let (px, py) = to_pixels(x, y, width, height);
    enigo
        .move_mouse(px, py, Coordinate::Abs)
        .map_err(|e| ActuatorError::Injection {
            action: "move-cursor",
            message: e.to_string(),
        })
}

/// Scale normalised coordinates to pixels, keeping the result on screen.
fn to_pixels(x: f32, y: f32, width: i32, height: i32) -> (i32, i32) {
    let scale = |v: f32, size: i32| {
        let max = (size - 1).max(0);
        ((v.clamp(0.0, 1.0) * max as f32).round() as i32).clamp(0, max)
    };
    (scale(x, width), scale(y, height))
}

/// `(modifiers, key)` for a combo.  Media keys are sent bare.
fn combo_keys(combo: KeyCombo) -> (&'static [Key], Key) {
    match combo {
        KeyCombo::Copy => (&[COMMAND_KEY], Key::Unicode('c')),
        KeyCombo::Paste => (&[COMMAND_KEY], Key::Unicode('v')),
        KeyCombo::Undo => (&[COMMAND_KEY], Key::Unicode('z')),
        #[cfg(target_os = "macos")]
        KeyCombo::Redo => (&[COMMAND_KEY, Key::Shift], Key::Unicode('z')),
        #[cfg(not(target_os = "macos"))]
        KeyCombo::Redo => (&[COMMAND_KEY], Key::Unicode('y')),
        KeyCombo::VolumeUp => (&[], Key::VolumeUp),
        KeyCombo::VolumeDown => (&[], Key::VolumeDown),
    }
}

fn navigate(enigo: &mut Enigo, forward: bool) -> enigo::InputResult<()> {
    #[cfg(target_os = "macos")]
    {
        let key = if forward { ']' } else { '[' };
        chord(enigo, &[Key::Meta], Key::Unicode(key))
    }

    #[cfg(not(target_os = "macos"))]
    {
        let key = if forward { Key::RightArrow } else { Key::LeftArrow };
        chord(enigo, &[Key::Alt], key)
    }
}

/// Press `modifiers` in order, click `key`, release modifiers in reverse.
fn chord(enigo: &mut Enigo, modifiers: &[Key], key: Key) -> enigo::InputResult<()> {
    for m in modifiers {
        enigo.key(*m, Direction::Press)?;
    }
    let clicked = enigo.key(key, Direction::Click);
    for m in modifiers.iter().rev() {
        enigo.key(*m, Direction::Release)?;
    }
    clicked
}

//! Application settings structs, defaults, validation and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every section is `#[serde(default)]`, so a settings file only needs to
//! list the values it changes.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AppPaths;
use crate::engine::{ActionBinding, ActionKind};
use crate::gesture::{Finger, GestureKind, SwipeDirection};

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A setting is outside the range the engine can work with.
///
/// Raised once by [`AppConfig::validate`] at startup; the frame loop never
/// starts with an invalid configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("stabilizer.quorum ({quorum}) must not exceed stabilizer.window_size ({window})")]
    QuorumExceedsWindow { quorum: usize, window: usize },
}

fn out_of_range(field: &'static str, value: impl ToString, expected: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        value: value.to_string(),
        expected,
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(field, value, "0.0 ..= 1.0"))
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, value, "> 0.0"))
    }
}

// ---------------------------------------------------------------------------
// DetectionConfig
// ---------------------------------------------------------------------------

/// Which tracker detections the engine accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Maximum number of hands processed per frame (highest confidence wins).
    pub max_hands: usize,
    /// Minimum confidence for a hand that has no live track yet.
    pub min_detection_confidence: f32,
    /// Minimum confidence for a hand that continues an existing track.
    pub min_tracking_confidence: f32,
    /// Flip observations horizontally before processing (selfie cameras
    /// that deliver an unmirrored image).
    pub mirror_x: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_hands: 2,
            min_detection_confidence: 0.6,
            min_tracking_confidence: 0.6,
            mirror_x: false,
        }
    }
}

// ---------------------------------------------------------------------------
// FeatureConfig
// ---------------------------------------------------------------------------

/// Per-finger extension thresholds.
///
/// The thumb value is a fraction of palm width (tip ↔ pinky knuckle); the
/// other four are tip-to-wrist over knuckle-to-wrist ratios.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerThresholds {
    pub thumb: f32,
    pub index: f32,
    pub middle: f32,
    pub ring: f32,
    pub pinky: f32,
}

impl FingerThresholds {
    pub fn get(&self, finger: Finger) -> f32 {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }
}

impl Default for FingerThresholds {
    fn default() -> Self {
        Self {
            thumb: 1.0,
            index: 1.1,
            middle: 1.1,
            ring: 1.1,
            pinky: 1.1,
        }
    }
}

/// Geometric feature extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub finger_extension: FingerThresholds,
    /// Thumb-tip ↔ index-tip distance, in palm widths, below which the
    /// fingers count as pinched.
    pub pinch_threshold: f32,
    /// Minimum extended fingers for the palm-open indicator.
    pub palm_min_fingers: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            finger_extension: FingerThresholds::default(),
            pinch_threshold: 0.3,
            palm_min_fingers: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// StabilizerConfig
// ---------------------------------------------------------------------------

/// Sliding-window quorum settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Number of recent raw labels kept per hand (N).
    pub window_size: usize,
    /// Occurrences within the window needed to confirm a gesture (Q).
    pub quorum: usize,
    /// Consecutive frames a hand may be missing before its history is
    /// dropped.
    pub grace_frames: u32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            quorum: 3,
            grace_frames: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// MotionConfig
// ---------------------------------------------------------------------------

/// Swipe and scroll motion settings.  Distances are normalised image units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Net horizontal fingertip travel that counts as a swipe.
    pub swipe_threshold: f32,
    /// The travel must happen within this many milliseconds.
    pub swipe_window_ms: u64,
    /// Scroll notches per unit of vertical fingertip travel.
    pub scroll_sensitivity: f32,
    /// Per-frame vertical travel ignored as jitter.
    pub scroll_deadzone: f32,
    /// Largest scroll delta emitted for one frame.
    pub scroll_max: i32,
}

impl MotionConfig {
    pub fn swipe_window(&self) -> Duration {
        Duration::from_millis(self.swipe_window_ms)
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 0.18,
            swipe_window_ms: 600,
            scroll_sensitivity: 150.0,
            scroll_deadzone: 0.015,
            scroll_max: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// CursorConfig
// ---------------------------------------------------------------------------

/// Cursor mapping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Exponential smoothing factor α (0 < α ≤ 1); higher follows the hand
    /// faster, lower is steadier.
    pub smoothing: f32,
    /// Fraction of the camera frame cropped on every side before mapping to
    /// the screen, so screen edges are reachable without leaving the image.
    pub frame_margin: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.6,
            frame_margin: 0.1,
        }
    }
}

// ---------------------------------------------------------------------------
// DispatchConfig
// ---------------------------------------------------------------------------

/// Cooldowns for one-shot actions and the drag hold delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub click_cooldown_ms: u64,
    pub double_click_cooldown_ms: u64,
    pub right_click_cooldown_ms: u64,
    pub navigate_cooldown_ms: u64,
    pub key_combo_cooldown_ms: u64,
    /// How long the drag gesture must be held before the button goes down.
    pub drag_hold_ms: u64,
}

impl DispatchConfig {
    /// Cooldown applied after `kind` fires.  Continuous kinds have none.
    pub fn cooldown(&self, kind: ActionKind) -> Duration {
        if kind.is_continuous() {
            return Duration::ZERO;
        }
        let ms = match kind {
            ActionKind::Click => self.click_cooldown_ms,
            ActionKind::DoubleClick => self.double_click_cooldown_ms,
            ActionKind::RightClick => self.right_click_cooldown_ms,
            ActionKind::NavigateBack | ActionKind::NavigateForward => self.navigate_cooldown_ms,
            ActionKind::KeyCombo => self.key_combo_cooldown_ms,
            // Gated by PauseConfig::toggle_cooldown_ms instead.
            _ => 0,
        };
        Duration::from_millis(ms)
    }

    pub fn drag_hold(&self) -> Duration {
        Duration::from_millis(self.drag_hold_ms)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            click_cooldown_ms: 500,
            double_click_cooldown_ms: 600,
            right_click_cooldown_ms: 500,
            navigate_cooldown_ms: 500,
            key_combo_cooldown_ms: 500,
            drag_hold_ms: 300,
        }
    }
}

// ---------------------------------------------------------------------------
// PauseConfig
// ---------------------------------------------------------------------------

/// Pause / resume behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseConfig {
    /// Minimum time between two thumbs-up toggles.
    pub toggle_cooldown_ms: u64,
    /// Two open hands stop everything immediately.
    pub harsh_pause_enabled: bool,
    /// Extended fingers each hand needs to count as open for the harsh pause.
    pub two_hand_min_fingers: usize,
}

impl PauseConfig {
    pub fn toggle_cooldown(&self) -> Duration {
        Duration::from_millis(self.toggle_cooldown_ms)
    }
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            toggle_cooldown_ms: 1_000,
            harsh_pause_enabled: true,
            two_hand_min_fingers: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// BindingsConfig
// ---------------------------------------------------------------------------

/// Gesture → action table.  Thumbs-up is reserved for pause / resume and
/// cannot be rebound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    pub point: ActionBinding,
    pub pinch: ActionBinding,
    pub victory: ActionBinding,
    pub three_fingers: ActionBinding,
    pub palm: ActionBinding,
    pub fist: ActionBinding,
    pub swipe_left: ActionBinding,
    pub swipe_right: ActionBinding,
}

impl BindingsConfig {
    /// Binding for a confirmed pose; `None` for thumbs-up and no-gesture.
    pub fn for_gesture(&self, gesture: GestureKind) -> Option<ActionBinding> {
        match gesture {
            GestureKind::Point => Some(self.point),
            GestureKind::Pinch => Some(self.pinch),
            GestureKind::Victory => Some(self.victory),
            GestureKind::ThreeFingers => Some(self.three_fingers),
            GestureKind::Palm => Some(self.palm),
            GestureKind::Fist => Some(self.fist),
            GestureKind::ThumbsUp | GestureKind::None => None,
        }
    }

    pub fn for_swipe(&self, direction: SwipeDirection) -> ActionBinding {
        match direction {
            SwipeDirection::Left => self.swipe_left,
            SwipeDirection::Right => self.swipe_right,
        }
    }

    /// Whether a confirmed `gesture` keeps re-emitting while held.
    pub fn is_continuous(&self, gesture: GestureKind) -> bool {
        self.for_gesture(gesture)
            .is_some_and(|binding| binding.is_continuous())
    }
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            point: ActionBinding::MoveCursor,
            pinch: ActionBinding::Click,
            victory: ActionBinding::DoubleClick,
            three_fingers: ActionBinding::Scroll,
            palm: ActionBinding::RightClick,
            fist: ActionBinding::Drag,
            swipe_left: ActionBinding::NavigateBack,
            swipe_right: ActionBinding::NavigateForward,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global keyboard shortcuts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Toggles pause from the keyboard (e.g. `"F8"`).
    pub pause_key: String,
    /// Stops the controller (e.g. `"F10"`).
    pub quit_key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            pause_key: "F8".into(),
            quit_key: "F10".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// InputConfig
// ---------------------------------------------------------------------------

/// Where landmark frames are read from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// JSON-lines file of frames; `None` reads stdin.
    pub frames_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use gesture_control::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detection: DetectionConfig,
    pub features: FeatureConfig,
    pub stabilizer: StabilizerConfig,
    pub motion: MotionConfig,
    pub cursor: CursorConfig,
    pub dispatch: DispatchConfig,
    pub pause: PauseConfig,
    pub bindings: BindingsConfig,
    pub hotkey: HotkeyConfig,
    pub input: InputConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check every threshold the engine depends on.  Returns the first
    /// violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.detection;
        if d.max_hands == 0 {
            return Err(out_of_range("detection.max_hands", d.max_hands, ">= 1"));
        }
        check_unit("detection.min_detection_confidence", d.min_detection_confidence)?;
        check_unit("detection.min_tracking_confidence", d.min_tracking_confidence)?;

        let f = &self.features;
        check_positive("features.finger_extension.thumb", f.finger_extension.thumb)?;
        check_positive("features.finger_extension.index", f.finger_extension.index)?;
        check_positive("features.finger_extension.middle", f.finger_extension.middle)?;
        check_positive("features.finger_extension.ring", f.finger_extension.ring)?;
        check_positive("features.finger_extension.pinky", f.finger_extension.pinky)?;
        check_positive("features.pinch_threshold", f.pinch_threshold)?;
        if !(1..=5).contains(&f.palm_min_fingers) {
            return Err(out_of_range(
                "features.palm_min_fingers",
                f.palm_min_fingers,
                "1 ..= 5",
            ));
        }

        let s = &self.stabilizer;
        if s.window_size == 0 {
            return Err(out_of_range("stabilizer.window_size", s.window_size, ">= 1"));
        }
        if s.quorum == 0 {
            return Err(out_of_range("stabilizer.quorum", s.quorum, ">= 1"));
        }
        if s.quorum > s.window_size {
            return Err(ConfigError::QuorumExceedsWindow {
                quorum: s.quorum,
                window: s.window_size,
            });
        }

        let m = &self.motion;
        check_positive("motion.swipe_threshold", m.swipe_threshold)?;
        if m.swipe_window_ms == 0 {
            return Err(out_of_range("motion.swipe_window_ms", m.swipe_window_ms, ">= 1"));
        }
        check_positive("motion.scroll_sensitivity", m.scroll_sensitivity)?;
        check_unit("motion.scroll_deadzone", m.scroll_deadzone)?;
        if m.scroll_max < 1 {
            return Err(out_of_range("motion.scroll_max", m.scroll_max, ">= 1"));
        }

        let c = &self.cursor;
        if !(c.smoothing > 0.0 && c.smoothing <= 1.0) {
            return Err(out_of_range("cursor.smoothing", c.smoothing, "0.0 < α <= 1.0"));
        }
        if !(0.0..0.5).contains(&c.frame_margin) {
            return Err(out_of_range("cursor.frame_margin", c.frame_margin, "0.0 ..< 0.5"));
        }

        let p = &self.pause;
        if !(1..=5).contains(&p.two_hand_min_fingers) {
            return Err(out_of_range(
                "pause.two_hand_min_fingers",
                p.two_hand_min_fingers,
                "1 ..= 5",
            ));
        }

        Ok(())
    }

    /// Returns `true` when no `settings.toml` file exists yet.
    pub fn is_first_run() -> bool {
        !AppPaths::new().settings_file.exists()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

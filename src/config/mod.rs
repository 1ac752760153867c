//! Configuration module for the gesture controller.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for cross-platform config directories, TOML persistence via
//! `AppConfig::load` / `AppConfig::save`, and startup validation via
//! `AppConfig::validate`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, BindingsConfig, ConfigError, CursorConfig, DetectionConfig, DispatchConfig,
    FeatureConfig, FingerThresholds, HotkeyConfig, InputConfig, MotionConfig, PauseConfig,
    StabilizerConfig,
};

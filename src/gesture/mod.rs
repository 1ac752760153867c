//! Gesture recognition: from one hand's keypoints to a stabilised gesture.
//!
//! # Architecture
//!
//! ```text
//! HandObservation ──▶ extract_features ──▶ FeatureSet
//!                                            │
//!                                       classify
//!                                            ▼
//!                      Stabilizer ◀── RawGesture (per frame, noisy)
//!                          │
//!                          ▼
//!                   confirmed gesture ──▶ MotionTracker (swipe / scroll)
//! ```
//!
//! Each stage is a plain struct or function with no I/O; the
//! [`engine`](crate::engine) owns one [`Stabilizer`] and one
//! [`MotionTracker`] per tracked hand.

pub mod classifier;
pub mod features;
pub mod motion;
pub mod stabilizer;
pub mod window;

pub use classifier::{classify, GestureKind, RawGesture};
pub use features::{extract_features, FeatureSet, Finger, FingerStates};
pub use motion::{MotionEvent, MotionMode, MotionTracker, SwipeDirection};
pub use stabilizer::{ConfirmedGesture, Emission, Stabilizer};
pub use window::RingBuffer;

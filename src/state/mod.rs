//! State machine module for the capture button
//!
//! Provides an explicit state machine with four modes:
//! - Idle: Default mode, nothing pressed or recorded
//! - Pressed: Momentary, until release or the long-press threshold
//! - LongPressed: Momentary, while the hold animation grows the circles
//! - Recording: Until release or the recording limit

mod machine;

pub use machine::{CaptureMachine, Mode};

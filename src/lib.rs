//! capture-button: press-and-hold capture control core
//!
//! A tap takes a photo, a long press grows the button into a timed
//! recording with a progress arc, and releasing at any point unwinds back
//! to idle. The crate provides:
//! - Gesture interpretation for a single-pointer stream
//! - A radius animator and a recording countdown driven by deadlines
//! - The capture state machine tying them together
//! - A thin rendering layer that paints state snapshots
//!
//! Actual photo/video capture is not performed here; the state machine
//! emits lifecycle events for whatever does it.

pub mod config;
pub mod events;
pub mod gesture;
pub mod lifecycle;
pub mod motion;
pub mod render;
pub mod state;

pub use config::Config;
pub use events::{CaptureEvent, Snapshot, StopReason};
pub use state::{CaptureMachine, Mode};

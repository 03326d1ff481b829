//! Gesture module for pointer input
//!
//! Turns the raw single-pointer stream into press, long-press and release
//! gestures for the capture state machine.

mod interpreter;
mod listener;
mod pointer;

pub use interpreter::{Gesture, GestureInterpreter};
pub use listener::{PointerError, PointerListener};
pub use pointer::{ParsePointerError, PointerEvent};

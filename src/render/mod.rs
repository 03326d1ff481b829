//! Rendering layer
//!
//! Turns state machine snapshots into draw calls on a host-provided
//! [`Canvas`]. Holds no state of its own.

mod layout;
mod paint;

pub use layout::{Layout, Point, Rect};
pub use paint::{paint, Canvas, Color, DisplayList, DrawOp, Palette, ARC_START_ANGLE};

//! Time-driven engines for the capture button
//!
//! - [`RadiusAnimator`]: interpolates the outer/inner radius pair
//! - [`RecordingTimer`]: counts down the recording budget
//!
//! Both are polled with the current instant and report events tagged with
//! the handle that produced them, so a caller can drop anything stale.

mod animator;
mod countdown;

pub use animator::{AnimationHandle, AnimatorEvent, RadiusAnimator, RadiusPair};
pub use countdown::{RecordingTimer, TimerEvent, TimerHandle};

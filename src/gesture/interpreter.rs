//! Pointer stream to press/long-press/release
//!
//! A press arms a long-press deadline. Releasing before the deadline
//! disarms it, and a disarmed deadline never fires.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::pointer::PointerEvent;

/// Semantic gestures delivered to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Press,
    LongPress,
    Release,
}

#[derive(Debug, Clone, Copy)]
struct Deferred {
    generation: u64,
    due: Instant,
}

/// Interprets a single-pointer stream
#[derive(Debug)]
pub struct GestureInterpreter {
    threshold: Duration,
    generation: u64,
    pointer_down: bool,
    pending: Option<Deferred>,
}

impl GestureInterpreter {
    pub fn new(long_press_threshold: Duration) -> Self {
        Self {
            threshold: long_press_threshold,
            generation: 0,
            pointer_down: false,
            pending: None,
        }
    }

    /// Handle a raw pointer event
    ///
    /// A second `Down` without an intervening `Up` is ignored. `Up` always
    /// produces a release, even when no press was seen.
    pub fn on_pointer(&mut self, event: PointerEvent, now: Instant) -> Option<Gesture> {
        match event {
            PointerEvent::Down => {
                if self.pointer_down {
                    debug!("pointer down ignored, press already in progress");
                    return None;
                }
                self.pointer_down = true;
                self.generation += 1;
                self.pending = Some(Deferred {
                    generation: self.generation,
                    due: now + self.threshold,
                });
                Some(Gesture::Press)
            }
            PointerEvent::Move => None,
            PointerEvent::Up => {
                self.pointer_down = false;
                if let Some(deferred) = self.pending.take() {
                    debug!(generation = deferred.generation, "long press disarmed");
                }
                Some(Gesture::Release)
            }
        }
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|d| d.due)
    }

    /// Fire the long press if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<Gesture> {
        let deferred = self.pending?;
        if now < deferred.due || deferred.generation != self.generation {
            return None;
        }
        self.pending = None;
        Some(Gesture::LongPress)
    }
}

//! Events module for capture button output
//!
//! Everything the state machine tells the outside world: redraw requests
//! for the rendering layer and lifecycle notifications for whatever performs
//! the actual photo or video capture.

use serde::{Deserialize, Serialize};

use crate::motion::RadiusPair;
use crate::state::Mode;

/// Everything the rendering layer needs to paint one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub radii: RadiusPair,
    /// Swept angle of the progress arc in degrees, `[0, 360)`
    pub progress: f32,
}

/// Why a recording ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The pointer was released
    Released,
    /// The maximum recording duration elapsed
    LimitReached,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Released => write!(f, "released"),
            StopReason::LimitReached => write!(f, "limit reached"),
        }
    }
}

/// Events emitted by the state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CaptureEvent {
    /// An observable value changed; repaint from the snapshot
    Redraw { snapshot: Snapshot },

    /// A quick tap asked for a photo
    PhotoCaptured,

    /// The hold animation finished and recording began
    RecordingStarted,

    /// Recording ended
    RecordingStopped {
        /// How long the recording ran, in milliseconds
        duration_ms: u64,
        reason: StopReason,
    },
}

impl CaptureEvent {
    /// Lifecycle events are the ones a capture backend cares about
    pub fn is_lifecycle(&self) -> bool {
        !matches!(self, CaptureEvent::Redraw { .. })
    }
}

impl std::fmt::Display for CaptureEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureEvent::Redraw { snapshot } => {
                write!(f, "REDRAW ({}, {:.1}°)", snapshot.mode, snapshot.progress)
            }
            CaptureEvent::PhotoCaptured => write!(f, "PHOTO_CAPTURED"),
            CaptureEvent::RecordingStarted => write!(f, "RECORDING_STARTED"),
            CaptureEvent::RecordingStopped {
                duration_ms,
                reason,
            } => {
                write!(f, "RECORDING_STOPPED ({}ms, {})", duration_ms, reason)
            }
        }
    }
}

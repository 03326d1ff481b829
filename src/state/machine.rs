//! Core state machine implementation
//!
//! Handles transitions between Idle, Pressed, LongPressed and Recording
//! based on pointer gestures, and drives the radius animator and the
//! recording countdown. All work happens on one logical timeline: pointer
//! events and due deadlines are processed one turn at a time, and every turn
//! ends with at most one redraw request.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::events::{CaptureEvent, Snapshot, StopReason};
use crate::gesture::{Gesture, GestureInterpreter, PointerEvent};
use crate::motion::{
    AnimationHandle, AnimatorEvent, RadiusAnimator, RadiusPair, RecordingTimer, TimerEvent,
    TimerHandle,
};

/// Largest sweep drawn while recording; a full circle only happens at expiry
const MAX_SWEEP: f32 = 359.999;

/// Upper bound on engine passes per turn; zero-length work settles well below this
const MAX_PASSES_PER_TURN: usize = 32;

/// The four possible modes of the capture button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Nothing pressed, nothing recorded
    #[default]
    Idle,
    /// Pointer is down, long-press threshold not reached yet
    Pressed,
    /// Long press detected, growing into recording
    LongPressed,
    /// Recording with the progress arc running
    Recording,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Idle => write!(f, "Idle"),
            Mode::Pressed => write!(f, "Pressed"),
            Mode::LongPressed => write!(f, "LongPressed"),
            Mode::Recording => write!(f, "Recording"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnimationKind {
    /// Outer grows, inner shrinks; promotes to Recording on completion
    Grow,
    /// Overshoot and settle after a tap
    Pulse,
    /// Back to idle radii
    Settle,
}

/// The animation in flight and the mode it was started in
#[derive(Debug, Clone, Copy)]
struct ActiveAnimation {
    handle: AnimationHandle,
    kind: AnimationKind,
    mode_at_start: Mode,
}

/// The capture button state machine
pub struct CaptureMachine {
    config: Config,
    mode: Mode,
    radii: RadiusPair,
    /// Degrees of arc, nonzero only while recording
    progress: f32,
    gestures: GestureInterpreter,
    animator: RadiusAnimator,
    timer: RecordingTimer,
    animation: Option<ActiveAnimation>,
    countdown: Option<TimerHandle>,
    recording_started_at: Option<Instant>,
    /// Time when current non-Idle mode was entered
    mode_entered_at: Option<Instant>,
    /// Something observable changed during the current turn
    dirty: bool,
    /// Channel for emitting capture events
    event_tx: broadcast::Sender<CaptureEvent>,
}

impl CaptureMachine {
    /// Create a new state machine
    pub fn new(config: Config, event_tx: broadcast::Sender<CaptureEvent>) -> Self {
        Self {
            radii: config.idle_radii(),
            progress: 0.0,
            gestures: GestureInterpreter::new(config.long_press_threshold),
            animator: RadiusAnimator::new(config.frame_interval),
            timer: RecordingTimer::new(),
            mode: Mode::Idle,
            animation: None,
            countdown: None,
            recording_started_at: None,
            mode_entered_at: None,
            dirty: false,
            event_tx,
            config,
        }
    }

    pub fn current_mode(&self) -> Mode {
        self.mode
    }

    pub fn current_radii(&self) -> RadiusPair {
        self.radii
    }

    pub fn current_progress(&self) -> f32 {
        self.progress
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            radii: self.radii,
            progress: self.progress,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a press is currently held
    pub fn is_pointer_down(&self) -> bool {
        self.gestures.is_pointer_down()
    }

    /// Nothing scheduled: no pending long press, animation or countdown
    pub fn is_quiescent(&self) -> bool {
        self.next_deadline().is_none()
    }

    /// Earliest instant at which [`advance`](Self::advance) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.gestures.next_deadline(),
            self.animator.next_deadline(),
            self.timer.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn on_pointer_down(&mut self, now: Instant) {
        self.handle_pointer(PointerEvent::Down, now);
    }

    pub fn on_pointer_move(&mut self, now: Instant) {
        self.handle_pointer(PointerEvent::Move, now);
    }

    pub fn on_pointer_up(&mut self, now: Instant) {
        self.handle_pointer(PointerEvent::Up, now);
    }

    /// Process one raw pointer event as a single turn
    ///
    /// Anything already due is delivered first so the event is applied on
    /// top of an up-to-date state.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) {
        self.pump(now);
        if let Some(gesture) = self.gestures.on_pointer(event, now) {
            self.handle_gesture(gesture, now);
        }
        self.pump(now);
        self.flush();
    }

    /// Deliver everything due at `now` as a single turn
    pub fn advance(&mut self, now: Instant) {
        self.pump(now);
        self.flush();
    }

    /// Run the state machine, processing pointer events and deadlines
    ///
    /// Returns once the pointer channel is closed and nothing is scheduled.
    pub async fn run(&mut self, mut pointer_rx: mpsc::Receiver<PointerEvent>) {
        info!(mode = %self.mode, "capture state machine started");

        let mut input_open = true;
        loop {
            let deadline = self.next_deadline();
            if !input_open && deadline.is_none() {
                break;
            }

            tokio::select! {
                event = pointer_rx.recv(), if input_open => match event {
                    Some(event) => self.handle_pointer(event, Instant::now()),
                    None => {
                        debug!("pointer channel closed, draining scheduled work");
                        input_open = false;
                    }
                },
                _ = sleep_until_deadline(deadline) => {
                    self.advance(Instant::now());
                }
            }
        }

        info!(mode = %self.mode, "capture state machine stopped");
    }

    /// Poll every engine until nothing more is due at `now`
    fn pump(&mut self, now: Instant) {
        for _ in 0..MAX_PASSES_PER_TURN {
            let mut progressed = false;

            if let Some(gesture) = self.gestures.poll(now) {
                progressed = true;
                self.handle_gesture(gesture, now);
            }

            for event in self.animator.poll(now) {
                progressed = true;
                self.handle_animator_event(event, now);
            }

            for event in self.timer.poll(now) {
                progressed = true;
                self.handle_timer_event(event, now);
            }

            if !progressed {
                return;
            }
        }

        warn!(mode = %self.mode, "turn did not settle, deferring remaining work");
    }

    fn handle_gesture(&mut self, gesture: Gesture, now: Instant) {
        trace!(?gesture, mode = %self.mode, "gesture");

        match (gesture, self.mode) {
            (Gesture::Press, Mode::Idle) => {
                self.transition_to(Mode::Pressed, now);
            }
            (Gesture::Press, mode) => {
                debug!(%mode, "press ignored, not idle");
            }

            (Gesture::LongPress, Mode::Pressed) => {
                self.transition_to(Mode::LongPressed, now);
                let to = self.config.recording_radii();
                self.start_animation(AnimationKind::Grow, vec![self.radii, to], now);
            }
            (Gesture::LongPress, mode) => {
                debug!(%mode, "long press ignored");
            }

            (Gesture::Release, Mode::Idle) => {
                debug!("release ignored, already idle");
            }
            (Gesture::Release, Mode::Pressed) => {
                self.transition_to(Mode::Idle, now);
                self.emit(CaptureEvent::PhotoCaptured);
                let keyframes = vec![self.radii, self.config.pulse_radii(), self.config.idle_radii()];
                self.start_animation(AnimationKind::Pulse, keyframes, now);
            }
            (Gesture::Release, Mode::LongPressed) => {
                self.cancel_animation();
                self.transition_to(Mode::Idle, now);
                self.settle(now);
            }
            (Gesture::Release, Mode::Recording) => {
                self.stop_recording(StopReason::Released, now);
                self.settle(now);
            }
        }
    }

    fn handle_animator_event(&mut self, event: AnimatorEvent, now: Instant) {
        let Some(active) = self.animation.filter(|a| a.handle == event.handle()) else {
            trace!(handle = ?event.handle(), "stale animation event dropped");
            return;
        };

        match event {
            AnimatorEvent::Frame { radii, .. } => self.set_radii(radii),
            AnimatorEvent::Completed { radii, .. } => {
                self.set_radii(radii);
                self.animation = None;

                if self.mode != active.mode_at_start {
                    debug!(
                        kind = ?active.kind,
                        started_in = %active.mode_at_start,
                        now_in = %self.mode,
                        "animation finished after mode changed, no promotion"
                    );
                    return;
                }

                if active.kind == AnimationKind::Grow {
                    self.start_recording(now);
                }
            }
        }
    }

    fn handle_timer_event(&mut self, event: TimerEvent, now: Instant) {
        if self.countdown != Some(event.handle()) || self.mode != Mode::Recording {
            trace!(handle = ?event.handle(), "stale countdown event dropped");
            return;
        }

        match event {
            TimerEvent::Tick { remaining, .. } => {
                self.progress = progress_for(remaining, self.config.max_record_duration);
                self.dirty = true;
            }
            TimerEvent::Expired { .. } => {
                info!("recording limit reached");
                self.stop_recording(StopReason::LimitReached, now);
                self.settle(now);
            }
        }
    }

    fn start_recording(&mut self, now: Instant) {
        self.transition_to(Mode::Recording, now);
        self.progress = 0.0;
        self.set_radii(self.config.recording_radii());

        let handle = self.timer.start(
            self.config.max_record_duration,
            self.config.tick_interval(),
            now,
        );
        self.countdown = Some(handle);
        self.recording_started_at = Some(now);

        self.emit(CaptureEvent::RecordingStarted);
    }

    fn stop_recording(&mut self, reason: StopReason, now: Instant) {
        self.timer.cancel();
        self.countdown = None;
        self.progress = 0.0;

        let duration_ms = self
            .recording_started_at
            .take()
            .map(|t| now.saturating_duration_since(t).as_millis() as u64)
            .unwrap_or(0);

        self.transition_to(Mode::Idle, now);
        self.emit(CaptureEvent::RecordingStopped {
            duration_ms,
            reason,
        });
    }

    /// Animate back to idle radii
    fn settle(&mut self, now: Instant) {
        let idle = self.config.idle_radii();
        self.start_animation(AnimationKind::Settle, vec![self.radii, idle], now);
    }

    /// Start an animation in the current mode, replacing any animation in flight
    fn start_animation(&mut self, kind: AnimationKind, keyframes: Vec<RadiusPair>, now: Instant) {
        self.cancel_animation();

        let handle =
            self.animator
                .animate_keyframes(keyframes, self.config.animation_duration, now);
        self.animation = Some(ActiveAnimation {
            handle,
            kind,
            mode_at_start: self.mode,
        });

        debug!(?kind, mode = %self.mode, "animation started");
    }

    fn cancel_animation(&mut self) {
        if let Some(active) = self.animation.take() {
            if self.animator.cancel(active.handle) {
                debug!(kind = ?active.kind, "animation cancelled mid-flight");
            }
        }
    }

    fn set_radii(&mut self, radii: RadiusPair) {
        if self.radii != radii {
            self.radii = radii;
            self.dirty = true;
        }
    }

    /// Perform a mode transition
    fn transition_to(&mut self, new_mode: Mode, now: Instant) {
        let old_mode = self.mode;
        if old_mode == new_mode {
            return;
        }

        let duration_ms = self
            .mode_entered_at
            .map(|t| now.saturating_duration_since(t).as_millis() as u64)
            .unwrap_or(0);

        info!(
            from = %old_mode,
            to = %new_mode,
            duration_ms = duration_ms,
            "mode transition"
        );

        self.mode = new_mode;
        self.mode_entered_at = if new_mode != Mode::Idle {
            Some(now)
        } else {
            None
        };
        self.dirty = true;
    }

    /// The engines hold exactly the work this machine tracks
    fn engines_consistent(&self) -> bool {
        let animation_ok = match self.animation {
            Some(active) => self.animator.is_running(active.handle),
            None => self.animator.is_idle(),
        };
        let countdown_ok = match self.countdown {
            Some(handle) => self.timer.is_current(handle),
            None => !self.timer.is_running(),
        };
        animation_ok && countdown_ok && self.timer.is_running() == (self.mode == Mode::Recording)
    }

    /// Emit the turn's redraw request, if anything changed
    fn flush(&mut self) {
        debug_assert!(self.engines_consistent(), "engine state out of sync");
        if self.dirty {
            self.dirty = false;
            let snapshot = self.snapshot();
            trace!(?snapshot, "redraw requested");
            let _ = self.event_tx.send(CaptureEvent::Redraw { snapshot });
        }
    }

    fn emit(&self, event: CaptureEvent) {
        debug!(%event, "emitting capture event");
        let _ = self.event_tx.send(event);
    }
}

/// Degrees of arc swept after `remaining` of `total` is left
fn progress_for(remaining: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 0.0;
    }
    let left = remaining.as_secs_f64() / total.as_secs_f64();
    ((360.0 * (1.0 - left)) as f32).clamp(0.0, MAX_SWEEP)
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

//! Radius animator
//!
//! Interpolates the outer and inner circle radii together on one shared
//! clock. The animator never sleeps: the owner polls it with the current
//! time and sleeps until [`RadiusAnimator::next_deadline`] in between.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::trace;

const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Outer and inner circle radii drawn on one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RadiusPair {
    pub outer: f32,
    pub inner: f32,
}

impl RadiusPair {
    pub fn new(outer: f32, inner: f32) -> Self {
        Self { outer, inner }
    }

    /// Linear interpolation towards `to`, `t` in `[0, 1]`
    pub fn lerp(self, to: RadiusPair, t: f32) -> RadiusPair {
        RadiusPair {
            outer: self.outer + (to.outer - self.outer) * t,
            inner: self.inner + (to.inner - self.inner) * t,
        }
    }
}

/// Identifies one `animate` call. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

/// Output of [`RadiusAnimator::poll`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatorEvent {
    /// Intermediate radii for the current frame
    Frame {
        handle: AnimationHandle,
        radii: RadiusPair,
    },
    /// Both radii reached their end values
    Completed {
        handle: AnimationHandle,
        radii: RadiusPair,
    },
}

impl AnimatorEvent {
    pub fn handle(&self) -> AnimationHandle {
        match self {
            AnimatorEvent::Frame { handle, .. } | AnimatorEvent::Completed { handle, .. } => *handle,
        }
    }
}

/// An animation in flight
#[derive(Debug)]
struct Running {
    handle: AnimationHandle,
    /// Evenly spaced over `duration`; always at least two entries
    keyframes: Vec<RadiusPair>,
    started_at: Instant,
    duration: Duration,
    next_frame_at: Instant,
}

impl Running {
    fn ends_at(&self) -> Instant {
        self.started_at + self.duration
    }

    fn sample(&self, now: Instant) -> (RadiusPair, bool) {
        let elapsed = now.saturating_duration_since(self.started_at);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.keyframes[self.keyframes.len() - 1], true);
        }

        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        (sample_keyframes(&self.keyframes, t), false)
    }
}

/// Position `t` in `[0, 1]` along a polyline of keyframes
fn sample_keyframes(keyframes: &[RadiusPair], t: f32) -> RadiusPair {
    let segments = keyframes.len() - 1;
    let position = t.clamp(0.0, 1.0) * segments as f32;
    let index = (position.floor() as usize).min(segments - 1);
    keyframes[index].lerp(keyframes[index + 1], position - index as f32)
}

/// Drives at most one radius animation at a time
#[derive(Debug)]
pub struct RadiusAnimator {
    frame_interval: Duration,
    generation: u64,
    running: Option<Running>,
}

impl RadiusAnimator {
    /// Frame intervals below one millisecond are raised to one millisecond
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval: frame_interval.max(MIN_FRAME_INTERVAL),
            generation: 0,
            running: None,
        }
    }

    /// Animate from one radius pair to another, cancelling any prior animation
    pub fn animate(
        &mut self,
        from: RadiusPair,
        to: RadiusPair,
        duration: Duration,
        now: Instant,
    ) -> AnimationHandle {
        self.animate_keyframes(vec![from, to], duration, now)
    }

    /// Animate through evenly spaced keyframes, cancelling any prior animation
    ///
    /// A single keyframe is treated as a hold at that value.
    pub fn animate_keyframes(
        &mut self,
        mut keyframes: Vec<RadiusPair>,
        duration: Duration,
        now: Instant,
    ) -> AnimationHandle {
        match keyframes.len() {
            0 => keyframes = vec![RadiusPair::default(); 2],
            1 => keyframes.push(keyframes[0]),
            _ => {}
        }

        if let Some(prev) = self.running.take() {
            trace!(handle = ?prev.handle, "animation superseded");
        }

        self.generation += 1;
        let handle = AnimationHandle(self.generation);
        let first_frame = now + self.frame_interval.min(duration);

        trace!(?handle, duration_ms = duration.as_millis() as u64, "animation started");

        self.running = Some(Running {
            handle,
            keyframes,
            started_at: now,
            duration,
            next_frame_at: first_frame,
        });
        handle
    }

    /// Stop an animation. Returns false if it already completed or was cancelled.
    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        match &self.running {
            Some(running) if running.handle == handle => {
                self.running = None;
                trace!(?handle, "animation cancelled");
                true
            }
            _ => false,
        }
    }

    /// Whether `handle` is the animation currently in flight
    pub fn is_running(&self, handle: AnimationHandle) -> bool {
        self.running.as_ref().is_some_and(|r| r.handle == handle)
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_none()
    }

    /// When the next frame is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.running.as_ref().map(|r| r.next_frame_at)
    }

    /// Deliver the frame due at `now`, plus completion if the end was reached
    ///
    /// Late polls are coalesced into a single frame at the current time.
    pub fn poll(&mut self, now: Instant) -> Vec<AnimatorEvent> {
        let Some(running) = self.running.as_mut() else {
            return Vec::new();
        };
        if now < running.next_frame_at {
            return Vec::new();
        }

        let handle = running.handle;
        let (radii, finished) = running.sample(now);

        if finished {
            self.running = None;
            return vec![
                AnimatorEvent::Frame { handle, radii },
                AnimatorEvent::Completed { handle, radii },
            ];
        }

        running.next_frame_at = (now + self.frame_interval).min(running.ends_at());
        vec![AnimatorEvent::Frame { handle, radii }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_lerp_halfway() {
        let from = RadiusPair::new(100.0, 75.0);
        let to = RadiusPair::new(140.0, 50.0);
        assert_eq!(from.lerp(to, 0.5), RadiusPair::new(120.0, 62.5));
    }

    #[test]
    fn test_frames_then_single_completion() {
        let mut animator = RadiusAnimator::new(FRAME);
        let start = Instant::now();
        let from = RadiusPair::new(100.0, 75.0);
        let to = RadiusPair::new(140.0, 50.0);
        let handle = animator.animate(from, to, ms(100), start);

        assert!(animator.poll(start).is_empty(), "first frame not due yet");

        let events = animator.poll(start + ms(50));
        assert_eq!(events.len(), 1);
        match events[0] {
            AnimatorEvent::Frame { radii, .. } => {
                assert!((radii.outer - 120.0).abs() < 0.01);
                assert!((radii.inner - 62.5).abs() < 0.01);
            }
            other => panic!("expected frame, got {other:?}"),
        }

        let events = animator.poll(start + ms(100));
        assert_eq!(
            events,
            vec![
                AnimatorEvent::Frame { handle, radii: to },
                AnimatorEvent::Completed { handle, radii: to },
            ]
        );

        assert!(animator.is_idle());
        assert!(animator.poll(start + ms(200)).is_empty());
    }

    #[test]
    fn test_deadline_never_passes_end() {
        let mut animator = RadiusAnimator::new(FRAME);
        let start = Instant::now();
        animator.animate(RadiusPair::default(), RadiusPair::new(1.0, 1.0), ms(20), start);

        assert_eq!(animator.next_deadline(), Some(start + FRAME));
        animator.poll(start + FRAME);
        assert_eq!(animator.next_deadline(), Some(start + ms(20)));
    }

    #[test]
    fn test_cancel_suppresses_completion() {
        let mut animator = RadiusAnimator::new(FRAME);
        let start = Instant::now();
        let handle = animator.animate(
            RadiusPair::default(),
            RadiusPair::new(10.0, 10.0),
            ms(100),
            start,
        );

        assert!(animator.cancel(handle));
        assert!(animator.poll(start + ms(500)).is_empty());
        assert_eq!(animator.next_deadline(), None);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut animator = RadiusAnimator::new(FRAME);
        let start = Instant::now();
        let handle = animator.animate(
            RadiusPair::default(),
            RadiusPair::new(10.0, 10.0),
            ms(10),
            start,
        );

        animator.poll(start + ms(10));
        assert!(!animator.cancel(handle), "cancel after completion is a no-op");
        assert!(!animator.cancel(handle));
    }

    #[test]
    fn test_new_animation_replaces_old() {
        let mut animator = RadiusAnimator::new(FRAME);
        let start = Instant::now();
        let first = animator.animate(
            RadiusPair::default(),
            RadiusPair::new(10.0, 10.0),
            ms(100),
            start,
        );
        let second = animator.animate(
            RadiusPair::new(5.0, 5.0),
            RadiusPair::default(),
            ms(100),
            start + ms(20),
        );

        assert_ne!(first, second);
        assert!(!animator.is_running(first));
        assert!(!animator.cancel(first), "stale handle must not cancel the new one");
        assert!(animator.is_running(second));

        let events = animator.poll(start + ms(120));
        assert!(events.iter().all(|e| e.handle() == second));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut animator = RadiusAnimator::new(FRAME);
        let start = Instant::now();
        let to = RadiusPair::new(3.0, 4.0);
        let handle = animator.animate(RadiusPair::default(), to, Duration::ZERO, start);

        assert_eq!(animator.next_deadline(), Some(start));
        let events = animator.poll(start);
        assert_eq!(events.last(), Some(&AnimatorEvent::Completed { handle, radii: to }));
    }

    #[test]
    fn test_keyframes_overshoot_and_settle() {
        let mut animator = RadiusAnimator::new(FRAME);
        let start = Instant::now();
        let rest = RadiusPair::new(100.0, 75.0);
        let peak = RadiusPair::new(120.0, 62.5);
        animator.animate_keyframes(vec![rest, peak, rest], ms(100), start);

        match animator.poll(start + ms(50))[0] {
            AnimatorEvent::Frame { radii, .. } => {
                assert!((radii.outer - peak.outer).abs() < 0.01);
                assert!((radii.inner - peak.inner).abs() < 0.01);
            }
            other => panic!("expected frame, got {other:?}"),
        }

        let events = animator.poll(start + ms(100));
        assert!(matches!(
            events.last(),
            Some(AnimatorEvent::Completed { radii, .. }) if *radii == rest
        ));
    }
}

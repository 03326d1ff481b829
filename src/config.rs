//! Configuration loading and management
//!
//! Every radius is derived from a single button size, the same way the
//! widget lays itself out. Timings can be overridden from the environment.

use std::time::Duration;

use anyhow::{Context, Result};

/// Default button diameter in pixels
pub const DEFAULT_BUTTON_SIZE: f32 = 200.0;
/// Duration of the growth, return and pulse animations
pub const DEFAULT_ANIMATION_MS: u64 = 100;
/// How long a press must be held before it counts as a long press
pub const DEFAULT_LONG_PRESS_MS: u64 = 500;
/// Upper bound on a single recording
pub const DEFAULT_MAX_RECORD_MS: u64 = 10_000;
/// Animation frame interval (~60fps)
pub const DEFAULT_FRAME_MS: u64 = 16;

/// Number of progress ticks per recording, one per degree of arc
pub const TICKS_PER_RECORDING: u32 = 360;

/// Errors for configuration values that cannot be used
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("button size must be positive, got {0}")]
    NonPositiveSize(f32),
}

/// Capture button configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Button diameter in pixels
    pub button_size: f32,
    /// Outer circle radius at rest
    pub idle_outer_radius: f32,
    /// Inner circle radius at rest
    pub idle_inner_radius: f32,
    /// How much the outer circle grows while recording
    pub outer_growth: f32,
    /// How much the inner circle shrinks while recording
    pub inner_shrink: f32,
    /// Outer overshoot at the peak of the capture pulse
    pub pulse_outer_growth: f32,
    /// Inner undershoot at the peak of the capture pulse
    pub pulse_inner_shrink: f32,
    /// Width of the progress arc stroke
    pub stroke_width: f32,
    pub animation_duration: Duration,
    pub long_press_threshold: Duration,
    pub max_record_duration: Duration,
    pub frame_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_button_size(DEFAULT_BUTTON_SIZE)
    }
}

impl Config {
    /// Derive the full geometry from a single button size
    pub fn from_button_size(size: f32) -> Self {
        let outer_growth = size / 5.0;
        let inner_shrink = size / 8.0;

        Self {
            button_size: size,
            idle_outer_radius: size / 2.0,
            idle_inner_radius: size / 2.0 * 0.75,
            outer_growth,
            inner_shrink,
            pulse_outer_growth: outer_growth / 2.0,
            pulse_inner_shrink: inner_shrink / 2.0,
            stroke_width: size / 15.0,
            animation_duration: Duration::from_millis(DEFAULT_ANIMATION_MS),
            long_press_threshold: Duration::from_millis(DEFAULT_LONG_PRESS_MS),
            max_record_duration: Duration::from_millis(DEFAULT_MAX_RECORD_MS),
            frame_interval: Duration::from_millis(DEFAULT_FRAME_MS),
        }
    }

    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        let size = match read_var("CAPTURE_BUTTON_SIZE")? {
            Some(raw) => parse_size(&raw).context("invalid CAPTURE_BUTTON_SIZE")?,
            None => DEFAULT_BUTTON_SIZE,
        };

        let mut config = Self::from_button_size(size);

        if let Some(raw) = read_var("CAPTURE_ANIMATION_MS")? {
            config.animation_duration = parse_millis("CAPTURE_ANIMATION_MS", &raw)?;
        }
        if let Some(raw) = read_var("CAPTURE_LONG_PRESS_MS")? {
            config.long_press_threshold = parse_millis("CAPTURE_LONG_PRESS_MS", &raw)?;
        }
        if let Some(raw) = read_var("CAPTURE_MAX_RECORD_MS")? {
            config.max_record_duration = parse_millis("CAPTURE_MAX_RECORD_MS", &raw)?;
        }
        if let Some(raw) = read_var("CAPTURE_FRAME_MS")? {
            config.frame_interval = parse_millis("CAPTURE_FRAME_MS", &raw)?;
        }

        Ok(config)
    }

    /// Radii drawn while nothing is happening
    pub fn idle_radii(&self) -> crate::motion::RadiusPair {
        crate::motion::RadiusPair::new(self.idle_outer_radius, self.idle_inner_radius)
    }

    /// Radii drawn while recording
    pub fn recording_radii(&self) -> crate::motion::RadiusPair {
        crate::motion::RadiusPair::new(
            self.idle_outer_radius + self.outer_growth,
            self.idle_inner_radius - self.inner_shrink,
        )
    }

    /// Radii at the peak of the capture pulse
    pub fn pulse_radii(&self) -> crate::motion::RadiusPair {
        crate::motion::RadiusPair::new(
            self.idle_outer_radius + self.pulse_outer_growth,
            self.idle_inner_radius - self.pulse_inner_shrink,
        )
    }

    /// Interval between progress ticks, one degree of arc each
    pub fn tick_interval(&self) -> Duration {
        self.max_record_duration / TICKS_PER_RECORDING
    }
}

fn read_var(name: &'static str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read {name}")),
    }
}

fn parse_millis(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: raw.to_string(),
        })
}

fn parse_size(raw: &str) -> Result<f32, ConfigError> {
    let size = raw
        .trim()
        .parse::<f32>()
        .map_err(|_| ConfigError::InvalidNumber {
            name: "CAPTURE_BUTTON_SIZE",
            value: raw.to_string(),
        })?;

    if !size.is_finite() || size <= 0.0 {
        return Err(ConfigError::NonPositiveSize(size));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_geometry() {
        let config = Config::from_button_size(240.0);
        assert_eq!(config.idle_outer_radius, 120.0);
        assert_eq!(config.idle_inner_radius, 90.0);
        assert_eq!(config.outer_growth, 48.0);
        assert_eq!(config.inner_shrink, 30.0);
        assert_eq!(config.stroke_width, 16.0);
    }

    #[test]
    fn test_default_timings() {
        let config = Config::default();
        assert_eq!(config.animation_duration, Duration::from_millis(100));
        assert_eq!(config.long_press_threshold, Duration::from_millis(500));
        assert_eq!(config.max_record_duration, Duration::from_millis(10_000));
    }

    #[test]
    fn test_recording_radii() {
        let config = Config::from_button_size(200.0);
        let radii = config.recording_radii();
        assert_eq!(radii.outer, 140.0);
        assert_eq!(radii.inner, 50.0);
    }

    #[test]
    fn test_tick_interval_is_one_degree() {
        let config = Config::default();
        let interval = config.tick_interval();
        assert_eq!(interval.as_micros(), 27_777);
    }

    #[test]
    fn test_parse_millis() {
        assert_eq!(
            parse_millis("X", " 250 ").unwrap(),
            Duration::from_millis(250)
        );
        assert!(matches!(
            parse_millis("X", "-5"),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(parse_millis("X", "soon").is_err());
    }

    #[test]
    fn test_parse_size_rejects_non_positive() {
        assert_eq!(parse_size("120").unwrap(), 120.0);
        assert!(matches!(parse_size("0"), Err(ConfigError::NonPositiveSize(_))));
        assert!(matches!(
            parse_size("big"),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_config_load() {
        let config = tokio_test::assert_ok!(Config::load());
        assert!(config.button_size > 0.0);
    }
}

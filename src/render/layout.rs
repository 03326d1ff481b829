//! Pixel layout of the button
//!
//! The view is sized so the fully grown outer circle fits, with the
//! progress arc stroked just inside that circle's edge.

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned bounds, y growing downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Where everything is drawn, derived once from the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Width and height of the square view
    pub measured_size: f32,
    pub center: Point,
    pub stroke_width: f32,
    /// Bounds of the circle the progress arc follows
    pub arc_bounds: Rect,
}

impl Layout {
    pub fn new(config: &Config) -> Self {
        let measured_size = config.button_size + config.outer_growth * 2.0;
        let c = measured_size / 2.0;
        let arc_radius = config.button_size / 2.0 + config.outer_growth - config.stroke_width / 2.0;

        Self {
            measured_size,
            center: Point { x: c, y: c },
            stroke_width: config.stroke_width,
            arc_bounds: Rect {
                left: c - arc_radius,
                top: c - arc_radius,
                right: c + arc_radius,
                bottom: c + arc_radius,
            },
        }
    }

    /// Measured size rounded down to whole pixels, as a view reports it
    pub fn measured_pixels(&self) -> u32 {
        self.measured_size.max(0.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measured_size_fits_grown_circle() {
        let config = Config::from_button_size(200.0);
        let layout = Layout::new(&config);

        assert_eq!(layout.measured_size, 280.0);
        assert_eq!(layout.measured_pixels(), 280);
        assert_eq!(layout.center, Point { x: 140.0, y: 140.0 });
        // grown outer radius touches the view edge
        assert_eq!(config.recording_radii().outer, layout.measured_size / 2.0);
    }

    #[test]
    fn test_arc_sits_inside_grown_circle() {
        let config = Config::from_button_size(150.0);
        let layout = Layout::new(&config);
        let bounds = layout.arc_bounds;

        assert_eq!(bounds.width(), bounds.height());
        let arc_radius = bounds.width() / 2.0;
        let grown = config.recording_radii().outer;
        assert!((grown - arc_radius - config.stroke_width / 2.0).abs() < 1e-4);
    }
}

//! Painting a snapshot
//!
//! Outer filled circle, inner filled circle, and while recording a stroked
//! arc starting at 12 o'clock.

use crate::events::Snapshot;
use crate::state::Mode;

use super::layout::{Layout, Point, Rect};

/// Where the progress arc starts, in degrees clockwise from 3 o'clock
pub const ARC_START_ANGLE: f32 = -90.0;

/// An ARGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha() == 0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Colors used to paint the button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub outer: Color,
    pub inner: Color,
    pub progress: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            outer: Color(0xEECC_CCCC),
            inner: Color(0xFFFF_FFFF),
            progress: Color(0xEE16_AE16),
        }
    }
}

/// Drawing surface provided by the host
pub trait Canvas {
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    fn stroke_arc(
        &mut self,
        bounds: Rect,
        start_angle: f32,
        sweep_angle: f32,
        stroke_width: f32,
        color: Color,
    );
}

/// Paint one frame
pub fn paint<C: Canvas + ?Sized>(
    snapshot: &Snapshot,
    layout: &Layout,
    palette: &Palette,
    canvas: &mut C,
) {
    for (radius, color) in [
        (snapshot.radii.outer, palette.outer),
        (snapshot.radii.inner, palette.inner),
    ] {
        if !color.is_transparent() {
            canvas.fill_circle(layout.center, radius, color);
        }
    }

    if snapshot.mode == Mode::Recording && !palette.progress.is_transparent() {
        canvas.stroke_arc(
            layout.arc_bounds,
            ARC_START_ANGLE,
            snapshot.progress,
            layout.stroke_width,
            palette.progress,
        );
    }
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillCircle {
        center: Point,
        radius: f32,
        color: Color,
    },
    StrokeArc {
        bounds: Rect,
        start_angle: f32,
        sweep_angle: f32,
        stroke_width: f32,
        color: Color,
    },
}

impl std::fmt::Display for DrawOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawOp::FillCircle {
                center,
                radius,
                color,
            } => write!(
                f,
                "circle ({:.1}, {:.1}) r={:.1} {}",
                center.x, center.y, radius, color
            ),
            DrawOp::StrokeArc {
                start_angle,
                sweep_angle,
                stroke_width,
                color,
                ..
            } => write!(
                f,
                "arc from {:.0}° sweep {:.1}° width {:.1} {}",
                start_angle, sweep_angle, stroke_width, color
            ),
        }
    }
}

/// Canvas that records draw calls instead of rasterizing them
#[derive(Debug, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for DisplayList {
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_arc(
        &mut self,
        bounds: Rect,
        start_angle: f32,
        sweep_angle: f32,
        stroke_width: f32,
        color: Color,
    ) {
        self.ops.push(DrawOp::StrokeArc {
            bounds,
            start_angle,
            sweep_angle,
            stroke_width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::motion::RadiusPair;

    fn snapshot(mode: Mode, progress: f32) -> Snapshot {
        Snapshot {
            mode,
            radii: RadiusPair::new(100.0, 75.0),
            progress,
        }
    }

    #[test]
    fn test_idle_paints_two_circles() {
        let layout = Layout::new(&Config::default());
        let mut canvas = DisplayList::new();

        paint(&snapshot(Mode::Idle, 0.0), &layout, &Palette::default(), &mut canvas);

        assert_eq!(canvas.ops().len(), 2);
        assert!(matches!(
            canvas.ops()[0],
            DrawOp::FillCircle { radius, .. } if radius == 100.0
        ));
        assert!(matches!(
            canvas.ops()[1],
            DrawOp::FillCircle { radius, .. } if radius == 75.0
        ));
    }

    #[test]
    fn test_recording_adds_arc_from_twelve_oclock() {
        let layout = Layout::new(&Config::default());
        let palette = Palette::default();
        let mut canvas = DisplayList::new();

        paint(&snapshot(Mode::Recording, 90.0), &layout, &palette, &mut canvas);

        assert_eq!(canvas.ops().len(), 3);
        assert_eq!(
            canvas.ops()[2],
            DrawOp::StrokeArc {
                bounds: layout.arc_bounds,
                start_angle: -90.0,
                sweep_angle: 90.0,
                stroke_width: layout.stroke_width,
                color: palette.progress,
            }
        );
    }

    #[test]
    fn test_long_pressed_has_no_arc() {
        let layout = Layout::new(&Config::default());
        let mut canvas = DisplayList::new();

        paint(
            &snapshot(Mode::LongPressed, 0.0),
            &layout,
            &Palette::default(),
            &mut canvas,
        );
        assert_eq!(canvas.ops().len(), 2);

        canvas.clear();
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_transparent_layers_are_skipped() {
        let layout = Layout::new(&Config::default());
        let palette = Palette {
            outer: Color(0x00CC_CCCC),
            progress: Color(0x0016_AE16),
            ..Palette::default()
        };
        let mut canvas = DisplayList::new();

        paint(&snapshot(Mode::Recording, 90.0), &layout, &palette, &mut canvas);

        assert_eq!(canvas.ops().len(), 1);
        assert!(matches!(
            canvas.ops()[0],
            DrawOp::FillCircle { color, .. } if color == palette.inner
        ));
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Palette::default().progress.to_string(), "#EE16AE16");
        assert_eq!(Palette::default().outer.alpha(), 0xEE);
    }
}

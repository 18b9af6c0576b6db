//! Screen ↔ design coordinate mapping.
//!
//! Two conventions coexist: absolute design pixels (texts, graphics, logo)
//! and percentages of the canvas (photo placement). Call sites pick one.

use crate::config::clamp_range;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Distance in design pixels that draggable elements keep from the canvas edge.
pub const DRAG_MARGIN: f64 = 20.0;
/// Horizontal limits of the percentage convention.
pub const PERCENT_MIN_X: f64 = 5.0;
pub const PERCENT_MAX_X: f64 = 95.0;
/// Vertical limits of the percentage convention (the printable text zone).
pub const TEXT_ZONE_TOP: f64 = 10.0;
pub const TEXT_ZONE_BOTTOM: f64 = 90.0;

/// Maps pointer positions on screen to the nominal canvas and back.
///
/// `origin` is the top-left corner of the canvas on screen and `zoom` the
/// on-screen scale of one design pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    pub origin: Point,
    pub zoom: f64,
    /// Nominal canvas size of the active orientation.
    pub canvas: Size,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            zoom: 1.0,
            canvas: Size::new(400.0, 260.0),
        }
    }
}

impl CoordinateMapper {
    pub fn new(origin: Point, zoom: f64, canvas: Size) -> Self {
        Self {
            origin,
            zoom: sanitize_zoom(zoom),
            canvas,
        }
    }

    /// Zoom actually used for mapping; a non-positive or non-finite zoom maps as 1.
    pub fn effective_zoom(&self) -> f64 {
        sanitize_zoom(self.zoom)
    }

    /// Design → screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::scale(self.effective_zoom())
    }

    /// Screen → design transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.effective_zoom()) * Affine::translate(-self.origin.to_vec2())
    }

    /// Convert a screen point to design space, unclamped.
    pub fn to_design(&self, screen: Point) -> Point {
        let zoom = self.effective_zoom();
        Point::new((screen.x - self.origin.x) / zoom, (screen.y - self.origin.y) / zoom)
    }

    /// Convert a design point to screen space.
    pub fn to_screen(&self, design: Point) -> Point {
        let zoom = self.effective_zoom();
        Point::new(design.x * zoom + self.origin.x, design.y * zoom + self.origin.y)
    }

    /// Convert a screen point to design space and keep it inside the drag margin.
    pub fn to_design_clamped(&self, screen: Point) -> Point {
        clamp_position(self.to_design(screen), self.canvas)
    }

    /// Convert a screen-space delta to a design-space delta.
    pub fn delta_to_design(&self, delta: Vec2) -> Vec2 {
        delta / self.effective_zoom()
    }

    /// Convert a design point to percentages of the canvas.
    pub fn to_percent(&self, design: Point) -> Point {
        to_percent(design, self.canvas)
    }

    /// Convert percentages of the canvas to a design point.
    pub fn from_percent(&self, percent: Point) -> Point {
        from_percent(percent, self.canvas)
    }
}

fn sanitize_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 }
}

/// Clamp a design point into `[DRAG_MARGIN, W - DRAG_MARGIN] × [DRAG_MARGIN, H - DRAG_MARGIN]`.
pub fn clamp_position(point: Point, canvas: Size) -> Point {
    let x = if point.x.is_nan() { canvas.width / 2.0 } else { point.x };
    let y = if point.y.is_nan() { canvas.height / 2.0 } else { point.y };
    Point::new(
        clamp_range(x, DRAG_MARGIN, canvas.width - DRAG_MARGIN),
        clamp_range(y, DRAG_MARGIN, canvas.height - DRAG_MARGIN),
    )
}

/// Clamp a percentage point into `[5, 95] × [TEXT_ZONE_TOP, TEXT_ZONE_BOTTOM]`.
pub fn clamp_percent(percent: Point) -> Point {
    let x = if percent.x.is_nan() { 50.0 } else { percent.x };
    let y = if percent.y.is_nan() { 50.0 } else { percent.y };
    Point::new(
        x.clamp(PERCENT_MIN_X, PERCENT_MAX_X),
        y.clamp(TEXT_ZONE_TOP, TEXT_ZONE_BOTTOM),
    )
}

pub fn to_percent(design: Point, canvas: Size) -> Point {
    if canvas.width <= 0.0 || canvas.height <= 0.0 {
        return Point::new(50.0, 50.0);
    }
    Point::new(design.x / canvas.width * 100.0, design.y / canvas.height * 100.0)
}

pub fn from_percent(percent: Point, canvas: Size) -> Point {
    Point::new(percent.x / 100.0 * canvas.width, percent.y / 100.0 * canvas.height)
}

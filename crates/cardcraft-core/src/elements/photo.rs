//! Photo placement, kept in percentage space.

use super::ImageRef;
use crate::config::EditorConfig;
use crate::mapper::clamp_percent;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Width of the photo window relative to the canvas width, in percent.
pub const PHOTO_BASE_WIDTH_PCT: f64 = 40.0;
/// Height of the photo window relative to the canvas height, in percent.
pub const PHOTO_BASE_HEIGHT_PCT: f64 = 50.0;

/// The portrait photo of a memorial card.
///
/// `x_pct`/`y_pct` locate the window center as a percentage of the canvas;
/// `zoom` magnifies the image inside the fixed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPlacement {
    pub source: ImageRef,
    pub x_pct: f64,
    pub y_pct: f64,
    pub zoom: f64,
}

impl PhotoPlacement {
    pub fn new(source: ImageRef) -> Self {
        Self {
            source,
            x_pct: 50.0,
            y_pct: 50.0,
            zoom: 1.0,
        }
    }

    pub fn position_pct(&self) -> Point {
        Point::new(self.x_pct, self.y_pct)
    }

    pub fn set_position_pct(&mut self, position: Point) {
        let clamped = clamp_percent(position);
        self.x_pct = clamped.x;
        self.y_pct = clamped.y;
    }

    /// The photo window in design space for a canvas of `canvas` size.
    pub fn window(&self, canvas: Size) -> Rect {
        let center = Point::new(self.x_pct / 100.0 * canvas.width, self.y_pct / 100.0 * canvas.height);
        let size = Size::new(
            PHOTO_BASE_WIDTH_PCT / 100.0 * canvas.width,
            PHOTO_BASE_HEIGHT_PCT / 100.0 * canvas.height,
        );
        Rect::from_center_size(center, size)
    }

    pub fn hit_test(&self, point: Point, canvas: Size, tolerance: f64) -> bool {
        self.window(canvas).inflate(tolerance, tolerance).contains(point)
    }

    pub fn normalize(&mut self, config: &EditorConfig) {
        self.zoom = config.photo_zoom.clamp(self.zoom);
        self.set_position_pct(self.position_pct());
    }
}

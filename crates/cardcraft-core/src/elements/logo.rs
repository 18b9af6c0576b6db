//! Logo placement.

use super::ImageRef;
use crate::config::EditorConfig;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Edge length of a logo at scale 1.0, in design pixels.
pub const LOGO_BASE_SIZE: f64 = 60.0;

/// A brand or emblem image placed on a side.
///
/// `x`/`y` is the center in design space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    pub source: ImageRef,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl Logo {
    pub fn new(source: ImageRef, position: Point) -> Self {
        Self {
            source,
            x: position.x,
            y: position.y,
            scale: 1.0,
            opacity: 1.0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn bounds(&self) -> Rect {
        let size = LOGO_BASE_SIZE * self.scale;
        Rect::from_center_size(self.position(), (size, size))
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    pub fn normalize(&mut self, config: &EditorConfig) {
        self.scale = config.logo_scale.clamp(self.scale);
        self.opacity = config.opacity.clamp(self.opacity);
    }
}

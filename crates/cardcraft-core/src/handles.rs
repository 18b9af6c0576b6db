//! Manipulation handles drawn around a selected graphic.

use crate::elements::{GraphicElement, rotate_about};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 14.0;
/// Distance from the top edge to the rotation handle, in design pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Rotate,
}

/// A handle with its design-space position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// `tolerance` is in design pixels; divide the screen tolerance by zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.position.distance_squared(point) <= tolerance * tolerance
    }
}

/// Handles of a graphic: four corners plus the rotation handle, rotated with
/// the element. Locked graphics have none.
pub fn graphic_handles(graphic: &GraphicElement) -> Vec<Handle> {
    if graphic.locked {
        return Vec::new();
    }
    let [tl, tr, br, bl] = graphic.corners();
    let center = graphic.position();
    let rotate = rotate_about(
        Point::new(center.x, center.y - graphic.height / 2.0 - ROTATE_HANDLE_OFFSET),
        center,
        graphic.rotation,
    );
    vec![
        Handle::new(tl, HandleKind::Corner(Corner::TopLeft)),
        Handle::new(tr, HandleKind::Corner(Corner::TopRight)),
        Handle::new(br, HandleKind::Corner(Corner::BottomRight)),
        Handle::new(bl, HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(rotate, HandleKind::Rotate),
    ]
}

/// Find which handle (if any) is hit at a design-space point.
pub fn hit_test_handles(graphic: &GraphicElement, point: Point, tolerance: f64) -> Option<HandleKind> {
    graphic_handles(graphic)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

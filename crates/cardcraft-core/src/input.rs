//! Pointer input delivered to the editor.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Identifier of one pointer (mouse, pen or a single touch contact).
pub type PointerId = u64;

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { pointer: PointerId, position: Point },
    Move { pointer: PointerId, position: Point },
    Up { pointer: PointerId, position: Point },
    /// Forced cancellation or loss of pointer capture.
    Cancel { pointer: PointerId },
    Wheel { position: Point, delta: Vec2 },
}

impl PointerEvent {
    pub fn pointer(&self) -> Option<PointerId> {
        match self {
            PointerEvent::Down { pointer, .. }
            | PointerEvent::Move { pointer, .. }
            | PointerEvent::Up { pointer, .. }
            | PointerEvent::Cancel { pointer } => Some(*pointer),
            PointerEvent::Wheel { .. } => None,
        }
    }

    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Wheel { position, .. } => Some(*position),
            PointerEvent::Cancel { .. } => None,
        }
    }
}

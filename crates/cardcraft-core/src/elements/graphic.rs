//! Graphic elements: shapes, icons, stickers, lines and images.

use super::{ElementId, ImageRef, SerializableColor, point_to_segment_dist, rotate_about, wrap_rotation};
use crate::config::EditorConfig;
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default edge length of a newly added graphic.
pub const DEFAULT_GRAPHIC_SIZE: f64 = 60.0;

/// Outline family of a shape graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Heart,
    Star,
    Diamond,
}

impl ShapeKind {
    /// Outline centered on the origin, fitting a `size` × `size` box.
    pub fn outline(&self, size: f64) -> BezPath {
        let half = size / 2.0;
        match self {
            ShapeKind::Rectangle => Rect::new(-half, -half, half, half).to_path(0.1),
            ShapeKind::Circle => Circle::new(Point::ZERO, half).to_path(0.1),
            ShapeKind::Diamond => {
                let mut path = BezPath::new();
                path.move_to((0.0, -half));
                path.line_to((half, 0.0));
                path.line_to((0.0, half));
                path.line_to((-half, 0.0));
                path.close_path();
                path
            }
            ShapeKind::Star => {
                let mut path = BezPath::new();
                let inner = half * 0.4;
                for i in 0..10 {
                    let radius = if i % 2 == 0 { half } else { inner };
                    let angle = std::f64::consts::PI * (i as f64) / 5.0 - std::f64::consts::FRAC_PI_2;
                    let p = Point::new(radius * angle.cos(), radius * angle.sin());
                    if i == 0 {
                        path.move_to(p);
                    } else {
                        path.line_to(p);
                    }
                }
                path.close_path();
                path
            }
            ShapeKind::Heart => {
                let mut path = BezPath::new();
                path.move_to((0.0, half));
                path.curve_to((-half * 1.4, -half * 0.1), (-half * 0.6, -half * 1.1), (0.0, -half * 0.45));
                path.curve_to((half * 0.6, -half * 1.1), (half * 1.4, -half * 0.1), (0.0, half));
                path.close_path();
                path
            }
        }
    }
}

/// Variant-specific payload of a graphic.
///
/// Matching on this enum is exhaustive, so adding a variant forces every
/// renderer and manipulator to handle it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphicKind {
    Shape {
        shape: ShapeKind,
        fill: SerializableColor,
    },
    Icon {
        name: String,
        color: SerializableColor,
    },
    Sticker {
        emoji: String,
    },
    Line {
        color: SerializableColor,
        thickness: f64,
    },
    Image {
        /// `None` until the upload collaborator's reference has decoded.
        source: Option<ImageRef>,
    },
}

impl GraphicKind {
    /// Short name used in logs and visual keys.
    pub fn name(&self) -> &'static str {
        match self {
            GraphicKind::Shape { .. } => "shape",
            GraphicKind::Icon { .. } => "icon",
            GraphicKind::Sticker { .. } => "sticker",
            GraphicKind::Line { .. } => "line",
            GraphicKind::Image { .. } => "image",
        }
    }
}

/// A decorative graphic placed on a card face.
///
/// `x`/`y` is the center in design space; `width` always equals `height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicElement {
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees in `[0, 360)`.
    pub rotation: f64,
    /// In `[0.1, 1.0]`.
    pub opacity: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: GraphicKind,
}

impl GraphicElement {
    /// Create a graphic centered at `position` with the default size.
    pub fn new(kind: GraphicKind, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            width: DEFAULT_GRAPHIC_SIZE,
            height: DEFAULT_GRAPHIC_SIZE,
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            kind,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Edge length (width and height are kept equal).
    pub fn size(&self) -> f64 {
        self.width
    }

    /// Set both edges to `size`, clamped to the configured bounds.
    pub fn set_size(&mut self, size: f64, config: &EditorConfig) {
        let size = config.graphic_size.clamp(size);
        self.width = size;
        self.height = size;
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = wrap_rotation(degrees);
    }

    pub fn set_opacity(&mut self, opacity: f64, config: &EditorConfig) {
        self.opacity = config.opacity.clamp(opacity);
    }

    /// Unrotated bounding box in design space.
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position(), (self.width, self.height))
    }

    /// Transform from the element's local frame (centered at the origin) to design space.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position().to_vec2()) * Affine::rotate(self.rotation.to_radians())
    }

    /// Check if a design-space point hits the graphic, honoring rotation.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = rotate_about(point, self.position(), -self.rotation) - self.position().to_vec2();
        match &self.kind {
            GraphicKind::Line { thickness, .. } => {
                let half = self.width / 2.0;
                point_to_segment_dist(local, Point::new(-half, 0.0), Point::new(half, 0.0))
                    <= thickness / 2.0 + tolerance
            }
            _ => Rect::from_center_size(Point::ZERO, (self.width, self.height))
                .inflate(tolerance, tolerance)
                .contains(local),
        }
    }

    /// Corners of the rotated box, clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        let b = self.bounds();
        let center = self.position();
        [
            rotate_about(Point::new(b.x0, b.y0), center, self.rotation),
            rotate_about(Point::new(b.x1, b.y0), center, self.rotation),
            rotate_about(Point::new(b.x1, b.y1), center, self.rotation),
            rotate_about(Point::new(b.x0, b.y1), center, self.rotation),
        ]
    }

    /// Enforce size, opacity and rotation invariants.
    pub fn normalize(&mut self, config: &EditorConfig) {
        let size = if self.width.is_finite() { self.width.max(self.height) } else { self.height };
        self.set_size(size, config);
        self.set_opacity(self.opacity, config);
        self.set_rotation(self.rotation);
    }

    pub(crate) fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    pub(crate) fn offset(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}

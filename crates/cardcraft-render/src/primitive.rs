//! Drawable primitives shared by both render backends.

use cardcraft_core::{ElementId, ImageRef, SerializableColor};
use kurbo::{Affine, BezPath, Point, Rect, Shape};

/// How a primitive is colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(SerializableColor),
    /// Two-stop gradient along `start → end` in the primitive's local space.
    Linear {
        start: Point,
        end: Point,
        from: SerializableColor,
        to: SerializableColor,
    },
}

impl Paint {
    /// Color at a local-space point.
    pub fn color_at(&self, point: Point) -> SerializableColor {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear { start, end, from, to } => {
                let axis = *end - *start;
                let len_sq = axis.hypot2();
                let t = if len_sq < f64::EPSILON {
                    0.0
                } else {
                    ((point - *start).dot(axis) / len_sq).clamp(0.0, 1.0)
                };
                let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
                SerializableColor::new(mix(from.r, to.r), mix(from.g, to.g), mix(from.b, to.b), mix(from.a, to.a))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub paint: Paint,
    /// Alternating on/off lengths, starting with "on".
    pub dash: Option<Vec<f64>>,
}

impl StrokeStyle {
    pub fn solid(width: f64, color: SerializableColor) -> Self {
        Self {
            width,
            paint: Paint::Solid(color),
            dash: None,
        }
    }

    pub fn dashed(mut self, pattern: &[f64]) -> Self {
        self.dash = Some(pattern.to_vec());
        self
    }
}

/// A drawing command in the owning visual's local space.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        rect: Rect,
        fill: Option<Paint>,
        stroke: Option<StrokeStyle>,
        /// Edge softness in design pixels (0 = hard edge).
        blur: f64,
    },
    Line {
        from: Point,
        to: Point,
        stroke: StrokeStyle,
    },
    Path {
        path: BezPath,
        fill: Option<Paint>,
        stroke: Option<StrokeStyle>,
    },
    Text {
        content: String,
        /// Layout box; the text is centered in it.
        bounds: Rect,
        font_family: String,
        font_size: f64,
        color: SerializableColor,
        scale_x: f64,
        scale_y: f64,
    },
    /// An icon (by name) or an emoji sticker, fitted into `bounds`.
    Glyph {
        symbol: String,
        bounds: Rect,
        color: SerializableColor,
    },
    Image {
        source: ImageRef,
        rect: Rect,
        /// Drawing is restricted to this rect when set.
        clip: Option<Rect>,
    },
    /// Stand-in for an image that has not decoded (yet).
    Placeholder { rect: Rect },
}

impl Primitive {
    /// Bounding box in local space, including stroke width.
    pub fn bounds(&self) -> Rect {
        match self {
            Primitive::Rect { rect, stroke, blur, .. } => {
                let grow = stroke.as_ref().map_or(0.0, |s| s.width / 2.0) + blur;
                rect.inflate(grow, grow)
            }
            Primitive::Line { from, to, stroke } => {
                let half = stroke.width / 2.0;
                Rect::from_points(*from, *to).inflate(half, half)
            }
            Primitive::Path { path, stroke, .. } => {
                let half = stroke.as_ref().map_or(0.0, |s| s.width / 2.0);
                path.bounding_box().inflate(half, half)
            }
            Primitive::Text { bounds, .. } | Primitive::Glyph { bounds, .. } => *bounds,
            Primitive::Image { rect, clip, .. } => clip.map_or(*rect, |c| rect.intersect(c)),
            Primitive::Placeholder { rect } => *rect,
        }
    }
}

/// Paint order group. Lower layers are always drawn first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Frame,
    Content,
    /// Selection outline, handles and caret; hidden on export.
    Chrome,
}

/// Stable identity of a visual across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKey {
    Background,
    Frame,
    Photo,
    Logo,
    Element(ElementId),
    Selection,
    Handles,
    Caret,
}

/// One long-lived drawable: a keyed group of primitives with a transform
/// from its local space to design space.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub key: VisualKey,
    pub layer: Layer,
    pub transform: Affine,
    pub opacity: f64,
    pub primitives: Vec<Primitive>,
}

impl Visual {
    pub fn new(key: VisualKey, layer: Layer, primitives: Vec<Primitive>) -> Self {
        Self {
            key,
            layer,
            transform: Affine::IDENTITY,
            opacity: 1.0,
            primitives,
        }
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Check if a design-space point falls on one of the primitives.
    pub fn hit_test(&self, point: Point) -> bool {
        let local = self.transform.inverse() * point;
        self.primitives.iter().any(|p| p.bounds().contains(local))
    }
}

/// Visuals in paint order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayList {
    pub visuals: Vec<Visual>,
}

impl DisplayList {
    pub fn keys(&self) -> Vec<VisualKey> {
        self.visuals.iter().map(|v| v.key).collect()
    }

    pub fn get(&self, key: VisualKey) -> Option<&Visual> {
        self.visuals.iter().find(|v| v.key == key)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Front-most content visual under a design-space point.
    pub fn hit_test(&self, point: Point) -> Option<VisualKey> {
        self.visuals
            .iter()
            .rev()
            .filter(|v| v.layer == Layer::Content)
            .find(|v| v.hit_test(point))
            .map(|v| v.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_paint_endpoints() {
        let paint = Paint::Linear {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 0.0),
            from: SerializableColor::black(),
            to: SerializableColor::white(),
        };
        assert_eq!(paint.color_at(Point::new(-5.0, 3.0)), SerializableColor::black());
        assert_eq!(paint.color_at(Point::new(100.0, 0.0)), SerializableColor::white());
        assert_eq!(paint.color_at(Point::new(50.0, 9.0)).r, 128);
    }

    #[test]
    fn test_bounds_include_stroke() {
        let rect = Primitive::Rect {
            rect: Rect::new(10.0, 10.0, 20.0, 20.0),
            fill: None,
            stroke: Some(StrokeStyle::solid(2.0, SerializableColor::black())),
            blur: 0.0,
        };
        assert_eq!(rect.bounds(), Rect::new(9.0, 9.0, 21.0, 21.0));
    }

    #[test]
    fn test_rotated_visual_hit_test() {
        let visual = Visual::new(
            VisualKey::Logo,
            Layer::Content,
            vec![Primitive::Placeholder {
                rect: Rect::new(-50.0, -5.0, 50.0, 5.0),
            }],
        )
        .with_transform(Affine::translate((100.0, 100.0)) * Affine::rotate(std::f64::consts::FRAC_PI_2));
        assert!(visual.hit_test(Point::new(100.0, 140.0)));
        assert!(!visual.hit_test(Point::new(140.0, 100.0)));
    }
}

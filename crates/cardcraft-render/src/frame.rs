//! Frame Renderer: border primitives for each frame style.

use crate::primitive::{Paint, Primitive, StrokeStyle};
use cardcraft_core::{FrameStyle, SerializableColor};
use kurbo::{Point, Rect, Size, Vec2};

/// Second color of the gradient frame.
pub const GRADIENT_ACCENT: SerializableColor = SerializableColor::new(212, 175, 55, 255);
/// Inset of a single border from the canvas edge.
pub const FRAME_INSET: f64 = 8.0;
/// Length of each corner bracket arm.
pub const CORNER_ARM: f64 = 22.0;
/// Inset of corner brackets from the canvas edge.
pub const CORNER_INSET: f64 = 10.0;

const SHADOW_OFFSET: f64 = 4.0;
const SHADOW_BLUR: f64 = 4.0;

/// Border primitives for a frame, in design space, back to front.
pub fn frame_primitives(style: FrameStyle, color: SerializableColor, size: Size) -> Vec<Primitive> {
    let solid = |width: f64| StrokeStyle::solid(width, color);
    match style {
        FrameStyle::Solid => vec![outline(inset(size, FRAME_INSET), solid(2.5))],
        FrameStyle::Double => vec![
            outline(inset(size, 6.0), solid(2.0)),
            outline(inset(size, 12.0), solid(1.0)),
        ],
        FrameStyle::Gradient => {
            let stroke = StrokeStyle {
                width: 3.0,
                paint: Paint::Linear {
                    start: Point::ZERO,
                    end: Point::new(size.width, size.height),
                    from: color,
                    to: GRADIENT_ACCENT,
                },
                dash: None,
            };
            vec![outline(inset(size, FRAME_INSET), stroke)]
        }
        FrameStyle::Ornate => vec![
            outline(inset(size, FRAME_INSET), solid(2.0)),
            outline(inset(size, FRAME_INSET + 3.0), solid(1.0)),
        ],
        FrameStyle::Dashed => vec![outline(inset(size, FRAME_INSET), solid(2.0).dashed(&[10.0, 5.0]))],
        FrameStyle::Dotted => vec![outline(inset(size, FRAME_INSET), solid(2.0).dashed(&[2.0, 4.0]))],
        FrameStyle::Inset => vec![
            outline(inset(size, 6.0), solid(2.0)),
            outline(inset(size, 20.0), solid(1.0)),
        ],
        FrameStyle::Shadow => {
            let shadow = inset(size, FRAME_INSET + SHADOW_BLUR) + Vec2::new(SHADOW_OFFSET, SHADOW_OFFSET);
            vec![
                Primitive::Rect {
                    rect: shadow,
                    fill: None,
                    stroke: Some(StrokeStyle::solid(3.0, color.with_opacity(0.35))),
                    blur: SHADOW_BLUR,
                },
                outline(inset(size, FRAME_INSET), solid(2.0)),
            ]
        }
        FrameStyle::Corner => corner_brackets(size, color),
    }
}

fn inset(size: Size, amount: f64) -> Rect {
    Rect::new(amount, amount, size.width - amount, size.height - amount)
}

fn outline(rect: Rect, stroke: StrokeStyle) -> Primitive {
    Primitive::Rect {
        rect,
        fill: None,
        stroke: Some(stroke),
        blur: 0.0,
    }
}

/// Two short arms per corner, no continuous border.
fn corner_brackets(size: Size, color: SerializableColor) -> Vec<Primitive> {
    let (l, t) = (CORNER_INSET, CORNER_INSET);
    let (r, b) = (size.width - CORNER_INSET, size.height - CORNER_INSET);
    let corners = [
        (Point::new(l, t), 1.0, 1.0),
        (Point::new(r, t), -1.0, 1.0),
        (Point::new(r, b), -1.0, -1.0),
        (Point::new(l, b), 1.0, -1.0),
    ];
    corners
        .into_iter()
        .flat_map(|(corner, dx, dy)| {
            let stroke = StrokeStyle::solid(2.0, color);
            [
                Primitive::Line {
                    from: corner,
                    to: Point::new(corner.x + dx * CORNER_ARM, corner.y),
                    stroke: stroke.clone(),
                },
                Primitive::Line {
                    from: corner,
                    to: Point::new(corner.x, corner.y + dy * CORNER_ARM),
                    stroke,
                },
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANDSCAPE: Size = Size::new(400.0, 260.0);

    fn brown() -> SerializableColor {
        SerializableColor::new(0x8b, 0x73, 0x55, 255)
    }

    #[test]
    fn test_corner_style_has_eight_short_lines() {
        let primitives = frame_primitives(FrameStyle::Corner, brown(), LANDSCAPE);
        assert_eq!(primitives.len(), 8);
        for primitive in &primitives {
            let Primitive::Line { from, to, .. } = primitive else {
                panic!("corner frame must only contain lines");
            };
            let length = from.distance(*to);
            assert!((20.0..=24.0).contains(&length), "length {length}");
            let near_x = from.x < 50.0 || from.x > 350.0;
            let near_y = from.y < 50.0 || from.y > 210.0;
            assert!(near_x && near_y, "line away from corners: {from:?}");
        }
    }

    #[test]
    fn test_rectangle_counts_per_style() {
        let count = |style| frame_primitives(style, brown(), LANDSCAPE).len();
        assert_eq!(count(FrameStyle::Solid), 1);
        assert_eq!(count(FrameStyle::Double), 2);
        assert_eq!(count(FrameStyle::Gradient), 1);
        assert_eq!(count(FrameStyle::Ornate), 2);
        assert_eq!(count(FrameStyle::Dashed), 1);
        assert_eq!(count(FrameStyle::Dotted), 1);
        assert_eq!(count(FrameStyle::Inset), 2);
        assert_eq!(count(FrameStyle::Shadow), 2);
    }

    #[test]
    fn test_dash_patterns() {
        let dash_of = |style| match frame_primitives(style, brown(), LANDSCAPE).remove(0) {
            Primitive::Rect { stroke: Some(stroke), .. } => stroke.dash,
            _ => None,
        };
        assert_eq!(dash_of(FrameStyle::Dashed), Some(vec![10.0, 5.0]));
        assert_eq!(dash_of(FrameStyle::Dotted), Some(vec![2.0, 4.0]));
    }

    #[test]
    fn test_inset_gap_larger_than_ornate() {
        let gap = |style| match frame_primitives(style, brown(), LANDSCAPE).as_slice() {
            [Primitive::Rect { rect: outer, .. }, Primitive::Rect { rect: inner, .. }] => inner.x0 - outer.x0,
            _ => panic!("expected two rectangles"),
        };
        assert!(gap(FrameStyle::Inset) > gap(FrameStyle::Ornate));
    }

    #[test]
    fn test_shadow_is_behind_and_soft() {
        let primitives = frame_primitives(FrameStyle::Shadow, brown(), LANDSCAPE);
        let Primitive::Rect { blur, .. } = &primitives[0] else {
            panic!("expected soft rectangle first");
        };
        assert!(*blur > 0.0);
    }

    #[test]
    fn test_frames_stay_on_canvas() {
        let canvas = Rect::from_origin_size(Point::ZERO, LANDSCAPE);
        for style in FrameStyle::ALL {
            for primitive in frame_primitives(style, brown(), LANDSCAPE) {
                let bounds = primitive.bounds();
                assert!(canvas.contains(bounds.origin()), "{style:?}");
                assert!(bounds.x1 <= canvas.x1 && bounds.y1 <= canvas.y1, "{style:?}");
            }
        }
    }
}

//! Text element.

use super::{ElementId, SerializableColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font family used when a template does not name one.
pub const DEFAULT_FONT_FAMILY: &str = "Playfair Display";
/// Default font size in design pixels.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Average advance of one glyph relative to the font size.
const GLYPH_ADVANCE: f64 = 0.55;
/// Line height relative to the font size.
const LINE_HEIGHT: f64 = 1.2;

/// Visual style and placement of a text element.
///
/// `x`/`y` is the anchor (center of the text block) in design-space pixels of
/// the current orientation's nominal canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub color: SerializableColor,
    pub x: f64,
    pub y: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            color: SerializableColor::new(0x3b, 0x2f, 0x2f, 255),
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// A block of text placed on a card face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub(crate) id: ElementId,
    pub content: String,
    pub style: TextStyle,
}

impl TextElement {
    /// Create a text element anchored at `position`.
    pub fn new(content: impl Into<String>, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            style: TextStyle {
                x: position.x,
                y: position.y,
                ..TextStyle::default()
            },
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn position(&self) -> Point {
        Point::new(self.style.x, self.style.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.style.x = position.x;
        self.style.y = position.y;
    }

    /// Lines of content; an empty string still occupies one line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Approximate layout size before scaling, from glyph count and line count.
    pub fn layout_size(&self) -> kurbo::Size {
        let (mut widest, mut count) = (0usize, 0usize);
        for line in self.lines() {
            widest = widest.max(line.chars().count());
            count += 1;
        }
        let width = (widest.max(1) as f64) * self.style.font_size * GLYPH_ADVANCE;
        let height = (count.max(1) as f64) * self.style.font_size * LINE_HEIGHT;
        kurbo::Size::new(width, height)
    }

    /// Bounding box in design space, centered on the anchor.
    pub fn bounds(&self) -> Rect {
        let size = self.layout_size();
        let half_w = size.width * self.style.scale_x.abs() / 2.0;
        let half_h = size.height * self.style.scale_y.abs() / 2.0;
        Rect::new(
            self.style.x - half_w,
            self.style.y - half_h,
            self.style.x + half_w,
            self.style.y + half_h,
        )
    }

    /// Check if a design-space point hits the text block.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Regenerate the id (used when duplicating).
    pub(crate) fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }
}

//! Scene → display list. Both backends draw exactly what this builds.

use crate::frame::frame_primitives;
use crate::primitive::{DisplayList, Layer, Paint, Primitive, StrokeStyle, Visual, VisualKey};
use cardcraft_core::elements::{LOGO_BASE_SIZE, PHOTO_BASE_HEIGHT_PCT, PHOTO_BASE_WIDTH_PCT};
use cardcraft_core::handles::{HANDLE_SIZE, HandleKind, graphic_handles};
use cardcraft_core::mapper::clamp_position;
use cardcraft_core::{
    Background, ElementKind, GraphicElement, GraphicKind, ImageSlot, SceneView, SerializableColor, TextElement,
};
use kurbo::{Affine, Circle, Point, Rect, Shape, Size};

/// Selection chrome color.
pub const SELECTION_COLOR: SerializableColor = SerializableColor::new(59, 130, 246, 255);
/// Gap between an element and its selection outline, in screen pixels.
const SELECTION_PADDING: f64 = 4.0;

/// How a scene is turned into visuals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Draw selection outline, handles and caret.
    pub show_chrome: bool,
    /// Screen zoom; chrome is sized in screen pixels.
    pub zoom: f64,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            show_chrome: true,
            zoom: 1.0,
        }
    }
}

impl SceneOptions {
    /// Options for raster export: no chrome.
    pub fn export() -> Self {
        Self {
            show_chrome: false,
            zoom: 1.0,
        }
    }

    fn chrome_scale(&self) -> f64 {
        if self.zoom.is_finite() && self.zoom > 0.0 { 1.0 / self.zoom } else { 1.0 }
    }
}

/// Fill color of a preset background texture.
pub fn texture_color(texture: &str) -> SerializableColor {
    match texture {
        "cream-linen" => SerializableColor::new(0xf5, 0xf0, 0xe6, 255),
        "soft-grey" => SerializableColor::new(0xee, 0xee, 0xec, 255),
        "confetti" => SerializableColor::new(0xff, 0xf4, 0xf8, 255),
        "ivory-silk" => SerializableColor::new(0xff, 0xfd, 0xf4, 255),
        "pine" => SerializableColor::new(0xe8, 0xf0, 0xe8, 255),
        _ => SerializableColor::white(),
    }
}

/// Build the visuals of one side in paint order: background, frame, photo,
/// logo, elements in z-order, then chrome.
pub fn build_display_list(view: &SceneView<'_>, options: &SceneOptions) -> DisplayList {
    let mut visuals = vec![background_visual(view)];
    visuals.push(Visual::new(
        VisualKey::Frame,
        Layer::Frame,
        frame_primitives(view.side.frame_style, view.side.frame_color, view.canvas),
    ));
    if let Some(photo) = photo_visual(view) {
        visuals.push(photo);
    }
    if let Some(logo) = logo_visual(view) {
        visuals.push(logo);
    }
    for element in view.side.ordered() {
        let visual = match element.kind {
            ElementKind::Text => view.side.text(element.id).map(text_visual),
            ElementKind::Graphic => view
                .side
                .graphic(element.id)
                .map(|g| graphic_visual(g, view.is_pending(ImageSlot::Graphic(g.id())))),
        };
        visuals.extend(visual);
    }
    if options.show_chrome {
        visuals.extend(chrome_visuals(view, options));
    }
    DisplayList { visuals }
}

fn background_visual(view: &SceneView<'_>) -> Visual {
    let canvas = Rect::from_origin_size(Point::ZERO, view.canvas);
    let primitive = if view.is_pending(ImageSlot::Background) {
        Primitive::Placeholder { rect: canvas }
    } else {
        match &view.side.background {
            Background::Preset { texture } => Primitive::Rect {
                rect: canvas,
                fill: Some(Paint::Solid(texture_color(texture))),
                stroke: None,
                blur: 0.0,
            },
            Background::Custom { image } => Primitive::Image {
                source: image.clone(),
                rect: canvas,
                clip: None,
            },
        }
    };
    Visual::new(VisualKey::Background, Layer::Background, vec![primitive])
}

fn default_photo_window(canvas: Size) -> Rect {
    Rect::from_center_size(
        Point::new(canvas.width / 2.0, canvas.height / 2.0),
        (
            PHOTO_BASE_WIDTH_PCT / 100.0 * canvas.width,
            PHOTO_BASE_HEIGHT_PCT / 100.0 * canvas.height,
        ),
    )
}

fn photo_visual(view: &SceneView<'_>) -> Option<Visual> {
    let pending = view.is_pending(ImageSlot::Photo);
    let primitive = match &view.side.photo {
        Some(photo) if !pending => {
            let window = photo.window(view.canvas);
            Primitive::Image {
                source: photo.source.clone(),
                rect: Rect::from_center_size(window.center(), window.size() * photo.zoom),
                clip: Some(window),
            }
        }
        Some(photo) => Primitive::Placeholder {
            rect: photo.window(view.canvas),
        },
        None if pending => Primitive::Placeholder {
            rect: default_photo_window(view.canvas),
        },
        None => return None,
    };
    Some(Visual::new(VisualKey::Photo, Layer::Content, vec![primitive]))
}

fn logo_visual(view: &SceneView<'_>) -> Option<Visual> {
    let pending = view.is_pending(ImageSlot::Logo);
    match &view.side.logo {
        Some(logo) => {
            let primitive = if pending {
                Primitive::Placeholder { rect: logo.bounds() }
            } else {
                Primitive::Image {
                    source: logo.source.clone(),
                    rect: logo.bounds(),
                    clip: None,
                }
            };
            Some(Visual::new(VisualKey::Logo, Layer::Content, vec![primitive]).with_opacity(logo.opacity))
        }
        None if pending => {
            let center = clamp_position(Point::new(LOGO_BASE_SIZE, LOGO_BASE_SIZE), view.canvas);
            let rect = Rect::from_center_size(center, (LOGO_BASE_SIZE, LOGO_BASE_SIZE));
            Some(Visual::new(VisualKey::Logo, Layer::Content, vec![Primitive::Placeholder { rect }]))
        }
        None => None,
    }
}

fn text_visual(text: &TextElement) -> Visual {
    let style = &text.style;
    Visual::new(
        VisualKey::Element(text.id()),
        Layer::Content,
        vec![Primitive::Text {
            content: text.content.clone(),
            bounds: text.bounds(),
            font_family: style.font_family.clone(),
            font_size: style.font_size,
            color: style.color,
            scale_x: style.scale_x,
            scale_y: style.scale_y,
        }],
    )
}

/// A graphic is drawn in its local frame (centered, unrotated) and placed by
/// its transform.
fn graphic_visual(graphic: &GraphicElement, pending: bool) -> Visual {
    let local = Rect::from_center_size(Point::ZERO, (graphic.width, graphic.height));
    let primitive = match &graphic.kind {
        GraphicKind::Shape { shape, fill } => Primitive::Path {
            path: shape.outline(graphic.size()),
            fill: Some(Paint::Solid(*fill)),
            stroke: None,
        },
        GraphicKind::Icon { name, color } => Primitive::Glyph {
            symbol: name.clone(),
            bounds: local,
            color: *color,
        },
        GraphicKind::Sticker { emoji } => Primitive::Glyph {
            symbol: emoji.clone(),
            bounds: local,
            color: SerializableColor::black(),
        },
        GraphicKind::Line { color, thickness } => Primitive::Line {
            from: Point::new(local.x0, 0.0),
            to: Point::new(local.x1, 0.0),
            stroke: StrokeStyle::solid(*thickness, *color),
        },
        GraphicKind::Image { source: Some(source) } if !pending => Primitive::Image {
            source: source.clone(),
            rect: local,
            clip: None,
        },
        GraphicKind::Image { .. } => Primitive::Placeholder { rect: local },
    };
    Visual::new(VisualKey::Element(graphic.id()), Layer::Content, vec![primitive])
        .with_transform(graphic.transform())
        .with_opacity(graphic.opacity)
}

fn chrome_visuals(view: &SceneView<'_>, options: &SceneOptions) -> Vec<Visual> {
    let mut visuals = Vec::new();
    let Some(selected) = view.selected else {
        return visuals;
    };
    let scale = options.chrome_scale();
    let padding = SELECTION_PADDING * scale;
    let outline = StrokeStyle::solid(scale, SELECTION_COLOR).dashed(&[4.0 * scale, 4.0 * scale]);

    match selected.kind {
        ElementKind::Text => {
            let Some(text) = view.side.text(selected.id) else {
                return visuals;
            };
            let bounds = text.bounds();
            visuals.push(Visual::new(
                VisualKey::Selection,
                Layer::Chrome,
                vec![Primitive::Rect {
                    rect: bounds.inflate(padding, padding),
                    fill: None,
                    stroke: Some(outline),
                    blur: 0.0,
                }],
            ));
            if view.editing == Some(text.id()) {
                let x = bounds.x1 + 2.0 * scale;
                visuals.push(Visual::new(
                    VisualKey::Caret,
                    Layer::Chrome,
                    vec![Primitive::Line {
                        from: Point::new(x, bounds.y0),
                        to: Point::new(x, bounds.y1),
                        stroke: StrokeStyle::solid(1.5 * scale, SELECTION_COLOR),
                    }],
                ));
            }
        }
        ElementKind::Graphic => {
            let Some(graphic) = view.side.graphic(selected.id) else {
                return visuals;
            };
            let local = Rect::from_center_size(Point::ZERO, (graphic.width, graphic.height));
            visuals.push(
                Visual::new(
                    VisualKey::Selection,
                    Layer::Chrome,
                    vec![Primitive::Rect {
                        rect: local.inflate(padding, padding),
                        fill: None,
                        stroke: Some(outline),
                        blur: 0.0,
                    }],
                )
                .with_transform(graphic.transform()),
            );
            let handles = handle_primitives(graphic, scale);
            if !handles.is_empty() {
                visuals.push(Visual::new(VisualKey::Handles, Layer::Chrome, handles));
            }
        }
    }
    visuals
}

/// Handles in design space; locked graphics have none.
fn handle_primitives(graphic: &GraphicElement, scale: f64) -> Vec<Primitive> {
    let size = HANDLE_SIZE * scale;
    let mut primitives = Vec::new();
    for handle in graphic_handles(graphic) {
        match handle.kind {
            HandleKind::Corner(_) => primitives.push(Primitive::Rect {
                rect: Rect::from_center_size(handle.position, (size, size)),
                fill: Some(Paint::Solid(SerializableColor::white())),
                stroke: Some(StrokeStyle::solid(1.5 * scale, SELECTION_COLOR)),
                blur: 0.0,
            }),
            HandleKind::Rotate => {
                let [top_left, top_right, ..] = graphic.corners();
                let top_mid = top_left.midpoint(top_right);
                primitives.push(Primitive::Line {
                    from: top_mid,
                    to: handle.position,
                    stroke: StrokeStyle::solid(scale, SELECTION_COLOR),
                });
                primitives.push(Primitive::Path {
                    path: Circle::new(handle.position, size / 2.0).to_path(0.1),
                    fill: Some(Paint::Solid(SerializableColor::white())),
                    stroke: Some(StrokeStyle::solid(2.0 * scale, SELECTION_COLOR)),
                });
            }
        }
    }
    primitives
}

/// Transform that maps design space onto an output raster at `scale`.
pub fn export_transform(scale: f64) -> Affine {
    Affine::scale(scale)
}

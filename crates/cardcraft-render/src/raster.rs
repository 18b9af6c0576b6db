//! CPU rasterizer for display lists.
//!
//! Paths, images and layers go through `vello_cpu`; text and glyph
//! primitives are shaped with `parley` against the bundled DejaVu faces.

use crate::images::ImageStore;
use crate::primitive::{DisplayList, Paint, Primitive, StrokeStyle, Visual};
use crate::renderer::{RenderError, RenderResult};
use crate::scene::export_transform;
use cardcraft_core::SerializableColor;
use image::RgbaImage;
use kurbo::{Affine, BezPath, Point, Rect, Shape, Size, Stroke};
use parley::{FontContext, FontFamily, FontFamilyName, Layout, LayoutContext, PositionedLayoutItem, StyleProperty};
use peniko::{Blob, Color, Gradient, ImageAlphaType, ImageData, ImageFormat, ImageSampler};
use std::borrow::Cow;
use std::sync::Arc;
use vello_cpu::{Glyph, Image, ImageSource, PaintType, Pixmap, RenderContext};

static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static DEJAVU_SERIF: &[u8] = include_bytes!("../assets/DejaVuSerif.ttf");
static DEJAVU_MONO: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

const SANS_FAMILY: &str = "DejaVu Sans";
const SERIF_FAMILY: &str = "DejaVu Serif";
const MONO_FAMILY: &str = "DejaVu Sans Mono";

/// Largest output edge, in pixels.
pub const MAX_RASTER_EDGE: u32 = 16_384;

const PLACEHOLDER_FILL: SerializableColor = SerializableColor::new(200, 200, 200, 255);
const PLACEHOLDER_CROSS: SerializableColor = SerializableColor::new(150, 150, 150, 255);
const PLACEHOLDER_BORDER: SerializableColor = SerializableColor::new(100, 100, 100, 255);
/// Drawn where a text layout produced no glyphs.
const MISSING_TEXT: SerializableColor = SerializableColor::new(255, 100, 100, 100);
const PATH_TOLERANCE: f64 = 0.1;
/// Share of a glyph box the symbol's em square fills.
const GLYPH_FILL: f64 = 0.8;

/// Output size for a design-space canvas at `scale`.
pub fn raster_size(canvas: Size, scale: f64) -> RenderResult<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RenderError::InvalidScale(scale));
    }
    let width = (canvas.width * scale).round();
    let height = (canvas.height * scale).round();
    if !(width >= 1.0 && height >= 1.0) {
        return Err(RenderError::EmptyCanvas);
    }
    let limit = MAX_RASTER_EDGE as f64;
    if width > limit || height > limit {
        return Err(RenderError::InvalidScale(scale));
    }
    Ok((width as u32, height as u32))
}

/// Draw `list` onto a transparent raster of `canvas` × `scale` pixels.
pub fn rasterize(list: &DisplayList, canvas: Size, scale: f64, images: &ImageStore) -> RenderResult<RgbaImage> {
    Rasterizer::new().rasterize(list, canvas, scale, images)
}

/// Font collection and layout scratch space; reuse one across exports to
/// register the bundled faces once.
pub struct Rasterizer {
    font_cx: FontContext,
    layout_cx: LayoutContext<()>,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        let mut font_cx = FontContext::new();
        for data in [DEJAVU_SANS, DEJAVU_SERIF, DEJAVU_MONO] {
            font_cx.collection.register_fonts(Blob::new(Arc::new(data)), None);
        }
        Self {
            font_cx,
            layout_cx: LayoutContext::new(),
        }
    }

    pub fn rasterize(
        &mut self,
        list: &DisplayList,
        canvas: Size,
        scale: f64,
        images: &ImageStore,
    ) -> RenderResult<RgbaImage> {
        let (width, height) = raster_size(canvas, scale)?;
        let edge = |value: u32| u16::try_from(value).map_err(|_| RenderError::InvalidScale(scale));
        let (w, h) = (edge(width)?, edge(height)?);

        let mut ctx = RenderContext::new(w, h);
        let base = export_transform(scale);
        for visual in &list.visuals {
            self.draw_visual(&mut ctx, visual, base, images);
        }
        ctx.flush();
        let mut pixmap = Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        let rgba: Vec<u8> = pixmap
            .take_unpremultiplied()
            .into_iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect();
        RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| RenderError::Encode(format!("raster buffer does not match {width}x{height}")))
    }

    fn draw_visual(&mut self, ctx: &mut RenderContext, visual: &Visual, base: Affine, images: &ImageStore) {
        let opacity = visual.opacity.clamp(0.0, 1.0) as f32;
        if opacity <= 0.0 {
            return;
        }
        let layered = opacity < 1.0;
        if layered {
            ctx.set_transform(Affine::IDENTITY);
            ctx.push_opacity_layer(opacity);
        }
        let transform = base * visual.transform;
        for primitive in &visual.primitives {
            ctx.set_transform(transform);
            ctx.reset_paint_transform();
            self.draw_primitive(ctx, primitive, transform, images);
        }
        if layered {
            ctx.pop_layer();
        }
    }

    fn draw_primitive(&mut self, ctx: &mut RenderContext, primitive: &Primitive, transform: Affine, images: &ImageStore) {
        match primitive {
            Primitive::Rect {
                rect,
                fill,
                stroke,
                blur,
            } => {
                if let Some(paint) = fill {
                    if *blur > 0.0 {
                        // The blur kernel only takes a solid color.
                        ctx.set_paint(Color::from(paint.color_at(rect.center())));
                        ctx.fill_blurred_rounded_rect(rect, 0.0, (*blur / 2.0) as f32);
                    } else {
                        ctx.set_paint(paint_type(paint));
                        ctx.fill_rect(rect);
                    }
                }
                if let Some(stroke) = stroke {
                    stroke_path(ctx, &rect.to_path(PATH_TOLERANCE), stroke);
                }
            }
            Primitive::Line { from, to, stroke } => {
                let mut path = BezPath::new();
                path.move_to(*from);
                path.line_to(*to);
                stroke_path(ctx, &path, stroke);
            }
            Primitive::Path { path, fill, stroke } => {
                if let Some(paint) = fill {
                    ctx.set_paint(paint_type(paint));
                    ctx.fill_path(path);
                }
                if let Some(stroke) = stroke {
                    stroke_path(ctx, path, stroke);
                }
            }
            Primitive::Image { source, rect, clip } => match images.get(source) {
                Some(image) => draw_image(ctx, image, *rect, *clip),
                None => {
                    log::debug!("Image {} not decoded; drawing placeholder", short(source.as_str()));
                    draw_placeholder(ctx, clip.map_or(*rect, |c| rect.intersect(c)));
                }
            },
            Primitive::Placeholder { rect } => draw_placeholder(ctx, *rect),
            Primitive::Text {
                content,
                bounds,
                font_family,
                font_size,
                color,
                scale_x,
                scale_y,
            } => {
                let layout = self.layout(content, family_for(font_family), *font_size as f32);
                let size = Size::new(layout.width() as f64, layout.height() as f64);
                let placement = transform
                    * Affine::translate(bounds.center().to_vec2())
                    * Affine::scale_non_uniform(*scale_x, *scale_y)
                    * Affine::translate((-size.width / 2.0, -size.height / 2.0));
                if fill_layout(ctx, &layout, placement, *color) == 0 && !content.trim().is_empty() {
                    log::debug!("Text layout for {font_family:?} produced no glyphs");
                    ctx.set_transform(transform);
                    ctx.set_paint(Color::from(MISSING_TEXT));
                    ctx.fill_rect(bounds);
                }
            }
            Primitive::Glyph { symbol, bounds, color } => {
                let em = bounds.width().min(bounds.height()) * GLYPH_FILL;
                if em <= 0.0 {
                    return;
                }
                let layout = self.layout(glyph_text(symbol), SANS_FAMILY, em as f32);
                let size = Size::new(layout.width() as f64, layout.height() as f64);
                let fit = if size.width > 0.0 && size.height > 0.0 {
                    (bounds.width() / size.width).min(bounds.height() / size.height).min(1.0)
                } else {
                    1.0
                };
                let placement = transform
                    * Affine::translate(bounds.center().to_vec2())
                    * Affine::scale(fit)
                    * Affine::translate((-size.width / 2.0, -size.height / 2.0));
                if fill_layout(ctx, &layout, placement, *color) == 0 {
                    log::debug!("No glyphs for symbol {symbol:?}");
                    ctx.set_transform(transform);
                    ctx.set_paint(Color::from(MISSING_TEXT));
                    ctx.fill_rect(bounds);
                }
            }
        }
    }

    /// Shape `text` in `family` (falling back to sans) at `font_size`.
    fn layout(&mut self, text: &str, family: &'static str, font_size: f32) -> Layout<()> {
        let stack = FontFamily::List(Cow::Owned(vec![
            FontFamilyName::named(family),
            FontFamilyName::named(SANS_FAMILY),
        ]));
        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, true);
        builder.push_default(StyleProperty::FontSize(font_size));
        builder.push_default(StyleProperty::FontFamily(stack));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(parley::Alignment::Start, parley::AlignmentOptions::default());
        layout
    }
}

/// Fill every glyph run of `layout` with `color`, each line centered on the
/// layout's width. Returns the number of glyphs drawn.
fn fill_layout(ctx: &mut RenderContext, layout: &Layout<()>, placement: Affine, color: SerializableColor) -> usize {
    let mut count = 0;
    ctx.set_transform(placement);
    ctx.set_paint(Color::from(color));
    for line in layout.lines() {
        let metrics = line.metrics();
        let shift = (layout.width() - (metrics.advance - metrics.trailing_whitespace)) / 2.0;
        for item in line.items() {
            let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                continue;
            };
            let mut x = glyph_run.offset() + shift;
            let y = glyph_run.baseline();
            let run = glyph_run.run();
            let glyphs: Vec<Glyph> = glyph_run
                .glyphs()
                .map(|glyph| {
                    let positioned = Glyph {
                        id: glyph.id,
                        x: x + glyph.x,
                        y: y - glyph.y,
                    };
                    x += glyph.advance;
                    positioned
                })
                .collect();
            if glyphs.is_empty() {
                continue;
            }
            count += glyphs.len();
            ctx.glyph_run(run.font())
                .font_size(run.font_size())
                .hint(false)
                .fill_glyphs(glyphs.into_iter());
        }
    }
    count
}

fn paint_type(paint: &Paint) -> PaintType {
    match paint {
        Paint::Solid(color) => Color::from(*color).into(),
        Paint::Linear { start, end, from, to } => Gradient::new_linear(*start, *end)
            .with_stops([(0.0_f32, Color::from(*from)), (1.0_f32, Color::from(*to))])
            .into(),
    }
}

fn stroke_path(ctx: &mut RenderContext, path: &BezPath, style: &StrokeStyle) {
    if style.width <= 0.0 {
        return;
    }
    let mut stroke = Stroke::new(style.width);
    if let Some(pattern) = style.dash.as_deref().filter(|p| valid_dash(p)) {
        stroke = stroke.with_dashes(0.0, pattern);
    }
    ctx.set_stroke(stroke);
    ctx.set_paint(paint_type(&style.paint));
    ctx.stroke_path(path);
}

/// A pattern with a negative, non-finite or all-zero entry leaves the
/// stroke solid.
fn valid_dash(pattern: &[f64]) -> bool {
    !pattern.is_empty() && pattern.iter().all(|d| d.is_finite() && *d >= 0.0) && pattern.iter().sum::<f64>() > 0.0
}

fn draw_image(ctx: &mut RenderContext, image: &RgbaImage, rect: Rect, clip: Option<Rect>) {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return;
    }
    if w > u16::MAX as u32 || h > u16::MAX as u32 {
        log::warn!("Image of {w}x{h} is too large to sample; drawing placeholder");
        draw_placeholder(ctx, clip.map_or(rect, |c| rect.intersect(c)));
        return;
    }
    let data = ImageData {
        data: Blob::from(image.as_raw().clone()),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width: w,
        height: h,
    };
    let brush = Image {
        image: ImageSource::from_peniko_image_data(&data),
        sampler: ImageSampler::default(),
    };
    if let Some(clip) = clip {
        ctx.push_clip_layer(&clip.to_path(PATH_TOLERANCE));
    }
    ctx.set_paint(brush);
    ctx.set_paint_transform(
        Affine::translate(rect.origin().to_vec2())
            * Affine::scale_non_uniform(rect.width() / w as f64, rect.height() / h as f64),
    );
    ctx.fill_rect(&rect);
    ctx.reset_paint_transform();
    if clip.is_some() {
        ctx.pop_layer();
    }
}

fn draw_placeholder(ctx: &mut RenderContext, rect: Rect) {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return;
    }
    ctx.set_paint(Color::from(PLACEHOLDER_FILL));
    ctx.fill_rect(&rect);
    let mut cross = BezPath::new();
    cross.move_to(Point::new(rect.x0, rect.y0));
    cross.line_to(Point::new(rect.x1, rect.y1));
    cross.move_to(Point::new(rect.x1, rect.y0));
    cross.line_to(Point::new(rect.x0, rect.y1));
    stroke_path(ctx, &cross, &StrokeStyle::solid(2.0, PLACEHOLDER_CROSS));
    stroke_path(ctx, &rect.to_path(PATH_TOLERANCE), &StrokeStyle::solid(2.0, PLACEHOLDER_BORDER));
}

/// Bundled face closest to a design font family.
fn family_for(name: &str) -> &'static str {
    let name = name.to_ascii_lowercase();
    const MONO: [&str; 4] = ["mono", "courier", "code", "console"];
    const SERIF: [&str; 8] = [
        "serif", "playfair", "georgia", "times", "garamond", "merriweather", "lora", "baskerville",
    ];
    if MONO.iter().any(|hint| name.contains(hint)) {
        MONO_FAMILY
    } else if name.contains("sans") {
        SANS_FAMILY
    } else if SERIF.iter().any(|hint| name.contains(hint)) {
        SERIF_FAMILY
    } else {
        SANS_FAMILY
    }
}

/// Text drawn for a glyph primitive: icon names map to a symbol the bundled
/// faces cover, anything else (an emoji) is drawn as is.
fn glyph_text(symbol: &str) -> &str {
    let is_name = !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !is_name {
        return symbol;
    }
    match symbol.to_ascii_lowercase().as_str() {
        "star" => "★",
        "heart" => "♥",
        "check" | "checkmark" => "✓",
        "cross" | "close" | "x" => "✗",
        "phone" => "☎",
        "mail" | "email" | "envelope" => "✉",
        "music" | "note" => "♪",
        "sun" => "☀",
        "moon" => "☾",
        "cloud" => "☁",
        "flower" | "florette" => "✿",
        "flag" => "⚑",
        "pin" | "location" => "⌖",
        "smile" | "smiley" => "☺",
        "cross-christian" | "church" => "✝",
        "dove" | "peace" => "☮",
        "sparkle" | "sparkles" => "✦",
        "diamond" => "◆",
        "circle" => "●",
        "square" => "■",
        _ => "●",
    }
}

fn short(reference: &str) -> &str {
    reference.get(..32).unwrap_or(reference)
}

/// Encode RGBA8 pixels as PNG.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyCanvas);
    }
    if rgba_data.len() != expected {
        return Err(RenderError::Encode(format!(
            "expected {expected} bytes for {width}x{height}, got {}",
            rgba_data.len()
        )));
    }
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::Encode(format!("PNG header: {e}")))?;
        writer
            .write_image_data(rgba_data)
            .map_err(|e| RenderError::Encode(format!("PNG data: {e}")))?;
    }
    Ok(png_data)
}

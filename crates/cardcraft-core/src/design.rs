//! Scene Model: the card design shared by the editor and both renderers.

use crate::config::EditorConfig;
use crate::elements::{
    ElementId, ElementKind, ElementRef, GraphicElement, GraphicKind, ImageRef, Logo, PhotoPlacement,
    SerializableColor, TextElement,
};
use crate::error::{CoreError, CoreResult};
use crate::mapper::clamp_position;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Current persisted format version.
pub const DESIGN_VERSION: u32 = 1;
/// Offset applied to a duplicated element.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// Card orientation, shared by both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    /// Nominal canvas size in design pixels.
    pub fn canvas_size(&self) -> Size {
        match self {
            Orientation::Landscape => Size::new(400.0, 260.0),
            Orientation::Portrait => Size::new(260.0, 400.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideId {
    #[default]
    Front,
    Back,
}

impl SideId {
    pub fn other(&self) -> Self {
        match self {
            SideId::Front => SideId::Back,
            SideId::Back => SideId::Front,
        }
    }
}

/// Product category; picks the defaults a reset returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    #[default]
    Memorial,
    Sympathy,
    Birthday,
    Wedding,
    Holiday,
    Greeting,
}

impl CardCategory {
    fn defaults(&self) -> (&'static str, FrameStyle, SerializableColor) {
        match self {
            CardCategory::Memorial => ("cream-linen", FrameStyle::Double, SerializableColor::new(0x8b, 0x73, 0x55, 255)),
            CardCategory::Sympathy => ("soft-grey", FrameStyle::Solid, SerializableColor::new(0x6b, 0x6b, 0x6b, 255)),
            CardCategory::Birthday => ("confetti", FrameStyle::Dashed, SerializableColor::new(0xe0, 0x4f, 0x8c, 255)),
            CardCategory::Wedding => ("ivory-silk", FrameStyle::Ornate, SerializableColor::new(0xd4, 0xaf, 0x37, 255)),
            CardCategory::Holiday => ("pine", FrameStyle::Corner, SerializableColor::new(0xb2, 0x22, 0x22, 255)),
            CardCategory::Greeting => ("plain-white", FrameStyle::Solid, SerializableColor::new(0x33, 0x33, 0x33, 255)),
        }
    }
}

/// Background of a side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    /// A built-in texture, identified by id.
    Preset { texture: String },
    /// A user-supplied image.
    Custom { image: ImageRef },
}

/// Decorative border treatment of a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStyle {
    #[default]
    Solid,
    Double,
    Gradient,
    Ornate,
    Dashed,
    Dotted,
    Inset,
    Shadow,
    Corner,
}

impl FrameStyle {
    pub const ALL: [FrameStyle; 9] = [
        FrameStyle::Solid,
        FrameStyle::Double,
        FrameStyle::Gradient,
        FrameStyle::Ornate,
        FrameStyle::Dashed,
        FrameStyle::Dotted,
        FrameStyle::Inset,
        FrameStyle::Shadow,
        FrameStyle::Corner,
    ];
}

/// One face of the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSide {
    pub background: Background,
    pub frame_style: FrameStyle,
    pub frame_color: SerializableColor,
    pub texts: Vec<TextElement>,
    pub graphics: Vec<GraphicElement>,
    #[serde(default)]
    pub logo: Option<Logo>,
    #[serde(default)]
    pub photo: Option<PhotoPlacement>,
    /// Element ids back to front, spanning texts and graphics.
    #[serde(default)]
    z_order: Vec<ElementId>,
}

impl Default for CardSide {
    fn default() -> Self {
        Self::for_category(CardCategory::default())
    }
}

impl CardSide {
    /// An empty side with the category's default background and frame.
    pub fn for_category(category: CardCategory) -> Self {
        let (texture, frame_style, frame_color) = category.defaults();
        Self {
            background: Background::Preset {
                texture: texture.to_string(),
            },
            frame_style,
            frame_color,
            texts: Vec::new(),
            graphics: Vec::new(),
            logo: None,
            photo: None,
            z_order: Vec::new(),
        }
    }

    /// Add a text element at the canvas center.
    pub fn add_text(&mut self, content: impl Into<String>, canvas: Size) -> ElementId {
        let text = TextElement::new(content, canvas_center(canvas));
        self.insert_text(text)
    }

    /// Add a graphic at the canvas center.
    pub fn add_graphic(&mut self, kind: GraphicKind, canvas: Size) -> ElementId {
        let graphic = GraphicElement::new(kind, canvas_center(canvas));
        self.insert_graphic(graphic)
    }

    /// Insert a prepared text element on top, regenerating its id on collision.
    pub fn insert_text(&mut self, mut text: TextElement) -> ElementId {
        while self.contains(text.id()) {
            text.regenerate_id();
        }
        let id = text.id();
        self.texts.push(text);
        self.z_order.push(id);
        id
    }

    /// Insert a prepared graphic on top, regenerating its id on collision.
    pub fn insert_graphic(&mut self, mut graphic: GraphicElement) -> ElementId {
        while self.contains(graphic.id()) {
            graphic.regenerate_id();
        }
        let id = graphic.id();
        self.graphics.push(graphic);
        self.z_order.push(id);
        id
    }

    /// Remove an element by id.
    pub fn remove(&mut self, id: ElementId) -> Option<ElementKind> {
        let kind = self.kind_of(id)?;
        match kind {
            ElementKind::Text => self.texts.retain(|t| t.id() != id),
            ElementKind::Graphic => self.graphics.retain(|g| g.id() != id),
        }
        self.z_order.retain(|&z| z != id);
        Some(kind)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.kind_of(id).is_some()
    }

    pub fn kind_of(&self, id: ElementId) -> Option<ElementKind> {
        if self.texts.iter().any(|t| t.id() == id) {
            Some(ElementKind::Text)
        } else if self.graphics.iter().any(|g| g.id() == id) {
            Some(ElementKind::Graphic)
        } else {
            None
        }
    }

    pub fn text(&self, id: ElementId) -> Option<&TextElement> {
        self.texts.iter().find(|t| t.id() == id)
    }

    pub fn text_mut(&mut self, id: ElementId) -> Option<&mut TextElement> {
        self.texts.iter_mut().find(|t| t.id() == id)
    }

    pub fn graphic(&self, id: ElementId) -> Option<&GraphicElement> {
        self.graphics.iter().find(|g| g.id() == id)
    }

    pub fn graphic_mut(&mut self, id: ElementId) -> Option<&mut GraphicElement> {
        self.graphics.iter_mut().find(|g| g.id() == id)
    }

    /// Element ids back to front.
    pub fn z_order(&self) -> &[ElementId] {
        &self.z_order
    }

    /// Typed references back to front.
    pub fn ordered(&self) -> Vec<ElementRef> {
        self.z_order
            .iter()
            .filter_map(|&id| self.kind_of(id).map(|kind| ElementRef { kind, id }))
            .collect()
    }

    /// Front-most element under a design-space point.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<ElementRef> {
        self.z_order.iter().rev().find_map(|&id| {
            if let Some(text) = self.text(id) {
                text.hit_test(point, tolerance).then(|| ElementRef::text(id))
            } else if let Some(graphic) = self.graphic(id) {
                graphic.hit_test(point, tolerance).then(|| ElementRef::graphic(id))
            } else {
                None
            }
        })
    }

    /// Move an element to the top of the z-order.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        if !self.z_order.contains(&id) {
            return false;
        }
        self.z_order.retain(|&z| z != id);
        self.z_order.push(id);
        true
    }

    /// Move an element to the bottom of the z-order.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        if !self.z_order.contains(&id) {
            return false;
        }
        self.z_order.retain(|&z| z != id);
        self.z_order.insert(0, id);
        true
    }

    /// Copy an element under a fresh id, offset and clamped into the canvas.
    pub fn duplicate(&mut self, id: ElementId, canvas: Size) -> Option<ElementId> {
        if let Some(text) = self.text(id) {
            let mut copy = text.clone();
            copy.regenerate_id();
            copy.set_position(clamp_position(copy.position() + DUPLICATE_OFFSET, canvas));
            return Some(self.insert_text(copy));
        }
        let mut copy = self.graphic(id)?.clone();
        copy.regenerate_id();
        copy.locked = false;
        copy.set_position(clamp_position(copy.position() + DUPLICATE_OFFSET, canvas));
        Some(self.insert_graphic(copy))
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.graphics.is_empty() && self.logo.is_none() && self.photo.is_none()
    }

    /// Every image this side refers to.
    pub fn image_refs(&self) -> Vec<&ImageRef> {
        let mut images = Vec::new();
        if let Background::Custom { image } = &self.background {
            images.push(image);
        }
        images.extend(self.photo.as_ref().map(|photo| &photo.source));
        images.extend(self.logo.as_ref().map(|logo| &logo.source));
        for graphic in &self.graphics {
            if let GraphicKind::Image { source: Some(source) } = &graphic.kind {
                images.push(source);
            }
        }
        images
    }

    /// Scale every design-pixel position by `(sx, sy)`. The photo is in
    /// percent space and does not move.
    pub(crate) fn rescale(&mut self, sx: f64, sy: f64) {
        for text in &mut self.texts {
            text.style.x *= sx;
            text.style.y *= sy;
        }
        for graphic in &mut self.graphics {
            graphic.x *= sx;
            graphic.y *= sy;
        }
        if let Some(logo) = &mut self.logo {
            logo.x *= sx;
            logo.y *= sy;
        }
    }

    /// Repair ids and the z-order, then clamp every bounded quantity.
    pub fn normalize(&mut self, config: &EditorConfig) {
        let mut seen = HashSet::new();
        for text in &mut self.texts {
            while !seen.insert(text.id()) {
                text.regenerate_id();
            }
            text.style.font_size = config.font_size.clamp(text.style.font_size);
            text.style.scale_x = config.text_stretch.clamp(text.style.scale_x);
            text.style.scale_y = config.text_stretch.clamp(text.style.scale_y);
        }
        for graphic in &mut self.graphics {
            while !seen.insert(graphic.id()) {
                graphic.regenerate_id();
            }
            graphic.normalize(config);
        }
        if let Some(logo) = &mut self.logo {
            logo.normalize(config);
        }
        if let Some(photo) = &mut self.photo {
            photo.normalize(config);
        }

        let mut ordered = Vec::with_capacity(seen.len());
        let mut placed = HashSet::new();
        for &id in &self.z_order {
            if seen.contains(&id) && placed.insert(id) {
                ordered.push(id);
            }
        }
        let missing = self
            .texts
            .iter()
            .map(|t| t.id())
            .chain(self.graphics.iter().map(|g| g.id()))
            .filter(|id| !placed.contains(id))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            log::debug!("Appending {} elements missing from z-order", missing.len());
        }
        ordered.extend(missing);
        self.z_order = ordered;
    }
}

fn canvas_center(canvas: Size) -> Point {
    Point::new(canvas.width / 2.0, canvas.height / 2.0)
}

/// A two-sided card design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDesign {
    pub version: u32,
    pub orientation: Orientation,
    #[serde(default)]
    pub category: CardCategory,
    pub front: CardSide,
    pub back: CardSide,
}

impl Default for CardDesign {
    fn default() -> Self {
        Self::new(Orientation::default(), CardCategory::default())
    }
}

impl CardDesign {
    pub fn new(orientation: Orientation, category: CardCategory) -> Self {
        Self {
            version: DESIGN_VERSION,
            orientation,
            category,
            front: CardSide::for_category(category),
            back: CardSide::for_category(category),
        }
    }

    pub fn canvas_size(&self) -> Size {
        self.orientation.canvas_size()
    }

    pub fn side(&self, side: SideId) -> &CardSide {
        match side {
            SideId::Front => &self.front,
            SideId::Back => &self.back,
        }
    }

    pub fn side_mut(&mut self, side: SideId) -> &mut CardSide {
        match side {
            SideId::Front => &mut self.front,
            SideId::Back => &mut self.back,
        }
    }

    /// Switch orientation, rescaling every position proportionally.
    ///
    /// Positions are not clamped so switching back restores them.
    pub fn switch_orientation(&mut self, orientation: Orientation) -> bool {
        if orientation == self.orientation {
            return false;
        }
        let from = self.canvas_size();
        let to = orientation.canvas_size();
        let (sx, sy) = (to.width / from.width, to.height / from.height);
        self.front.rescale(sx, sy);
        self.back.rescale(sx, sy);
        self.orientation = orientation;
        log::debug!("Switched orientation to {orientation:?} (scale {sx:.4}, {sy:.4})");
        true
    }

    /// Every image either side refers to.
    pub fn image_refs(&self) -> impl Iterator<Item = &ImageRef> {
        self.front.image_refs().into_iter().chain(self.back.image_refs())
    }

    /// Reset one side to the category defaults.
    pub fn reset_side(&mut self, side: SideId) {
        *self.side_mut(side) = CardSide::for_category(self.category);
    }

    /// Reset both sides to the category defaults.
    pub fn reset_all(&mut self) {
        self.front = CardSide::for_category(self.category);
        self.back = CardSide::for_category(self.category);
    }

    pub fn normalize(&mut self, config: &EditorConfig) {
        self.front.normalize(config);
        self.back.normalize(config);
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize, check the version and normalize.
    pub fn from_json(json: &str, config: &EditorConfig) -> CoreResult<Self> {
        let mut design: Self = serde_json::from_str(json)?;
        if design.version != DESIGN_VERSION {
            return Err(CoreError::UnsupportedVersion(design.version));
        }
        design.normalize(config);
        Ok(design)
    }
}

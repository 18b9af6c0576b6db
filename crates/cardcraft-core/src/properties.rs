//! Property-panel edits. These bypass the gesture engine and write the side
//! directly, subject to the configured lock policy.

use crate::config::{EditorConfig, LockPolicy};
use crate::design::{Background, CardSide, FrameStyle};
use crate::elements::{ElementId, GraphicKind, SerializableColor};
use crate::mapper::clamp_position;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edit", rename_all = "snake_case")]
pub enum PropertyEdit {
    TextContent { id: ElementId, content: String },
    FontFamily { id: ElementId, family: String },
    FontSize { id: ElementId, size: f64 },
    TextColor { id: ElementId, color: SerializableColor },
    TextStretch { id: ElementId, scale_x: f64, scale_y: f64 },
    TextPosition { id: ElementId, position: Point },
    GraphicPosition { id: ElementId, position: Point },
    GraphicSize { id: ElementId, size: f64 },
    GraphicRotation { id: ElementId, degrees: f64 },
    GraphicOpacity { id: ElementId, opacity: f64 },
    /// Fill of a shape, or the color of an icon or line.
    GraphicColor { id: ElementId, color: SerializableColor },
    GraphicLocked { id: ElementId, locked: bool },
    FrameStyle { style: FrameStyle },
    FrameColor { color: SerializableColor },
    BackgroundPreset { texture: String },
    LogoScale { scale: f64 },
    LogoOpacity { opacity: f64 },
    RemoveLogo,
    PhotoZoom { zoom: f64 },
    RemovePhoto,
}

impl PropertyEdit {
    /// The graphic this edit targets, if any.
    pub fn graphic_id(&self) -> Option<ElementId> {
        match self {
            PropertyEdit::GraphicPosition { id, .. }
            | PropertyEdit::GraphicSize { id, .. }
            | PropertyEdit::GraphicRotation { id, .. }
            | PropertyEdit::GraphicOpacity { id, .. }
            | PropertyEdit::GraphicColor { id, .. }
            | PropertyEdit::GraphicLocked { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Apply an edit to a copy of `side`.
///
/// Returns `None` when nothing changes: the target is missing, the value is
/// already set, or a locked graphic refuses the edit under [`LockPolicy::Full`].
/// Spatial edits on a locked graphic are refused under either policy.
pub fn apply_property(
    side: &CardSide,
    canvas: Size,
    edit: &PropertyEdit,
    config: &EditorConfig,
) -> Option<CardSide> {
    if let Some(id) = edit.graphic_id() {
        let graphic = side.graphic(id)?;
        if graphic.locked && refused_when_locked(edit, config.lock_policy) {
            log::debug!("Locked graphic {id} refuses {edit:?}");
            return None;
        }
    }

    let mut next = side.clone();
    match edit {
        PropertyEdit::TextContent { id, content } => next.text_mut(*id)?.content = content.clone(),
        PropertyEdit::FontFamily { id, family } => next.text_mut(*id)?.style.font_family = family.clone(),
        PropertyEdit::FontSize { id, size } => {
            next.text_mut(*id)?.style.font_size = config.font_size.clamp(*size);
        }
        PropertyEdit::TextColor { id, color } => next.text_mut(*id)?.style.color = *color,
        PropertyEdit::TextStretch { id, scale_x, scale_y } => {
            let text = next.text_mut(*id)?;
            text.style.scale_x = config.text_stretch.clamp(*scale_x);
            text.style.scale_y = config.text_stretch.clamp(*scale_y);
        }
        PropertyEdit::TextPosition { id, position } => {
            next.text_mut(*id)?.set_position(clamp_position(*position, canvas));
        }
        PropertyEdit::GraphicPosition { id, position } => {
            next.graphic_mut(*id)?.set_position(clamp_position(*position, canvas));
        }
        PropertyEdit::GraphicSize { id, size } => next.graphic_mut(*id)?.set_size(*size, config),
        PropertyEdit::GraphicRotation { id, degrees } => next.graphic_mut(*id)?.set_rotation(*degrees),
        PropertyEdit::GraphicOpacity { id, opacity } => next.graphic_mut(*id)?.set_opacity(*opacity, config),
        PropertyEdit::GraphicColor { id, color } => match &mut next.graphic_mut(*id)?.kind {
            GraphicKind::Shape { fill, .. } => *fill = *color,
            GraphicKind::Icon { color: c, .. } | GraphicKind::Line { color: c, .. } => *c = *color,
            GraphicKind::Sticker { .. } | GraphicKind::Image { .. } => return None,
        },
        PropertyEdit::GraphicLocked { id, locked } => next.graphic_mut(*id)?.locked = *locked,
        PropertyEdit::FrameStyle { style } => next.frame_style = *style,
        PropertyEdit::FrameColor { color } => next.frame_color = *color,
        PropertyEdit::BackgroundPreset { texture } => {
            next.background = Background::Preset {
                texture: texture.clone(),
            }
        }
        PropertyEdit::LogoScale { scale } => next.logo.as_mut()?.scale = config.logo_scale.clamp(*scale),
        PropertyEdit::LogoOpacity { opacity } => next.logo.as_mut()?.opacity = config.opacity.clamp(*opacity),
        PropertyEdit::RemoveLogo => next.logo = None,
        PropertyEdit::PhotoZoom { zoom } => next.photo.as_mut()?.zoom = config.photo_zoom.clamp(*zoom),
        PropertyEdit::RemovePhoto => next.photo = None,
    }

    (next != *side).then_some(next)
}

/// Gestures on a locked graphic are refused by the gesture engine; the
/// panel is only blocked under [`LockPolicy::Full`].
fn refused_when_locked(edit: &PropertyEdit, policy: LockPolicy) -> bool {
    match edit {
        PropertyEdit::GraphicLocked { .. } => false,
        _ => policy == LockPolicy::Full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Orientation;
    use crate::elements::ShapeKind;

    fn canvas() -> Size {
        Orientation::Landscape.canvas_size()
    }

    fn locked_side() -> (CardSide, ElementId) {
        let mut side = CardSide::default();
        let id = side.add_graphic(
            GraphicKind::Shape {
                shape: ShapeKind::Diamond,
                fill: SerializableColor::black(),
            },
            canvas(),
        );
        if let Some(g) = side.graphic_mut(id) {
            g.locked = true;
        }
        (side, id)
    }

    #[test]
    fn test_spatial_only_policy_allows_panel_edits() {
        let (side, id) = locked_side();
        let config = EditorConfig::default();
        let edit = PropertyEdit::GraphicOpacity { id, opacity: 0.5 };
        let next = apply_property(&side, canvas(), &edit, &config).unwrap();
        assert!((next.graphic(id).unwrap().opacity - 0.5).abs() < f64::EPSILON);

        let edit = PropertyEdit::GraphicPosition { id, position: Point::new(50.0, 50.0) };
        let next = apply_property(&side, canvas(), &edit, &config).unwrap();
        assert_eq!(next.graphic(id).unwrap().position(), Point::new(50.0, 50.0));
        assert!(next.graphic(id).unwrap().locked);

        let edit = PropertyEdit::GraphicRotation { id, degrees: 45.0 };
        let next = apply_property(&side, canvas(), &edit, &config).unwrap();
        assert!((next.graphic(id).unwrap().rotation - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_policy_blocks_panel_moves() {
        let (side, id) = locked_side();
        let config = EditorConfig {
            lock_policy: LockPolicy::Full,
            ..EditorConfig::default()
        };
        let edit = PropertyEdit::GraphicPosition { id, position: Point::new(50.0, 50.0) };
        assert!(apply_property(&side, canvas(), &edit, &config).is_none());
    }

    #[test]
    fn test_full_policy_blocks_everything_but_unlock() {
        let (side, id) = locked_side();
        let config = EditorConfig {
            lock_policy: LockPolicy::Full,
            ..EditorConfig::default()
        };
        let edit = PropertyEdit::GraphicOpacity { id, opacity: 0.5 };
        assert!(apply_property(&side, canvas(), &edit, &config).is_none());
        let edit = PropertyEdit::GraphicLocked { id, locked: false };
        let next = apply_property(&side, canvas(), &edit, &config).unwrap();
        assert!(!next.graphic(id).unwrap().locked);
    }

    #[test]
    fn test_font_size_clamped() {
        let mut side = CardSide::default();
        let id = side.add_text("x", canvas());
        let edit = PropertyEdit::FontSize { id, size: 500.0 };
        let next = apply_property(&side, canvas(), &edit, &EditorConfig::default()).unwrap();
        assert_eq!(next.text(id).unwrap().style.font_size, 72.0);
    }

    #[test]
    fn test_unchanged_edit_is_none() {
        let side = CardSide::default();
        let edit = PropertyEdit::FrameStyle { style: side.frame_style };
        assert!(apply_property(&side, canvas(), &edit, &EditorConfig::default()).is_none());
        let edit = PropertyEdit::FrameStyle { style: FrameStyle::Corner };
        assert!(apply_property(&side, canvas(), &edit, &EditorConfig::default()).is_some());
    }

    #[test]
    fn test_missing_logo_is_none() {
        let side = CardSide::default();
        let edit = PropertyEdit::LogoScale { scale: 1.5 };
        assert!(apply_property(&side, canvas(), &edit, &EditorConfig::default()).is_none());
    }
}

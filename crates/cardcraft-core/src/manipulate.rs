//! Element Manipulator: applies a committed gesture intent to a side.

use crate::config::EditorConfig;
use crate::design::CardSide;
use crate::elements::ElementId;
use crate::gesture::{GestureIntent, GestureTarget};
use crate::mapper::{clamp_percent, clamp_position, to_percent};
use kurbo::{Point, Size};

/// Result of applying an intent.
#[derive(Debug, Clone, PartialEq)]
pub enum ManipulationOutcome {
    /// A new side with the change applied.
    Updated(CardSide),
    /// A tap on a text element.
    EnterEditMode(ElementId),
    /// Nothing to change (locked target, unchanged value, or a terminal intent).
    Unchanged,
    /// The target no longer exists.
    MissingElement(GestureTarget),
}

/// Apply `intent` to a copy of `side`. The input is never modified.
///
/// Positions are clamped to the drag margin (or to the percentage zone for
/// the photo), sizes to their per-feature bounds, rotation wraps.
pub fn apply_intent(
    side: &CardSide,
    canvas: Size,
    intent: &GestureIntent,
    config: &EditorConfig,
) -> ManipulationOutcome {
    let target = intent.target();
    if !target_exists(side, target) {
        log::warn!("Dropping {intent:?}: target no longer exists");
        return ManipulationOutcome::MissingElement(target);
    }
    if is_locked(side, target) && !intent.is_terminal() {
        log::trace!("Ignoring {intent:?} on locked target");
        return ManipulationOutcome::Unchanged;
    }

    let mut next = side.clone();
    match *intent {
        GestureIntent::Move { target, position } => move_target(&mut next, canvas, target, position),
        GestureIntent::Scale { target, value, .. } => scale_target(&mut next, target, value, config),
        GestureIntent::Rotate { target, degrees } => {
            if let Some(graphic) = graphic_target(target).and_then(|id| next.graphic_mut(id)) {
                graphic.set_rotation(degrees);
            }
        }
        GestureIntent::Tap { target } => {
            return match target {
                GestureTarget::Text(id) => ManipulationOutcome::EnterEditMode(id),
                _ => ManipulationOutcome::Unchanged,
            };
        }
        GestureIntent::Finished { .. } | GestureIntent::Cancelled { .. } => {
            return ManipulationOutcome::Unchanged;
        }
    }

    if next == *side {
        ManipulationOutcome::Unchanged
    } else {
        ManipulationOutcome::Updated(next)
    }
}

fn target_exists(side: &CardSide, target: GestureTarget) -> bool {
    match target {
        GestureTarget::Text(id) => side.text(id).is_some(),
        GestureTarget::Graphic(id) => side.graphic(id).is_some(),
        GestureTarget::Logo => side.logo.is_some(),
        GestureTarget::Photo => side.photo.is_some(),
    }
}

fn graphic_target(target: GestureTarget) -> Option<ElementId> {
    match target {
        GestureTarget::Graphic(id) => Some(id),
        _ => None,
    }
}

fn is_locked(side: &CardSide, target: GestureTarget) -> bool {
    graphic_target(target)
        .and_then(|id| side.graphic(id))
        .is_some_and(|g| g.locked)
}

fn move_target(side: &mut CardSide, canvas: Size, target: GestureTarget, position: Point) {
    match target {
        GestureTarget::Text(id) => {
            if let Some(text) = side.text_mut(id) {
                text.set_position(clamp_position(position, canvas));
            }
        }
        GestureTarget::Graphic(id) => {
            if let Some(graphic) = side.graphic_mut(id) {
                graphic.set_position(clamp_position(position, canvas));
            }
        }
        GestureTarget::Logo => {
            if let Some(logo) = &mut side.logo {
                logo.set_position(clamp_position(position, canvas));
            }
        }
        GestureTarget::Photo => {
            if let Some(photo) = &mut side.photo {
                photo.set_position_pct(clamp_percent(to_percent(position, canvas)));
            }
        }
    }
}

fn scale_target(side: &mut CardSide, target: GestureTarget, value: f64, config: &EditorConfig) {
    match target {
        GestureTarget::Text(id) => {
            if let Some(text) = side.text_mut(id) {
                text.style.font_size = config.font_size.clamp(value);
            }
        }
        GestureTarget::Graphic(id) => {
            if let Some(graphic) = side.graphic_mut(id) {
                graphic.set_size(value, config);
            }
        }
        GestureTarget::Logo => {
            if let Some(logo) = &mut side.logo {
                logo.scale = config.logo_scale.clamp(value);
            }
        }
        GestureTarget::Photo => {
            if let Some(photo) = &mut side.photo {
                photo.zoom = config.photo_zoom.clamp(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Orientation;
    use crate::elements::{GraphicKind, ImageRef, PhotoPlacement, SerializableColor, ShapeKind};
    use crate::gesture::PinchQuantity;

    fn canvas() -> Size {
        Orientation::Landscape.canvas_size()
    }

    fn side_with_graphic() -> (CardSide, ElementId) {
        let mut side = CardSide::default();
        let id = side.add_graphic(
            GraphicKind::Shape {
                shape: ShapeKind::Star,
                fill: SerializableColor::black(),
            },
            canvas(),
        );
        (side, id)
    }

    #[test]
    fn test_move_is_clamped_and_input_untouched() {
        let (side, id) = side_with_graphic();
        let intent = GestureIntent::Move {
            target: GestureTarget::Graphic(id),
            position: Point::new(900.0, -40.0),
        };
        let ManipulationOutcome::Updated(next) = apply_intent(&side, canvas(), &intent, &EditorConfig::default()) else {
            panic!("expected an update");
        };
        assert_eq!(next.graphic(id).map(|g| g.position()), Some(Point::new(380.0, 20.0)));
        assert_eq!(side.graphic(id).map(|g| g.position()), Some(Point::new(200.0, 130.0)));
    }

    #[test]
    fn test_locked_graphic_is_not_moved() {
        let (mut side, id) = side_with_graphic();
        if let Some(g) = side.graphic_mut(id) {
            g.locked = true;
        }
        let intent = GestureIntent::Move {
            target: GestureTarget::Graphic(id),
            position: Point::new(50.0, 50.0),
        };
        assert_eq!(
            apply_intent(&side, canvas(), &intent, &EditorConfig::default()),
            ManipulationOutcome::Unchanged
        );
    }

    #[test]
    fn test_tap_on_text_enters_edit_mode() {
        let mut side = CardSide::default();
        let id = side.add_text("Rest in peace", canvas());
        let intent = GestureIntent::Tap { target: GestureTarget::Text(id) };
        assert_eq!(
            apply_intent(&side, canvas(), &intent, &EditorConfig::default()),
            ManipulationOutcome::EnterEditMode(id)
        );
    }

    #[test]
    fn test_missing_target() {
        let side = CardSide::default();
        let target = GestureTarget::Graphic(uuid::Uuid::new_v4());
        let intent = GestureIntent::Rotate { target, degrees: 10.0 };
        assert_eq!(
            apply_intent(&side, canvas(), &intent, &EditorConfig::default()),
            ManipulationOutcome::MissingElement(target)
        );
    }

    #[test]
    fn test_photo_moves_in_percent_space() {
        let mut side = CardSide::default();
        side.photo = Some(PhotoPlacement::new(ImageRef::new("blob:photo")));
        let intent = GestureIntent::Move {
            target: GestureTarget::Photo,
            position: Point::new(100.0, 0.0),
        };
        let ManipulationOutcome::Updated(next) = apply_intent(&side, canvas(), &intent, &EditorConfig::default()) else {
            panic!("expected an update");
        };
        let photo = next.photo.unwrap();
        assert!((photo.x_pct - 25.0).abs() < 1e-9);
        assert!((photo.y_pct - crate::mapper::TEXT_ZONE_TOP).abs() < 1e-9);
    }

    #[test]
    fn test_scale_and_rotate_graphic() {
        let (side, id) = side_with_graphic();
        let config = EditorConfig::default();
        let target = GestureTarget::Graphic(id);
        let intent = GestureIntent::Scale {
            target,
            quantity: PinchQuantity::GraphicSize,
            value: 450.0,
        };
        let ManipulationOutcome::Updated(scaled) = apply_intent(&side, canvas(), &intent, &config) else {
            panic!("expected an update");
        };
        assert_eq!(scaled.graphic(id).map(|g| (g.width, g.height)), Some((200.0, 200.0)));

        let intent = GestureIntent::Rotate { target, degrees: 405.0 };
        let ManipulationOutcome::Updated(rotated) = apply_intent(&scaled, canvas(), &intent, &config) else {
            panic!("expected an update");
        };
        assert!((rotated.graphic(id).unwrap().rotation - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_move_is_idempotent() {
        let mut side = CardSide::default();
        let id = side.add_text("x", canvas());
        let config = EditorConfig::default();
        let intent = GestureIntent::Move {
            target: GestureTarget::Text(id),
            position: Point::new(-100.0, 500.0),
        };
        let ManipulationOutcome::Updated(once) = apply_intent(&side, canvas(), &intent, &config) else {
            panic!("expected an update");
        };
        assert_eq!(apply_intent(&once, canvas(), &intent, &config), ManipulationOutcome::Unchanged);
    }
}

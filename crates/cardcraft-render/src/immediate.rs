//! Immediate backend: the whole visual tree is rebuilt on every change.

use crate::primitive::DisplayList;
use crate::renderer::{Effect, Reconciler};
use crate::scene::{SceneOptions, build_display_list};
use cardcraft_core::SceneView;

#[derive(Debug, Default)]
pub struct ImmediateRenderer {
    list: DisplayList,
}

impl ImmediateRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reconciler for ImmediateRenderer {
    fn reconcile(&mut self, view: &SceneView<'_>, options: &SceneOptions) -> Vec<Effect> {
        self.list = build_display_list(view, options);
        log::trace!("Immediate rebuild: {} visuals", self.list.len());
        vec![Effect::Rebuild { count: self.list.len() }]
    }

    fn snapshot(&self) -> DisplayList {
        self.list.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::VisualKey;
    use crate::retained::RetainedRenderer;
    use cardcraft_core::{
        CardDesign, EditorConfig, EditorMessage, EditorSession, GraphicKind, Orientation, PointerEvent,
        SerializableColor, ShapeKind,
    };
    use kurbo::Point;

    fn pointer(event: PointerEvent) -> EditorMessage {
        EditorMessage::Pointer(event)
    }

    /// Drive a session through a mix of edits and check both backends agree
    /// after every step.
    #[test]
    fn test_backends_agree_through_an_editing_session() {
        let mut session = EditorSession::new(CardDesign::default(), EditorConfig::default());
        let mut retained = RetainedRenderer::new();
        let mut immediate = ImmediateRenderer::new();
        let options = SceneOptions::default();

        let heart = GraphicKind::Shape {
            shape: ShapeKind::Heart,
            fill: SerializableColor::new(200, 30, 60, 255),
        };
        let messages = vec![
            EditorMessage::AddText("In loving memory".into()),
            EditorMessage::AddGraphic(heart.clone()),
            EditorMessage::AddGraphic(heart),
            pointer(PointerEvent::Down {
                pointer: 1,
                position: Point::new(200.0, 130.0),
            }),
            pointer(PointerEvent::Move {
                pointer: 1,
                position: Point::new(240.0, 150.0),
            }),
            pointer(PointerEvent::Up {
                pointer: 1,
                position: Point::new(240.0, 150.0),
            }),
            EditorMessage::DeleteSelected,
            EditorMessage::SetOrientation(Orientation::Portrait),
            EditorMessage::Undo,
            EditorMessage::ClearSelection,
        ];

        for message in messages {
            session.update(message.clone());
            let view = session.scene_view();
            retained.reconcile(&view, &options);
            let effects = immediate.reconcile(&view, &options);
            assert!(matches!(effects.as_slice(), [Effect::Rebuild { .. }]));
            assert_eq!(retained.snapshot(), immediate.snapshot(), "after {message:?}");
            let point = Point::new(200.0, 130.0);
            assert_eq!(retained.hit_test(point), immediate.hit_test(point), "after {message:?}");
        }
        assert!(immediate.snapshot().get(VisualKey::Frame).is_some());
    }
}

//! Retained-mode backend: one long-lived visual per key, reconciled by diff.

use crate::export::ExportImage;
use crate::images::ImageStore;
use crate::primitive::{DisplayList, Layer, Visual, VisualKey};
use crate::raster::rasterize;
use crate::renderer::{Effect, Reconciler, RenderError, RenderResult};
use crate::scene::{SceneOptions, build_display_list};
use cardcraft_core::SceneView;
use kurbo::{Point, Size};
use std::collections::{HashMap, HashSet};

/// Keeps visuals alive across updates and touches only what changed.
#[derive(Debug, Default)]
pub struct RetainedRenderer {
    canvas: Size,
    visuals: HashMap<VisualKey, Visual>,
    /// Paint order.
    order: Vec<VisualKey>,
    images: ImageStore,
}

impl RetainedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas size of the last reconciled scene.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn visual(&self, key: VisualKey) -> Option<&Visual> {
        self.visuals.get(&key)
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut ImageStore {
        &mut self.images
    }

    /// Flatten the current visuals to RGBA at `scale` times the design size.
    /// Selection outline, handles and caret are left out.
    pub fn export(&self, scale: f64) -> RenderResult<ExportImage> {
        if self.order.is_empty() {
            return Err(RenderError::EmptyCanvas);
        }
        let list = DisplayList {
            visuals: self
                .order
                .iter()
                .filter_map(|key| self.visuals.get(key))
                .filter(|visual| visual.layer != Layer::Chrome)
                .cloned()
                .collect(),
        };
        let image = rasterize(&list, self.canvas, scale, &self.images)?;
        let (width, height) = image.dimensions();
        log::info!("Exported {} visuals at {scale}x ({width}x{height})", list.len());
        Ok(ExportImage {
            rgba_data: image.into_raw(),
            width,
            height,
        })
    }
}

impl Reconciler for RetainedRenderer {
    fn reconcile(&mut self, view: &SceneView<'_>, options: &SceneOptions) -> Vec<Effect> {
        let desired = build_display_list(view, options);
        let desired_keys = desired.keys();
        let keep: HashSet<VisualKey> = desired_keys.iter().copied().collect();
        let mut effects = Vec::new();

        for key in &self.order {
            if !keep.contains(key) {
                effects.push(Effect::Remove { key: *key });
            }
        }
        self.visuals.retain(|key, _| keep.contains(key));

        let survivors_before: Vec<VisualKey> = self.order.iter().copied().filter(|k| keep.contains(k)).collect();
        let survivors_after: Vec<VisualKey> = desired_keys
            .iter()
            .copied()
            .filter(|k| self.visuals.contains_key(k))
            .collect();

        for (index, visual) in desired.visuals.into_iter().enumerate() {
            match self.visuals.get_mut(&visual.key) {
                None => {
                    effects.push(Effect::Insert { key: visual.key, index });
                    self.visuals.insert(visual.key, visual);
                }
                Some(existing) if *existing != visual => {
                    effects.push(Effect::Update { key: visual.key });
                    *existing = visual;
                }
                Some(_) => {}
            }
        }
        if survivors_before != survivors_after {
            effects.push(Effect::Reorder {
                keys: desired_keys.clone(),
            });
        }
        self.order = desired_keys;
        self.canvas = view.canvas;

        if !effects.is_empty() {
            log::debug!("Retained reconcile: {} effects, {} visuals", effects.len(), self.order.len());
        }
        effects
    }

    fn snapshot(&self) -> DisplayList {
        DisplayList {
            visuals: self.order.iter().filter_map(|key| self.visuals.get(key)).cloned().collect(),
        }
    }

    fn hit_test(&self, point: Point) -> Option<VisualKey> {
        self.order
            .iter()
            .rev()
            .filter_map(|key| self.visuals.get(key))
            .filter(|visual| visual.layer == Layer::Content)
            .find(|visual| visual.hit_test(point))
            .map(|visual| visual.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardcraft_core::{CardSide, ElementRef, GraphicKind, SerializableColor, ShapeKind, SideId};

    const CANVAS: Size = Size::new(400.0, 260.0);

    fn star() -> GraphicKind {
        GraphicKind::Shape {
            shape: ShapeKind::Star,
            fill: SerializableColor::new(212, 175, 55, 255),
        }
    }

    fn reconcile(renderer: &mut RetainedRenderer, side: &CardSide) -> Vec<Effect> {
        renderer.reconcile(&SceneView::new(SideId::Front, side, CANVAS), &SceneOptions::default())
    }

    #[test]
    fn test_first_pass_inserts_everything() {
        let mut renderer = RetainedRenderer::new();
        let mut side = CardSide::default();
        side.add_graphic(star(), CANVAS);
        let effects = reconcile(&mut renderer, &side);
        assert_eq!(effects.len(), 3);
        assert!(effects.iter().all(|e| matches!(e, Effect::Insert { .. })));
        assert_eq!(renderer.canvas(), CANVAS);
    }

    #[test]
    fn test_unchanged_scene_has_no_effects() {
        let mut renderer = RetainedRenderer::new();
        let mut side = CardSide::default();
        side.add_graphic(star(), CANVAS);
        reconcile(&mut renderer, &side);
        assert!(reconcile(&mut renderer, &side).is_empty());
    }

    #[test]
    fn test_move_updates_only_that_visual() {
        let mut renderer = RetainedRenderer::new();
        let mut side = CardSide::default();
        let a = side.add_graphic(star(), CANVAS);
        side.add_graphic(star(), CANVAS);
        reconcile(&mut renderer, &side);
        if let Some(g) = side.graphic_mut(a) {
            g.set_position(Point::new(50.0, 50.0));
        }
        let effects = reconcile(&mut renderer, &side);
        assert_eq!(effects, vec![Effect::Update { key: VisualKey::Element(a) }]);
    }

    #[test]
    fn test_remove_and_reorder() {
        let mut renderer = RetainedRenderer::new();
        let mut side = CardSide::default();
        let a = side.add_graphic(star(), CANVAS);
        let b = side.add_graphic(star(), CANVAS);
        let c = side.add_text("Always remembered", CANVAS);
        reconcile(&mut renderer, &side);

        side.remove(b);
        side.bring_to_front(a);
        let effects = reconcile(&mut renderer, &side);
        assert!(effects.contains(&Effect::Remove { key: VisualKey::Element(b) }));
        assert!(effects.iter().any(|e| matches!(e, Effect::Reorder { .. })));
        let keys = renderer.snapshot().keys();
        assert_eq!(&keys[2..], &[VisualKey::Element(c), VisualKey::Element(a)]);
        assert!(renderer.visual(VisualKey::Element(b)).is_none());
    }

    #[test]
    fn test_selection_chrome_comes_and_goes() {
        let mut renderer = RetainedRenderer::new();
        let mut side = CardSide::default();
        let id = side.add_graphic(star(), CANVAS);
        reconcile(&mut renderer, &side);

        let mut view = SceneView::new(SideId::Front, &side, CANVAS);
        view.selected = Some(ElementRef::graphic(id));
        let effects = renderer.reconcile(&view, &SceneOptions::default());
        assert!(effects.contains(&Effect::Insert {
            key: VisualKey::Selection,
            index: 3
        }));
        assert!(renderer.visual(VisualKey::Handles).is_some());

        let effects = reconcile(&mut renderer, &side);
        assert!(effects.contains(&Effect::Remove { key: VisualKey::Selection }));
        assert!(effects.contains(&Effect::Remove { key: VisualKey::Handles }));
    }

    #[test]
    fn test_hit_test_front_most() {
        let mut renderer = RetainedRenderer::new();
        let mut side = CardSide::default();
        let back = side.add_graphic(star(), CANVAS);
        let front = side.add_graphic(star(), CANVAS);
        reconcile(&mut renderer, &side);
        let center = Point::new(CANVAS.width / 2.0, CANVAS.height / 2.0);
        assert_eq!(renderer.hit_test(center), Some(VisualKey::Element(front)));
        side.bring_to_front(back);
        reconcile(&mut renderer, &side);
        assert_eq!(renderer.hit_test(center), Some(VisualKey::Element(back)));
        assert_eq!(renderer.hit_test(Point::new(2.0, 2.0)), None);
    }

    #[test]
    fn test_export_hides_chrome() {
        let mut renderer = RetainedRenderer::new();
        assert!(matches!(renderer.export(3.0), Err(RenderError::EmptyCanvas)));

        let mut side = CardSide::default();
        let id = side.add_graphic(star(), CANVAS);
        let mut view = SceneView::new(SideId::Front, &side, CANVAS);
        view.selected = Some(ElementRef::graphic(id));
        renderer.reconcile(&view, &SceneOptions::default());
        let with_chrome = renderer.export(1.0).unwrap();

        renderer.reconcile(&SceneView::new(SideId::Front, &side, CANVAS), &SceneOptions::export());
        let without = renderer.export(1.0).unwrap();
        assert_eq!(with_chrome, without);
        assert!(renderer.visual(VisualKey::Selection).is_none());
    }

    #[test]
    fn test_export_supersamples() {
        let mut renderer = RetainedRenderer::new();
        let side = CardSide::default();
        reconcile(&mut renderer, &side);
        let image = renderer.export(3.0).unwrap();
        assert_eq!((image.width, image.height), (1200, 780));
        assert_eq!(image.rgba_data.len(), 1200 * 780 * 4);
    }

    #[test]
    fn test_export_draws_text() {
        let mut renderer = RetainedRenderer::new();
        let mut side = CardSide::default();
        reconcile(&mut renderer, &side);
        let empty = renderer.export(1.0).unwrap();

        let id = side.add_text("In loving memory", CANVAS);
        if let Some(text) = side.text_mut(id) {
            text.style.font_size = 72.0;
        }
        reconcile(&mut renderer, &side);
        let with_text = renderer.export(1.0).unwrap();
        assert_ne!(empty.rgba_data, with_text.rgba_data);
    }
}

//! Read-only view of the scene handed to renderers.

use crate::design::{CardSide, SideId};
use crate::elements::{ElementId, ElementRef};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// A slot that receives an image from the upload collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSlot {
    Background,
    Logo,
    Photo,
    Graphic(ElementId),
}

/// Everything a renderer reads: one side, its canvas and the UI chrome state.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub side_id: SideId,
    pub side: &'a CardSide,
    pub canvas: Size,
    pub selected: Option<ElementRef>,
    pub editing: Option<ElementId>,
    /// Slots waiting on an image decode; drawn as placeholders.
    pub pending: &'a [ImageSlot],
}

impl<'a> SceneView<'a> {
    /// A view with no selection and nothing pending (e.g. for export).
    pub fn new(side_id: SideId, side: &'a CardSide, canvas: Size) -> Self {
        Self {
            side_id,
            side,
            canvas,
            selected: None,
            editing: None,
            pending: &[],
        }
    }

    pub fn is_pending(&self, slot: ImageSlot) -> bool {
        self.pending.contains(&slot)
    }
}

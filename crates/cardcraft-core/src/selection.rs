//! Selection & Editing Controller.
//!
//! Tracks the selected element and the text element being edited. The edited
//! element is always the selected one.

use crate::design::CardSide;
use crate::elements::{ElementId, ElementKind, ElementRef};

/// The UI state of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    #[default]
    Normal,
    /// Selected; shows the selection outline and handles.
    Selected,
    /// Selected and in text edit mode.
    Editing,
}

impl WidgetState {
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Editing)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionController {
    selected: Option<ElementRef>,
    editing: Option<ElementId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<ElementRef> {
        self.selected
    }

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected.map(|s| s.id)
    }

    pub fn selected_kind(&self) -> Option<ElementKind> {
        self.selected.map(|s| s.kind)
    }

    pub fn editing(&self) -> Option<ElementId> {
        self.editing
    }

    pub fn state(&self, id: ElementId) -> WidgetState {
        if self.editing == Some(id) {
            WidgetState::Editing
        } else if self.selected_id() == Some(id) {
            WidgetState::Selected
        } else {
            WidgetState::Normal
        }
    }

    /// Select an element. Returns the id of an edit that was committed because
    /// a different element got selected.
    pub fn select(&mut self, element: ElementRef) -> Option<ElementId> {
        if self.selected == Some(element) {
            return None;
        }
        let committed = self.exit_edit();
        self.selected = Some(element);
        committed
    }

    /// Enter text edit mode, selecting the text first if needed.
    pub fn enter_edit(&mut self, id: ElementId) -> Option<ElementId> {
        let committed = self.select(ElementRef::text(id));
        self.editing = Some(id);
        log::debug!("Editing text {id}");
        committed
    }

    /// Leave edit mode, keeping the selection.
    pub fn exit_edit(&mut self) -> Option<ElementId> {
        self.editing.take()
    }

    /// Clear both selection and edit mode.
    pub fn clear(&mut self) -> Option<ElementId> {
        let committed = self.exit_edit();
        self.selected = None;
        committed
    }

    /// Forget a removed element.
    pub fn element_removed(&mut self, id: ElementId) {
        if self.selected_id() == Some(id) || self.editing == Some(id) {
            self.selected = None;
            self.editing = None;
        }
    }

    /// Drop a selection whose element no longer exists on `side`.
    pub fn prune(&mut self, side: &CardSide) {
        if let Some(selected) = self.selected {
            if side.kind_of(selected.id) != Some(selected.kind) {
                self.selected = None;
                self.editing = None;
            }
        }
    }
}

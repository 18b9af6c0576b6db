//! Renderer trait abstraction.

use crate::primitive::{DisplayList, VisualKey};
use crate::scene::SceneOptions;
use cardcraft_core::SceneView;
use kurbo::Point;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Image decode failed: {0}")]
    Decode(String),
    #[error("Image encode failed: {0}")]
    Encode(String),
    #[error("Nothing to export: the renderer has not drawn a scene")]
    EmptyCanvas,
    #[error("Invalid export scale: {0}")]
    InvalidScale(f64),
    #[error("The renderer behind this handle has been dropped")]
    Detached,
    #[error("The renderer is being updated")]
    Busy,
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// One change a reconcile pass made to the visual tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Insert { key: VisualKey, index: usize },
    Remove { key: VisualKey },
    Update { key: VisualKey },
    /// Surviving visuals changed relative order; `keys` is the new order.
    Reorder { keys: Vec<VisualKey> },
    /// The whole tree was replaced.
    Rebuild { count: usize },
}

/// A render backend.
///
/// Both backends take the same [`SceneView`] and must end up with the same
/// [`DisplayList`]; they differ only in how they get there.
pub trait Reconciler {
    /// Bring the visual tree in line with `view`.
    fn reconcile(&mut self, view: &SceneView<'_>, options: &SceneOptions) -> Vec<Effect>;

    /// Current visuals in paint order.
    fn snapshot(&self) -> DisplayList;

    /// Front-most content visual under a design-space point.
    fn hit_test(&self, point: Point) -> Option<VisualKey> {
        self.snapshot().hit_test(point)
    }
}

//! Undo/redo history of design snapshots.

use crate::design::CardDesign;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Snapshot history. Callers push the state *before* a change.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<CardDesign>,
    redo_stack: Vec<CardDesign>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `before` as an undo point and drop the redo branch.
    pub fn push(&mut self, before: CardDesign) {
        self.undo_stack.push(before);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Step back: returns the state to restore, keeping `current` for redo.
    pub fn undo(&mut self, current: &CardDesign) -> Option<CardDesign> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current.clone());
        Some(previous)
    }

    /// Step forward: returns the state to restore, keeping `current` for undo.
    pub fn redo(&mut self, current: &CardDesign) -> Option<CardDesign> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Every state undo or redo can bring back.
    pub fn snapshots(&self) -> impl Iterator<Item = &CardDesign> {
        self.undo_stack.iter().chain(&self.redo_stack)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Orientation;

    #[test]
    fn test_undo_redo() {
        let mut history = History::new();
        let mut design = CardDesign::default();
        history.push(design.clone());
        design.switch_orientation(Orientation::Portrait);

        let restored = history.undo(&design).unwrap();
        assert_eq!(restored.orientation, Orientation::Landscape);
        assert!(history.can_redo());
        let again = history.redo(&restored).unwrap();
        assert_eq!(again.orientation, Orientation::Portrait);
        assert!(history.undo(&again).is_some());
        assert!(history.undo(&again).is_none());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::new();
        let design = CardDesign::default();
        history.push(design.clone());
        history.undo(&design);
        assert!(history.can_redo());
        history.push(design);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new();
        for _ in 0..(MAX_UNDO_HISTORY + 10) {
            history.push(CardDesign::default());
        }
        assert_eq!(history.len(), MAX_UNDO_HISTORY);
    }
}

//! Linear undo/redo over whole-document snapshots.
//!
//! Every commit appends a [`Document`] after the cursor, discarding any
//! entries that had been undone. Bitmaps are shared through `Arc`, so a
//! snapshot costs one annotation list clone.

use crate::document::Document;

/// Snapshot list plus a cursor at the live entry.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Document>,
    /// `None` while empty; otherwise always a valid index.
    cursor: Option<usize>,
    /// Oldest entries are dropped beyond this many.
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Record a new state, truncating any redo branch.
    pub fn commit(&mut self, document: Document) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        let discarded = self.entries.len() - keep;
        self.entries.truncate(keep);
        self.entries.push(document);

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let overflow = self.entries.len() - limit;
                self.entries.drain(..overflow);
            }
        }
        self.cursor = Some(self.entries.len() - 1);

        tracing::info!(
            entries = self.entries.len(),
            discarded,
            "history entry committed"
        );
    }

    /// Step back one entry. Returns the restored state.
    pub fn undo(&mut self) -> Option<&Document> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        tracing::debug!(cursor, "undo");
        self.entries.get(cursor)
    }

    /// Step forward one entry. Returns the restored state.
    pub fn redo(&mut self) -> Option<&Document> {
        let cursor = self.cursor.filter(|&c| c + 1 < self.entries.len())? + 1;
        self.cursor = Some(cursor);
        tracing::debug!(cursor, "redo");
        self.entries.get(cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn current(&self) -> Option<&Document> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::decode::DecodedImage;
    use crate::geometry::Rotation;

    fn doc(degrees: i32) -> Document {
        Document::new(DecodedImage::filled(2, 2, [0, 0, 0, 255])).with_rotation(Rotation::new(degrees))
    }

    fn degrees(d: Option<&Document>) -> Option<i32> {
        d.map(|d| d.rotation.degrees())
    }

    #[test]
    fn test_empty_history() {
        let mut h = History::default();
        assert!(h.is_empty());
        assert_eq!(h.cursor(), None);
        assert!(!h.can_undo() && !h.can_redo());
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
    }

    #[test]
    fn test_single_entry_cannot_undo() {
        let mut h = History::default();
        h.commit(doc(0));
        assert_eq!(h.cursor(), Some(0));
        assert!(h.undo().is_none());
        assert_eq!(h.cursor(), Some(0));
    }

    #[test]
    fn test_undo_redo() {
        let mut h = History::default();
        h.commit(doc(0));
        h.commit(doc(90));
        h.commit(doc(180));

        assert_eq!(degrees(h.undo()), Some(90));
        assert_eq!(degrees(h.undo()), Some(0));
        assert!(h.undo().is_none());
        assert_eq!(degrees(h.redo()), Some(90));
        assert_eq!(degrees(h.redo()), Some(180));
        assert!(h.redo().is_none());
        assert_eq!(degrees(h.current()), Some(180));
    }

    #[test]
    fn test_commit_after_undo_discards_redo_branch() {
        let mut h = History::default();
        h.commit(doc(0));
        h.commit(doc(90));
        h.undo();
        h.commit(doc(270));

        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        assert!(h.redo().is_none());
        assert_eq!(degrees(h.current()), Some(270));
        assert_eq!(degrees(h.undo()), Some(0));
    }

    #[test]
    fn test_undo_restores_identical_snapshot() {
        let mut h = History::default();
        let first = doc(0);
        h.commit(first.clone());
        h.commit(first.with_rotation(Rotation::new(90)));

        let restored = h.undo().unwrap();
        assert_eq!(restored, &first);
        assert!(Arc::ptr_eq(&restored.image, &first.image));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut h = History::new(Some(2));
        h.commit(doc(0));
        h.commit(doc(90));
        h.commit(doc(180));

        assert_eq!(h.len(), 2);
        assert_eq!(h.cursor(), Some(1));
        assert_eq!(degrees(h.undo()), Some(90));
        assert!(h.undo().is_none());
    }

    #[test]
    fn test_clear() {
        let mut h = History::default();
        h.commit(doc(0));
        h.clear();
        assert!(h.is_empty());
        assert!(h.current().is_none());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

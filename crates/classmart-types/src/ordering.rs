//! Ordered collections and the messages that reorder them.

use serde::{Deserialize, Serialize};

/// One entry of a managed list.
///
/// Within a list, positions form the permutation `0..n-1` whenever no
/// reorder is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedItem<P> {
    pub id: String,
    pub position: u32,
    pub payload: P,
}

impl<P> OrderedItem<P> {
    pub fn new(id: impl Into<String>, position: u32, payload: P) -> Self {
        Self {
            id: id.into(),
            position,
            payload,
        }
    }
}

/// A drag-and-drop instruction.
///
/// `destination_index` is `None` when the item was dropped outside any valid
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOperation {
    pub source_index: usize,
    pub destination_index: Option<usize>,
}

impl MoveOperation {
    pub fn new(source_index: usize, destination_index: Option<usize>) -> Self {
        Self {
            source_index,
            destination_index,
        }
    }

    /// Resolve against a list of `len` items.
    ///
    /// Returns `(source, destination)` when the move changes the order. A
    /// destination past the end is clamped to the last index. `None` means
    /// no destination, a source outside the list, or a destination that
    /// (after clamping) equals the source.
    pub fn resolve(&self, len: usize) -> Option<(usize, usize)> {
        let destination = self.destination_index?;
        if self.source_index >= len {
            return None;
        }
        let destination = destination.min(len - 1);
        (destination != self.source_index).then_some((self.source_index, destination))
    }

    /// Whether applying this move to a list of `len` items changes nothing.
    pub fn is_noop(&self, len: usize) -> bool {
        self.resolve(len).is_none()
    }
}

/// New position for one item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: String,
    pub position: u32,
}

/// The authoritative order of a whole list, persisted as one unit.
///
/// Always covers every item, even those whose position did not change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderBatch {
    pub updates: Vec<PositionUpdate>,
}

impl ReorderBatch {
    /// Describe the order of `items` exactly as it stands.
    pub fn from_items<P>(items: &[OrderedItem<P>]) -> Self {
        Self {
            updates: items
                .iter()
                .map(|item| PositionUpdate {
                    id: item.id.clone(),
                    position: item.position,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Whether the positions are exactly `0..len`, each used once, with no
    /// duplicate ids.
    pub fn is_contiguous(&self) -> bool {
        let n = self.updates.len();
        let mut seen = vec![false; n];
        let mut ids = std::collections::HashSet::with_capacity(n);
        for update in &self.updates {
            let pos = update.position as usize;
            if pos >= n || seen[pos] || !ids.insert(update.id.as_str()) {
                return false;
            }
            seen[pos] = true;
        }
        true
    }
}

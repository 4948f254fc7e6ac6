//! Pure list arithmetic for reorder gestures.

use classmart_types::ordering::{MoveOperation, OrderedItem};

/// Resolve a move against a list of `len` items.
///
/// `None` for a no-op; see [`MoveOperation::resolve`] for the clamping rules.
pub fn resolve_move(op: &MoveOperation, len: usize) -> Option<(usize, usize)> {
    op.resolve(len)
}

/// Assign every item its index as position.
pub fn reindex<P>(items: &mut [OrderedItem<P>]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.position = index as u32;
    }
}

/// Move the item at `source` to `destination` and reindex the whole list.
///
/// Both indices must be in range (see [`resolve_move`]).
pub fn apply_move<P: Clone>(
    items: &[OrderedItem<P>],
    source: usize,
    destination: usize,
) -> Vec<OrderedItem<P>> {
    let mut reordered = items.to_vec();
    let moved = reordered.remove(source);
    reordered.insert(destination, moved);
    reindex(&mut reordered);
    reordered
}

/// Bring a freshly-loaded list into canonical form.
///
/// Items are stable-sorted by their incoming position (ties keep load order)
/// and then reindexed, so gaps and duplicates from the backend disappear.
pub fn normalize_positions<P>(mut items: Vec<OrderedItem<P>>) -> Vec<OrderedItem<P>> {
    items.sort_by_key(|item| item.position);
    reindex(&mut items);
    items
}

/// Whether positions are exactly the indices `0..n-1`.
pub fn is_canonical<P>(items: &[OrderedItem<P>]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.position as usize == index)
}

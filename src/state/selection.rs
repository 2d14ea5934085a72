//! Row selection transitions.
//!
//! Pure functions from a click and the current selection to the next selection.
//! Indices are positions on the current page; membership is keyed by
//! [`RecordId`] so a selection survives re-sorting.

use crate::model::RecordId;
use std::collections::HashSet;

/// Selected ids plus the anchor for shift-click ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Selected record ids.
    pub selected: HashSet<RecordId>,
    /// Page index of the last single-click select.
    pub anchor_index: Option<usize>,
}

impl SelectionState {
    /// A selection holding `ids`, without an anchor.
    pub fn with_ids(ids: impl IntoIterator<Item = RecordId>) -> Self {
        Self {
            selected: ids.into_iter().collect(),
            anchor_index: None,
        }
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.selected.contains(id)
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in a stable order.
    pub fn sorted_ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Keep only ids present on the page and drop the anchor.
    ///
    /// Returns how many ids were removed.
    pub fn prune(&mut self, page_ids: &[RecordId]) -> usize {
        let before = self.selected.len();
        let present: HashSet<&RecordId> = page_ids.iter().collect();
        self.selected.retain(|id| present.contains(id));
        self.anchor_index = None;
        before - self.selected.len()
    }
}

/// A click on a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemClick {
    /// Page index of the clicked row.
    pub index: usize,
    /// Identity of the clicked row.
    pub record_id: RecordId,
    /// Shift was held.
    pub shift_held: bool,
    /// The click landed on the row's selection checkbox.
    pub hits_selection_affordance: bool,
}

impl ItemClick {
    /// A plain click on the row body.
    pub fn plain(index: usize, record_id: RecordId) -> Self {
        Self {
            index,
            record_id,
            shift_held: false,
            hits_selection_affordance: false,
        }
    }

    /// Same click with shift held.
    pub fn with_shift(mut self) -> Self {
        self.shift_held = true;
        self
    }

    /// Same click on the selection checkbox.
    pub fn on_affordance(mut self) -> Self {
        self.hits_selection_affordance = true;
        self
    }
}

/// Compute the selection after `click`.
///
/// # Rules
///
/// - Shift-click with an anchor adds every page row between the anchor and the
///   clicked index (inclusive, clipped to the page). The anchor is kept.
/// - Otherwise, a click on a selected row deselects it and clears the anchor.
/// - A click on an unselected row's checkbox adds it; a click on its body
///   replaces the selection with it. Either way it becomes the anchor.
pub fn on_item_click(
    click: &ItemClick,
    current: &SelectionState,
    page_ids: &[RecordId],
) -> SelectionState {
    let mut next = current.clone();

    if let (true, Some(anchor)) = (click.shift_held, current.anchor_index) {
        let low = anchor.min(click.index);
        let high = anchor.max(click.index);
        next.selected.extend(
            page_ids
                .iter()
                .skip(low)
                .take(high - low + 1)
                .cloned(),
        );
        return next;
    }

    if current.contains(&click.record_id) {
        next.selected.remove(&click.record_id);
        next.anchor_index = None;
    } else {
        if !click.hits_selection_affordance {
            next.selected.clear();
        }
        next.selected.insert(click.record_id.clone());
        next.anchor_index = Some(click.index);
    }
    next
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;

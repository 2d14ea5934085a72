//! Mutable browsing session.

use crate::config::InitialState;
use crate::model::{FilterSource, Generation, QueryRequest, RecordId, SortDirective};
use crate::state::selection::SelectionState;
use std::collections::HashSet;

/// Everything that drives the next query, plus selection and expansion.
///
/// Owned by exactly one controller. `generation` increases on every change
/// that needs a fresh page.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Active filter.
    pub filter: FilterSource,
    /// Sort directives, primary first.
    pub sort: Vec<SortDirective>,
    /// First record index of the window.
    pub first_index: usize,
    /// Pages per window.
    pub page_count: usize,
    /// Current generation token.
    pub generation: Generation,
    /// Selected ids and shift-click anchor.
    pub selection: SelectionState,
    /// Expand-all flag.
    pub expanded: bool,
    /// Individually expanded rows.
    pub expanded_ids: HashSet<RecordId>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::from_initial(&InitialState::default())
    }
}

impl SessionState {
    /// Session at generation zero, seeded from `initial`.
    pub fn from_initial(initial: &InitialState) -> Self {
        Self {
            filter: FilterSource::Form(initial.filter.clone()),
            sort: initial.sort.clone(),
            first_index: initial.first_index,
            page_count: initial.page_count.max(1),
            generation: Generation::default(),
            selection: SelectionState::with_ids(initial.selection.iter().cloned()),
            expanded: initial.expanded,
            expanded_ids: HashSet::new(),
        }
    }

    /// Request for the current window.
    pub fn to_request(&self, page_size: usize) -> QueryRequest {
        QueryRequest {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            first_index: self.first_index,
            page_count: self.page_count,
            page_size,
            generation: self.generation,
        }
    }

    /// Advance to the next generation and return it.
    pub fn bump(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.generation
    }

    /// Whether the row `id` renders expanded.
    pub fn is_expanded(&self, id: &RecordId) -> bool {
        self.expanded || self.expanded_ids.contains(id)
    }
}

//! Query request/result pairs and the generation token that ties them together.

use crate::model::{FilterSource, FilterTypes, Record, SortDirective, SortTypes};
use serde::{Deserialize, Serialize};
use std::fmt;

// ===== Generation =====

/// Monotonic token stamped on every request and echoed by its result.
///
/// A result is only applied when its generation equals the session's current
/// one; anything else is stale.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// Wrap a raw counter value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The next generation. Strictly greater than `self`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

// ===== FieldTypes =====

/// Per-field kind overrides consulted while compiling filters and sorts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTypes {
    /// Sort kind per field.
    pub sort_types: SortTypes,
    /// Filter leaf kind per field.
    pub filter_types: FilterTypes,
}

// ===== QueryRequest =====

/// Everything a data source needs to produce one page.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Filter to apply before sorting.
    pub filter: FilterSource,
    /// Sort directives, primary first.
    pub sort: Vec<SortDirective>,
    /// Index of the first record of the window.
    pub first_index: usize,
    /// Number of pages to return in one window.
    pub page_count: usize,
    /// Records per page.
    pub page_size: usize,
    /// Token the result must echo.
    pub generation: Generation,
}

impl QueryRequest {
    /// Number of records the window may hold.
    pub fn window_len(&self) -> usize {
        self.page_count.saturating_mul(self.page_size)
    }
}

// ===== QueryResult =====

/// One page (or prefetched run of pages) of the filtered, sorted set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Window contents.
    pub records: Vec<Record>,
    /// Total records that passed the filter.
    pub matched_count: usize,
    /// Index of `records[0]` within the full sorted set.
    pub first_index: usize,
    /// Copied from the request.
    pub generation: Generation,
}

impl QueryResult {
    /// An empty result for `request`.
    pub fn empty(request: &QueryRequest) -> Self {
        Self {
            records: Vec::new(),
            matched_count: 0,
            first_index: request.first_index,
            generation: request.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_next_strictly_increases() {
        let g = Generation::default();
        assert!(g.next() > g);
        assert_eq!(g.next().next().get(), 2);
    }

    #[test]
    fn window_len_saturates() {
        let request = QueryRequest {
            filter: FilterSource::default(),
            sort: vec![],
            first_index: 0,
            page_count: usize::MAX,
            page_size: 2,
            generation: Generation::default(),
        };
        assert_eq!(request.window_len(), usize::MAX);
    }
}

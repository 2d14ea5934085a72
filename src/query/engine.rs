//! Query execution: filter → sort → slice.

use crate::model::{FieldTypes, QueryRequest, QueryResult, Record};
use crate::query::{filter, sort};

/// Executes [`QueryRequest`]s against a dataset snapshot.
///
/// Pure: no I/O, and neither the dataset nor the request is mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryEngine {
    types: FieldTypes,
}

impl QueryEngine {
    /// Engine using the given per-field kind overrides.
    pub fn new(types: FieldTypes) -> Self {
        Self { types }
    }

    /// Kind overrides in effect.
    pub fn types(&self) -> &FieldTypes {
        &self.types
    }

    /// Replace the kind overrides.
    pub fn set_types(&mut self, types: FieldTypes) {
        self.types = types;
    }

    /// Run `request` over `dataset`.
    ///
    /// `matched_count` counts every record that passed the filter. The page is
    /// `[first_index, first_index + page_count * page_size)` of the sorted set,
    /// clipped to what exists; a window past the end is simply empty.
    pub fn execute(&self, dataset: &[Record], request: &QueryRequest) -> QueryResult {
        let spec = filter::resolve(&request.filter, &self.types.filter_types);
        let predicate = filter::compile(&spec);
        let filtered: Vec<&Record> = dataset.iter().filter(|&record| predicate(record)).collect();

        let sorted = sort::compile(&request.sort, &self.types.sort_types).apply(filtered);
        let matched_count = sorted.len();

        let records = sorted
            .into_iter()
            .skip(request.first_index)
            .take(request.window_len())
            .cloned()
            .collect();

        QueryResult {
            records,
            matched_count,
            first_index: request.first_index,
            generation: request.generation,
        }
    }
}

/// Run `request` over `dataset` with the given kind overrides.
pub fn execute(dataset: &[Record], request: &QueryRequest, types: &FieldTypes) -> QueryResult {
    QueryEngine::new(types.clone()).execute(dataset, request)
}

//! Shared fixtures for whitebox tests.
//!
//! Builders for small record sets plus helpers to read ids back out of results.

use crate::model::{Record, RecordId};
use serde_json::{json, Value};

/// Build a record from a JSON object literal.
///
/// Panics if `value` is not an object; fixtures are always objects.
pub fn record(value: Value) -> Record {
    Record::from_value(value).expect("fixture must be a JSON object")
}

/// The three-record dataset used by the ordering and filtering scenarios.
pub fn scenario_dataset() -> Vec<Record> {
    vec![
        record(json!({"id": 1, "name": "b"})),
        record(json!({"id": 2, "name": "a"})),
        record(json!({"id": 3, "name": "a"})),
    ]
}

/// A slightly richer dataset with mixed field types.
pub fn people() -> Vec<Record> {
    vec![
        record(json!({"id": 1, "name": "Alice", "age": 34, "team": "red", "score": "12"})),
        record(json!({"id": 2, "name": "bob", "age": 27, "team": "blue", "score": "9.5"})),
        record(json!({"id": 3, "name": "Carol", "age": 34, "team": "blue", "score": "n/a"})),
        record(json!({"id": 4, "name": "dave", "age": 41, "team": "red"})),
        record(json!({"id": 5, "name": "Eve", "age": 27, "team": "green", "score": "100"})),
    ]
}

/// `n` records with `id = 0..n` and a `bucket` field cycling through `buckets`.
pub fn numbered(n: usize, buckets: usize) -> Vec<Record> {
    (0..n)
        .map(|i| record(json!({"id": i, "bucket": i % buckets.max(1)})))
        .collect()
}

/// The `id` field of every record, as integers.
pub fn ids(records: &[Record]) -> Vec<i64> {
    records
        .iter()
        .map(|r| r.get("id").and_then(Value::as_i64).unwrap_or(-1))
        .collect()
}

/// Shorthand for a [`RecordId`].
pub fn rid(raw: impl ToString) -> RecordId {
    RecordId::new(raw.to_string())
}

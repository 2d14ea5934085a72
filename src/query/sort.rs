//! Sort compilation.
//!
//! A directive list compiles into a [`CompiledSort`]. [`CompiledSort::apply`] runs
//! one stable pass per directive, least significant first, so the first
//! directive ends up dominant. Every pass tie-breaks on the position an item
//! held when the pass started, ascending regardless of direction, which makes
//! the output reproducible for identical input.

use crate::model::value;
use crate::model::{Record, SortDirection, SortDirective, SortKind, SortTypes};
use serde_json::Value;
use std::cmp::Ordering;

/// Per-field comparison resolved from one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldComparator {
    key: String,
    kind: SortKind,
    direction: SortDirection,
}

/// Sort key extracted once per record per pass.
enum SortKey<'a> {
    Raw(Option<&'a Value>),
    Text(String),
    Number(f64),
}

impl FieldComparator {
    /// Resolve the directive's kind: its own, then the field's configured one,
    /// then [`SortKind::Default`].
    pub fn new(directive: &SortDirective, sort_types: &SortTypes) -> Self {
        let kind = directive
            .kind
            .or_else(|| sort_types.get(&directive.key).copied())
            .unwrap_or_default();
        Self {
            key: directive.key.clone(),
            kind,
            direction: directive.direction,
        }
    }

    /// Field this comparator reads.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolved kind.
    pub fn kind(&self) -> SortKind {
        self.kind
    }

    /// Compare two records on this field, direction applied.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        self.compare_keys(&self.sort_key(a), &self.sort_key(b))
    }

    fn sort_key<'a>(&self, record: &'a Record) -> SortKey<'a> {
        let field = record.get(&self.key);
        match self.kind {
            SortKind::Default => SortKey::Raw(field),
            SortKind::Text => SortKey::Text(value::lowercase(field)),
            SortKind::Number => SortKey::Number(value::parse_number(field)),
        }
    }

    fn compare_keys(&self, a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
        let ordering = match (a, b) {
            (SortKey::Raw(x), SortKey::Raw(y)) => value::compare_raw(*x, *y),
            (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
            (SortKey::Number(x), SortKey::Number(y)) => value::compare_f64(*x, *y),
            // Keys for one comparator always share a variant.
            _ => Ordering::Equal,
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// A compiled directive list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledSort {
    comparators: Vec<FieldComparator>,
}

/// Compile sort directives, primary first.
pub fn compile(directives: &[SortDirective], sort_types: &SortTypes) -> CompiledSort {
    CompiledSort {
        comparators: directives
            .iter()
            .map(|d| FieldComparator::new(d, sort_types))
            .collect(),
    }
}

impl CompiledSort {
    /// True when there is nothing to sort by.
    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    /// Resolved comparators, primary first.
    pub fn comparators(&self) -> &[FieldComparator] {
        &self.comparators
    }

    /// Lexicographic comparison over all directives (no index tie-break).
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        self.comparators
            .iter()
            .map(|c| c.compare(a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Sort `records` by multi-pass stable sorting. An empty directive list
    /// returns the input order untouched.
    pub fn apply<'a>(&self, records: Vec<&'a Record>) -> Vec<&'a Record> {
        if self.is_empty() {
            return records;
        }

        let mut ordered = records;
        for comparator in self.comparators.iter().rev() {
            let mut tagged: Vec<(SortKey<'a>, usize, &'a Record)> = ordered
                .iter()
                .enumerate()
                .map(|(position, &record)| (comparator.sort_key(record), position, record))
                .collect();
            tagged.sort_by(|a, b| comparator.compare_keys(&a.0, &b.0).then(a.1.cmp(&b.1)));
            ordered = tagged.into_iter().map(|(_, _, record)| record).collect();
        }
        ordered
    }
}

#[cfg(test)]
#[path = "sort_tests.rs"]
mod tests;

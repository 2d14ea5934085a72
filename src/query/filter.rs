//! Filter compilation.
//!
//! Turns a [`FilterSpec`] tree into a boxed predicate. Composite nodes
//! short-circuit: `And` stops at the first false child, `Or` at the first true.

use crate::model::value;
use crate::model::{FilterForm, FilterKind, FilterSource, FilterSpec, FilterTypes, Record};
use std::borrow::Cow;

/// Compiled filter.
pub type Predicate = Box<dyn Fn(&Record) -> bool + Send + Sync>;

/// Compile a filter tree into a predicate.
pub fn compile(spec: &FilterSpec) -> Predicate {
    match spec {
        FilterSpec::Equals { key, value } => {
            let key = key.clone();
            let expected = value.clone();
            Box::new(move |record| value::strict_equals(record.get(&key), &expected))
        }
        FilterSpec::Text {
            key,
            value,
            exact_match,
        } => {
            let key = key.clone();
            let needle = value::lowercase(Some(value));
            if *exact_match {
                Box::new(move |record| value::lowercase(record.get(&key)) == needle)
            } else {
                Box::new(move |record| value::lowercase(record.get(&key)).contains(&needle))
            }
        }
        FilterSpec::And { children } => {
            let predicates: Vec<Predicate> = children.iter().map(compile).collect();
            Box::new(move |record| predicates.iter().all(|p| p(record)))
        }
        FilterSpec::Or { children } => {
            let predicates: Vec<Predicate> = children.iter().map(compile).collect();
            Box::new(move |record| predicates.iter().any(|p| p(record)))
        }
        FilterSpec::MatchAll => Box::new(|_| true),
    }
}

/// Normalize a raw form value into an `And` of per-field leaves.
///
/// Each leaf's kind comes from `filter_types`, defaulting to a substring text
/// match.
pub fn compile_form(form: &FilterForm, filter_types: &FilterTypes) -> FilterSpec {
    let children = form
        .iter()
        .map(|(key, value)| {
            match filter_types.get(key).copied().unwrap_or_default() {
                FilterKind::Equals => FilterSpec::equals(key.clone(), value.clone()),
                FilterKind::Text => FilterSpec::text(key.clone(), value.clone()),
            }
        })
        .collect();
    FilterSpec::And { children }
}

/// Resolve a session filter into a concrete tree.
pub fn resolve<'a>(source: &'a FilterSource, filter_types: &FilterTypes) -> Cow<'a, FilterSpec> {
    match source {
        FilterSource::Spec(spec) => Cow::Borrowed(spec),
        FilterSource::Form(form) => Cow::Owned(compile_form(form, filter_types)),
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;

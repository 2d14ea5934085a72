//! Tests for filter compilation.

use super::*;
use crate::test_harness::{people, record, scenario_dataset};
use serde_json::json;

fn matching_ids(spec: &FilterSpec, records: &[Record]) -> Vec<i64> {
    let predicate = compile(spec);
    records
        .iter()
        .filter(|r| predicate(r))
        .filter_map(|r| r.get("id").and_then(|v| v.as_i64()))
        .collect()
}

// ===== Leaves =====

#[test]
fn text_filter_is_case_insensitive_substring() {
    let spec = FilterSpec::text("name", "A");

    assert_eq!(matching_ids(&spec, &scenario_dataset()), vec![2, 3]);
}

#[test]
fn text_filter_matches_inside_the_field() {
    let spec = FilterSpec::text("name", "ar");

    assert_eq!(matching_ids(&spec, &people()), vec![3]);
}

#[test]
fn exact_text_filter_requires_whole_field() {
    let records = vec![
        record(json!({"id": 1, "name": "Bob"})),
        record(json!({"id": 2, "name": "Bobby"})),
    ];

    assert_eq!(
        matching_ids(&FilterSpec::text_exact("name", "bob"), &records),
        vec![1]
    );
}

#[test]
fn text_filter_stringifies_numbers() {
    let spec = FilterSpec::text("age", 4);

    assert_eq!(matching_ids(&spec, &people()), vec![1, 3, 4]);
}

#[test]
fn text_filter_treats_missing_field_as_empty_string() {
    // Record 4 has no score; only the empty needle matches it.
    assert_eq!(matching_ids(&FilterSpec::text("score", "1"), &people()), vec![1, 5]);
    assert_eq!(
        matching_ids(&FilterSpec::text("score", ""), &people()),
        vec![1, 2, 3, 4, 5]
    );
}

#[test]
fn equals_filter_does_not_coerce() {
    assert_eq!(matching_ids(&FilterSpec::equals("age", 34), &people()), vec![1, 3]);
    assert!(matching_ids(&FilterSpec::equals("age", "34"), &people()).is_empty());
}

#[test]
fn equals_filter_never_matches_missing_field() {
    assert!(matching_ids(&FilterSpec::equals("score", json!(null)), &people()).is_empty());
}

// ===== Composites =====

#[test]
fn and_filter_is_intersection() {
    let spec = FilterSpec::and(vec![
        FilterSpec::equals("age", 34),
        FilterSpec::text("team", "blue"),
    ]);

    assert_eq!(matching_ids(&spec, &people()), vec![3]);
}

#[test]
fn or_filter_is_union() {
    let spec = FilterSpec::or(vec![
        FilterSpec::equals("team", "green"),
        FilterSpec::equals("age", 41),
    ]);

    assert_eq!(matching_ids(&spec, &people()), vec![4, 5]);
}

#[test]
fn empty_and_matches_everything_empty_or_matches_nothing() {
    assert_eq!(matching_ids(&FilterSpec::and(vec![]), &people()).len(), 5);
    assert!(matching_ids(&FilterSpec::or(vec![]), &people()).is_empty());
}

#[test]
fn match_all_accepts_every_record() {
    assert_eq!(
        matching_ids(&FilterSpec::MatchAll, &people()),
        vec![1, 2, 3, 4, 5]
    );
}

// ===== Forms =====

#[test]
fn form_compiles_to_and_of_text_leaves_by_default() {
    let mut form = FilterForm::new();
    form.insert("name".into(), json!("a"));
    form.insert("team".into(), json!("re"));

    let spec = compile_form(&form, &FilterTypes::new());

    assert_eq!(
        spec,
        FilterSpec::and(vec![FilterSpec::text("name", "a"), FilterSpec::text("team", "re")])
    );
    assert_eq!(matching_ids(&spec, &people()), vec![1, 4]);
}

#[test]
fn form_honours_configured_filter_types() {
    let mut form = FilterForm::new();
    form.insert("age".into(), json!(27));
    let mut types = FilterTypes::new();
    types.insert("age".into(), FilterKind::Equals);

    let spec = compile_form(&form, &types);

    assert_eq!(spec, FilterSpec::and(vec![FilterSpec::equals("age", 27)]));
    assert_eq!(matching_ids(&spec, &people()), vec![2, 5]);
}

#[test]
fn empty_form_matches_everything() {
    let spec = compile_form(&FilterForm::new(), &FilterTypes::new());

    assert_eq!(matching_ids(&spec, &people()).len(), 5);
}

#[test]
fn resolve_borrows_explicit_specs() {
    let source = FilterSource::Spec(FilterSpec::MatchAll);

    assert!(matches!(
        resolve(&source, &FilterTypes::new()),
        Cow::Borrowed(FilterSpec::MatchAll)
    ));
}

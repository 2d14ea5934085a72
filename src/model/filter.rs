//! Declarative filter specifications.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw filter form value: field name → form value.
///
/// Ordered by field name so compiled filters are deterministic.
pub type FilterForm = BTreeMap<String, Value>;

/// Per-field filter kind overrides used when compiling a [`FilterForm`].
pub type FilterTypes = BTreeMap<String, FilterKind>;

/// A filter expression tree.
///
/// Serialized with a `kind` tag (`equals`, `string`, `and`, `or`). Any
/// unrecognised tag deserializes into [`FilterSpec::MatchAll`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterSpec {
    /// `record[key] == value`, no coercion.
    Equals {
        /// Field name.
        key: String,
        /// Expected value.
        value: Value,
    },
    /// Case-insensitive substring (or, with `exact_match`, equality) test.
    #[serde(rename = "string")]
    Text {
        /// Field name.
        key: String,
        /// Search value; stringified before comparison.
        value: Value,
        /// Require the whole lower-cased field to equal the value.
        #[serde(default, alias = "exactMatch", alias = "match")]
        exact_match: bool,
    },
    /// All children must match.
    And {
        /// Child filters.
        #[serde(default)]
        children: Vec<FilterSpec>,
    },
    /// At least one child must match.
    Or {
        /// Child filters.
        #[serde(default)]
        children: Vec<FilterSpec>,
    },
    /// Matches every record.
    #[default]
    #[serde(other)]
    MatchAll,
}

impl FilterSpec {
    /// Substring text filter.
    pub fn text(key: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterSpec::Text {
            key: key.into(),
            value: value.into(),
            exact_match: false,
        }
    }

    /// Exact (case-insensitive) text filter.
    pub fn text_exact(key: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterSpec::Text {
            key: key.into(),
            value: value.into(),
            exact_match: true,
        }
    }

    /// Strict equality filter.
    pub fn equals(key: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterSpec::Equals {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Conjunction of `children`.
    pub fn and(children: Vec<FilterSpec>) -> Self {
        FilterSpec::And { children }
    }

    /// Disjunction of `children`.
    pub fn or(children: Vec<FilterSpec>) -> Self {
        FilterSpec::Or { children }
    }
}

/// Leaf kind selected for a form field.
///
/// Unknown names fall back to [`FilterKind::Text`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum FilterKind {
    /// Strict equality leaf.
    #[serde(rename = "equals")]
    Equals,
    /// Case-insensitive substring leaf.
    #[default]
    #[serde(rename = "string")]
    Text,
}

impl From<String> for FilterKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "equals" => FilterKind::Equals,
            _ => FilterKind::Text,
        }
    }
}

/// Where the session's filter comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSource {
    /// A raw form value, compiled with the configured [`FilterTypes`].
    Form(FilterForm),
    /// An explicit filter tree.
    Spec(FilterSpec),
}

impl Default for FilterSource {
    fn default() -> Self {
        FilterSource::Form(FilterForm::new())
    }
}

impl From<FilterSpec> for FilterSource {
    fn from(spec: FilterSpec) -> Self {
        FilterSource::Spec(spec)
    }
}

impl From<FilterForm> for FilterSource {
    fn from(form: FilterForm) -> Self {
        FilterSource::Form(form)
    }
}

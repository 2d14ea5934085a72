//! Sort directives.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-field sort kind overrides.
pub type SortTypes = BTreeMap<String, SortKind>;

/// Sort direction. `":asc"`/`":desc"` are accepted as aliases; anything else
/// is ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl From<String> for SortDirection {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "desc" | ":desc" => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// How field values are compared. Unknown names fall back to
/// [`SortKind::Default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum SortKind {
    /// Raw value ordering.
    #[default]
    #[serde(rename = "default")]
    Default,
    /// Case-insensitive text ordering.
    #[serde(rename = "string")]
    Text,
    /// Numeric ordering of parsed floats.
    #[serde(rename = "number")]
    Number,
}

impl From<String> for SortKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "string" => SortKind::Text,
            "number" => SortKind::Number,
            _ => SortKind::Default,
        }
    }
}

/// One sort key. The first directive of a list is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    /// Field name. `value` is accepted as an alias.
    #[serde(alias = "value")]
    pub key: String,
    /// Direction; ascending when omitted.
    #[serde(default)]
    pub direction: SortDirection,
    /// Explicit kind; when absent the field's configured kind applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SortKind>,
}

impl SortDirective {
    /// Ascending directive on `key`.
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
            kind: None,
        }
    }

    /// Descending directive on `key`.
    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
            kind: None,
        }
    }

    /// Same directive with an explicit kind.
    pub fn with_kind(mut self, kind: SortKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Parse the `key[:asc|:desc]` shorthand.
    pub fn parse(raw: &str) -> Self {
        match raw.rsplit_once(':') {
            Some((key, "desc")) => Self::desc(key),
            Some((key, "asc")) => Self::asc(key),
            _ => Self::asc(raw),
        }
    }
}

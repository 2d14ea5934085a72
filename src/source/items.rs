//! Item document loading.
//!
//! An item document is either a top-level JSON array of objects, or an object
//! whose `items_prop` key holds such an array.

pub use crate::model::error::InputError;
use crate::model::Record;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Load records from the item document at `path`.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if the file does not exist,
/// `InputError::Io` if it cannot be read, and the decoding errors of
/// [`parse_items`] otherwise.
pub fn load_items(path: impl AsRef<Path>, items_prop: &str) -> Result<Vec<Record>, InputError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(InputError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path)?;
    decode(&contents, items_prop, path)
}

/// Decode records from an in-memory item document.
///
/// # Errors
///
/// Returns `InputError::Json` for malformed JSON, `InputError::MissingItems`
/// when there is no item array, and `InputError::NotAnObject` for the first
/// array element that is not an object.
pub fn parse_items(text: &str, items_prop: &str) -> Result<Vec<Record>, InputError> {
    decode(text, items_prop, &PathBuf::from("<memory>"))
}

fn decode(text: &str, items_prop: &str, path: &Path) -> Result<Vec<Record>, InputError> {
    let document: Value = serde_json::from_str(text).map_err(|e| InputError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let elements = match document {
        Value::Array(elements) => elements,
        Value::Object(mut fields) => match fields.remove(items_prop) {
            Some(Value::Array(elements)) => elements,
            _ => {
                return Err(InputError::MissingItems {
                    key: items_prop.to_string(),
                })
            }
        },
        _ => {
            return Err(InputError::MissingItems {
                key: items_prop.to_string(),
            })
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            Record::from_value(element).ok_or(InputError::NotAnObject { index })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::ids;
    use std::fs;

    #[test]
    fn top_level_array_is_accepted() {
        let records = parse_items(r#"[{"id": 1}, {"id": 2}]"#, "items").unwrap();

        assert_eq!(ids(&records), vec![1, 2]);
    }

    #[test]
    fn items_prop_selects_nested_array() {
        let records = parse_items(r#"{"rows": [{"id": 3}], "total": 1}"#, "rows").unwrap();

        assert_eq!(ids(&records), vec![3]);
    }

    #[test]
    fn object_without_items_array_is_rejected() {
        let err = parse_items(r#"{"items": {"id": 1}}"#, "items").unwrap_err();

        assert!(matches!(err, InputError::MissingItems { key } if key == "items"));
    }

    #[test]
    fn scalar_document_is_rejected() {
        assert!(matches!(
            parse_items("42", "items"),
            Err(InputError::MissingItems { .. })
        ));
    }

    #[test]
    fn non_object_element_reports_its_index() {
        let err = parse_items(r#"[{"id": 1}, "two", 3]"#, "items").unwrap_err();

        assert!(matches!(err, InputError::NotAnObject { index: 1 }));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = parse_items("[{", "items").unwrap_err();

        assert!(matches!(err, InputError::Json { .. }));
        assert!(err.to_string().contains("<memory>"));
    }

    #[test]
    fn load_items_reports_missing_file() {
        let err = load_items("/nonexistent/recbrowse/items.json", "items").unwrap_err();

        assert!(matches!(err, InputError::FileNotFound { .. }));
    }

    #[test]
    fn load_items_reads_file() {
        let path = std::env::temp_dir().join("recbrowse_load_items_reads_file.json");
        fs::write(&path, r#"{"items": [{"id": 10}, {"id": 11}]}"#).unwrap();

        let result = load_items(&path, "items");
        let _ = fs::remove_file(&path);

        assert_eq!(ids(&result.unwrap()), vec![10, 11]);
    }
}

//! Changelog document parsing
//!
//! Turns the raw text of a changelog file into a generic YAML value and
//! pulls the `Entries` list out of it.

use crate::errors::{ExError, RelayError, Result};
use crate::model::ChangelogEntry;
use serde_yaml::{Mapping, Value};

const BYTE_ORDER_MARK: char = '\u{feff}';
const ENTRIES_KEY: &str = "Entries";

/// Parse a changelog document
///
/// A missing file, an empty file and a `null` document all parse to an
/// empty mapping. A leading byte-order mark is ignored.
///
/// # Errors
///
/// Returns `InvalidDocument` when the text is not valid YAML.
pub fn parse_document(text: Option<&str>) -> Result<Value> {
    let Some(text) = text else {
        return Ok(Value::Mapping(Mapping::new()));
    };
    let text = text.trim_start_matches(BYTE_ORDER_MARK);
    if text.trim().is_empty() {
        return Ok(Value::Mapping(Mapping::new()));
    }
    let value: Value = serde_yaml::from_str(text)
        .map_err(|e| ExError::from(RelayError::from(e)))?;
    Ok(match value {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    })
}

/// Extract the entries of a parsed document
///
/// Anything other than a top-level mapping with an `Entries` sequence
/// yields no entries; sequence items that are not mappings are skipped.
pub fn extract_entries(document: &Value) -> Vec<ChangelogEntry> {
    match document.get(ENTRIES_KEY) {
        Some(Value::Sequence(items)) => items
            .iter()
            .cloned()
            .filter_map(ChangelogEntry::from_value)
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse a document and extract its entries in one step
///
/// # Errors
///
/// Returns `InvalidDocument` when the text is not valid YAML.
pub fn parse_entries(text: Option<&str>) -> Result<Vec<ChangelogEntry>> {
    Ok(extract_entries(&parse_document(text)?))
}

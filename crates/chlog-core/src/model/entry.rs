//! A single changelog entry and its change items

use serde_yaml::{Mapping, Value};
use std::fmt;

/// Identifier of a changelog entry
///
/// Ids are YAML scalars; `1` and `"1"` are different ids. The id is a
/// candidate key only: a file may contain the same id more than once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(Value);

impl EntryId {
    /// Build an id from a YAML value; `null` means "no id"
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            other => Some(Self(other.clone())),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(Value::Number(id.into()))
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(Value::String(id.to_string()))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&scalar_text(&self.0))
    }
}

/// Kind of a single change item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Add,
    Fix,
    Remove,
    Tweak,
    /// Anything else, with the raw type text (possibly empty)
    Unknown(String),
}

impl ChangeType {
    /// The four canonical types in summary order
    pub const CANONICAL: [ChangeType; 4] = [
        ChangeType::Add,
        ChangeType::Fix,
        ChangeType::Remove,
        ChangeType::Tweak,
    ];

    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "Add" => ChangeType::Add,
            "Fix" => ChangeType::Fix,
            "Remove" => ChangeType::Remove,
            "Tweak" => ChangeType::Tweak,
            other => ChangeType::Unknown(other.to_string()),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ChangeType::Add => "🆕",
            ChangeType::Fix => "🐛",
            ChangeType::Remove => "❌",
            ChangeType::Tweak => "⚒️",
            ChangeType::Unknown(_) => "❓",
        }
    }

    /// True when the source item carried no type at all
    pub fn is_missing(&self) -> bool {
        matches!(self, ChangeType::Unknown(raw) if raw.is_empty())
    }
}

/// One `{type, message}` pair of an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeItem {
    pub kind: ChangeType,
    /// Message as written in the file, untrimmed
    pub message: String,
}

/// One entry of a changelog file
///
/// The raw mapping is kept verbatim and is the only thing equality looks
/// at, so fields this model does not interpret (`time`, `url`, ...) still
/// count when deciding whether an entry was modified.
#[derive(Debug, Clone)]
pub struct ChangelogEntry {
    id: Option<EntryId>,
    author: Option<String>,
    changes: Vec<ChangeItem>,
    raw: Mapping,
}

impl ChangelogEntry {
    /// Interpret a YAML value as an entry; non-mappings are not entries
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Mapping(mapping) => Some(Self::from_mapping(mapping)),
            Value::Tagged(tagged) => Self::from_value(tagged.value),
            _ => None,
        }
    }

    pub fn from_mapping(raw: Mapping) -> Self {
        let id = raw.get("id").and_then(EntryId::from_value);
        let author = raw
            .get("author")
            .map(scalar_text)
            .filter(|author| !author.is_empty());
        let changes = match raw.get("changes") {
            Some(Value::Sequence(items)) => items.iter().filter_map(change_item).collect(),
            _ => Vec::new(),
        };
        Self {
            id,
            author,
            changes,
            raw,
        }
    }

    pub fn id(&self) -> Option<&EntryId> {
        self.id.as_ref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn changes(&self) -> &[ChangeItem] {
        &self.changes
    }

    pub fn raw(&self) -> &Mapping {
        &self.raw
    }
}

impl PartialEq for ChangelogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ChangelogEntry {}

fn change_item(value: &Value) -> Option<ChangeItem> {
    let Value::Mapping(item) = value else {
        return None;
    };
    let kind = item
        .get("type")
        .map(scalar_text)
        .map(|raw| ChangeType::from_raw(&raw))
        .unwrap_or_else(|| ChangeType::Unknown(String::new()));
    let message = item.get("message").map(scalar_text).unwrap_or_default();
    Some(ChangeItem { kind, message })
}

/// Render a YAML value as the plain text a human wrote
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        nested => serde_yaml::to_string(nested)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

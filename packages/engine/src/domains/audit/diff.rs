//! Structural diff of two flat key/value snapshots.
//!
//! Mutations hand the recorder a before and an after map of the fields
//! they touched; the diff is generic over the entity type, tolerant of
//! keys missing on either side (treated as null).

use serde_json::{Map, Value};

/// One differing column with its serialized before/after values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub column: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Compute the set of fields present in either snapshot whose values
/// differ, sorted by column name for stable output.
pub fn diff_snapshots(before: &Map<String, Value>, after: &Map<String, Value>) -> Vec<FieldChange> {
    let mut columns: Vec<&String> = before.keys().chain(after.keys()).collect();
    columns.sort();
    columns.dedup();

    let mut changes = Vec::new();
    for column in columns {
        let old = before.get(column).unwrap_or(&Value::Null);
        let new = after.get(column).unwrap_or(&Value::Null);
        if old != new {
            changes.push(FieldChange {
                column: column.clone(),
                before: render(old),
                after: render(new),
            });
        }
    }
    changes
}

/// Null maps to a NULL column; strings are stored raw, everything else as
/// its JSON rendering.
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

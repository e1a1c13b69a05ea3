//! Record normalization
//!
//! Flattens nested API records into flat rows with dotted column names and
//! collects them into a table whose columns are the union of all keys.

use crate::types::{JsonObject, JsonValue};

/// Separator between parent and child keys in flattened column names
pub const COLUMN_SEPARATOR: char = '.';

/// Column used when a record is not a JSON object
pub const SCALAR_COLUMN: &str = "value";

static NULL: JsonValue = JsonValue::Null;

/// Flatten nested objects into dotted keys.
///
/// `{"a": {"b": 1}, "c": [1, 2]}` becomes `{"a.b": 1, "c": [1, 2]}`.
/// Arrays are kept as values. An empty nested object produces no column.
pub fn normalize_record(record: &JsonValue) -> JsonObject {
    let mut flat = JsonObject::new();
    match record {
        JsonValue::Object(map) => flatten_into(&mut flat, None, map),
        other => {
            flat.insert(SCALAR_COLUMN.to_string(), other.clone());
        }
    }
    flat
}

fn flatten_into(flat: &mut JsonObject, prefix: Option<&str>, map: &JsonObject) {
    for (key, value) in map {
        let column = match prefix {
            Some(prefix) => format!("{prefix}{COLUMN_SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            JsonValue::Object(nested) => flatten_into(flat, Some(&column), nested),
            other => {
                flat.insert(column, other.clone());
            }
        }
    }
}

/// Normalized rows sharing one column list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<JsonObject>,
}

impl Table {
    /// Normalize `records`; columns appear in the order they are first seen
    pub fn from_records(records: &[JsonValue]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let row = normalize_record(record);
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
            rows.push(row);
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[JsonObject] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value; `None` when the row has no such column
    pub fn cell(&self, row: usize, column: &str) -> Option<&JsonValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Values of one column, with `Null` for rows that lack it
    pub fn column_values<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a JsonValue> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&NULL))
    }
}

/// Render a cell for text output: strings unquoted, null and missing empty
pub fn render_cell(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

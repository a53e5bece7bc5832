//! A list item and the column rules around it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Columns the service owns. Clients cannot write them.
pub const SYSTEM_COLUMNS: [&str; 4] = ["ID", "Id", "Created", "Modified"];

/// A stored list item.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    pub id: u64,
    /// User columns, schemaless
    pub columns: Map<String, Value>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl StoredItem {
    /// Create an item, dropping any system columns from `columns`.
    pub fn new(id: u64, columns: Map<String, Value>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            columns: strip_system_columns(columns),
            created: now,
            modified: now,
        }
    }

    /// Merge columns into the item. Columns not mentioned keep their value.
    pub fn merge(&mut self, columns: Map<String, Value>, now: DateTime<Utc>) {
        self.columns.extend(strip_system_columns(columns));
        self.modified = now;
    }

    /// Look up a column, system columns included.
    pub fn column(&self, name: &str) -> Option<Value> {
        match name {
            "ID" | "Id" => Some(Value::from(self.id)),
            "Created" => Some(timestamp(self.created)),
            "Modified" => Some(timestamp(self.modified)),
            _ => self.columns.get(name).cloned(),
        }
    }

    /// JSON representation with every column.
    pub fn to_json(&self) -> Value {
        let mut out = self.columns.clone();
        for name in SYSTEM_COLUMNS {
            if let Some(value) = self.column(name) {
                out.insert(name.to_string(), value);
            }
        }
        Value::Object(out)
    }

    /// JSON representation restricted to `select`. The id is always included.
    pub fn to_json_selected(&self, select: &[String]) -> Value {
        let mut out = Map::new();
        out.insert("ID".to_string(), Value::from(self.id));
        for name in select {
            out.insert(name.clone(), self.column(name).unwrap_or(Value::Null));
        }
        Value::Object(out)
    }
}

fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn strip_system_columns(mut columns: Map<String, Value>) -> Map<String, Value> {
    for name in SYSTEM_COLUMNS {
        columns.remove(name);
    }
    columns
}

/// Order two column values: missing and null first, then booleans,
/// numbers, and strings, each compared naturally.
pub fn compare_columns(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn class(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => class(a).cmp(&class(b)),
    }
}

//! Ingestion-time adapter for row-store field shapes.
//!
//! The hosted store is inconsistent about value shapes: a select field may
//! arrive as a plain string or as an `{id, value}` wrapper object, and link
//! fields arrive as arrays of either ids or wrapper objects. Everything is
//! converted to plain typed values here, at the service boundary, so the rest
//! of the crate never shape-checks.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

/// Unwraps an `{id, value}` wrapper, passing plain scalars through.
fn unwrap_value(v: &JsonValue) -> &JsonValue {
    match v {
        JsonValue::Object(map) => map.get("value").unwrap_or(v),
        _ => v,
    }
}

pub fn field<'a>(row: &'a JsonValue, name: &str) -> Option<&'a JsonValue> {
    row.get(name).filter(|v| !v.is_null())
}

pub fn str_field(row: &JsonValue, name: &str) -> Option<String> {
    let v = unwrap_value(field(row, name)?);
    match v {
        JsonValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn i64_field(row: &JsonValue, name: &str) -> Option<i64> {
    let v = unwrap_value(field(row, name)?);
    match v {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn bool_field(row: &JsonValue, name: &str) -> Option<bool> {
    let v = unwrap_value(field(row, name)?);
    match v {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::Number(n) => Some(n.as_i64() != Some(0)),
        JsonValue::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn datetime_field(row: &JsonValue, name: &str) -> Option<DateTime<Utc>> {
    let raw = str_field(row, name)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Link-row fields: an array of row ids, or of `{id, value}` objects.
pub fn id_list_field(row: &JsonValue, name: &str) -> Vec<i64> {
    let Some(JsonValue::Array(items)) = field(row, name) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            JsonValue::Number(n) => n.as_i64(),
            JsonValue::Object(map) => map.get("id").and_then(|id| id.as_i64()),
            _ => None,
        })
        .collect()
}

pub fn json_field(row: &JsonValue, name: &str) -> Option<JsonValue> {
    let v = field(row, name)?;
    match v {
        // Blob columns are stored as long text; parse when they hold JSON.
        JsonValue::String(s) => serde_json::from_str(s).ok(),
        other => Some(other.clone()),
    }
}

pub fn row_id(row: &JsonValue) -> Option<i64> {
    row.get("id").and_then(|v| v.as_i64())
}

//! Item handlers - list reads and item mutations.
//!
//! Paths address lists and items the OData way: a list segment
//! `GetByTitle('Title')` and an item segment `items(7)`.

use crate::error::{AppError, Result};
use crate::store::{ItemQuery, ListRepository, OrderBy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query parameters of a list read.
#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    /// Comma-separated column names
    #[serde(rename = "$select")]
    pub select: Option<String>,
    /// Column name, optionally followed by `asc` or `desc`
    #[serde(rename = "$orderby")]
    pub order_by: Option<String>,
}

/// Response of a list read.
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub value: Vec<Value>,
}

/// What a POST to an item asks for, from its `X-HTTP-Method` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemMethod {
    Merge,
    Delete,
}

impl ItemMethod {
    pub fn parse(header: Option<&str>) -> Result<Self> {
        match header.map(str::to_ascii_uppercase).as_deref() {
            Some("MERGE") | Some("PATCH") => Ok(ItemMethod::Merge),
            Some("DELETE") => Ok(ItemMethod::Delete),
            Some(other) => Err(AppError::BadRequest(format!(
                "unsupported X-HTTP-Method '{other}'"
            ))),
            None => Err(AppError::BadRequest(
                "POST to an item requires X-HTTP-Method".to_string(),
            )),
        }
    }
}

/// Extract the title from a `GetByTitle('...')` segment.
pub fn parse_list_ref(segment: &str) -> Result<String> {
    let inner = segment
        .strip_prefix("GetByTitle('")
        .or_else(|| segment.strip_prefix("getbytitle('"))
        .and_then(|s| s.strip_suffix("')"))
        .ok_or_else(|| AppError::BadRequest(format!("invalid list reference '{segment}'")))?;
    if inner.is_empty() {
        return Err(AppError::BadRequest("empty list title".to_string()));
    }
    Ok(inner.replace("''", "'"))
}

/// Extract the id from an `items(7)` segment.
pub fn parse_item_ref(segment: &str) -> Result<u64> {
    segment
        .strip_prefix("items(")
        .and_then(|s| s.strip_suffix(')'))
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| AppError::BadRequest(format!("invalid item reference '{segment}'")))
}

fn to_item_query(query: ItemsQuery) -> Result<ItemQuery> {
    let select = query.select.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect::<Vec<_>>()
    });
    let order_by = query.order_by.as_deref().map(OrderBy::parse).transpose()?;
    Ok(ItemQuery { select, order_by })
}

fn to_columns(body: Value) -> Result<Map<String, Value>> {
    match body {
        Value::Object(columns) => Ok(columns),
        other => Err(AppError::BadRequest(format!(
            "item body must be a JSON object, got {other}"
        ))),
    }
}

/// Read the items of a list.
pub fn handle_list(repo: &ListRepository, list: &str, query: ItemsQuery) -> Result<ItemsResponse> {
    let title = parse_list_ref(list)?;
    let value = repo.items(&title, &to_item_query(query)?)?;
    Ok(ItemsResponse { value })
}

/// Add an item to a list.
pub fn handle_add(repo: &ListRepository, list: &str, body: Value) -> Result<Value> {
    let title = parse_list_ref(list)?;
    repo.add(&title, to_columns(body)?)
}

/// Merge columns into an item.
pub fn handle_merge(repo: &ListRepository, list: &str, item: &str, body: Value) -> Result<()> {
    let title = parse_list_ref(list)?;
    let id = parse_item_ref(item)?;
    repo.merge(&title, id, to_columns(body)?)
}

/// Delete an item.
pub fn handle_delete(repo: &ListRepository, list: &str, item: &str) -> Result<()> {
    let title = parse_list_ref(list)?;
    let id = parse_item_ref(item)?;
    repo.delete(&title, id)
}

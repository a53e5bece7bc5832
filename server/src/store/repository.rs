//! Lists and their items, shared across handlers.

use super::{compare_columns, StoredItem};
use crate::error::{AppError, Result};
use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Sort order of a list read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    /// Parse `"Column"`, `"Column asc"` or `"Column desc"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split_whitespace();
        let column = parts
            .next()
            .ok_or_else(|| AppError::BadRequest("empty $orderby".to_string()))?;
        let descending = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "unknown sort direction '{other}'"
                )))
            }
        };
        if parts.next().is_some() {
            return Err(AppError::BadRequest(format!("invalid $orderby '{raw}'")));
        }
        Ok(Self {
            column: column.to_string(),
            descending,
        })
    }
}

/// Projection and ordering of a list read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Columns to return. `None` returns every column.
    pub select: Option<Vec<String>>,
    pub order_by: Option<OrderBy>,
}

/// Title and size of one list, shaped like a list resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "ItemCount")]
    pub item_count: usize,
}

#[derive(Debug)]
struct ListData {
    title: String,
    next_id: u64,
    items: BTreeMap<u64, StoredItem>,
}

/// All lists of the service. List titles are matched case-insensitively.
#[derive(Debug, Default)]
pub struct ListRepository {
    lists: DashMap<String, ListData>,
}

impl ListRepository {
    /// Create a repository with no lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Create an empty list unless one with that title exists.
    pub fn provision(&self, title: &str) {
        self.lists.entry(key(title)).or_insert_with(|| {
            tracing::info!(list = %title, "List provisioned");
            ListData {
                title: title.to_string(),
                next_id: 1,
                items: BTreeMap::new(),
            }
        });
    }

    /// Every list with its item count, sorted by title.
    pub fn summaries(&self) -> Vec<ListSummary> {
        let mut lists: Vec<_> = self
            .lists
            .iter()
            .map(|l| ListSummary {
                title: l.title.clone(),
                item_count: l.items.len(),
            })
            .collect();
        lists.sort_by(|a, b| a.title.cmp(&b.title));
        lists
    }

    /// Read items. Without an order, items come back in id order.
    pub fn items(&self, title: &str, query: &ItemQuery) -> Result<Vec<Value>> {
        let list = self
            .lists
            .get(&key(title))
            .ok_or_else(|| AppError::ListNotFound(title.to_string()))?;

        let mut items: Vec<&StoredItem> = list.items.values().collect();
        if let Some(order) = &query.order_by {
            items.sort_by(|a, b| {
                let ord = compare_columns(
                    a.column(&order.column).as_ref(),
                    b.column(&order.column).as_ref(),
                );
                if order.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        Ok(items
            .into_iter()
            .map(|item| match &query.select {
                Some(select) => item.to_json_selected(select),
                None => item.to_json(),
            })
            .collect())
    }

    /// Add an item and return it with its assigned id.
    pub fn add(&self, title: &str, columns: Map<String, Value>) -> Result<Value> {
        let mut list = self
            .lists
            .get_mut(&key(title))
            .ok_or_else(|| AppError::ListNotFound(title.to_string()))?;

        let id = list.next_id;
        list.next_id += 1;
        let item = StoredItem::new(id, columns, Utc::now());
        let json = item.to_json();
        list.items.insert(id, item);

        tracing::info!(list = %title, id, "Item added");
        Ok(json)
    }

    /// Merge columns into an existing item.
    pub fn merge(&self, title: &str, id: u64, columns: Map<String, Value>) -> Result<()> {
        let mut list = self
            .lists
            .get_mut(&key(title))
            .ok_or_else(|| AppError::ListNotFound(title.to_string()))?;

        let item = list.items.get_mut(&id).ok_or_else(|| AppError::ItemNotFound {
            list: title.to_string(),
            id,
        })?;
        item.merge(columns, Utc::now());

        tracing::info!(list = %title, id, "Item updated");
        Ok(())
    }

    /// Remove an item.
    pub fn delete(&self, title: &str, id: u64) -> Result<()> {
        let mut list = self
            .lists
            .get_mut(&key(title))
            .ok_or_else(|| AppError::ListNotFound(title.to_string()))?;

        list.items
            .remove(&id)
            .ok_or_else(|| AppError::ItemNotFound {
                list: title.to_string(),
                id,
            })?;

        tracing::info!(list = %title, id, "Item deleted");
        Ok(())
    }
}

fn key(title: &str) -> String {
    title.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn repo() -> ListRepository {
        let repo = ListRepository::new();
        repo.provision("Carousel");
        repo
    }

    #[test]
    fn parse_order_by() {
        assert_eq!(
            OrderBy::parse("Ordem").unwrap(),
            OrderBy {
                column: "Ordem".into(),
                descending: false
            }
        );
        assert!(OrderBy::parse("Ordem DESC").unwrap().descending);
        assert!(OrderBy::parse("Ordem sideways").is_err());
        assert!(OrderBy::parse("  ").is_err());
    }

    #[test]
    fn titles_match_case_insensitively() {
        let repo = repo();
        repo.provision("CAROUSEL");
        assert_eq!(
            repo.summaries(),
            vec![ListSummary {
                title: "Carousel".to_string(),
                item_count: 0
            }]
        );
        assert!(repo.items("carousel", &ItemQuery::default()).is_ok());
    }

    #[test]
    fn ids_are_assigned_and_never_reused() {
        let repo = repo();
        let a = repo.add("Carousel", columns(json!({"Titulo": "A"}))).unwrap();
        assert_eq!(a["ID"], 1);

        repo.delete("Carousel", 1).unwrap();
        let b = repo.add("Carousel", columns(json!({"Titulo": "B"}))).unwrap();
        assert_eq!(b["ID"], 2);
    }

    #[test]
    fn summaries_count_items() {
        let repo = repo();
        repo.provision("Banners");
        repo.add("Carousel", columns(json!({"Titulo": "A"}))).unwrap();
        repo.add("Carousel", columns(json!({"Titulo": "B"}))).unwrap();

        let counts: Vec<_> = repo
            .summaries()
            .into_iter()
            .map(|l| (l.title, l.item_count))
            .collect();
        assert_eq!(
            counts,
            vec![("Banners".to_string(), 0), ("Carousel".to_string(), 2)]
        );
    }

    #[test]
    fn items_sort_by_column() {
        let repo = repo();
        repo.add("Carousel", columns(json!({"Titulo": "c", "Ordem": 3})))
            .unwrap();
        repo.add("Carousel", columns(json!({"Titulo": "a", "Ordem": 1})))
            .unwrap();
        repo.add("Carousel", columns(json!({"Titulo": "b", "Ordem": 2})))
            .unwrap();

        let query = ItemQuery {
            select: Some(vec!["Titulo".into()]),
            order_by: Some(OrderBy::parse("Ordem").unwrap()),
        };
        let titles: Vec<_> = repo
            .items("Carousel", &query)
            .unwrap()
            .into_iter()
            .map(|i| i["Titulo"].clone())
            .collect();
        assert_eq!(titles, vec![json!("a"), json!("b"), json!("c")]);

        let native = repo.items("Carousel", &ItemQuery::default()).unwrap();
        assert_eq!(native[0]["Titulo"], "c");
    }

    #[test]
    fn missing_targets_are_not_found() {
        let repo = repo();
        assert!(matches!(
            repo.items("Nope", &ItemQuery::default()),
            Err(AppError::ListNotFound(_))
        ));
        assert!(matches!(
            repo.merge("Carousel", 8, Map::new()),
            Err(AppError::ItemNotFound { id: 8, .. })
        ));
        assert!(matches!(
            repo.delete("Carousel", 8),
            Err(AppError::ItemNotFound { id: 8, .. })
        ));
    }
}

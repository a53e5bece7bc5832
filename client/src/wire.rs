//! JSON shapes exchanged with the list service.
//!
//! The list keeps one column per record field. Hyperlink columns travel as
//! `{ "Url": "..." }` objects in both directions.

use carousel_engine::{error::Result, Error, Field, NewRecord, Rank, Record, RecordFields, RecordId};
use serde::{Deserialize, Serialize};

pub const COL_ID: &str = "ID";
pub const COL_TITLE: &str = "Titulo";
pub const COL_DESCRIPTION: &str = "Descricao";
pub const COL_LINK_TARGET: &str = "DirecionamentoURL";
pub const COL_MEDIA_REF: &str = "ArquivoURL";
pub const COL_RANK: &str = "Ordem";

/// Column name of a record field.
pub fn column(field: Field) -> &'static str {
    match field {
        Field::Id => COL_ID,
        Field::Title => COL_TITLE,
        Field::Description => COL_DESCRIPTION,
        Field::LinkTarget => COL_LINK_TARGET,
        Field::MediaRef => COL_MEDIA_REF,
        Field::Rank => COL_RANK,
    }
}

/// Item id columns. Lists serve the id under both `ID` and `Id`; older
/// verbose responses carry only `Id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ItemId {
    #[serde(rename = "ID", default)]
    pub upper: Option<RecordId>,
    #[serde(rename = "Id", default)]
    pub lower: Option<RecordId>,
}

impl ItemId {
    /// The id, or [`Error::InvalidPayload`] if neither column is present.
    pub fn get(self) -> Result<RecordId> {
        self.upper
            .or(self.lower)
            .ok_or_else(|| Error::InvalidPayload("item has no ID column".to_string()))
    }
}

/// A hyperlink column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    #[serde(rename = "Url")]
    pub url: String,
}

impl Hyperlink {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// An item as returned by a list read. Columns left out of `$select`, or
/// never filled in, come back missing or null.
#[derive(Debug, Clone, Deserialize)]
pub struct ListItem {
    #[serde(flatten)]
    pub id: ItemId,
    #[serde(rename = "Titulo", default)]
    pub title: Option<String>,
    #[serde(rename = "Descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "DirecionamentoURL", default)]
    pub link_target: Option<Hyperlink>,
    #[serde(rename = "ArquivoURL", default)]
    pub media_ref: Option<Hyperlink>,
    /// Number columns may be served as floats.
    #[serde(rename = "Ordem", default)]
    pub rank: Option<f64>,
}

impl TryFrom<ListItem> for Record {
    type Error = Error;

    fn try_from(item: ListItem) -> Result<Self> {
        let fields = RecordFields {
            title: item.title.unwrap_or_default(),
            description: item.description.unwrap_or_default(),
            link_target: item.link_target.map(|h| h.url).unwrap_or_default(),
            media_ref: item.media_ref.map(|h| h.url).unwrap_or_default(),
        };
        let rank = item.rank.map_or(0, |r| r.round().max(0.0) as Rank);
        Ok(Record::new(item.id.get()?, fields, rank))
    }
}

/// Body of a create or update request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemBody {
    #[serde(rename = "Titulo")]
    pub title: String,
    #[serde(rename = "Descricao")]
    pub description: String,
    #[serde(rename = "DirecionamentoURL")]
    pub link_target: Hyperlink,
    #[serde(rename = "ArquivoURL")]
    pub media_ref: Hyperlink,
    /// Only sent on create; updates leave the rank alone.
    #[serde(rename = "Ordem", skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,
}

impl From<&RecordFields> for ItemBody {
    fn from(fields: &RecordFields) -> Self {
        Self {
            title: fields.title.clone(),
            description: fields.description.clone(),
            link_target: Hyperlink::new(fields.link_target.clone()),
            media_ref: Hyperlink::new(fields.media_ref.clone()),
            rank: None,
        }
    }
}

impl From<&NewRecord> for ItemBody {
    fn from(record: &NewRecord) -> Self {
        Self {
            rank: Some(record.rank),
            ..Self::from(&record.fields)
        }
    }
}

/// Collection envelope. Both the `nometadata` and the verbose OData shapes
/// are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Collection<T> {
    Plain { value: Vec<T> },
    Verbose { d: VerboseResults<T> },
}

#[derive(Debug, Deserialize)]
pub struct VerboseResults<T> {
    pub results: Vec<T>,
}

impl<T> Collection<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Collection::Plain { value } => value,
            Collection::Verbose { d } => d.results,
        }
    }
}

/// The part of a create response the client needs.
#[derive(Debug, Deserialize)]
pub struct CreatedItem {
    #[serde(flatten)]
    pub id: ItemId,
}

/// Single-item envelope, plain or verbose.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Single<T> {
    Verbose { d: T },
    Plain(T),
}

impl<T> Single<T> {
    pub fn into_inner(self) -> T {
        match self {
            Single::Verbose { d } => d,
            Single::Plain(item) => item,
        }
    }
}

/// Error body of the list service.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_body_wraps_links_and_carries_rank() {
        let record = NewRecord::new(
            RecordFields::new("Title", "Text", "https://go.example", "https://img.example/1.png"),
            4,
        );

        let body = serde_json::to_value(ItemBody::from(&record)).unwrap();
        assert_eq!(
            body,
            json!({
                "Titulo": "Title",
                "Descricao": "Text",
                "DirecionamentoURL": { "Url": "https://go.example" },
                "ArquivoURL": { "Url": "https://img.example/1.png" },
                "Ordem": 4
            })
        );
    }

    #[test]
    fn update_body_has_no_rank() {
        let fields = RecordFields::new("T", "D", "https://l", "https://m");
        let body = serde_json::to_value(ItemBody::from(&fields)).unwrap();
        assert!(body.get("Ordem").is_none());
        assert_eq!(body["DirecionamentoURL"]["Url"], "https://l");
    }

    #[test]
    fn list_item_tolerates_nulls_and_float_ranks() {
        let item: ListItem = serde_json::from_value(json!({
            "ID": 12,
            "Titulo": "Hello",
            "Descricao": null,
            "DirecionamentoURL": null,
            "ArquivoURL": { "Url": "https://img" },
            "Ordem": 3.0
        }))
        .unwrap();

        let record = Record::try_from(item).unwrap();
        assert_eq!(record.id, 12);
        assert_eq!(record.fields.title, "Hello");
        assert_eq!(record.fields.description, "");
        assert_eq!(record.fields.link_target, "");
        assert_eq!(record.fields.media_ref, "https://img");
        assert_eq!(record.rank, 3);
    }

    #[test]
    fn both_collection_envelopes_parse() {
        let plain: Collection<CreatedItem> =
            serde_json::from_value(json!({ "value": [{ "ID": 1 }, { "ID": 2 }] })).unwrap();
        assert_eq!(plain.into_items().len(), 2);

        let verbose: Collection<CreatedItem> =
            serde_json::from_value(json!({ "d": { "results": [{ "Id": 5 }] } })).unwrap();
        let items = verbose.into_items();
        assert_eq!(items[0].id.get().unwrap(), 5);
    }

    #[test]
    fn single_envelopes_parse() {
        let plain: Single<CreatedItem> = serde_json::from_value(json!({ "ID": 9 })).unwrap();
        assert_eq!(plain.into_inner().id.get().unwrap(), 9);

        let verbose: Single<CreatedItem> =
            serde_json::from_value(json!({ "d": { "ID": 10 } })).unwrap();
        assert_eq!(verbose.into_inner().id.get().unwrap(), 10);
    }

    fn stored_item() -> serde_json::Value {
        json!({
            "ID": 4,
            "Id": 4,
            "Created": "2026-10-17T09:00:00Z",
            "Modified": "2026-10-17T09:05:00Z",
            "Titulo": "Launch",
            "Descricao": "New product",
            "DirecionamentoURL": { "Url": "https://go.example/launch" },
            "ArquivoURL": { "Url": "https://img.example/launch.png" },
            "Ordem": 2
        })
    }

    #[test]
    fn item_with_both_id_columns_decodes() {
        let created: Single<CreatedItem> = serde_json::from_value(stored_item()).unwrap();
        assert_eq!(created.into_inner().id.get().unwrap(), 4);

        let listed: Collection<ListItem> =
            serde_json::from_value(json!({ "value": [stored_item()] })).unwrap();
        let record = Record::try_from(listed.into_items().remove(0)).unwrap();
        assert_eq!(record.id, 4);
        assert_eq!(record.fields.title, "Launch");
        assert_eq!(record.fields.link_target, "https://go.example/launch");
        assert_eq!(record.fields.media_ref, "https://img.example/launch.png");
        assert_eq!(record.rank, 2);
    }

    #[test]
    fn item_without_id_is_invalid_payload() {
        let item: ListItem = serde_json::from_value(json!({ "Titulo": "A" })).unwrap();
        assert!(matches!(
            Record::try_from(item),
            Err(Error::InvalidPayload(_))
        ));
    }

    #[test]
    fn columns_cover_every_field() {
        let columns: Vec<_> = Field::ALL.iter().map(|f| column(*f)).collect();
        assert_eq!(
            columns,
            vec!["Titulo", "Descricao", "DirecionamentoURL", "ArquivoURL", "Ordem", "ID"]
        );
    }
}

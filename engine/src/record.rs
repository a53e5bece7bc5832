//! Record types for carousel entries.

use crate::{Rank, RecordId};
use serde::{Deserialize, Serialize};

/// A field of a carousel record, as known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    Title,
    Description,
    LinkTarget,
    MediaRef,
    Rank,
}

impl Field {
    /// Every field of a record, in display order.
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Description,
        Field::LinkTarget,
        Field::MediaRef,
        Field::Rank,
        Field::Id,
    ];
}

/// The user-editable part of a record.
///
/// This is also the shape of the edit buffer: an all-empty value is the
/// blank "add" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    /// Display title
    pub title: String,
    /// Display description
    pub description: String,
    /// URL the entry navigates to when activated
    pub link_target: String,
    /// URL of the image shown for the entry
    pub media_ref: String,
}

impl RecordFields {
    /// Create fields from their four values.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link_target: impl Into<String>,
        media_ref: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link_target: link_target.into(),
            media_ref: media_ref.into(),
        }
    }

    /// Check if every field is blank.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.link_target.is_empty()
            && self.media_ref.is_empty()
    }

    /// Reset every field to blank.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Body of a record that has not been created yet. It has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    #[serde(flatten)]
    pub fields: RecordFields,
    /// Display position assigned by the client
    pub rank: Rank,
}

impl NewRecord {
    pub fn new(fields: RecordFields, rank: Rank) -> Self {
        Self { fields, rank }
    }
}

/// A carousel record as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Store-assigned identifier, immutable once created
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: RecordFields,
    /// Display position; unique by convention only
    pub rank: Rank,
}

impl Record {
    /// Create a record.
    pub fn new(id: RecordId, fields: RecordFields, rank: Rank) -> Self {
        Self { id, fields, rank }
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }
}

//! Render models handed to whatever surface draws the components.

use crate::{Record, RecordFields, RecordId};
use serde::{Deserialize, Serialize};

/// Whether the form adds a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Add,
    Edit,
}

impl FormMode {
    pub fn heading(self) -> &'static str {
        match self {
            FormMode::Add => "Add item",
            FormMode::Edit => "Edit item",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            FormMode::Add => "Add",
            FormMode::Edit => "Save",
        }
    }

    /// Cancel is only offered while editing.
    pub fn shows_cancel(self) -> bool {
        self == FormMode::Edit
    }
}

/// One row of the management list, with its edit and delete actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCard {
    pub id: RecordId,
    pub href: String,
    pub image_src: String,
    pub alt: String,
    pub title: String,
    pub description: String,
    /// The card belongs to the record currently in the form
    pub editing: bool,
}

/// Everything the management view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub mode: FormMode,
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub shows_cancel: bool,
    pub form: RecordFields,
    pub cards: Vec<EntryCard>,
    pub status: String,
}

/// One slide of the display carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Where activating the slide navigates
    pub href: String,
    /// Image shown on the slide
    pub image_src: String,
    pub alt: String,
    pub title: String,
    pub description: String,
}

impl From<&Record> for Slide {
    fn from(record: &Record) -> Self {
        Self {
            href: record.fields.link_target.clone(),
            image_src: record.fields.media_ref.clone(),
            alt: record.fields.title.clone(),
            title: record.fields.title.clone(),
            description: record.fields.description.clone(),
        }
    }
}

impl EntryCard {
    pub fn new(record: &Record, editing: Option<RecordId>) -> Self {
        let slide = Slide::from(record);
        Self {
            id: record.id,
            href: slide.href,
            image_src: slide.image_src,
            alt: slide.alt,
            title: slide.title,
            description: slide.description,
            editing: editing == Some(record.id),
        }
    }
}

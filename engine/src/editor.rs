//! The management component: a cached list, one edit buffer and a status line.
//!
//! The editor never patches its cache. After every successful mutation it
//! re-reads the whole collection from the store, so the cache is always a
//! mirror of the last authoritative read.
//!
//! The edit buffer is a two-state machine:
//!
//! ```text
//!   ComposingNew --begin_edit--> ComposingEdit(id)
//!   ComposingEdit(id) --cancel_edit | update ok | delete(id) ok--> ComposingNew
//! ```

use crate::view::{EditorView, EntryCard, FormMode};
use crate::{
    error::Result, CollectionName, Error, ListQuery, NewRecord, Rank, Record, RecordFields,
    RecordId, RecordStore, RefreshTicket, RequestSequence,
};

/// State of the edit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// The form describes a record that does not exist yet.
    ComposingNew,
    /// The form is bound to an existing record.
    ComposingEdit(RecordId),
}

impl EditMode {
    pub fn form_mode(self) -> FormMode {
        match self {
            EditMode::ComposingNew => FormMode::Add,
            EditMode::ComposingEdit(_) => FormMode::Edit,
        }
    }
}

/// Editable view over one collection of a [`RecordStore`].
#[derive(Debug)]
pub struct Editor<S> {
    store: S,
    collection: CollectionName,
    items: Vec<Record>,
    form: RecordFields,
    status: String,
    editing: Option<RecordId>,
    refreshes: RequestSequence,
}

impl<S: RecordStore> Editor<S> {
    /// Create an editor with an empty cache, in [`EditMode::ComposingNew`].
    pub fn new(store: S, collection: impl Into<CollectionName>) -> Self {
        Self {
            store,
            collection: collection.into(),
            items: Vec::new(),
            form: RecordFields::default(),
            status: String::new(),
            editing: None,
            refreshes: RequestSequence::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Cached records, ordered by rank.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn form(&self) -> &RecordFields {
        &self.form
    }

    /// Mutable access to the edit buffer, for field change handlers.
    pub fn form_mut(&mut self) -> &mut RecordFields {
        &mut self.form
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Id of the record bound to the form, if any.
    pub fn editing(&self) -> Option<RecordId> {
        self.editing
    }

    pub fn mode(&self) -> EditMode {
        match self.editing {
            Some(id) => EditMode::ComposingEdit(id),
            None => EditMode::ComposingNew,
        }
    }

    /// Start a collection read. Any ticket issued before this one is stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.refreshes.next()
    }

    /// Apply the outcome of a read started with [`Editor::begin_refresh`].
    ///
    /// Returns `Ok(true)` if the cache was replaced and `Ok(false)` if the
    /// ticket was stale and the records were discarded. Errors are passed
    /// through and leave the cache untouched.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Record>>,
    ) -> Result<bool> {
        let records = result?;
        if !self.refreshes.is_current(ticket) {
            tracing::debug!(
                collection = %self.collection,
                ticket = ticket.value(),
                "Discarding stale refresh"
            );
            return Ok(false);
        }
        self.items = records;
        Ok(true)
    }

    /// Re-read the collection ordered by rank and replace the cache.
    ///
    /// Errors are returned, not turned into a status; the cache keeps its
    /// previous contents on failure.
    pub async fn fetch_all(&mut self) -> Result<&[Record]> {
        self.refresh().await?;
        Ok(&self.items)
    }

    async fn refresh(&mut self) -> Result<bool> {
        let ticket = self.begin_refresh();
        let result = self
            .store
            .list(&self.collection, &ListQuery::editor())
            .await;
        self.finish_refresh(ticket, result)
    }

    /// Create a record from the form, appended after the cached records.
    pub async fn create(&mut self) {
        let rank = next_rank(self.items.len());
        let body = NewRecord::new(self.form.clone(), rank);

        match self.store.add(&self.collection, &body).await {
            Ok(id) => {
                tracing::info!(collection = %self.collection, id, rank, "Item created");
                self.status = format!("Item created: {id}");
                self.form.clear();
                self.refresh_after("create").await;
            }
            Err(e) => {
                tracing::warn!(collection = %self.collection, error = %e, "Failed to create item");
                self.status = "Failed to create item.".to_string();
            }
        }
    }

    /// Save the form over the record being edited.
    ///
    /// Returns [`Error::InvalidState`] without touching anything if no record
    /// is being edited. Store failures only show up in the status line, and
    /// edit mode is kept so the user can retry.
    pub async fn update(&mut self) -> Result<()> {
        let id = self.editing.ok_or_else(|| {
            Error::InvalidState("update requires a record being edited".to_string())
        })?;

        match self.store.update(&self.collection, id, &self.form).await {
            Ok(()) => {
                tracing::info!(collection = %self.collection, id, "Item updated");
                self.status = format!("Item updated: {id}");
                self.form.clear();
                self.editing = None;
                self.refresh_after("update").await;
            }
            Err(e) => {
                tracing::warn!(
                    collection = %self.collection,
                    id,
                    error = %e,
                    "Failed to update item"
                );
                self.status = format!("Failed to update item: {id}");
            }
        }
        Ok(())
    }

    /// Delete a record. If it is the one being edited, edit mode ends too.
    pub async fn delete(&mut self, id: RecordId) {
        match self.store.delete(&self.collection, id).await {
            Ok(()) => {
                tracing::info!(collection = %self.collection, id, "Item deleted");
                self.status = format!("Item deleted: {id}");
                if self.editing == Some(id) {
                    self.cancel_edit();
                }
                self.refresh_after("delete").await;
            }
            Err(e) => {
                tracing::warn!(
                    collection = %self.collection,
                    id,
                    error = %e,
                    "Failed to delete item"
                );
                self.status = "Failed to delete item.".to_string();
            }
        }
    }

    /// Bind the form to `record`, copying its editable fields.
    pub fn begin_edit(&mut self, record: &Record) {
        self.form = record.fields.clone();
        self.editing = Some(record.id);
    }

    /// Clear the form and leave edit mode.
    pub fn cancel_edit(&mut self) {
        self.form.clear();
        self.editing = None;
    }

    /// The form's submit action: update while editing, create otherwise.
    pub async fn submit(&mut self) -> Result<()> {
        match self.mode() {
            EditMode::ComposingNew => {
                self.create().await;
                Ok(())
            }
            EditMode::ComposingEdit(_) => self.update().await,
        }
    }

    /// Snapshot of everything the management view renders.
    pub fn view(&self) -> EditorView {
        let mode = self.mode().form_mode();
        EditorView {
            mode,
            heading: mode.heading(),
            submit_label: mode.submit_label(),
            shows_cancel: mode.shows_cancel(),
            form: self.form.clone(),
            cards: self
                .items
                .iter()
                .map(|record| EntryCard::new(record, self.editing))
                .collect(),
            status: self.status.clone(),
        }
    }

    /// Re-read after a successful mutation. A failed read keeps the status
    /// of the mutation and the previous cache.
    async fn refresh_after(&mut self, action: &'static str) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(
                collection = %self.collection,
                action,
                error = %e,
                "Refresh after mutation failed"
            );
        }
    }
}

/// Rank for a record appended to a collection of `len` records.
///
/// Ranks are never renumbered, so after deletions or with several editors
/// this can collide with an existing rank.
fn next_rank(len: usize) -> Rank {
    Rank::try_from(len).map_or(Rank::MAX, |n| n.saturating_add(1))
}

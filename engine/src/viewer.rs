//! The display component: a read-only list loaded once when mounted.

use crate::view::Slide;
use crate::{
    error::Result, CollectionName, ListQuery, Record, RecordStore, RefreshTicket, RequestSequence,
};

/// Read-only carousel over one collection of a [`RecordStore`].
#[derive(Debug)]
pub struct Viewer<S> {
    store: S,
    collection: CollectionName,
    items: Vec<Record>,
    loads: RequestSequence,
}

impl<S: RecordStore> Viewer<S> {
    pub fn new(store: S, collection: impl Into<CollectionName>) -> Self {
        Self {
            store,
            collection: collection.into(),
            items: Vec::new(),
            loads: RequestSequence::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn is_mounted(&self) -> bool {
        !self.loads.is_closed()
    }

    /// Load the collection. Only the first call while mounted reaches the
    /// store; later calls do nothing.
    ///
    /// Failures are logged and leave the items as they were.
    pub async fn load_on_mount(&mut self) {
        let Some(ticket) = self.begin_load() else {
            return;
        };
        let result = self
            .store
            .list(&self.collection, &ListQuery::viewer())
            .await;
        self.finish_load(ticket, result);
    }

    /// Claim the one load of this viewer's lifetime.
    ///
    /// Returns `None` if a load was already issued or the viewer is unmounted.
    pub fn begin_load(&mut self) -> Option<RefreshTicket> {
        if self.loads.issued() > 0 || self.loads.is_closed() {
            return None;
        }
        Some(self.loads.next())
    }

    /// Apply the outcome of the load. Results arriving after
    /// [`Viewer::unmount`] are dropped.
    pub fn finish_load(&mut self, ticket: RefreshTicket, result: Result<Vec<Record>>) {
        if !self.loads.is_current(ticket) {
            tracing::debug!(collection = %self.collection, "Dropping load result after unmount");
            return;
        }
        match result {
            Ok(records) => {
                tracing::debug!(
                    collection = %self.collection,
                    count = records.len(),
                    "Carousel loaded"
                );
                self.items = records;
            }
            Err(e) => {
                tracing::error!(
                    collection = %self.collection,
                    error = %e,
                    "Failed to load carousel"
                );
            }
        }
    }

    /// Detach the viewer. Nothing updates its items afterward.
    pub fn unmount(&mut self) {
        self.loads.close();
    }

    /// Slides to render, in item order.
    pub fn slides(&self) -> Vec<Slide> {
        self.items.iter().map(Slide::from).collect()
    }
}

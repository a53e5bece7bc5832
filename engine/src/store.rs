//! The record store contract and an in-memory implementation.
//!
//! [`RecordStore`] is the only boundary between the engine and the remote
//! list service. [`MemoryStore`] implements it without IO; it backs the
//! engine's own tests and any host that wants an offline store.

use crate::{error::Result, CollectionName, Error, Field, NewRecord, Record, RecordFields, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Which fields to read and how to order them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Fields to select. Empty selects everything.
    pub select: Vec<Field>,
    /// Sort key, ascending. `None` keeps the store's native order.
    pub order_by: Option<Field>,
}

impl ListQuery {
    /// Every field, native order.
    pub fn all() -> Self {
        Self::default()
    }

    /// The query the editor refreshes with: every record field, by rank.
    pub fn editor() -> Self {
        Self::all().select(Field::ALL).ordered_by(Field::Rank)
    }

    /// The query the viewer loads with: unfiltered, by rank.
    pub fn viewer() -> Self {
        Self::all().ordered_by(Field::Rank)
    }

    pub fn select(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.select = fields.into_iter().collect();
        self
    }

    pub fn ordered_by(mut self, field: Field) -> Self {
        self.order_by = Some(field);
        self
    }

    /// Check whether `field` is part of the projection.
    pub fn selects(&self, field: Field) -> bool {
        self.select.is_empty() || self.select.contains(&field)
    }
}

/// An ordered-record store reachable asynchronously.
///
/// Every call is atomic on its own; nothing else is serialized.
pub trait RecordStore {
    /// Read the records of a collection.
    fn list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// Create a record and return the id the store assigned.
    fn add(&self, collection: &str, body: &NewRecord)
        -> impl Future<Output = Result<RecordId>> + Send;

    /// Merge new field values into an existing record.
    fn update(
        &self,
        collection: &str,
        id: RecordId,
        fields: &RecordFields,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Remove a record.
    fn delete(&self, collection: &str, id: RecordId) -> impl Future<Output = Result<()>> + Send;
}

/// Kind of store call, used to script failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    List,
    Add,
    Update,
    Delete,
}

/// A call received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List {
        collection: CollectionName,
        query: ListQuery,
    },
    Add {
        collection: CollectionName,
        body: NewRecord,
    },
    Update {
        collection: CollectionName,
        id: RecordId,
        fields: RecordFields,
    },
    Delete {
        collection: CollectionName,
        id: RecordId,
    },
}

impl StoreCall {
    pub fn kind(&self) -> CallKind {
        match self {
            StoreCall::List { .. } => CallKind::List,
            StoreCall::Add { .. } => CallKind::Add,
            StoreCall::Update { .. } => CallKind::Update,
            StoreCall::Delete { .. } => CallKind::Delete,
        }
    }
}

/// Records of one collection, keyed by id so native order is creation order.
#[derive(Debug, Clone, Default)]
struct MemoryCollection {
    records: BTreeMap<RecordId, Record>,
    next_id: RecordId,
}

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<CollectionName, MemoryCollection>,
    failures: HashMap<CallKind, VecDeque<Error>>,
    calls: Vec<StoreCall>,
}

/// An in-memory [`RecordStore`].
///
/// Clones share the same state, so a test can keep one handle while an
/// editor owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create a store with no collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one empty collection.
    pub fn with_collection(collection: impl Into<CollectionName>) -> Self {
        let store = Self::new();
        store.create_collection(collection);
        store
    }

    /// Create an empty collection if it does not exist yet.
    pub fn create_collection(&self, collection: impl Into<CollectionName>) {
        self.lock().collections.entry(collection.into()).or_insert_with(|| {
            MemoryCollection {
                records: BTreeMap::new(),
                next_id: 1,
            }
        });
    }

    /// Insert records as-is, bypassing id assignment.
    pub fn seed(&self, collection: &str, records: impl IntoIterator<Item = Record>) {
        self.create_collection(collection);
        let mut inner = self.lock();
        if let Some(coll) = inner.collections.get_mut(collection) {
            for record in records {
                coll.next_id = coll.next_id.max(record.id + 1);
                coll.records.insert(record.id, record);
            }
        }
    }

    /// Make the next call of `kind` fail with `error`. Failures queue up.
    pub fn fail_next(&self, kind: CallKind, error: Error) {
        self.lock().failures.entry(kind).or_default().push_back(error);
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Current records of a collection in native order.
    pub fn snapshot(&self, collection: &str) -> Vec<Record> {
        self.lock()
            .collections
            .get(collection)
            .map(|c| c.records.values().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log a call and pop a scripted failure for it, if any.
    fn begin(inner: &mut Inner, call: StoreCall) -> Result<()> {
        let kind = call.kind();
        inner.calls.push(call);
        match inner.failures.get_mut(&kind).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn list_not_found(collection: &str) -> Error {
    Error::rejection(404, format!("list '{collection}' does not exist"))
}

fn item_not_found(id: RecordId) -> Error {
    Error::rejection(404, format!("item {id} does not exist"))
}

fn project(record: &Record, query: &ListQuery) -> Record {
    let mut out = Record::new(record.id, RecordFields::default(), 0);
    if query.selects(Field::Title) {
        out.fields.title = record.fields.title.clone();
    }
    if query.selects(Field::Description) {
        out.fields.description = record.fields.description.clone();
    }
    if query.selects(Field::LinkTarget) {
        out.fields.link_target = record.fields.link_target.clone();
    }
    if query.selects(Field::MediaRef) {
        out.fields.media_ref = record.fields.media_ref.clone();
    }
    if query.selects(Field::Rank) {
        out.rank = record.rank;
    }
    out
}

/// Sort records by `field`, ascending. Ties keep native order.
fn sort_by_field(records: &mut [Record], field: Field) {
    match field {
        Field::Id => records.sort_by_key(|r| r.id),
        Field::Rank => records.sort_by_key(|r| r.rank),
        Field::Title => records.sort_by(|a, b| a.fields.title.cmp(&b.fields.title)),
        Field::Description => {
            records.sort_by(|a, b| a.fields.description.cmp(&b.fields.description))
        }
        Field::LinkTarget => {
            records.sort_by(|a, b| a.fields.link_target.cmp(&b.fields.link_target))
        }
        Field::MediaRef => records.sort_by(|a, b| a.fields.media_ref.cmp(&b.fields.media_ref)),
    }
}

impl RecordStore for MemoryStore {
    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Record>> {
        let mut inner = self.lock();
        Self::begin(
            &mut inner,
            StoreCall::List {
                collection: collection.to_string(),
                query: query.clone(),
            },
        )?;

        let coll = inner
            .collections
            .get(collection)
            .ok_or_else(|| list_not_found(collection))?;

        let mut records: Vec<Record> = coll.records.values().cloned().collect();
        if let Some(field) = query.order_by {
            sort_by_field(&mut records, field);
        }
        Ok(records.iter().map(|r| project(r, query)).collect())
    }

    async fn add(&self, collection: &str, body: &NewRecord) -> Result<RecordId> {
        let mut inner = self.lock();
        Self::begin(
            &mut inner,
            StoreCall::Add {
                collection: collection.to_string(),
                body: body.clone(),
            },
        )?;

        let coll = inner
            .collections
            .get_mut(collection)
            .ok_or_else(|| list_not_found(collection))?;

        let id = coll.next_id;
        coll.next_id += 1;
        coll.records
            .insert(id, Record::new(id, body.fields.clone(), body.rank));
        Ok(id)
    }

    async fn update(&self, collection: &str, id: RecordId, fields: &RecordFields) -> Result<()> {
        let mut inner = self.lock();
        Self::begin(
            &mut inner,
            StoreCall::Update {
                collection: collection.to_string(),
                id,
                fields: fields.clone(),
            },
        )?;

        let record = inner
            .collections
            .get_mut(collection)
            .ok_or_else(|| list_not_found(collection))?
            .records
            .get_mut(&id)
            .ok_or_else(|| item_not_found(id))?;
        record.fields = fields.clone();
        Ok(())
    }

    async fn delete(&self, collection: &str, id: RecordId) -> Result<()> {
        let mut inner = self.lock();
        Self::begin(
            &mut inner,
            StoreCall::Delete {
                collection: collection.to_string(),
                id,
            },
        )?;

        inner
            .collections
            .get_mut(collection)
            .ok_or_else(|| list_not_found(collection))?
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| item_not_found(id))
    }
}

//! Behavioral scenarios for carousel-engine
//!
//! These tests drive the editor and viewer through the in-memory store the
//! way a management page and a display page would.

use carousel_engine::{
    CallKind, EditMode, Editor, Error, MemoryStore, NewRecord, Record, RecordFields, RecordStore,
    StoreCall, Viewer,
};
use proptest::prelude::*;

const LIST: &str = "Carousel";

fn fields(title: &str) -> RecordFields {
    RecordFields::new(
        title,
        format!("{title} description"),
        format!("https://intranet.example/{title}"),
        format!("https://intranet.example/media/{title}.jpg"),
    )
}

fn store_with(titles: &[&str]) -> MemoryStore {
    let store = MemoryStore::new();
    store.seed(
        LIST,
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| Record::new(i as u64 + 1, fields(title), i as u32 + 1)),
    );
    store
}

fn added_bodies(store: &MemoryStore) -> Vec<NewRecord> {
    store
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            StoreCall::Add { body, .. } => Some(body),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_round_trip() {
    let store = store_with(&["A", "B"]);
    let mut editor = Editor::new(store, LIST);
    editor.fetch_all().await.unwrap();
    let before = editor.items().len();

    *editor.form_mut() = fields("C");
    editor.create().await;

    let records = editor.fetch_all().await.unwrap();
    let matching: Vec<_> = records.iter().filter(|r| r.fields == fields("C")).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].rank as usize, before + 1);
}

#[tokio::test]
async fn first_record_of_empty_collection_gets_rank_one() {
    let store = MemoryStore::with_collection(LIST);
    let mut editor = Editor::new(store.clone(), LIST);

    *editor.form_mut() = RecordFields::new("X", "", "", "");
    editor.create().await;

    let bodies = added_bodies(&store);
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0].rank, 1);

    let records = editor.fetch_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rank, 1);
    assert_eq!(records[0].title(), "X");
}

#[tokio::test]
async fn failed_create_preserves_input() {
    let store = store_with(&["A"]);
    store.fail_next(CallKind::Add, Error::rejection(500, "list is locked"));
    let mut editor = Editor::new(store, LIST);

    *editor.form_mut() = fields("draft");
    let before = editor.form().clone();
    editor.create().await;

    assert_eq!(editor.form(), &before);
    assert_eq!(editor.status(), "Failed to create item.");
    assert_eq!(editor.mode(), EditMode::ComposingNew);
}

#[tokio::test]
async fn rank_collides_after_delete() {
    // Ranks are never renumbered: deleting rank 1 of [1, 2] and appending
    // assigns rank 2 again.
    let store = store_with(&["A", "B"]);
    let mut editor = Editor::new(store, LIST);
    editor.fetch_all().await.unwrap();

    editor.delete(1).await;
    *editor.form_mut() = fields("C");
    editor.create().await;

    let ranks: Vec<_> = editor.items().iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![2, 2]);
}

// ============================================================================
// Edit mode
// ============================================================================

#[tokio::test]
async fn begin_then_cancel_edit() {
    let store = store_with(&["A", "B"]);
    let mut editor = Editor::new(store, LIST);
    let records = editor.fetch_all().await.unwrap().to_vec();

    editor.begin_edit(&records[1]);
    assert_eq!(editor.mode(), EditMode::ComposingEdit(2));
    assert_eq!(editor.editing(), Some(2));
    assert_eq!(editor.form(), &fields("B"));

    editor.cancel_edit();
    assert_eq!(editor.mode(), EditMode::ComposingNew);
    assert_eq!(editor.editing(), None);
    assert!(editor.form().is_empty());
}

#[tokio::test]
async fn unchanged_update_keeps_record() {
    let store = store_with(&["A", "B"]);
    let mut editor = Editor::new(store.clone(), LIST);
    let records = editor.fetch_all().await.unwrap().to_vec();
    let before = store.snapshot(LIST);

    editor.begin_edit(&records[0]);
    editor.update().await.unwrap();

    assert_eq!(store.snapshot(LIST), before);
    assert_eq!(editor.items(), records.as_slice());
}

#[tokio::test]
async fn begin_edit_rebinds_to_another_record() {
    let store = store_with(&["A", "B"]);
    let mut editor = Editor::new(store, LIST);
    let records = editor.fetch_all().await.unwrap().to_vec();

    editor.begin_edit(&records[0]);
    editor.begin_edit(&records[1]);
    assert_eq!(editor.mode(), EditMode::ComposingEdit(2));
    assert_eq!(editor.form(), &fields("B"));
}

#[tokio::test]
async fn update_of_vanished_record_reports_failure() {
    let store = store_with(&["A"]);
    let mut editor = Editor::new(store.clone(), LIST);
    let records = editor.fetch_all().await.unwrap().to_vec();

    editor.begin_edit(&records[0]);
    // Someone else removes it.
    store.delete(LIST, 1).await.unwrap();

    editor.update().await.unwrap();
    assert_eq!(editor.status(), "Failed to update item: 1");
    assert_eq!(editor.mode(), EditMode::ComposingEdit(1));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_removes_exactly_one() {
    let store = store_with(&["A", "B", "C", "D"]);
    let mut editor = Editor::new(store, LIST);
    let n = editor.fetch_all().await.unwrap().len();

    editor.delete(3).await;

    let records = editor.fetch_all().await.unwrap();
    assert_eq!(records.len(), n - 1);
    assert!(records.iter().all(|r| r.id != 3));
}

// ============================================================================
// Viewer
// ============================================================================

#[tokio::test]
async fn viewer_sees_editor_changes_on_next_mount() {
    let store = store_with(&["A"]);
    let mut editor = Editor::new(store.clone(), LIST);
    editor.fetch_all().await.unwrap();

    *editor.form_mut() = fields("B");
    editor.submit().await.unwrap();

    let mut viewer = Viewer::new(store, LIST);
    viewer.load_on_mount().await;

    let titles: Vec<_> = viewer.slides().into_iter().map(|s| s.title).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn cancel_edit_is_idempotent(times in 1usize..20) {
        let mut editor = Editor::new(MemoryStore::new(), LIST);
        for _ in 0..times {
            editor.cancel_edit();
            prop_assert!(editor.form().is_empty());
            prop_assert_eq!(editor.editing(), None);
        }
    }

    #[test]
    fn begin_edit_copies_fields(
        id in 1u64..1000,
        title in ".{0,20}",
        description in ".{0,40}",
        rank in 1u32..100,
    ) {
        let record = Record::new(
            id,
            RecordFields::new(title, description, "https://l", "https://m"),
            rank,
        );
        let mut editor = Editor::new(MemoryStore::new(), LIST);
        editor.begin_edit(&record);

        prop_assert_eq!(editor.mode(), EditMode::ComposingEdit(id));
        prop_assert_eq!(editor.form(), &record.fields);
    }
}

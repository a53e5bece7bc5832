//! # Carousel Engine
//!
//! Client-side state for a small, ordered list of carousel entries kept in a
//! remote list service.
//!
//! The crate holds the logic that keeps a local view of the remote list
//! consistent with create, update and delete calls, and the edit-mode state
//! machine of the management form. It performs no IO of its own: every remote
//! call goes through the [`RecordStore`] trait, which the `carousel-client`
//! crate implements over HTTP and [`MemoryStore`] implements in memory.
//!
//! ## Components
//!
//! - [`Editor`] - cached records, one edit buffer, a status line. Every
//!   successful mutation is followed by an authoritative re-read.
//! - [`Viewer`] - records loaded once at mount time, rendered as [`Slide`]s.
//!
//! ## Ordering
//!
//! Records carry a client-assigned [`Rank`]. A new record gets
//! `cached records + 1`. Ranks are not renumbered on delete and the store does
//! not enforce uniqueness, so duplicate or sparse ranks are possible.
//!
//! ## Quick Start
//!
//! ```rust
//! use carousel_engine::{Editor, MemoryStore, RecordFields};
//!
//! # tokio_test_block(async {
//! let store = MemoryStore::with_collection("Carousel");
//! let mut editor = Editor::new(store, "Carousel");
//!
//! *editor.form_mut() = RecordFields::new(
//!     "Welcome",
//!     "First slide",
//!     "https://example.com",
//!     "https://example.com/welcome.png",
//! );
//! editor.submit().await.unwrap();
//!
//! assert_eq!(editor.status(), "Item created: 1");
//! assert_eq!(editor.items()[0].rank, 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

pub mod editor;
pub mod error;
pub mod record;
pub mod sequence;
pub mod store;
pub mod view;
pub mod viewer;

// Re-export main types at crate root
pub use editor::{EditMode, Editor};
pub use error::Error;
pub use record::{Field, NewRecord, Record, RecordFields};
pub use sequence::{RefreshTicket, RequestSequence};
pub use store::{CallKind, ListQuery, MemoryStore, RecordStore, StoreCall};
pub use view::{EditorView, EntryCard, FormMode, Slide};
pub use viewer::Viewer;

/// Type aliases for clarity
pub type RecordId = u64;
pub type CollectionName = String;
pub type Rank = u32;

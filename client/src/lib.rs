//! # Carousel Client
//!
//! HTTP implementation of [`carousel_engine::RecordStore`] for lists served
//! through a SharePoint-style REST API.
//!
//! The client is constructed explicitly and handed to the components that
//! use it; there is no process-wide connection object.
//!
//! ```no_run
//! use carousel_client::{HttpStore, StoreConfig};
//! use carousel_engine::Editor;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoreConfig::from_env()?;
//! let list = config.list.clone();
//! let store = HttpStore::init(config)?;
//!
//! let mut editor = Editor::new(store, list);
//! editor.fetch_all().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod wire;

pub use config::{ConfigError, StoreConfig};
pub use http::HttpStore;

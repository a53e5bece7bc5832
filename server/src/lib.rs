//! Carousel list service.
//!
//! A small in-memory list service that speaks the item protocol the carousel
//! client expects: `GetByTitle('...')/items` reads with `$select` and
//! `$orderby`, item creation, and `X-HTTP-Method` merges and deletes.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

use crate::config::Config;
use crate::store::ListRepository;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<ListRepository>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state with every configured list provisioned.
    pub fn new(config: Config) -> Self {
        let repo = ListRepository::new_shared();
        for title in &config.lists {
            repo.provision(title);
        }
        Self {
            repo,
            config: Arc::new(config),
        }
    }
}

/// Build the router with tracing and CORS layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

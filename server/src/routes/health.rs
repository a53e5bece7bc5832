//! Service metadata: health, banner, and the list directory.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::store::ListSummary;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub lists: usize,
    pub items: usize,
}

/// Response of `GET /_api/web/lists`.
#[derive(Serialize)]
pub struct ListsResponse {
    pub value: Vec<ListSummary>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/_api/web/lists", get(list_directory))
        .route("/", get(root))
}

/// Liveness plus a count of what is stored. Open to anonymous callers.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let lists = state.repo.summaries();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        items: lists.iter().map(|l| l.item_count).sum(),
        lists: lists.len(),
    })
}

async fn list_directory(State(state): State<AppState>, _auth: AuthUser) -> Json<ListsResponse> {
    Json(ListsResponse {
        value: state.repo.summaries(),
    })
}

async fn root() -> &'static str {
    "Carousel List Service"
}

//! List item routes.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::handlers::{
    handle_add, handle_delete, handle_list, handle_merge, ItemMethod, ItemsQuery, ItemsResponse,
};
use crate::AppState;

/// Create list routes.
///
/// `{target}` is either `items` (the collection) or `items(id)` (one item).
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/_api/web/lists/{list}/{target}",
        get(list_handler)
            .post(post_handler)
            .patch(merge_handler)
            .delete(delete_handler),
    )
}

const ITEMS: &str = "items";

fn require_items(target: &str) -> Result<()> {
    if target == ITEMS {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "expected 'items', got '{target}'"
        )))
    }
}

/// GET .../items - Read items.
async fn list_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((list, target)): Path<(String, String)>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<ItemsResponse>> {
    require_items(&target)?;
    let response = handle_list(&state.repo, &list, query)?;
    Ok(Json(response))
}

/// POST .../items adds an item. POST .../items(id) merges or deletes, as
/// named by `X-HTTP-Method`.
async fn post_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((list, target)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    if target == ITEMS {
        let created = handle_add(&state.repo, &list, parse_body(&body)?)?;
        return Ok((StatusCode::CREATED, Json(created)).into_response());
    }

    let method = headers
        .get("X-HTTP-Method")
        .and_then(|value| value.to_str().ok());

    match ItemMethod::parse(method)? {
        ItemMethod::Merge => {
            handle_merge(&state.repo, &list, &target, parse_body(&body)?)?;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        ItemMethod::Delete => {
            handle_delete(&state.repo, &list, &target)?;
            Ok(StatusCode::OK.into_response())
        }
    }
}

/// PATCH .../items(id) - Merge columns.
async fn merge_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((list, item)): Path<(String, String)>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(body) = body?;
    handle_merge(&state.repo, &list, &item, body)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE .../items(id) - Delete an item.
async fn delete_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((list, item)): Path<(String, String)>,
) -> Result<StatusCode> {
    handle_delete(&state.repo, &list, &item)?;
    Ok(StatusCode::OK)
}

fn parse_body(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))
}

//! Authentication middleware.
//!
//! Clients present a Bearer token. When the server has an `AUTH_SECRET`, the
//! token must equal it; without one, anonymous requests are accepted.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::AppState;

/// Authenticated caller extracted from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// The bearer token, or "anonymous"
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        authorize(auth_header, state.config.auth_secret.as_deref())
    }
}

/// Check an `Authorization` header value against the configured secret.
pub fn authorize(header: Option<&str>, secret: Option<&str>) -> Result<AuthUser, AppError> {
    match header {
        Some(header) if header.starts_with("Bearer ") => {
            let token = header.trim_start_matches("Bearer ").to_string();

            if token.is_empty() {
                return Err(AppError::Unauthorized("Empty bearer token"));
            }

            match secret {
                Some(secret) if token != secret => {
                    tracing::warn!("Rejected request with invalid bearer token");
                    Err(AppError::Unauthorized("Invalid bearer token"))
                }
                _ => Ok(AuthUser { token }),
            }
        }
        Some(_) => Err(AppError::Unauthorized(
            "Invalid authorization header format",
        )),
        None => {
            if secret.is_none() {
                // No auth configured, allow anonymous access
                Ok(AuthUser {
                    token: "anonymous".to_string(),
                })
            } else {
                Err(AppError::Unauthorized("Missing authorization header"))
            }
        }
    }
}

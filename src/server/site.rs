//! The non-API routes: index page, health checks, verification tokens and
//! static assets.

use super::response::text_response;
use super::static_files::{self, StaticFile};
use super::AppState;
use crate::{Error, Result};
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

pub const INDEX_FILE: &str = "index.html";

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response> {
    serve_static(&state, INDEX_FILE).await
}

pub async fn health() -> Response {
    text_response(StatusCode::OK, "ok")
}

/// Catch-all: verification tokens first, then static files, then 404.
pub async fn fallback(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Result<Response> {
    if method != Method::GET {
        return Err(Error::NotFound);
    }

    let path = uri.path();
    if let Some(token) = state
        .config
        .verification_tokens
        .iter()
        .find(|t| t.path == path)
    {
        return Ok(text_response(StatusCode::OK, token.token.clone()));
    }

    serve_static(&state, path).await
}

async fn serve_static(state: &AppState, path: &str) -> Result<Response> {
    match static_files::load(&state.config.static_root, path).await? {
        Some(StaticFile {
            content,
            content_type,
        }) => Ok(([(header::CONTENT_TYPE, content_type)], content).into_response()),
        None => Err(Error::NotFound),
    }
}

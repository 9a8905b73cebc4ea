//! `/api/generate`: keywords in, couplet out.

use super::response::json_response;
use super::AppState;
use crate::models::{Couplet, KeywordRequest};
use crate::{prompts, Error, Result};
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Upper bound on buffered request bytes; anything past it is dropped.
pub const MAX_BODY_BYTES: usize = 2_000_000;

/// Request body as handed to the dispatcher.
///
/// The axum route always passes `Raw`. `Parsed` is the entry point for hosts
/// that embed the library behind their own HTTP layer and have already decoded
/// the JSON; they call [`handle`] directly and serialize the result themselves.
pub enum InboundBody {
    Parsed(Value),
    Raw(Body),
}

pub async fn generate(State(state): State<Arc<AppState>>, body: Body) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("generate", %request_id);

    async move {
        match handle(&state, InboundBody::Raw(body)).await {
            Ok(couplet) => json_response(StatusCode::OK, &couplet),
            Err(e) => e.into_response(),
        }
    }
    .instrument(span)
    .await
}

pub async fn preflight() -> Response {
    json_response(StatusCode::OK, &serde_json::json!({ "ok": true }))
}

pub async fn method_not_allowed() -> Response {
    ([(header::ALLOW, "POST")], Error::MethodNotAllowed).into_response()
}

/// Run the full pipeline for one request body.
pub async fn handle(state: &AppState, body: InboundBody) -> Result<Couplet> {
    let body = decode_body(body, MAX_BODY_BYTES).await;
    let request = KeywordRequest::from_body(&body, &state.config.keyword_aliases);
    if let Some(hint) = &request.horizontal_hint {
        tracing::debug!("Ignoring horizontal hint '{}'; caption is model-written", hint);
    }

    let keywords = request.into_pair();
    tracing::info!(
        "Generating couplet for keywords '{}' / '{}'",
        keywords.keyword1,
        keywords.keyword2
    );

    let prompts = prompts::build(&keywords);
    state.couplets.generate_couplet(&prompts).await
}

/// Decode a request body into a JSON object.
///
/// Never fails: empty, unreadable, malformed or non-object bodies all become
/// an empty object.
pub async fn decode_body(body: InboundBody, limit: usize) -> Value {
    let value = match body {
        InboundBody::Parsed(value) => value,
        InboundBody::Raw(body) => {
            let bytes = buffer_body(body, limit).await;
            if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                    tracing::debug!("Request body is not valid JSON: {}", e);
                    Value::Null
                })
            }
        }
    };

    match value {
        Value::Object(_) => value,
        _ => Value::Object(Map::new()),
    }
}

/// Buffer at most `limit` bytes of `body`.
///
/// A read error yields an empty buffer.
async fn buffer_body(mut body: Body, limit: usize) -> Vec<u8> {
    let mut buf = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Failed to read request body: {}", e);
                return Vec::new();
            }
        };

        let Ok(data) = frame.into_data() else {
            continue;
        };

        let remaining = limit - buf.len();
        if data.len() >= remaining {
            buf.extend_from_slice(&data[..remaining]);
            if data.len() > remaining {
                tracing::warn!("Request body exceeds {} bytes; truncating", limit);
            }
            break;
        }
        buf.extend_from_slice(&data);
    }

    buf
}

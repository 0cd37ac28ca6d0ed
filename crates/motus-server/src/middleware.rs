// SPDX-License-Identifier: Apache-2.0

//! Request policy and tracing layers. Ops routes stay open; `/v1` business
//! routes go through the API-key check when one is required.

use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use motus_api::ApiError;
use serde_json::json;
use std::time::Instant;

const OPEN_ROUTES: [&str; 5] = ["/", "/healthz", "/readyz", "/metrics", "/v1/version"];

fn error_response(status: StatusCode, err: ApiError) -> Response {
    (status, Json(json!({ "error": err }))).into_response()
}

fn normalized_header_value(headers: &HeaderMap, name: &str, max_len: usize) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= max_len)
        .map(ToString::to_string)
}

pub(crate) async fn security_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let uri_text = req.uri().to_string();
    if uri_text.len() > state.api.max_uri_bytes {
        return error_response(
            StatusCode::BAD_REQUEST,
            ApiError::new(
                motus_api::ApiErrorCode::RequestRejectedByPolicy,
                "request URI too large",
                json!({"max_uri_bytes": state.api.max_uri_bytes, "actual": uri_text.len()}),
                "req-unknown",
            ),
        );
    }
    let header_bytes: usize = req
        .headers()
        .iter()
        .map(|(k, v)| k.as_str().len() + v.as_bytes().len())
        .sum();
    if header_bytes > state.api.max_header_bytes {
        return error_response(
            StatusCode::BAD_REQUEST,
            ApiError::new(
                motus_api::ApiErrorCode::RequestRejectedByPolicy,
                "request headers too large",
                json!({"max_header_bytes": state.api.max_header_bytes, "actual": header_bytes}),
                "req-unknown",
            ),
        );
    }

    let open = OPEN_ROUTES.contains(&req.uri().path());
    if state.api.require_api_key && !open {
        let api_key = normalized_header_value(req.headers(), "x-api-key", 256);
        match api_key {
            None => {
                return error_response(
                    StatusCode::UNAUTHORIZED,
                    ApiError::unauthorized("api key required"),
                );
            }
            Some(key)
                if !state.api.allowed_api_keys.is_empty()
                    && !state.api.allowed_api_keys.iter().any(|k| k == &key) =>
            {
                return error_response(
                    StatusCode::UNAUTHORIZED,
                    ApiError::unauthorized("invalid api key"),
                );
            }
            Some(_) => {}
        }
    }

    next.run(req).await
}

/// Bound wall time per request so a stalled downstream call cannot pin the
/// task (or its turn on the store mutex) forever.
pub(crate) async fn request_timeout_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    match tokio::time::timeout(state.api.request_timeout, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(path = %path, "request exceeded the configured timeout");
            error_response(StatusCode::GATEWAY_TIMEOUT, ApiError::timeout())
        }
    }
}

pub(crate) async fn request_tracing_middleware(
    State(_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(req).await;
    tracing::info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

// SPDX-License-Identifier: Apache-2.0

use crate::telemetry::with_request_id;
use crate::AppState;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use motus_api::ApiError;
use motus_store::StoreError;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Instant;

pub(crate) fn api_error_response(status: StatusCode, err: ApiError, request_id: &str) -> Response {
    let err = err.with_request_id(request_id);
    (status, Json(json!({ "error": err }))).into_response()
}

/// Record the route observation and tag the response with its request id.
pub(crate) async fn finish(
    state: &AppState,
    route: &'static str,
    started: Instant,
    request_id: &str,
    response: Response,
) -> Response {
    state
        .metrics
        .observe_request(route, response.status(), started.elapsed())
        .await;
    with_request_id(response, request_id)
}

pub(crate) fn parse_body<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::malformed_body(&e.to_string()))
}

/// Store failures that reach a handler: `NotFound` is a client-facing 404,
/// everything else is logged and masked as a 500.
pub(crate) fn store_error_response(err: &StoreError) -> (StatusCode, ApiError) {
    match err {
        StoreError::NotFound { entity, id } => {
            (StatusCode::NOT_FOUND, ApiError::not_found(entity, id))
        }
        StoreError::Constraint(detail) => (
            StatusCode::BAD_REQUEST,
            ApiError::validation_failed(json!([{"reason": detail}])),
        ),
        other => {
            tracing::error!(error = %other, "store operation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal())
        }
    }
}

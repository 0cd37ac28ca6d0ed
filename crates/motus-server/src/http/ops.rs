// SPDX-License-Identifier: Apache-2.0

use crate::config::CONFIG_SCHEMA_VERSION;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub(crate) async fn landing_handler() -> &'static str {
    "motus: athlete movement-risk and rehab tracking service"
}

pub(crate) async fn healthz_handler() -> Response {
    Json(json!({"status": "ok"})).into_response()
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    let store = state.store.lock().await;
    match store.healthcheck() {
        Ok(()) => Json(json!({"status": "ready"})).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unavailable"})),
            )
                .into_response()
        }
    }
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> Response {
    let body = state.metrics.render().await;
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> Response {
    Json(json!({
        "name": crate::CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": motus_api::API_VERSION,
        "config_schema_version": CONFIG_SCHEMA_VERSION,
        "wearable_sim_enabled": state.api.enable_wearable_sim,
    }))
    .into_response()
}

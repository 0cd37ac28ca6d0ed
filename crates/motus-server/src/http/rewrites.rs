// SPDX-License-Identifier: Apache-2.0

use super::support::{api_error_response, finish, parse_body, store_error_response};
use crate::telemetry::make_request_id;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use motus_api::{ApiError, CreateRewriteDto};
use motus_model::{AudienceRewrite, MovementAssessmentId, RewriteId};
use serde_json::json;
use std::time::Instant;

pub(crate) async fn create_rewrite_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/rewrites";

    let parsed = parse_body::<CreateRewriteDto>(&body).and_then(|dto| {
        dto.validate()?;
        let assessment_id = dto
            .movement_assessment_id
            .as_deref()
            .map(|raw| {
                MovementAssessmentId::parse(raw)
                    .map_err(|_| ApiError::invalid_path("movement_assessment_id", raw))
            })
            .transpose()?;
        Ok((assessment_id, dto))
    });
    let (assessment_id, dto) = match parsed {
        Ok(v) => v,
        Err(e) => {
            let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
            return finish(&state, route, started, &request_id, resp).await;
        }
    };

    // Anchoring to a nonexistent assessment is a client error, checked before
    // any engine call is spent.
    if let Some(id) = &assessment_id {
        let store = state.store.lock().await;
        if let Err(e) = store.get_movement_assessment(id) {
            let (status, err) = store_error_response(&e);
            let resp = api_error_response(status, err, &request_id);
            drop(store);
            return finish(&state, route, started, &request_id, resp).await;
        }
    }

    let rewritten = match state
        .summary
        .rewrite(dto.audience, &dto.tone, &dto.source_text)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "rewrite engine failed; nothing written");
            let resp = api_error_response(
                StatusCode::BAD_GATEWAY,
                ApiError::summary_unavailable(&e.to_string()),
                &request_id,
            );
            return finish(&state, route, started, &request_id, resp).await;
        }
    };

    let rewrite = AudienceRewrite {
        id: RewriteId::generate(),
        movement_assessment_id: assessment_id,
        audience: dto.audience,
        tone: dto.tone,
        source_text: dto.source_text,
        rewritten_text: rewritten,
        created_at: Utc::now(),
    };
    let store = state.store.lock().await;
    let resp = match store.insert_rewrite(&rewrite) {
        Ok(()) => (StatusCode::CREATED, Json(json!({"rewrite": rewrite}))).into_response(),
        Err(e) => {
            let (status, err) = store_error_response(&e);
            api_error_response(status, err, &request_id)
        }
    };
    drop(store);
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn get_rewrite_handler(
    State(state): State<AppState>,
    Path(rewrite_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/rewrites/:rewrite_id";

    let resp = match RewriteId::parse(&rewrite_id)
        .map_err(|_| ApiError::invalid_path("rewrite_id", &rewrite_id))
    {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok(id) => {
            let store = state.store.lock().await;
            match store.get_rewrite(&id) {
                Ok(rewrite) => Json(json!({"rewrite": rewrite})).into_response(),
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

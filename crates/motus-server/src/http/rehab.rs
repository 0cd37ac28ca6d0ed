// SPDX-License-Identifier: Apache-2.0

use super::support::{api_error_response, finish, parse_body, store_error_response};
use crate::services::clearance::{evaluate_rehab_clearance, ClearanceError};
use crate::telemetry::make_request_id;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use motus_api::params::parse_history_limit;
use motus_api::{
    ApiError, CreateRehabAssessmentDto, RehabDetailResponseDto, RehabHistoryResponseDto,
};
use motus_model::{AthleteId, RehabAssessmentId};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Instant;

fn clearance_error_response(err: ClearanceError, request_id: &str) -> Response {
    match err {
        ClearanceError::AthleteMissing(id) => api_error_response(
            StatusCode::NOT_FOUND,
            ApiError::not_found("athlete", &id),
            request_id,
        ),
        ClearanceError::Summary(e) => {
            tracing::warn!(error = %e, "summary engine failed; assessment not written");
            api_error_response(
                StatusCode::BAD_GATEWAY,
                ApiError::summary_unavailable(&e.to_string()),
                request_id,
            )
        }
        ClearanceError::Store(e) => {
            let (status, err) = store_error_response(&e);
            api_error_response(status, err, request_id)
        }
    }
}

pub(crate) async fn create_rehab_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/rehab";

    let parsed = parse_body::<CreateRehabAssessmentDto>(&body).and_then(|dto| {
        dto.validate()?;
        let athlete_id = AthleteId::parse(&dto.athlete_id)
            .map_err(|_| ApiError::invalid_path("athlete_id", &dto.athlete_id))?;
        Ok((athlete_id, dto))
    });
    let (athlete_id, dto) = match parsed {
        Ok(v) => v,
        Err(e) => {
            let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
            return finish(&state, route, started, &request_id, resp).await;
        }
    };

    let resp = match evaluate_rehab_clearance(&state, athlete_id, dto).await {
        Ok(assessment) => {
            (StatusCode::CREATED, Json(json!({"assessment": assessment}))).into_response()
        }
        Err(e) => clearance_error_response(e, &request_id),
    };
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn rehab_history_handler(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/rehab/athlete/:athlete_id";

    let parsed = AthleteId::parse(&athlete_id)
        .map_err(|_| ApiError::invalid_path("athlete_id", &athlete_id))
        .and_then(|id| parse_history_limit(&params).map(|limit| (id, limit)));
    let resp = match parsed {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok((id, limit)) => {
            let store = state.store.lock().await;
            match store
                .get_athlete(&id)
                .and_then(|_| store.list_rehab_assessments(&id, limit))
            {
                Ok(assessments) => {
                    Json(RehabHistoryResponseDto { assessments }).into_response()
                }
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn rehab_detail_handler(
    State(state): State<AppState>,
    Path(assessment_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/rehab/:rehab_assessment_id";

    let resp = match RehabAssessmentId::parse(&assessment_id)
        .map_err(|_| ApiError::invalid_path("assessment_id", &assessment_id))
    {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok(id) => {
            let store = state.store.lock().await;
            match store.get_rehab_detail(&id) {
                Ok((assessment, athlete, videos)) => Json(RehabDetailResponseDto {
                    assessment,
                    athlete,
                    videos,
                })
                .into_response(),
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

// SPDX-License-Identifier: Apache-2.0

use super::support::{api_error_response, finish, parse_body, store_error_response};
use crate::telemetry::make_request_id;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use motus_api::params::parse_history_limit;
use motus_api::{
    ApiError, CreateInterventionDto, CreateMovementAssessmentDto, CreateRiskSnapshotDto,
};
use motus_model::{
    AthleteId, Intervention, InterventionId, MovementAssessment, MovementAssessmentId, RiskBand,
    RiskSnapshot, RiskSnapshotId,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Instant;

pub(crate) async fn create_assessment_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/assessments";

    let parsed = parse_body::<CreateMovementAssessmentDto>(&body).and_then(|dto| {
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

    let store = state.store.lock().await;
    let resp = match store.get_athlete(&athlete_id) {
        Ok(_) => {
            let now = Utc::now();
            let assessment = MovementAssessment {
                id: MovementAssessmentId::generate(),
                athlete_id,
                session_date: dto.session_date.unwrap_or(now),
                screen_type: dto.screen_type,
                score: dto.score,
                notes: dto.notes,
                created_at: now,
            };
            match store.insert_movement_assessment(&assessment) {
                Ok(()) => {
                    (StatusCode::CREATED, Json(json!({"assessment": assessment}))).into_response()
                }
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
        Err(e) => {
            let (status, err) = store_error_response(&e);
            api_error_response(status, err, &request_id)
        }
    };
    drop(store);
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn get_assessment_handler(
    State(state): State<AppState>,
    Path(assessment_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/assessments/:assessment_id";

    let resp = match MovementAssessmentId::parse(&assessment_id)
        .map_err(|_| ApiError::invalid_path("assessment_id", &assessment_id))
    {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok(id) => {
            let store = state.store.lock().await;
            match store
                .get_movement_assessment(&id)
                .and_then(|assessment| {
                    let interventions = store.list_interventions(&id)?;
                    Ok((assessment, interventions))
                }) {
                Ok((assessment, interventions)) => Json(json!({
                    "assessment": assessment,
                    "interventions": interventions,
                }))
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

pub(crate) async fn list_assessments_handler(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/athletes/:athlete_id/assessments";

    let parsed = AthleteId::parse(&athlete_id)
        .map_err(|_| ApiError::invalid_path("athlete_id", &athlete_id))
        .and_then(|id| parse_history_limit(&params).map(|limit| (id, limit)));
    let resp = match parsed {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok((id, limit)) => {
            let store = state.store.lock().await;
            match store.list_movement_assessments(&id, limit) {
                Ok(assessments) => Json(json!({"assessments": assessments})).into_response(),
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn create_intervention_handler(
    State(state): State<AppState>,
    Path(assessment_id): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/assessments/:assessment_id/interventions";

    let parsed = MovementAssessmentId::parse(&assessment_id)
        .map_err(|_| ApiError::invalid_path("assessment_id", &assessment_id))
        .and_then(|id| {
            let dto: CreateInterventionDto = parse_body(&body)?;
            dto.validate()?;
            Ok((id, dto))
        });
    let (id, dto) = match parsed {
        Ok(v) => v,
        Err(e) => {
            let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
            return finish(&state, route, started, &request_id, resp).await;
        }
    };

    let store = state.store.lock().await;
    let resp = match store.get_movement_assessment(&id) {
        Ok(_) => {
            let intervention = Intervention {
                id: InterventionId::generate(),
                movement_assessment_id: id,
                title: dto.title,
                detail: dto.detail,
                acknowledged: false,
                created_at: Utc::now(),
            };
            match store.insert_intervention(&intervention) {
                Ok(()) => (
                    StatusCode::CREATED,
                    Json(json!({"intervention": intervention})),
                )
                    .into_response(),
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
        Err(e) => {
            let (status, err) = store_error_response(&e);
            api_error_response(status, err, &request_id)
        }
    };
    drop(store);
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn acknowledge_intervention_handler(
    State(state): State<AppState>,
    Path(intervention_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/interventions/:intervention_id/acknowledge";

    let resp = match InterventionId::parse(&intervention_id)
        .map_err(|_| ApiError::invalid_path("intervention_id", &intervention_id))
    {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok(id) => {
            let store = state.store.lock().await;
            match store.acknowledge_intervention(&id) {
                Ok(intervention) => Json(json!({"intervention": intervention})).into_response(),
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn create_snapshot_handler(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/athletes/:athlete_id/snapshots";

    let parsed = AthleteId::parse(&athlete_id)
        .map_err(|_| ApiError::invalid_path("athlete_id", &athlete_id))
        .and_then(|id| {
            let dto: CreateRiskSnapshotDto = parse_body(&body)?;
            dto.validate()?;
            Ok((id, dto))
        });
    let (id, dto) = match parsed {
        Ok(v) => v,
        Err(e) => {
            let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
            return finish(&state, route, started, &request_id, resp).await;
        }
    };

    let store = state.store.lock().await;
    let resp = match store.get_athlete(&id) {
        Ok(_) => {
            let snapshot = RiskSnapshot {
                id: RiskSnapshotId::generate(),
                athlete_id: id,
                captured_at: dto.captured_at.unwrap_or_else(Utc::now),
                risk_score: dto.risk_score,
                risk_band: RiskBand::from_score(dto.risk_score),
            };
            match store.insert_risk_snapshot(&snapshot) {
                Ok(()) => {
                    (StatusCode::CREATED, Json(json!({"snapshot": snapshot}))).into_response()
                }
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
        Err(e) => {
            let (status, err) = store_error_response(&e);
            api_error_response(status, err, &request_id)
        }
    };
    drop(store);
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn list_snapshots_handler(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/athletes/:athlete_id/snapshots";

    let parsed = AthleteId::parse(&athlete_id)
        .map_err(|_| ApiError::invalid_path("athlete_id", &athlete_id))
        .and_then(|id| parse_history_limit(&params).map(|limit| (id, limit)));
    let resp = match parsed {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok((id, limit)) => {
            let store = state.store.lock().await;
            match store.list_risk_snapshots(&id, limit) {
                Ok(snapshots) => Json(json!({"snapshots": snapshots})).into_response(),
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

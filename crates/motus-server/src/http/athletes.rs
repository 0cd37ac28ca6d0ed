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
use motus_api::params::{parse_history_limit, parse_team_filter};
use motus_api::{ApiError, CreateAthleteDto, CreateContactDto, UpdateAthleteDto};
use motus_model::{Athlete, AthleteContact, AthleteId, ContactId};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Instant;

pub(crate) async fn create_athlete_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/athletes";

    let dto: CreateAthleteDto = match parse_body(&body) {
        Ok(dto) => dto,
        Err(e) => {
            let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
            return finish(&state, route, started, &request_id, resp).await;
        }
    };
    if let Err(e) = dto.validate() {
        let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
        return finish(&state, route, started, &request_id, resp).await;
    }

    let now = Utc::now();
    let athlete = Athlete {
        id: AthleteId::generate(),
        name: dto.name,
        sport: dto.sport,
        position: dto.position,
        team: dto.team,
        sex: dto.sex,
        date_of_birth: dto.date_of_birth,
        height_cm: dto.height_cm,
        weight_kg: dto.weight_kg,
        notes: dto.notes,
        archived: false,
        created_at: now,
        updated_at: now,
    };
    let store = state.store.lock().await;
    let resp = match store.insert_athlete(&athlete) {
        Ok(()) => (StatusCode::CREATED, Json(json!({"athlete": athlete}))).into_response(),
        Err(e) => {
            let (status, err) = store_error_response(&e);
            api_error_response(status, err, &request_id)
        }
    };
    drop(store);
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn list_athletes_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/athletes";

    let parsed = parse_history_limit(&params).and_then(|limit| {
        parse_team_filter(&params).map(|team| (limit, team))
    });
    let (limit, team) = match parsed {
        Ok(v) => v,
        Err(e) => {
            let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
            return finish(&state, route, started, &request_id, resp).await;
        }
    };

    let store = state.store.lock().await;
    let resp = match store.list_athletes(limit, team.as_deref()) {
        Ok(athletes) => Json(json!({"athletes": athletes})).into_response(),
        Err(e) => {
            let (status, err) = store_error_response(&e);
            api_error_response(status, err, &request_id)
        }
    };
    drop(store);
    finish(&state, route, started, &request_id, resp).await
}

fn parse_athlete_path(raw: &str) -> Result<AthleteId, ApiError> {
    AthleteId::parse(raw).map_err(|_| ApiError::invalid_path("athlete_id", raw))
}

pub(crate) async fn get_athlete_handler(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/athletes/:athlete_id";

    let resp = match parse_athlete_path(&athlete_id) {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok(id) => {
            let store = state.store.lock().await;
            match store.get_athlete(&id) {
                Ok(athlete) => Json(json!({"athlete": athlete})).into_response(),
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn update_athlete_handler(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/athletes/:athlete_id";

    let id = match parse_athlete_path(&athlete_id) {
        Ok(id) => id,
        Err(e) => {
            let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
            return finish(&state, route, started, &request_id, resp).await;
        }
    };
    let dto: UpdateAthleteDto = match parse_body(&body).and_then(|dto: UpdateAthleteDto| {
        dto.validate()?;
        Ok(dto)
    }) {
        Ok(dto) => dto,
        Err(e) => {
            let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
            return finish(&state, route, started, &request_id, resp).await;
        }
    };

    let store = state.store.lock().await;
    let resp = match store.get_athlete(&id) {
        Ok(mut athlete) => {
            if let Some(name) = dto.name {
                athlete.name = name;
            }
            if let Some(sport) = dto.sport {
                athlete.sport = sport;
            }
            if let Some(position) = dto.position {
                athlete.position = Some(position);
            }
            if let Some(team) = dto.team {
                athlete.team = Some(team);
            }
            if let Some(sex) = dto.sex {
                athlete.sex = sex;
            }
            if let Some(height_cm) = dto.height_cm {
                athlete.height_cm = Some(height_cm);
            }
            if let Some(weight_kg) = dto.weight_kg {
                athlete.weight_kg = Some(weight_kg);
            }
            if let Some(notes) = dto.notes {
                athlete.notes = Some(notes);
            }
            athlete.updated_at = Utc::now();
            match store.update_athlete(&athlete) {
                Ok(()) => Json(json!({"athlete": athlete})).into_response(),
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

pub(crate) async fn archive_athlete_handler(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/athletes/:athlete_id/archive";

    let resp = match parse_athlete_path(&athlete_id) {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok(id) => {
            let store = state.store.lock().await;
            match store.archive_athlete(&id) {
                Ok(athlete) => Json(json!({"athlete": athlete})).into_response(),
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn create_contact_handler(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/athletes/:athlete_id/contacts";

    let parsed = parse_athlete_path(&athlete_id).and_then(|id| {
        let dto: CreateContactDto = parse_body(&body)?;
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
            let contact = AthleteContact {
                id: ContactId::generate(),
                athlete_id: id,
                name: dto.name,
                relationship: dto.relationship,
                email: dto.email,
                phone: dto.phone,
                role: dto.role,
            };
            match store.insert_contact(&contact) {
                Ok(()) => (StatusCode::CREATED, Json(json!({"contact": contact}))).into_response(),
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

pub(crate) async fn list_contacts_handler(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/athletes/:athlete_id/contacts";

    let resp = match parse_athlete_path(&athlete_id) {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok(id) => {
            let store = state.store.lock().await;
            match store.list_contacts(&id) {
                Ok(contacts) => Json(json!({"contacts": contacts})).into_response(),
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

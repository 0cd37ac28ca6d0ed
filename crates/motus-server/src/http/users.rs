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
use motus_api::{ApiError, CreateUserDto};
use motus_model::{AthleteId, User, UserId};
use serde_json::json;
use std::time::Instant;

pub(crate) async fn create_user_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/users";

    let parsed = parse_body::<CreateUserDto>(&body).and_then(|dto| {
        dto.validate()?;
        let athlete_id = dto
            .athlete_id
            .as_deref()
            .map(|raw| {
                AthleteId::parse(raw).map_err(|_| ApiError::invalid_path("athlete_id", raw))
            })
            .transpose()?;
        Ok((athlete_id, dto))
    });
    let (athlete_id, dto) = match parsed {
        Ok(v) => v,
        Err(e) => {
            let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
            return finish(&state, route, started, &request_id, resp).await;
        }
    };

    let user = User {
        id: UserId::generate(),
        email: dto.email.trim().to_string(),
        name: dto.name,
        role: dto.role,
        athlete_id,
        created_at: Utc::now(),
    };
    let store = state.store.lock().await;
    let resp = match store.insert_user(&user) {
        Ok(()) => (StatusCode::CREATED, Json(json!({"user": user}))).into_response(),
        Err(e) => {
            let (status, err) = store_error_response(&e);
            api_error_response(status, err, &request_id)
        }
    };
    drop(store);
    finish(&state, route, started, &request_id, resp).await
}

pub(crate) async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/users/:user_id";

    let resp = match UserId::parse(&user_id)
        .map_err(|_| ApiError::invalid_path("user_id", &user_id))
    {
        Err(e) => api_error_response(StatusCode::BAD_REQUEST, e, &request_id),
        Ok(id) => {
            let store = state.store.lock().await;
            match store.get_user(&id) {
                Ok(user) => Json(json!({"user": user})).into_response(),
                Err(e) => {
                    let (status, err) = store_error_response(&e);
                    api_error_response(status, err, &request_id)
                }
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

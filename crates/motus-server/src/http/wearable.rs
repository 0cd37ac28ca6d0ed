// SPDX-License-Identifier: Apache-2.0

use super::support::{api_error_response, finish, store_error_response};
use crate::services::wearable::WearableSimulator;
use crate::telemetry::make_request_id;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use motus_api::params::parse_wearable_count;
use motus_api::{ApiError, WearableResponseDto};
use motus_model::AthleteId;
use std::collections::BTreeMap;
use std::time::Instant;

/// Demo telemetry burst for one athlete. Disabled deployments answer 404 so
/// the route is indistinguishable from absent.
pub(crate) async fn wearable_sample_handler(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let route = "/v1/wearable/:athlete_id/sample";

    if !state.api.enable_wearable_sim {
        let resp = api_error_response(
            StatusCode::NOT_FOUND,
            ApiError::not_found("route", route),
            &request_id,
        );
        return finish(&state, route, started, &request_id, resp).await;
    }

    let parsed = AthleteId::parse(&athlete_id)
        .map_err(|_| ApiError::invalid_path("athlete_id", &athlete_id))
        .and_then(|id| parse_wearable_count(&params).map(|count| (id, count)));
    let (id, count) = match parsed {
        Ok(v) => v,
        Err(e) => {
            let resp = api_error_response(StatusCode::BAD_REQUEST, e, &request_id);
            return finish(&state, route, started, &request_id, resp).await;
        }
    };

    let resp = {
        let store = state.store.lock().await;
        match store.get_athlete(&id) {
            Ok(athlete) => {
                let samples =
                    WearableSimulator::seeded_for(athlete.id.as_str()).sample_burst(count, Utc::now());
                Json(WearableResponseDto {
                    athlete_id: athlete.id.as_str().to_string(),
                    samples,
                })
                .into_response()
            }
            Err(e) => {
                let (status, err) = store_error_response(&e);
                api_error_response(status, err, &request_id)
            }
        }
    };
    finish(&state, route, started, &request_id, resp).await
}

#![forbid(unsafe_code)]
//! Motus HTTP server: router, state, middleware, telemetry, and the services
//! that sit between the REST surface and the store.

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod config;
mod http;
mod middleware;
pub mod services;
mod telemetry;

pub use config::ApiConfig;
pub use services::summary::{
    FailingSummaryEngine, HttpSummaryEngine, SummaryEngine, TemplateSummaryEngine,
};
pub use telemetry::RequestMetrics;

pub const CRATE_NAME: &str = "motus-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<motus_store::Store>>,
    pub summary: Arc<dyn SummaryEngine>,
    pub metrics: Arc<RequestMetrics>,
    pub request_id_seed: Arc<AtomicU64>,
    pub api: ApiConfig,
}

impl AppState {
    #[must_use]
    pub fn new(store: motus_store::Store, summary: Arc<dyn SummaryEngine>) -> Self {
        Self::with_config(store, summary, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(
        store: motus_store::Store,
        summary: Arc<dyn SummaryEngine>,
        api: ApiConfig,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            summary,
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
            api,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::ops::landing_handler))
        .route("/healthz", get(http::ops::healthz_handler))
        .route("/readyz", get(http::ops::readyz_handler))
        .route("/metrics", get(http::ops::metrics_handler))
        .route("/v1/version", get(http::ops::version_handler))
        .route(
            "/v1/athletes",
            post(http::athletes::create_athlete_handler).get(http::athletes::list_athletes_handler),
        )
        .route(
            "/v1/athletes/:athlete_id",
            get(http::athletes::get_athlete_handler).put(http::athletes::update_athlete_handler),
        )
        .route(
            "/v1/athletes/:athlete_id/archive",
            post(http::athletes::archive_athlete_handler),
        )
        .route(
            "/v1/athletes/:athlete_id/contacts",
            post(http::athletes::create_contact_handler).get(http::athletes::list_contacts_handler),
        )
        .route(
            "/v1/athletes/:athlete_id/assessments",
            get(http::screening::list_assessments_handler),
        )
        .route(
            "/v1/athletes/:athlete_id/snapshots",
            post(http::screening::create_snapshot_handler)
                .get(http::screening::list_snapshots_handler),
        )
        .route(
            "/v1/assessments",
            post(http::screening::create_assessment_handler),
        )
        .route(
            "/v1/assessments/:assessment_id",
            get(http::screening::get_assessment_handler),
        )
        .route(
            "/v1/assessments/:assessment_id/interventions",
            post(http::screening::create_intervention_handler),
        )
        .route(
            "/v1/interventions/:intervention_id/acknowledge",
            post(http::screening::acknowledge_intervention_handler),
        )
        .route("/v1/rehab", post(http::rehab::create_rehab_handler))
        .route(
            "/v1/rehab/athlete/:athlete_id",
            get(http::rehab::rehab_history_handler),
        )
        .route(
            "/v1/rehab/:rehab_assessment_id",
            get(http::rehab::rehab_detail_handler),
        )
        .route(
            "/v1/rewrites",
            post(http::rewrites::create_rewrite_handler),
        )
        .route(
            "/v1/rewrites/:rewrite_id",
            get(http::rewrites::get_rewrite_handler),
        )
        .route(
            "/v1/wearable/:athlete_id/sample",
            get(http::wearable::wearable_sample_handler),
        )
        .route("/v1/users", post(http::users::create_user_handler))
        .route("/v1/users/:user_id", get(http::users::get_user_handler))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_timeout_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::security_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}

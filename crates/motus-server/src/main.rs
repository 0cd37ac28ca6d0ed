#![forbid(unsafe_code)]

use motus_server::{
    build_router, ApiConfig, AppState, HttpSummaryEngine, SummaryEngine, TemplateSummaryEngine,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("MOTUS_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("MOTUS_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let db_path =
        PathBuf::from(env::var("MOTUS_DB_PATH").unwrap_or_else(|_| "motus.sqlite3".to_string()));

    let api_cfg = ApiConfig {
        max_body_bytes: env_usize("MOTUS_MAX_BODY_BYTES", 64 * 1024),
        max_uri_bytes: env_usize("MOTUS_MAX_URI_BYTES", 2048),
        max_header_bytes: env_usize("MOTUS_MAX_HEADER_BYTES", 16 * 1024),
        request_timeout: env_duration_ms("MOTUS_REQUEST_TIMEOUT_MS", 5000),
        require_api_key: env_bool("MOTUS_REQUIRE_API_KEY", false),
        allowed_api_keys: env_list("MOTUS_API_KEYS"),
        summary_base_url: env::var("MOTUS_SUMMARY_BASE_URL").ok(),
        summary_api_key: env::var("MOTUS_SUMMARY_API_KEY").ok(),
        summary_timeout: env_duration_ms("MOTUS_SUMMARY_TIMEOUT_MS", 10_000),
        enable_wearable_sim: env_bool("MOTUS_ENABLE_WEARABLE_SIM", true),
    };
    if api_cfg.require_api_key && api_cfg.allowed_api_keys.is_empty() {
        return Err("MOTUS_REQUIRE_API_KEY is set but MOTUS_API_KEYS is empty".to_string());
    }

    let summary: Arc<dyn SummaryEngine> = match &api_cfg.summary_base_url {
        Some(base_url) => {
            info!(base_url, "using HTTP summary engine");
            Arc::new(
                HttpSummaryEngine::new(
                    base_url.clone(),
                    api_cfg.summary_api_key.clone(),
                    api_cfg.summary_timeout,
                )
                .map_err(|e| format!("summary engine init failed: {e}"))?,
            )
        }
        None => {
            info!("no summary service configured; using local template engine");
            Arc::new(TemplateSummaryEngine)
        }
    };

    let store = motus_store::Store::open(&db_path)
        .map_err(|e| format!("store open failed at {}: {e}", db_path.display()))?;
    let state = AppState::with_config(store, summary, api_cfg);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("motus-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}

// SPDX-License-Identifier: Apache-2.0

//! Policy and failure-path behavior: auth gate, request-size limits, and the
//! summary-engine outage contract.

use motus_server::{
    build_router, ApiConfig, AppState, FailingSummaryEngine, HttpSummaryEngine,
    TemplateSummaryEngine,
};
use motus_store::Store;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn spawn_app(state: AppState) -> SocketAddr {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    if let Some(body) = body {
        req.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n",
            body.len()
        ));
    }
    req.push_str("\r\n");
    if let Some(body) = body {
        req.push_str(body);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

fn body_json(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

fn athlete_body(name: &str) -> String {
    json!({
        "name": name,
        "sport": "soccer",
        "sex": "male",
        "date_of_birth": "2007-11-02"
    })
    .to_string()
}

#[tokio::test]
async fn api_key_gate_protects_v1_but_not_ops_routes() {
    let store = Store::open_in_memory().expect("open store");
    let cfg = ApiConfig {
        require_api_key: true,
        allowed_api_keys: vec!["k-good".to_string()],
        ..ApiConfig::default()
    };
    let addr = spawn_app(AppState::with_config(
        store,
        Arc::new(TemplateSummaryEngine),
        cfg,
    ))
    .await;

    let (status, _, body) = send_raw(addr, "GET", "/v1/athletes", &[], None).await;
    assert_eq!(status, 401);
    assert_eq!(body_json(&body)["error"]["code"], "unauthorized");

    let (status, _, _) = send_raw(
        addr,
        "GET",
        "/v1/athletes",
        &[("x-api-key", "k-wrong")],
        None,
    )
    .await;
    assert_eq!(status, 401);

    let (status, _, _) = send_raw(
        addr,
        "GET",
        "/v1/athletes",
        &[("x-api-key", "k-good")],
        None,
    )
    .await;
    assert_eq!(status, 200);

    for open in ["/healthz", "/readyz", "/metrics", "/v1/version"] {
        let (status, _, _) = send_raw(addr, "GET", open, &[], None).await;
        assert_eq!(status, 200, "{open} must stay open");
    }
}

#[tokio::test]
async fn oversized_uri_is_rejected_by_policy() {
    let store = Store::open_in_memory().expect("open store");
    let addr = spawn_app(AppState::new(store, Arc::new(TemplateSummaryEngine))).await;

    let long = "x".repeat(4096);
    let (status, _, body) =
        send_raw(addr, "GET", &format!("/v1/athletes?team={long}"), &[], None).await;
    assert_eq!(status, 400);
    assert_eq!(
        body_json(&body)["error"]["code"],
        "request_rejected_by_policy"
    );
}

#[tokio::test]
async fn oversized_headers_are_rejected_by_policy() {
    let store = Store::open_in_memory().expect("open store");
    let addr = spawn_app(AppState::new(store, Arc::new(TemplateSummaryEngine))).await;

    let big = "v".repeat(20 * 1024);
    let (status, _, body) = send_raw(
        addr,
        "GET",
        "/v1/athletes",
        &[("x-filler", big.as_str())],
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(
        body_json(&body)["error"]["code"],
        "request_rejected_by_policy"
    );
}

#[tokio::test]
async fn malformed_body_is_a_400_not_a_500() {
    let store = Store::open_in_memory().expect("open store");
    let addr = spawn_app(AppState::new(store, Arc::new(TemplateSummaryEngine))).await;

    let (status, _, body) = send_raw(addr, "POST", "/v1/athletes", &[], Some("{not json")).await;
    assert_eq!(status, 400);
    assert_eq!(body_json(&body)["error"]["code"], "validation_failed");
}

#[tokio::test]
async fn summary_outage_is_502_and_writes_nothing() {
    let store = Store::open_in_memory().expect("open store");
    let addr = spawn_app(AppState::new(store, Arc::new(FailingSummaryEngine))).await;

    let (status, _, body) =
        send_raw(addr, "POST", "/v1/athletes", &[], Some(&athlete_body("Pat Kim"))).await;
    assert_eq!(status, 201);
    let athlete_id = body_json(&body)["athlete"]["id"]
        .as_str()
        .expect("athlete id")
        .to_string();

    let rehab = json!({
        "athlete_id": athlete_id,
        "surgical_side": "left",
        "videos": [
            {"test_type": "squat", "url": "https://cdn.example/v.mp4", "captured_at": "2026-08-20T10:00:00Z"}
        ],
        "limb_symmetry": {"squat": 0.95},
        "strength": {"quadriceps": 0.95}
    })
    .to_string();
    let (status, _, body) = send_raw(addr, "POST", "/v1/rehab", &[], Some(&rehab)).await;
    assert_eq!(status, 502);
    assert_eq!(
        body_json(&body)["error"]["code"],
        "summary_service_unavailable"
    );

    // The failed evaluation must not have left a partial assessment behind.
    let (status, _, body) = send_raw(
        addr,
        "GET",
        &format!("/v1/rehab/athlete/{athlete_id}"),
        &[],
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert!(body_json(&body)["assessments"]
        .as_array()
        .expect("assessments")
        .is_empty());

    let (status, _, body) = send_raw(
        addr,
        "POST",
        "/v1/rewrites",
        &[],
        Some(&json!({"audience": "parent", "tone": "calm", "source_text": "x"}).to_string()),
    )
    .await;
    assert_eq!(status, 502, "rewrite outage: {body}");
}

// Accepts connections, reads, and never answers.
async fn spawn_stalled_upstream() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stalled upstream");
    let addr = listener.local_addr().expect("stalled upstream addr");
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                while !matches!(socket.read(&mut buf).await, Ok(0) | Err(_)) {}
            });
        }
    });
    addr
}

#[tokio::test]
async fn stalled_downstream_call_hits_the_request_timeout() {
    let upstream = spawn_stalled_upstream().await;
    let store = Store::open_in_memory().expect("open store");
    let cfg = ApiConfig {
        request_timeout: Duration::from_millis(250),
        ..ApiConfig::default()
    };
    // Engine-level timeout is deliberately far longer than the request budget.
    let engine = HttpSummaryEngine::new(
        format!("http://{upstream}"),
        None,
        Duration::from_secs(30),
    )
    .expect("summary engine");
    let addr = spawn_app(AppState::with_config(store, Arc::new(engine), cfg)).await;

    let (status, _, body) =
        send_raw(addr, "POST", "/v1/athletes", &[], Some(&athlete_body("Ash Cole"))).await;
    assert_eq!(status, 201);
    let athlete_id = body_json(&body)["athlete"]["id"]
        .as_str()
        .expect("athlete id")
        .to_string();

    let rehab = json!({
        "athlete_id": athlete_id,
        "surgical_side": "right",
        "videos": [
            {"test_type": "lunge", "url": "https://cdn.example/v.mp4",
             "captured_at": "2026-08-20T10:00:00Z"}
        ],
        "limb_symmetry": {"lunge": 0.95}
    })
    .to_string();
    let (status, _, body) = send_raw(addr, "POST", "/v1/rehab", &[], Some(&rehab)).await;
    assert_eq!(status, 504, "stalled engine: {body}");
    assert_eq!(body_json(&body)["error"]["code"], "timeout");
}

#[tokio::test]
async fn responses_carry_request_ids_and_metrics_accumulate() {
    let store = Store::open_in_memory().expect("open store");
    let addr = spawn_app(AppState::new(store, Arc::new(TemplateSummaryEngine))).await;

    let (status, head, _) = send_raw(addr, "GET", "/v1/athletes", &[], None).await;
    assert_eq!(status, 200);
    let request_id = head
        .lines()
        .find_map(|line| line.to_lowercase().strip_prefix("x-request-id:").map(str::to_string))
        .expect("x-request-id header");
    assert!(request_id.trim().starts_with("req-"));

    let (status, _, body) = send_raw(addr, "GET", "/metrics", &[], None).await;
    assert_eq!(status, 200);
    assert!(body.contains("motus_http_requests_total"));
    assert!(body.contains("/v1/athletes"));
}

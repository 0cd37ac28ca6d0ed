// SPDX-License-Identifier: Apache-2.0

//! Request metrics with hand-rendered Prometheus text exposition.

use crate::AppState;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::Mutex;

pub const METRIC_SUBSYSTEM: &str = "motus";
pub const METRIC_VERSION: &str = env!("CARGO_PKG_VERSION");

// Bounded per-route sample buffer; oldest samples are discarded first.
const MAX_LATENCY_SAMPLES: usize = 4096;

#[derive(Default)]
struct MetricsInner {
    requests: BTreeMap<(String, u16), u64>,
    latency_ns: BTreeMap<String, Vec<u64>>,
}

#[derive(Default)]
pub struct RequestMetrics {
    inner: Mutex<MetricsInner>,
}

impl RequestMetrics {
    pub async fn observe_request(&self, route: &str, status: StatusCode, elapsed: Duration) {
        let mut inner = self.inner.lock().await;
        *inner
            .requests
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        let samples = inner.latency_ns.entry(route.to_string()).or_default();
        if samples.len() >= MAX_LATENCY_SAMPLES {
            samples.remove(0);
        }
        samples.push(elapsed.as_nanos() as u64);
    }

    pub async fn render(&self) -> String {
        let inner = self.inner.lock().await;
        let mut body = String::new();
        body.push_str(&format!(
            "# HELP {METRIC_SUBSYSTEM}_build_info build metadata\n\
             # TYPE {METRIC_SUBSYSTEM}_build_info gauge\n\
             {METRIC_SUBSYSTEM}_build_info{{version=\"{METRIC_VERSION}\"}} 1\n"
        ));
        body.push_str(&format!(
            "# TYPE {METRIC_SUBSYSTEM}_http_requests_total counter\n"
        ));
        for ((route, status), count) in &inner.requests {
            body.push_str(&format!(
                "{METRIC_SUBSYSTEM}_http_requests_total{{route=\"{route}\",status=\"{status}\"}} {count}\n"
            ));
        }
        body.push_str(&format!(
            "# TYPE {METRIC_SUBSYSTEM}_http_latency_seconds gauge\n"
        ));
        for (route, samples) in &inner.latency_ns {
            for (label, pct) in [("0.5", 0.5), ("0.95", 0.95), ("0.99", 0.99)] {
                let value = percentile_ns(samples, pct) as f64 / 1_000_000_000.0;
                body.push_str(&format!(
                    "{METRIC_SUBSYSTEM}_http_latency_seconds{{route=\"{route}\",quantile=\"{label}\"}} {value:.9}\n"
                ));
            }
        }
        body
    }
}

pub(crate) fn percentile_ns(values: &[u64], pct: f64) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut v = values.to_vec();
    v.sort_unstable();
    let idx = ((v.len() as f64 - 1.0) * pct).round() as usize;
    v[idx]
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_empty_is_zero() {
        assert_eq!(percentile_ns(&[], 0.95), 0);
    }

    #[test]
    fn percentile_picks_upper_samples() {
        let samples: Vec<u64> = (1..=100).collect();
        assert_eq!(percentile_ns(&samples, 0.5), 51);
        assert_eq!(percentile_ns(&samples, 0.99), 99);
    }

    #[tokio::test]
    async fn render_includes_observed_routes() {
        let metrics = RequestMetrics::default();
        metrics
            .observe_request("/v1/rehab", StatusCode::CREATED, Duration::from_millis(12))
            .await;
        let body = metrics.render().await;
        assert!(body.contains("motus_http_requests_total{route=\"/v1/rehab\",status=\"201\"} 1"));
        assert!(body.contains("quantile=\"0.95\""));
    }
}

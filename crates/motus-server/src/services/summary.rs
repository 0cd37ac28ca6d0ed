// SPDX-License-Identifier: Apache-2.0

//! Narrative generation seam. The HTTP engine talks to an external
//! text-generation service; the template engine renders deterministic copy
//! locally and backs tests and keyless demo deployments.

use async_trait::async_trait;
use motus_model::{Audience, ClearanceDecision, SurgicalSide};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summary request failed: {0}")]
    Transport(String),
    #[error("summary service returned status {0}")]
    Status(u16),
    #[error("summary response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest {
    pub athlete_name: String,
    pub surgical_side: SurgicalSide,
    pub limb_symmetry_score: f64,
    pub cleared: bool,
    pub concerns: Vec<String>,
    pub recommended_exercises: Vec<String>,
}

/// One narrative per audience, plus whatever raw payload the model returned.
#[derive(Debug, Clone)]
pub struct SummaryBundle {
    pub athlete_summary: String,
    pub parent_summary: String,
    pub clinician_summary: String,
    pub raw_model_output: Option<Value>,
}

#[async_trait]
pub trait SummaryEngine: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryBundle, SummaryError>;

    async fn rewrite(
        &self,
        audience: Audience,
        tone: &str,
        source_text: &str,
    ) -> Result<String, SummaryError>;
}

#[derive(Debug, Deserialize)]
struct SummaryWireResponse {
    athlete_summary: String,
    parent_summary: String,
    clinician_summary: String,
    #[serde(default)]
    raw: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RewriteWireResponse {
    rewritten_text: String,
}

pub struct HttpSummaryEngine {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpSummaryEngine {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SummaryError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummaryError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, SummaryError> {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));
        let mut request = self.http.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| SummaryError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SummaryError::Status(status.as_u16()));
        }
        response
            .json::<R>()
            .await
            .map_err(|e| SummaryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SummaryEngine for HttpSummaryEngine {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryBundle, SummaryError> {
        let wire: SummaryWireResponse = self.post_json("/v1/summaries", request).await?;
        Ok(SummaryBundle {
            athlete_summary: wire.athlete_summary,
            parent_summary: wire.parent_summary,
            clinician_summary: wire.clinician_summary,
            raw_model_output: wire.raw,
        })
    }

    async fn rewrite(
        &self,
        audience: Audience,
        tone: &str,
        source_text: &str,
    ) -> Result<String, SummaryError> {
        let body = json!({
            "audience": audience,
            "tone": tone,
            "source_text": source_text,
        });
        let wire: RewriteWireResponse = self.post_json("/v1/rewrites", &body).await?;
        Ok(wire.rewritten_text)
    }
}

/// Deterministic local narratives. No network, no model, stable output.
#[derive(Debug, Default)]
pub struct TemplateSummaryEngine;

#[async_trait]
impl SummaryEngine for TemplateSummaryEngine {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryBundle, SummaryError> {
        let pct = request.limb_symmetry_score * 100.0;
        let side = request.surgical_side.as_str();
        let status = if request.cleared {
            "met the clearance criteria"
        } else {
            "has not yet met the clearance criteria"
        };
        let athlete_summary = format!(
            "Your {side}-side symmetry is at {pct:.0}%. You {status} for return to sport."
        );
        let parent_summary = format!(
            "{} {status} this session; the care team will keep the home plan updated.",
            request.athlete_name
        );
        let mut clinician_summary = format!(
            "LSI {pct:.0}% ({side} surgical side); cleared={}.",
            request.cleared
        );
        if !request.concerns.is_empty() {
            clinician_summary.push_str(&format!(" Concerns: {}.", request.concerns.join("; ")));
        }
        Ok(SummaryBundle {
            athlete_summary,
            parent_summary,
            clinician_summary,
            raw_model_output: Some(json!({
                "engine": "template",
                "inputs": request,
            })),
        })
    }

    async fn rewrite(
        &self,
        audience: Audience,
        tone: &str,
        source_text: &str,
    ) -> Result<String, SummaryError> {
        Ok(format!(
            "[{} / {tone}] {source_text}",
            audience.as_str()
        ))
    }
}

/// An engine that always fails, for exercising the 502 path in tests.
#[derive(Debug, Default)]
pub struct FailingSummaryEngine;

#[async_trait]
impl SummaryEngine for FailingSummaryEngine {
    async fn summarize(&self, _request: &SummaryRequest) -> Result<SummaryBundle, SummaryError> {
        Err(SummaryError::Status(503))
    }

    async fn rewrite(
        &self,
        _audience: Audience,
        _tone: &str,
        _source_text: &str,
    ) -> Result<String, SummaryError> {
        Err(SummaryError::Status(503))
    }
}

/// Build the summary request for a scored session.
pub fn summary_request_for(
    athlete_name: &str,
    surgical_side: SurgicalSide,
    decision: &ClearanceDecision,
) -> SummaryRequest {
    SummaryRequest {
        athlete_name: athlete_name.to_string(),
        surgical_side,
        limb_symmetry_score: decision.limb_symmetry_score,
        cleared: decision.cleared,
        concerns: decision.concerns.clone(),
        recommended_exercises: decision.recommended_exercises.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn template_engine_mentions_score_and_decision() {
        let request = SummaryRequest {
            athlete_name: "Ada".to_string(),
            surgical_side: SurgicalSide::Left,
            limb_symmetry_score: 0.92,
            cleared: true,
            concerns: Vec::new(),
            recommended_exercises: Vec::new(),
        };
        let bundle = TemplateSummaryEngine
            .summarize(&request)
            .await
            .expect("template summarize");
        assert!(bundle.athlete_summary.contains("92%"));
        assert!(bundle.clinician_summary.contains("cleared=true"));
        assert!(bundle.raw_model_output.is_some());
    }

    #[tokio::test]
    async fn template_rewrite_tags_audience_and_tone() {
        let text = TemplateSummaryEngine
            .rewrite(Audience::Parent, "reassuring", "Quad deficit persists.")
            .await
            .expect("rewrite");
        assert!(text.starts_with("[parent / reassuring]"));
    }
}

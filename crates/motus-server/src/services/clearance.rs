// SPDX-License-Identifier: Apache-2.0

//! Rehab clearance evaluation: score the session, generate narratives, and
//! persist the assessment with its videos in one transaction. A summary-engine
//! failure aborts the whole evaluation; nothing is written.

use crate::services::summary::{summary_request_for, SummaryError};
use crate::AppState;
use chrono::Utc;
use motus_api::CreateRehabAssessmentDto;
use motus_model::{
    evaluate_clearance, AthleteId, RehabAssessment, RehabAssessmentId, RehabVideo, RehabVideoId,
    StrengthMetrics, SymmetryMetrics,
};
use motus_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClearanceError {
    #[error("athlete not found: {0}")]
    AthleteMissing(String),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ClearanceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity: "athlete", id } => Self::AthleteMissing(id),
            other => Self::Store(other),
        }
    }
}

pub async fn evaluate_rehab_clearance(
    state: &AppState,
    athlete_id: AthleteId,
    dto: CreateRehabAssessmentDto,
) -> Result<RehabAssessment, ClearanceError> {
    let athlete = {
        let store = state.store.lock().await;
        store.get_athlete(&athlete_id)?
    };

    let symmetry = dto.limb_symmetry.unwrap_or_else(SymmetryMetrics::default);
    let strength = dto.strength.unwrap_or_else(StrengthMetrics::default);
    let decision = evaluate_clearance(&symmetry, &strength);

    let request = summary_request_for(&athlete.name, dto.surgical_side, &decision);
    let bundle = state.summary.summarize(&request).await?;

    let now = Utc::now();
    let assessment_id = RehabAssessmentId::generate();
    let assessment = RehabAssessment {
        id: assessment_id.clone(),
        athlete_id,
        session_date: dto.session_date.unwrap_or(now),
        surgical_side: dto.surgical_side,
        limb_symmetry_score: decision.limb_symmetry_score,
        cleared: decision.cleared,
        concerns: decision.concerns,
        recommended_exercises: decision.recommended_exercises,
        athlete_summary: bundle.athlete_summary,
        parent_summary: bundle.parent_summary,
        clinician_summary: bundle.clinician_summary,
        raw_model_output: bundle.raw_model_output,
        created_at: now,
    };
    let videos: Vec<RehabVideo> = dto
        .videos
        .iter()
        .map(|v| RehabVideo {
            // Client-minted ids were validated with the body; absent ones are
            // generated here.
            id: v
                .id
                .as_deref()
                .and_then(|raw| RehabVideoId::parse(raw).ok())
                .unwrap_or_else(RehabVideoId::generate),
            rehab_assessment_id: assessment_id.clone(),
            test_type: v.test_type,
            url: v.url.clone(),
            captured_at: v.captured_at,
        })
        .collect();

    {
        let store = state.store.lock().await;
        store.insert_rehab_assessment(&assessment, &videos)?;
    }
    tracing::info!(
        assessment = %assessment.id,
        score = assessment.limb_symmetry_score,
        cleared = assessment.cleared,
        "rehab clearance evaluated"
    );
    Ok(assessment)
}

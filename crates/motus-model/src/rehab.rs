// SPDX-License-Identifier: Apache-2.0

use crate::enums::{RehabTestType, SurgicalSide};
use crate::ids::{AthleteId, RehabAssessmentId, RehabVideoId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One post-injury rehab evaluation. `limb_symmetry_score` is a ratio in
/// [0, 1]; `concerns` and `recommended_exercises` are structured lists, never
/// JSON-encoded strings, at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabAssessment {
    pub id: RehabAssessmentId,
    pub athlete_id: AthleteId,
    pub session_date: DateTime<Utc>,
    pub surgical_side: SurgicalSide,
    pub limb_symmetry_score: f64,
    pub cleared: bool,
    pub concerns: Vec<String>,
    pub recommended_exercises: Vec<String>,
    pub athlete_summary: String,
    pub parent_summary: String,
    pub clinician_summary: String,
    pub raw_model_output: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// One uploaded clip per test type, owned by a rehab assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RehabVideo {
    pub id: RehabVideoId,
    pub rehab_assessment_id: RehabAssessmentId,
    pub test_type: RehabTestType,
    pub url: String,
    pub captured_at: DateTime<Utc>,
}

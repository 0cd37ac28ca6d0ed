// SPDX-License-Identifier: Apache-2.0

use crate::ids::{AthleteId, InterventionId, MovementAssessmentId, RiskSnapshotId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scored movement-screen session. Owns its interventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementAssessment {
    pub id: MovementAssessmentId,
    pub athlete_id: AthleteId,
    pub session_date: DateTime<Utc>,
    pub screen_type: String,
    pub score: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Recommended action tied to one movement assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: InterventionId,
    pub movement_assessment_id: MovementAssessmentId,
    pub title: String,
    pub detail: Option<String>,
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
}

/// Point-in-time risk score for an athlete; the series is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSnapshot {
    pub id: RiskSnapshotId,
    pub athlete_id: AthleteId,
    pub captured_at: DateTime<Utc>,
    pub risk_score: f64,
    pub risk_band: RiskBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    /// Band boundaries: [0, 0.33) low, [0.33, 0.66) moderate, [0.66, 1] high.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 0.33 {
            Self::Low
        } else if score < 0.66 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(RiskBand::from_score(0.0), RiskBand::Low);
        assert_eq!(RiskBand::from_score(0.329), RiskBand::Low);
        assert_eq!(RiskBand::from_score(0.33), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(0.659), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(0.66), RiskBand::High);
        assert_eq!(RiskBand::from_score(1.0), RiskBand::High);
    }
}

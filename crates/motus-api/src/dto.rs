// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use chrono::{DateTime, NaiveDate, Utc};
use motus_model::{
    Athlete, Audience, RehabAssessment, RehabTestType, RehabVideo, Sex, StrengthMetrics,
    SurgicalSide, SymmetryMetrics,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// One field-level validation failure, rendered into `details.field_errors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn validation_error(errors: &[FieldError]) -> ApiError {
    ApiError::validation_failed(json!(errors))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateAthleteDto {
    pub name: String,
    pub sport: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    pub sex: Sex,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateAthleteDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if Athlete::validate_name(&self.name).is_err() {
            errors.push(FieldError::new("name", "must be non-empty and bounded"));
        }
        if self.sport.trim().is_empty() {
            errors.push(FieldError::new("sport", "must be non-empty"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(validation_error(&errors))
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAthleteDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateAthleteDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            if Athlete::validate_name(name).is_err() {
                return Err(validation_error(&[FieldError::new(
                    "name",
                    "must be non-empty and bounded",
                )]));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateContactDto {
    pub name: String,
    pub relationship: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl CreateContactDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "must be non-empty"));
        }
        if self.relationship.trim().is_empty() {
            errors.push(FieldError::new("relationship", "must be non-empty"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(validation_error(&errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMovementAssessmentDto {
    pub athlete_id: String,
    #[serde(default)]
    pub session_date: Option<DateTime<Utc>>,
    pub screen_type: String,
    pub score: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateMovementAssessmentDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.screen_type.trim().is_empty() {
            errors.push(FieldError::new("screen_type", "must be non-empty"));
        }
        if !self.score.is_finite() || self.score < 0.0 {
            errors.push(FieldError::new("score", "must be a non-negative number"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(validation_error(&errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateInterventionDto {
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
}

impl CreateInterventionDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(validation_error(&[FieldError::new(
                "title",
                "must be non-empty",
            )]));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRiskSnapshotDto {
    pub risk_score: f64,
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
}

impl CreateRiskSnapshotDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.risk_score.is_finite() || !(0.0..=1.0).contains(&self.risk_score) {
            return Err(validation_error(&[FieldError::new(
                "risk_score",
                "must be within [0, 1]",
            )]));
        }
        Ok(())
    }
}

/// Client-captured clip. `id` is optional; uploaders that minted an id ahead
/// of the request may supply it, otherwise the server generates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRehabVideoDto {
    #[serde(default)]
    pub id: Option<String>,
    pub test_type: RehabTestType,
    pub url: String,
    pub captured_at: DateTime<Utc>,
}

/// Body of `POST /v1/rehab`. At least one captured video is required; the
/// metric blocks are optional and default to "not captured".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRehabAssessmentDto {
    pub athlete_id: String,
    pub surgical_side: SurgicalSide,
    #[serde(default)]
    pub session_date: Option<DateTime<Utc>>,
    pub videos: Vec<CreateRehabVideoDto>,
    #[serde(default)]
    pub limb_symmetry: Option<SymmetryMetrics>,
    #[serde(default)]
    pub strength: Option<StrengthMetrics>,
}

impl CreateRehabAssessmentDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.videos.is_empty() {
            errors.push(FieldError::new("videos", "at least one video is required"));
        }
        for (idx, video) in self.videos.iter().enumerate() {
            if video.url.trim().is_empty() {
                errors.push(FieldError::new(
                    &format!("videos[{idx}].url"),
                    "must be non-empty",
                ));
            }
            if let Some(id) = &video.id {
                if motus_model::RehabVideoId::parse(id).is_err() {
                    errors.push(FieldError::new(
                        &format!("videos[{idx}].id"),
                        "must be a well-formed identifier",
                    ));
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(validation_error(&errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRewriteDto {
    #[serde(default)]
    pub movement_assessment_id: Option<String>,
    pub audience: Audience,
    pub tone: String,
    pub source_text: String,
}

impl CreateRewriteDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.tone.trim().is_empty() {
            errors.push(FieldError::new("tone", "must be non-empty"));
        }
        if self.source_text.trim().is_empty() {
            errors.push(FieldError::new("source_text", "must be non-empty"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(validation_error(&errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserDto {
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub athlete_id: Option<String>,
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            errors.push(FieldError::new("email", "must be a plausible address"));
        }
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "must be non-empty"));
        }
        if self.role.trim().is_empty() {
            errors.push(FieldError::new("role", "must be non-empty"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(validation_error(&errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabHistoryResponseDto {
    pub assessments: Vec<RehabAssessment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabDetailResponseDto {
    pub assessment: RehabAssessment,
    pub athlete: Athlete,
    pub videos: Vec<RehabVideo>,
}

/// One fabricated wearable packet. `simulated` is always true; demo data must
/// never be mistakable for a hardware feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearableSampleDto {
    pub captured_at: DateTime<Utc>,
    pub heart_rate_bpm: f64,
    pub acceleration_g: f64,
    pub load_au: f64,
    pub signal_quality: f64,
    pub trust_grade: String,
    pub simulated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearableResponseDto {
    pub athlete_id: String,
    pub samples: Vec<WearableSampleDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rehab_body_requires_videos() {
        let dto = CreateRehabAssessmentDto {
            athlete_id: "a1".to_string(),
            surgical_side: SurgicalSide::Left,
            session_date: None,
            videos: Vec::new(),
            limb_symmetry: None,
            strength: None,
        };
        let err = dto.validate().expect_err("zero videos must fail");
        assert_eq!(err.code, crate::ApiErrorCode::ValidationFailed);
    }

    #[test]
    fn video_id_is_optional_on_ingest() {
        let raw = r#"{
            "athlete_id": "a1",
            "surgical_side": "left",
            "videos": [
                {"id": "v1", "test_type": "squat", "url": "https://cdn.example/v.mp4",
                 "captured_at": "2026-08-20T10:00:00Z"},
                {"test_type": "lunge", "url": "https://cdn.example/w.mp4",
                 "captured_at": "2026-08-20T10:01:00Z"}
            ]
        }"#;
        let dto: CreateRehabAssessmentDto = serde_json::from_str(raw).expect("body with video id");
        assert!(dto.validate().is_ok());
        assert_eq!(dto.videos[0].id.as_deref(), Some("v1"));
        assert_eq!(dto.videos[1].id, None);
    }

    #[test]
    fn padded_video_id_fails_validation() {
        let dto = CreateRehabAssessmentDto {
            athlete_id: "a1".to_string(),
            surgical_side: SurgicalSide::Left,
            session_date: None,
            videos: vec![CreateRehabVideoDto {
                id: Some(" v1 ".to_string()),
                test_type: RehabTestType::Squat,
                url: "https://cdn.example/v.mp4".to_string(),
                captured_at: Utc::now(),
            }],
            limb_symmetry: None,
            strength: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"{"athlete_id":"a1","surgical_side":"left","videos":[],"bogus":1}"#;
        assert!(serde_json::from_str::<CreateRehabAssessmentDto>(raw).is_err());
    }

    #[test]
    fn risk_score_bounds() {
        let ok = CreateRiskSnapshotDto {
            risk_score: 0.4,
            captured_at: None,
        };
        assert!(ok.validate().is_ok());
        let bad = CreateRiskSnapshotDto {
            risk_score: 1.2,
            captured_at: None,
        };
        assert!(bad.validate().is_err());
    }
}

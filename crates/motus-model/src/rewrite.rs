// SPDX-License-Identifier: Apache-2.0

use crate::enums::Audience;
use crate::ids::{MovementAssessmentId, RewriteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored rewrite of a clinical message for a target audience and tone,
/// optionally anchored to a movement assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceRewrite {
    pub id: RewriteId,
    pub movement_assessment_id: Option<MovementAssessmentId>,
    pub audience: Audience,
    pub tone: String,
    pub source_text: String,
    pub rewritten_text: String,
    pub created_at: DateTime<Utc>,
}

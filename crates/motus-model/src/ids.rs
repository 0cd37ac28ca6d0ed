// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ID_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
    InvalidValue(&'static str, String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::InvalidValue(name, value) => write!(f, "{name} has no variant {value:?}"),
        }
    }
}

impl std::error::Error for ParseError {}

fn validated(field: &'static str, input: &str) -> Result<String, ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty(field));
    }
    if input.trim() != input {
        return Err(ParseError::Trimmed(field));
    }
    if input.len() > ID_MAX_LEN {
        return Err(ParseError::TooLong(field, ID_MAX_LEN));
    }
    Ok(input.to_string())
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $field:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(input: &str) -> Result<Self, ParseError> {
                validated($field, input).map(Self)
            }

            /// Mint a fresh random identifier for a newly created row.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id!(AthleteId, "athlete_id");
entity_id!(ContactId, "contact_id");
entity_id!(MovementAssessmentId, "movement_assessment_id");
entity_id!(RiskSnapshotId, "risk_snapshot_id");
entity_id!(RehabAssessmentId, "rehab_assessment_id");
entity_id!(RehabVideoId, "rehab_video_id");
entity_id!(InterventionId, "intervention_id");
entity_id!(RewriteId, "rewrite_id");
entity_id!(UserId, "user_id");

// SPDX-License-Identifier: Apache-2.0

use crate::ids::ParseError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Unspecified,
}

impl Sex {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unspecified => "unspecified",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        match input {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unspecified" => Ok(Self::Unspecified),
            other => Err(ParseError::InvalidValue("sex", other.to_string())),
        }
    }
}

/// Which limb was operated on; the contralateral limb is the symmetry baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurgicalSide {
    Left,
    Right,
}

impl SurgicalSide {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        match input {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(ParseError::InvalidValue("surgical_side", other.to_string())),
        }
    }
}

/// One captured clip per test type is expected in a rehab session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RehabTestType {
    SingleLegHop,
    TripleHop,
    Squat,
    Lunge,
}

impl RehabTestType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleLegHop => "single_leg_hop",
            Self::TripleHop => "triple_hop",
            Self::Squat => "squat",
            Self::Lunge => "lunge",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        match input {
            "single_leg_hop" => Ok(Self::SingleLegHop),
            "triple_hop" => Ok(Self::TripleHop),
            "squat" => Ok(Self::Squat),
            "lunge" => Ok(Self::Lunge),
            other => Err(ParseError::InvalidValue("test_type", other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Athlete,
    Parent,
    Clinician,
}

impl Audience {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Athlete => "athlete",
            Self::Parent => "parent",
            Self::Clinician => "clinician",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        match input {
            "athlete" => Ok(Self::Athlete),
            "parent" => Ok(Self::Parent),
            "clinician" => Ok(Self::Clinician),
            other => Err(ParseError::InvalidValue("audience", other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for t in [
            RehabTestType::SingleLegHop,
            RehabTestType::TripleHop,
            RehabTestType::Squat,
            RehabTestType::Lunge,
        ] {
            assert_eq!(RehabTestType::parse(t.as_str()), Ok(t));
        }
        assert!(RehabTestType::parse("vertical_jump").is_err());
        assert_eq!(SurgicalSide::parse("left"), Ok(SurgicalSide::Left));
        assert!(SurgicalSide::parse("bilateral").is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&RehabTestType::SingleLegHop).expect("serialize");
        assert_eq!(json, "\"single_leg_hop\"");
    }
}

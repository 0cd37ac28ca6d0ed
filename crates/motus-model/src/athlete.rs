// SPDX-License-Identifier: Apache-2.0

use crate::enums::Sex;
use crate::ids::{AthleteId, ContactId, ParseError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LEN: usize = 256;

/// Root entity: one tracked athlete. Rows are never hard-deleted; an archived
/// athlete stays referenceable by its assessments and snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: AthleteId,
    pub name: String,
    pub sport: String,
    pub position: Option<String>,
    pub team: Option<String>,
    pub sex: Sex,
    pub date_of_birth: NaiveDate,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Athlete {
    pub fn validate_name(name: &str) -> Result<(), ParseError> {
        if name.trim().is_empty() {
            return Err(ParseError::Empty("name"));
        }
        if name.len() > NAME_MAX_LEN {
            return Err(ParseError::TooLong("name", NAME_MAX_LEN));
        }
        Ok(())
    }
}

/// Guardian or other relation attached to exactly one athlete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteContact {
    pub id: ContactId,
    pub athlete_id: AthleteId,
    pub name: String,
    pub relationship: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation() {
        assert!(Athlete::validate_name("Ada Imoh").is_ok());
        assert!(Athlete::validate_name("   ").is_err());
        assert!(Athlete::validate_name(&"x".repeat(NAME_MAX_LEN + 1)).is_err());
    }
}

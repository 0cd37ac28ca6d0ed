// SPDX-License-Identifier: Apache-2.0

use crate::ids::{AthleteId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login account, optionally linked to one athlete profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub athlete_id: Option<AthleteId>,
    pub created_at: DateTime<Utc>,
}

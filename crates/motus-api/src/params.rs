// SPDX-License-Identifier: Apache-2.0

//! Query-string validation. Out-of-range values are rejected, never clamped,
//! so callers learn about bad requests instead of silently getting fewer rows.

use crate::errors::ApiError;
use std::collections::BTreeMap;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const MAX_HISTORY_LIMIT: usize = 50;

pub const DEFAULT_WEARABLE_COUNT: usize = 30;
pub const MAX_WEARABLE_COUNT: usize = 120;

fn parse_bounded(
    query: &BTreeMap<String, String>,
    name: &str,
    default: usize,
    max: usize,
) -> Result<usize, ApiError> {
    let Some(raw) = query.get(name) else {
        return Ok(default);
    };
    let value = raw
        .parse::<usize>()
        .map_err(|_| ApiError::invalid_param(name, raw))?;
    if value == 0 || value > max {
        return Err(ApiError::invalid_param(name, raw));
    }
    Ok(value)
}

/// `limit` for history/list endpoints: default 10, accepted range 1..=50.
pub fn parse_history_limit(query: &BTreeMap<String, String>) -> Result<usize, ApiError> {
    parse_bounded(query, "limit", DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT)
}

/// `count` for the wearable demo endpoint: default 30, accepted range 1..=120.
pub fn parse_wearable_count(query: &BTreeMap<String, String>) -> Result<usize, ApiError> {
    parse_bounded(query, "count", DEFAULT_WEARABLE_COUNT, MAX_WEARABLE_COUNT)
}

/// Optional exact-match `team` filter for athlete listings.
pub fn parse_team_filter(query: &BTreeMap<String, String>) -> Result<Option<String>, ApiError> {
    match query.get("team") {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Err(ApiError::invalid_param("team", raw)),
        Some(raw) => Ok(Some(raw.clone())),
    }
}

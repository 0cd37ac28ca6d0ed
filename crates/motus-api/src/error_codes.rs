// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Stable machine-readable error codes carried in every error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    ValidationFailed,
    InvalidQueryParameter,
    InvalidPathParameter,
    NotFound,
    Unauthorized,
    RequestRejectedByPolicy,
    SummaryServiceUnavailable,
    Timeout,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::InvalidQueryParameter => "invalid_query_parameter",
            Self::InvalidPathParameter => "invalid_path_parameter",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::RequestRejectedByPolicy => "request_rejected_by_policy",
            Self::SummaryServiceUnavailable => "summary_service_unavailable",
            Self::Timeout => "timeout",
            Self::Internal => "internal",
        }
    }
}

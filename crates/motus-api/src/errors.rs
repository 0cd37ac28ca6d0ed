// SPDX-License-Identifier: Apache-2.0

use crate::error_codes::ApiErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "invalid", "value": value}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn invalid_path(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidPathParameter,
            format!("invalid path parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "invalid", "value": value}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn validation_failed(field_errors: Value) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "validation failed",
            json!({"field_errors": field_errors}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn malformed_body(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "request body could not be parsed",
            json!({"reason": reason}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{entity} not found"),
            json!({"entity": entity, "id": id}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn unauthorized(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::Unauthorized,
            reason.to_string(),
            json!({}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn summary_unavailable(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::SummaryServiceUnavailable,
            "summary engine unavailable",
            json!({"reason": reason}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn timeout() -> Self {
        Self::new(
            ApiErrorCode::Timeout,
            "request timed out",
            json!({}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            ApiErrorCode::Internal,
            "internal error",
            json!({}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = request_id.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape_is_stable() {
        let err = ApiError::invalid_param("limit", "51").with_request_id("req-1");
        let value = serde_json::to_value(&err).expect("serialize");
        assert_eq!(value["code"], "invalid_query_parameter");
        assert_eq!(value["request_id"], "req-1");
        assert!(value["details"]["field_errors"].is_array());
    }
}

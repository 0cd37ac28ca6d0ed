// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

/// Server policy knobs. Defaults suit local/demo use; production overrides
/// arrive via environment variables parsed in `main`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub max_uri_bytes: usize,
    pub max_header_bytes: usize,
    pub request_timeout: Duration,
    pub require_api_key: bool,
    pub allowed_api_keys: Vec<String>,
    pub summary_base_url: Option<String>,
    pub summary_api_key: Option<String>,
    pub summary_timeout: Duration,
    pub enable_wearable_sim: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            max_uri_bytes: 2048,
            max_header_bytes: 16 * 1024,
            request_timeout: Duration::from_secs(5),
            require_api_key: false,
            allowed_api_keys: Vec::new(),
            summary_base_url: None,
            summary_api_key: None,
            summary_timeout: Duration::from_secs(10),
            enable_wearable_sim: true,
        }
    }
}

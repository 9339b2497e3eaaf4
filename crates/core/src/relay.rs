//! Wire types for the relay HTTP contract.
//!
//! Shared by the relay client (`lookout-providers`) and the relay server
//! (`lookout-gateway`) so both sides agree on field names byte for byte.
//!
//! - `POST /api/find-object`: [`FindObjectRequest`] → [`FindObjectResponse`]
//! - `POST /api/analyze`:     [`AnalyzeRequest`] → [`AnalyzeResponse`]
//! - `ANY  /api/test`:        [`ProbeResponse`]
//!
//! Failures come back as [`ErrorResponse`] with a non-2xx status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FIND_OBJECT_PATH: &str = "/api/find-object";
pub const ANALYZE_PATH: &str = "/api/analyze";
pub const PROBE_PATH: &str = "/api/test";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindObjectRequest {
    /// Base64-encoded image
    #[serde(default)]
    pub image: String,

    /// What the user is looking for
    #[serde(default)]
    pub object_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindObjectResponse {
    pub success: bool,

    #[serde(default)]
    pub found: bool,

    #[serde(default)]
    pub guidance: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,

    #[serde(default)]
    pub answer: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of every non-2xx relay response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,

    /// Underlying cause, only on internal errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

//! # Response Envelope
//!
//! When an operation is exposed remotely, it maps to a synchronous
//! request/response call returning `{success, error?, data?}`. This module
//! is that envelope; no richer wire format is mandated by the ledger.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The `{success, error?, data?}` envelope.
///
/// ## Serialized Shapes
/// ```json
/// { "success": true,  "data": { ... } }
/// { "success": false, "error": "payment exceeds remaining balance of 60000" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying data.
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed response carrying a display message.
    pub fn fail(error: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T> From<Result<T, EngineError>> for ApiResponse<T> {
    fn from(result: Result<T, EngineError>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(err) => ApiResponse::fail(err.to_string()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

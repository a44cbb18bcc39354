//! JSON-lines envelope: one request object per line in, one response per line out.

use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One request line
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Correlation id, echoed in the response
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Error payload of a failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable kind
    pub kind: String,
    pub message: String,
}

/// One response line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// `None` only when the request line could not be read at all
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn ok(id: u64, result: Value) -> Self {
        Self {
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<u64>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(ErrorBody {
                kind: kind.into(),
                message: message.into(),
            }),
        }
    }

    pub fn from_service_error(id: u64, error: &ServiceError) -> Self {
        Self::error(Some(id), error.kind(), error.to_string())
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Error kinds produced by the RPC layer itself
pub mod kinds {
    pub const PARSE_ERROR: &str = "parse_error";
    pub const UNKNOWN_METHOD: &str = "unknown_method";
    pub const INVALID_PARAMS: &str = "invalid_params";
    pub const NOT_FOUND: &str = "not_found";
}

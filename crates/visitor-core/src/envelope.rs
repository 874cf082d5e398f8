//! HTTP-style response envelope produced by the counter service.
//!
//! The shape matches an API-gateway proxy response (`statusCode`, `headers`,
//! `body`) so it can be handed to a function runtime as-is, and it is turned
//! into a real HTTP response by the axum adapter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Placeholder used when a store error renders to an empty string.
const FALLBACK_ERROR: &str = "store operation failed";

/// Success body: `{"count": N}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBody {
    pub count: u64,
}

/// Failure body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Tagged result of one counter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Post-increment value of the counter record.
    Success { count: u64 },
    /// The store rejected or failed the increment; the message is diagnostic only.
    StoreFailure { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "success",
            Outcome::StoreFailure { .. } => "store_failure",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Outcome::Success { .. } => 200,
            Outcome::StoreFailure { .. } => 500,
        }
    }

    /// Render the outcome into the wire envelope.
    pub fn into_response(self) -> ApiResponse {
        let status_code = self.status_code();
        let body = match self {
            Outcome::Success { count } => json_body(&CountBody { count }),
            Outcome::StoreFailure { message } => {
                let error = if message.trim().is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                };
                json_body(&ErrorBody { error })
            }
        };
        ApiResponse::json(status_code, body)
    }
}

// Serializing these two structs cannot fail (string keys, plain values),
// but fall back to a static body rather than panic.
fn json_body<T: Serialize>(v: &T) -> String {
    serde_json::to_string(v).unwrap_or_else(|_| format!("{{\"error\":\"{FALLBACK_ERROR}\"}}"))
}

/// Proxy-style response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    /// JSON response readable from any origin.
    pub fn json(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(HEADER_ALLOW_ORIGIN.to_string(), "*".to_string());
        headers.insert(HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn success_envelope() {
        let resp = Outcome::Success { count: 7 }.into_response();
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
        assert_eq!(resp.header(HEADER_CONTENT_TYPE), Some(CONTENT_TYPE_JSON));

        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(body, serde_json::json!({ "count": 7 }));
    }

    #[test]
    fn failure_envelope_keeps_message() {
        let resp = Outcome::StoreFailure {
            message: "store unavailable: connection refused".into(),
        }
        .into_response();
        assert_eq!(resp.status_code, 500);

        let body: ErrorBody = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(body.error, "store unavailable: connection refused");
    }

    #[test]
    fn empty_failure_message_is_replaced() {
        let resp = Outcome::StoreFailure { message: "  ".into() }.into_response();
        let body: ErrorBody = serde_json::from_str(&resp.body).unwrap();
        assert!(!body.error.is_empty());
    }

    #[test]
    fn proxy_shape_uses_camel_case() {
        let resp = Outcome::Success { count: 1 }.into_response();
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["statusCode"], 200);
        assert_eq!(v["headers"]["Access-Control-Allow-Origin"], "*");
        assert_eq!(v["body"], "{\"count\":1}");
    }
}

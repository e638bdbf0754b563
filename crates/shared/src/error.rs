//! Backend response envelope and client-side error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Envelope wrapping every `/api/v1/*` response.
///
/// `success == false` marks a business-logic failure even when the HTTP
/// status is 2xx, so the envelope has to be inspected before `data` is used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error detail, present on failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            success: true,
            request_id: None,
            timestamp: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            success: false,
            request_id: None,
            timestamp: None,
            data: None,
            error: None,
        }
    }

    /// Unwrap the envelope of a 2xx response.
    ///
    /// `http_status` is used when the envelope's own `code` is not a valid
    /// status.
    pub fn into_result(self, http_status: u16) -> Result<Option<T>, ApiError> {
        if self.success {
            return Ok(self.data);
        }
        let status = u16::try_from(self.code)
            .ok()
            .filter(|code| (100..600).contains(code))
            .unwrap_or(http_status);
        Err(ApiError::Server {
            status,
            message: envelope_message(&self.message, self.error.as_deref()),
            request_id: self.request_id,
        })
    }
}

fn envelope_message(message: &str, error: Option<&str>) -> String {
    match error {
        Some(detail) if !detail.trim().is_empty() && !message.trim().is_empty() => {
            format!("{message}: {detail}")
        }
        Some(detail) if !detail.trim().is_empty() => detail.to_string(),
        _ if !message.trim().is_empty() => message.to_string(),
        _ => "request failed".to_string(),
    }
}

/// Build a server error from a non-2xx response body.
///
/// Prefers the envelope's message and detail, falls back to the raw body.
pub fn server_error_from_body(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) {
        Ok(envelope) => ApiError::Server {
            status,
            message: envelope_message(&envelope.message, envelope.error.as_deref()),
            request_id: envelope.request_id,
        },
        Err(_) => ApiError::Server {
            status,
            message: if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.trim().to_string()
            },
            request_id: None,
        },
    }
}

/// API error type for client-side use
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection failure, timeout, or an unreadable body.
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx response or an envelope with `success == false`.
    #[error("Server error {status}: {message}")]
    Server {
        status: u16,
        message: String,
        request_id: Option<String>,
    },
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl ApiError {
    /// Whether retrying the same request may succeed without any change.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Server { status, .. } => *status >= 500,
            ApiError::Deserialize(_) => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short message suitable for an inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Network request failed, check your connection".to_string(),
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Deserialize(_) => "Unexpected response from server".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_envelope_yields_data() {
        let envelope: ApiEnvelope<Vec<u32>> = serde_json::from_str(
            r#"{"code":200,"message":"ok","success":true,"requestId":"r-1","data":[1,2]}"#,
        )
        .unwrap();
        assert_eq!(envelope.into_result(200).unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn business_failure_inside_2xx_is_a_server_error() {
        let envelope: ApiEnvelope<Vec<u32>> = serde_json::from_str(
            r#"{"code":403,"message":"permission denied","success":false,"requestId":"r-2"}"#,
        )
        .unwrap();
        let err = envelope.into_result(200).unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 403,
                message: "permission denied".to_string(),
                request_id: Some("r-2".to_string()),
            }
        );
    }

    #[test]
    fn business_code_outside_status_range_falls_back_to_http_status() {
        let envelope: ApiEnvelope<()> = ApiEnvelope::failure(10042, "quota exceeded");
        assert_eq!(envelope.into_result(200).unwrap_err().status(), Some(200));
    }

    #[test]
    fn error_body_prefers_envelope_message() {
        let body = r#"{"code":500,"message":"query failed","success":false,"error":"mongo timeout"}"#;
        let err = server_error_from_body(500, body);
        assert_eq!(err.user_message(), "query failed: mongo timeout");
        assert!(err.is_transient());
    }

    #[test]
    fn error_body_that_is_not_json_is_kept_verbatim() {
        let err = server_error_from_body(502, "Bad Gateway\n");
        assert_eq!(err.to_string(), "Server error 502: Bad Gateway");
    }

    #[test]
    fn network_errors_are_transient() {
        assert!(ApiError::Network("timed out".into()).is_transient());
        assert!(!ApiError::Deserialize("eof".into()).is_transient());
        assert!(!server_error_from_body(404, "").is_transient());
    }
}

//! Error types for Notion API operations.

use crate::types::ApiErrorBody;

/// Error from Notion API operations.
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} {code} - {message}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// API error code (e.g. `object_not_found`).
        code: String,
        /// Error message, or the raw body when it isn't an API error object.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NotionError {
    /// Build an error from a failed response's status and body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(error) => Self::HttpResponse {
                status,
                code: error.code,
                message: error.message,
            },
            Err(_) => Self::HttpResponse {
                status,
                code: "unknown".to_owned(),
                message: body.to_owned(),
            },
        }
    }

    /// HTTP status of a response error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_response_decodes_api_error() {
        let body = r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find database"}"#;
        let err = NotionError::from_response(404, body);

        let NotionError::HttpResponse {
            status,
            code,
            message,
        } = err
        else {
            panic!("expected HttpResponse");
        };
        assert_eq!(status, 404);
        assert_eq!(code, "object_not_found");
        assert_eq!(message, "Could not find database");
    }

    #[test]
    fn test_from_response_keeps_raw_body() {
        let err = NotionError::from_response(502, "Bad Gateway");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "HTTP error: 502 unknown - Bad Gateway");
    }

    #[test]
    fn test_request_error_includes_cause() {
        let cause = ureq::Error::HostNotFound;
        let expected = format!("HTTP request failed: {cause}");
        let err = NotionError::from(cause);
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_json_and_io_errors_include_cause() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = format!("JSON error: {json}");
        assert_eq!(NotionError::from(json).to_string(), expected);

        let io = std::io::Error::other("disk full");
        assert_eq!(NotionError::from(io).to_string(), "I/O error: disk full");
    }
}

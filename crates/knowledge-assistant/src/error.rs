//! Error types for the knowledge assistant

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Knowledge assistant errors
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required secret absent from the environment (fatal at startup)
    #[error("{0} not found in environment or .env file")]
    MissingSecret(String),

    /// Text extraction failed for a single uploaded file
    #[error("Error reading {filename}: {message}")]
    Extraction { filename: String, message: String },

    /// Upload carried a file the assistant does not accept
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Completion service failure (network, API or malformed response)
    #[error("API Error: {0}. Please contact admin.")]
    Completion(String),

    /// Session not found
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Malformed client request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error for one file
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a completion service error
    pub fn completion(message: impl Into<String>) -> Self {
        Self::Completion(message.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::Config(_) | Error::MissingSecret(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error")
            }
            Error::Extraction { .. } => (StatusCode::BAD_REQUEST, "extraction_error"),
            Error::UnsupportedFileType(_) => (StatusCode::BAD_REQUEST, "unsupported_type"),
            Error::Completion(_) => (StatusCode::BAD_GATEWAY, "completion_error"),
            Error::SessionNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Error::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_message_carries_remediation() {
        let err = Error::completion("connection refused");
        assert_eq!(
            err.to_string(),
            "API Error: connection refused. Please contact admin."
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::completion("x").into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::SessionNotFound("abc".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::extraction("a.pdf", "corrupt").into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of the username/password login exchange.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Login request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Login rejected with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("Failed to parse login response: {0}")]
    InvalidBody(#[source] reqwest::Error),

    #[error("Token not found in login response")]
    MissingToken,

    #[error("Login response token cannot be sent as a header value")]
    InvalidToken,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error("Unauthorized - token rejected after re-authentication")]
    Unauthorized,

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token cannot be sent as a header value")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Files not found: {}", display_paths(.0))]
    MissingFiles(Vec<PathBuf>),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncate a response body to avoid logging excessive data
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            _ => ApiError::UnexpectedStatus {
                status,
                body: truncate_body(body),
            },
        }
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            ApiError::Authentication(AuthError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn test_truncate_body_long() {
        let body = "x".repeat(600);
        let truncated = truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = format!("{}é{}", "a".repeat(499), "b".repeat(100));
        let truncated = truncate_body(&body);
        assert!(truncated.starts_with(&"a".repeat(499)));
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        match ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom") {
            ApiError::UnexpectedStatus { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_accessor() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(ApiError::InvalidResponse("x".into()).status(), None);
    }

    #[test]
    fn test_missing_files_message() {
        let err = ApiError::MissingFiles(vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);
        assert_eq!(err.to_string(), "Files not found: a.jpg, b.jpg");
    }
}

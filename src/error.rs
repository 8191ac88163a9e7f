use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

/// Errors raised by the backend API client. The aggregation layer never
/// produces these; only the state containers store and surface them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Classify a non-success HTTP status from the backend.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let message = if body.is_empty() {
            status.to_string()
        } else {
            body
        };
        match status.as_u16() {
            404 => ApiError::NotFound(message),
            400 | 422 => ApiError::Validation(message),
            500..=599 => ApiError::Server(message),
            _ => ApiError::Server(message),
        }
    }

    /// Message suitable for direct display in a dashboard error banner.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // Transport-level failures (connect, timeout, body read) never
        // reached a usable response; everything with a status goes through
        // from_status at the call site instead.
        ApiError::Network(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Network(_) | ApiError::Server(_) => StatusCode::BAD_GATEWAY,
        };
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        let not_found = ApiError::from_status(reqwest::StatusCode::NOT_FOUND, "no student".into());
        assert_eq!(not_found, ApiError::NotFound("no student".into()));

        let validation =
            ApiError::from_status(reqwest::StatusCode::UNPROCESSABLE_ENTITY, "bad id".into());
        assert_eq!(validation, ApiError::Validation("bad id".into()));

        let server = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, String::new());
        assert!(matches!(server, ApiError::Server(_)));
    }

    #[test]
    fn empty_body_falls_back_to_status_text() {
        let err = ApiError::from_status(reqwest::StatusCode::NOT_FOUND, String::new());
        assert_eq!(err, ApiError::NotFound("404 Not Found".into()));
    }
}

//! API error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors returned synchronously to the submitting client.
///
/// These are the only failures a caller ever observes directly; anything
/// that happens after acceptance is reported through the activity log.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field was absent from the submission.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The recipient list contained nothing usable after trimming.
    #[error("No valid recipients supplied")]
    NoRecipients,

    /// The server failed to bind its listen address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    /// The server stopped with a runtime error.
    #[error("Server error: {0}")]
    Server(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingField(_) | Self::NoRecipients => StatusCode::BAD_REQUEST,
            Self::Bind { .. } | Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "status": "Error",
            "msg": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let response = ApiError::MissingField("recipients").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::NoRecipients.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

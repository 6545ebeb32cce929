use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dupfinder::{DetectorError, ErrorKind};
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Request timeout")]
    Timeout,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Inference(_) | ServerError::Internal(_) | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Timeout => "REQUEST_TIMEOUT",
            ServerError::Validation(_) => "VALIDATION_ERROR",
            ServerError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            ServerError::Inference(_) => "INFERENCE_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        });

        (status, body).into_response()
    }
}

impl From<DetectorError> for ServerError {
    fn from(err: DetectorError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::InvalidInput => ServerError::Validation(message),
            ErrorKind::ModelUnavailable => ServerError::ModelUnavailable(message),
            ErrorKind::Inference => ServerError::Inference(message),
            ErrorKind::Configuration => ServerError::Config(message),
        }
    }
}

/// Any body that does not deserialize into the request type is a validation
/// failure: wrong shape, malformed JSON, or a missing JSON content type.
impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dupfinder::{MatchError, SemanticError};

    #[test]
    fn detector_errors_map_to_distinct_statuses() {
        let cases = [
            (
                DetectorError::from(SemanticError::InvalidInput("blank".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (
                DetectorError::from(MatchError::DimensionMismatch { left: 2, right: 3 }),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (
                DetectorError::from(SemanticError::Download("offline".into())),
                StatusCode::SERVICE_UNAVAILABLE,
                "MODEL_UNAVAILABLE",
            ),
            (
                DetectorError::from(SemanticError::Inference("tensor shape".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INFERENCE_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let server_err = ServerError::from(err);
            assert_eq!(server_err.status_code(), status);
            assert_eq!(server_err.error_code(), code);
        }
    }

    #[test]
    fn timeout_is_408_with_its_own_code() {
        assert_eq!(ServerError::Timeout.status_code(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(ServerError::Timeout.error_code(), "REQUEST_TIMEOUT");
    }

    #[test]
    fn error_body_has_code_and_message() {
        let err = ServerError::Validation("texts must not be empty".into());
        let body = serde_json::to_value(ErrorResponse {
            error: ErrorDetail {
                code: err.error_code().to_string(),
                message: err.to_string(),
            },
        })
        .unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Validation failed: texts must not be empty"
        );
    }
}

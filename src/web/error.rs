use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

use crate::predictor::PredictError;

/// Everything a route can fail with. Bodies are always `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("Invalid JSON body")]
    InvalidBody,
    #[error("Content-Type must be application/json")]
    UnsupportedMediaType,
    #[error("Request body too large")]
    PayloadTooLarge,
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Predict(PredictError::FeedbackRequired) => StatusCode::BAD_REQUEST,
            ApiError::Predict(PredictError::Scorer(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Client-facing message. Scorer internals stay in the log.
    fn message(&self) -> String {
        match self {
            ApiError::Predict(PredictError::Scorer(_)) => "Sentiment scorer unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType,
            other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge,
            _ => ApiError::InvalidBody,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Predict(PredictError::Scorer(ref e)) = self {
            error!("Sentiment scorer failed: {}", e);
        }
        let body = serde_json::json!({ "error": self.message() });
        (self.status(), Json(body)).into_response()
    }
}

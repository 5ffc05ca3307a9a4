use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::outbound::webhook::{DeliveryLogError, RegistryError};

/// JSON error body returned by every failing admin API call.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Store errors mapped onto HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let status = match &err {
            RegistryError::InvalidUrl { .. } | RegistryError::NoEventTypes => {
                StatusCode::BAD_REQUEST
            }
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<DeliveryLogError> for ApiError {
    fn from(err: DeliveryLogError) -> Self {
        let status = match &err {
            DeliveryLogError::NotFound(_) => StatusCode::NOT_FOUND,
            DeliveryLogError::AlreadyFinalized(_) => StatusCode::CONFLICT,
            DeliveryLogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Undecodable request bodies surface the same JSON error shape as
/// validated rejections
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

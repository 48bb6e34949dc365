//! Translation of service errors into HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use super::envelope::Envelope;
use crate::domain::errors::{ErrorCode, ServiceError};

const SYSTEM_ERROR_MESSAGE: &str = "An internal error occurred";

#[derive(Debug)]
pub struct ApiError(pub ServiceError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ServiceError::InvalidParameter(format!(
            "request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ServiceError::InvalidParameter(format!(
            "query: {}",
            rejection.body_text()
        )))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(ServiceError::InvalidParameter(format!(
            "path: {}",
            rejection.body_text()
        )))
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidParameter
        | ErrorCode::InsufficientFunds
        | ErrorCode::InsufficientQuantity
        | ErrorCode::InsufficientStock => StatusCode::BAD_REQUEST,
        ErrorCode::DataNotFound => StatusCode::NOT_FOUND,
        ErrorCode::DataDuplicated | ErrorCode::DataInUse => StatusCode::CONFLICT,
        ErrorCode::NotAuthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::SystemError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let message = match code {
            ErrorCode::SystemError => {
                error!("Request failed with system error: {}", self.0);
                SYSTEM_ERROR_MESSAGE.to_string()
            }
            _ => self.0.to_string(),
        };

        (status_for(code), Envelope::fail(code, message)).into_response()
    }
}

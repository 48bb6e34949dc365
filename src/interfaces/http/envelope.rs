use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::errors::ErrorCode;

/// Uniform wrapper around every API response.
///
/// `result` is 0 on success and 1 on failure; `code` carries the numeric
/// [`ErrorCode`] (0 on success). Absent `message` and `body` are omitted.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub result: i32,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(body: T) -> Self {
        Self {
            result: 0,
            code: 0,
            message: None,
            body: Some(body),
        }
    }

    /// Success answered with `201 Created`.
    pub fn created(body: T) -> (StatusCode, Self) {
        (StatusCode::CREATED, Self::ok(body))
    }
}

impl Envelope<()> {
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            result: 0,
            code: 0,
            message: Some(message.into()),
            body: None,
        }
    }

    pub fn fail(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            result: 1,
            code: code.code(),
            message: Some(message.into()),
            body: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_omits_message() {
        let value = serde_json::to_value(Envelope::ok(json!({"id": 1}))).unwrap();
        assert_eq!(value, json!({"result": 0, "code": 0, "body": {"id": 1}}));
    }

    #[test]
    fn test_failure_omits_body() {
        let value = serde_json::to_value(Envelope::fail(ErrorCode::DataNotFound, "Player not found")).unwrap();
        assert_eq!(
            value,
            json!({"result": 1, "code": 1002, "message": "Player not found"})
        );
    }
}

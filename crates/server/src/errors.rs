use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": <title>, "detail": <message>}`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, error: error.into(), detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_storage() {
            // 存储失败：记录日志并以 500 返回原始错误信息
            error!(error = %e, "storage failure");
            return JsonApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                Some(e.to_string()),
            );
        }
        let (status, title) = match e {
            ServiceError::Duplicate(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            ServiceError::Storage(_) | ServiceError::Corrupt(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };
        JsonApiError::new(status, title, Some(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage unavailable: {0}")]
    Storage(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        let dup: JsonApiError = ServiceError::Duplicate(1).into();
        assert_eq!(dup.status, StatusCode::BAD_REQUEST);
        assert_eq!(dup.detail.as_deref(), Some("ID already exists"));

        let missing: JsonApiError = ServiceError::not_found("Item").into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.detail.as_deref(), Some("Item not found"));

        let io: JsonApiError = ServiceError::Storage("permission denied".into()).into();
        assert_eq!(io.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(io.detail.unwrap().contains("permission denied"));

        let corrupt: JsonApiError = ServiceError::Corrupt("bad row".into()).into();
        assert_eq!(corrupt.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

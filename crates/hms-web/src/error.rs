//! HTTP错误映射

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use hms_core::HmsError;
use serde_json::json;
use tracing::{error, warn};

/// 处理器错误，包装核心错误并映射为HTTP状态码
#[derive(Debug)]
pub struct ApiError(pub HmsError);

impl From<HmsError> for ApiError {
    fn from(err: HmsError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            HmsError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HmsError::Validation(msg) => {
                warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            other => {
                // 内部细节只写日志
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

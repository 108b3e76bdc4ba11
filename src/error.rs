//! 统一错误模型
//! 定义控制台的错误类型和错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 角色名为空、重复或不存在
    #[error("{0}")]
    InvalidName(String),

    /// 日期/时间格式包含无效字符
    #[error("{0}")]
    InvalidFormat(String),

    /// 必需的请求参数缺失
    #[error("Required parameter '{0}' missing")]
    MissingParameter(String),

    /// 配置存储写入失败
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidName(_)
            | AppError::InvalidFormat(_)
            | AppError::MissingParameter(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::PersistenceFailure(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户友好的错误消息（不包含文件路径等内部信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidName(msg) => msg.clone(),
            AppError::InvalidFormat(msg) => msg.clone(),
            AppError::MissingParameter(name) => format!("Required parameter '{}' missing", name),
            AppError::PersistenceFailure(_) => "Failed to persist configuration".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Unauthorized => "Authentication failed".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }

    // 便捷方法
    pub fn invalid_name(msg: impl Into<String>) -> Self {
        AppError::InvalidName(msg.into())
    }

    pub fn invalid_format(msg: impl Into<String>) -> Self {
        AppError::InvalidFormat(msg.into())
    }

    pub fn missing_parameter(name: &str) -> Self {
        AppError::MissingParameter(name.to_string())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        AppError::PersistenceFailure(msg.into())
    }
}

/// 错误响应 DTO
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
    pub request_id: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.code(),
                message: self.user_message(),
                request_id,
            },
        };

        if status.is_server_error() {
            tracing::error!(
                code = self.code(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Application error"
            );
        } else {
            tracing::warn!(
                code = self.code(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Request rejected"
            );
        }

        (status, Json(error_response)).into_response()
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::invalid_name("x").code(), 400);
        assert_eq!(AppError::invalid_format("x").code(), 400);
        assert_eq!(AppError::missing_parameter("role").code(), 400);
        assert_eq!(AppError::Unauthorized.code(), 401);
        assert_eq!(AppError::persistence("disk full").code(), 500);
    }

    #[test]
    fn test_missing_parameter_message() {
        let error = AppError::missing_parameter("role");
        assert_eq!(error.user_message(), "Required parameter 'role' missing");
    }

    #[test]
    fn test_user_message_no_sensitive_info() {
        let error = AppError::persistence("/etc/console/roles.ini: permission denied");
        let message = error.user_message();
        assert_eq!(message, "Failed to persist configuration");
        assert!(!message.contains("/etc"));
    }
}

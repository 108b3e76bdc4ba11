//! 当前用户
//! 认证由前置代理完成，代理通过 `X-Remote-User` 头传入用户名

use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const REMOTE_USER_HEADER: &str = "x-remote-user";

/// 已认证的用户名
#[derive(Debug, Clone)]
pub struct RemoteUser(pub String);

impl RemoteUser {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RemoteUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(REMOTE_USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| RemoteUser(s.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}

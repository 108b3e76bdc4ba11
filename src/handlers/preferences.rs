//! 用户偏好的 HTTP 处理器

use crate::{
    auth::RemoteUser, error::AppError, handlers::FormResponse, middleware::AppState,
};
use axum::{
    extract::{Query, State},
    Form,
};
use std::collections::HashMap;
use std::sync::Arc;

/// 展示偏好表单
///
/// 开关切换触发的自动提交也走这里，查询参数中的开关值参与默认值计算。
pub async fn show(
    State(state): State<Arc<AppState>>,
    user: RemoteUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<FormResponse, AppError> {
    let form = state.preference_service.render(user.name(), &params)?;
    Ok(FormResponse::unsubmitted(form))
}

/// 保存偏好
pub async fn save(
    State(state): State<Arc<AppState>>,
    user: RemoteUser,
    Form(params): Form<HashMap<String, String>>,
) -> Result<FormResponse, AppError> {
    let submission = state.preference_service.submit(user.name(), &params)?;
    Ok(FormResponse::from_submission(submission))
}

//! 角色管理的 HTTP 处理器
//! `/permissions` 下的列表、新建、更新与删除

use crate::{
    error::AppError,
    handlers::FormResponse,
    middleware::AppState,
    models::role::{RoleRequest, RoleSummary},
    request::require_param,
    services::{CreateRole, RemoveRole, UpdateRole},
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// 列出所有角色
pub async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let roles: Vec<RoleSummary> = state
        .role_manager()?
        .list()
        .into_iter()
        .map(RoleSummary::from)
        .collect();

    Ok(Json(json!({
        "count": roles.len(),
        "roles": roles,
    })))
}

/// 新建角色表单
pub async fn new_form(State(state): State<Arc<AppState>>) -> Result<FormResponse, AppError> {
    let workflow = CreateRole::new(state.role_manager()?);
    Ok(FormResponse::unsubmitted(workflow.form()))
}

/// 提交新建角色
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RoleRequest>,
) -> Result<FormResponse, AppError> {
    let workflow = CreateRole::new(state.role_manager()?);
    Ok(FormResponse::from_submission(workflow.submit(&req)))
}

/// 编辑角色表单
pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<FormResponse, AppError> {
    let name = require_param(&params, "role")?;
    let workflow = UpdateRole::open(state.role_manager()?, name)?;
    Ok(FormResponse::unsubmitted(workflow.form()))
}

/// 提交角色更新
///
/// `role` 参数先于请求体检查。
pub async fn update(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    body: Result<Json<RoleRequest>, JsonRejection>,
) -> Result<FormResponse, AppError> {
    let name = require_param(&params, "role")?;
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let workflow = UpdateRole::open(state.role_manager()?, name)?;
    Ok(FormResponse::from_submission(workflow.submit(&req)))
}

/// 删除确认表单
pub async fn remove_form(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<FormResponse, AppError> {
    let name = require_param(&params, "role")?;
    let workflow = RemoveRole::open(state.role_manager()?, name)?;
    Ok(FormResponse::unsubmitted(workflow.form()))
}

/// 确认删除
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<FormResponse, AppError> {
    let name = require_param(&params, "role")?;
    let workflow = RemoveRole::open(state.role_manager()?, name)?;
    Ok(FormResponse::from_submission(workflow.submit()))
}

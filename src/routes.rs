//! 路由注册
//! 创建所有路由并应用中间件

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{handlers, middleware::AppState};

/// 表单提交的请求体上限
const MAX_BODY_BYTES: usize = 64 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 角色管理
    let permission_routes = Router::new()
        .route("/permissions", get(handlers::permissions::index))
        .route(
            "/permissions/new",
            get(handlers::permissions::new_form).post(handlers::permissions::create),
        )
        .route(
            "/permissions/update",
            get(handlers::permissions::update_form).post(handlers::permissions::update),
        )
        .route(
            "/permissions/remove",
            get(handlers::permissions::remove_form).post(handlers::permissions::remove),
        );

    // 用户偏好
    let preference_routes = Router::new().route(
        "/preferences",
        get(handlers::preferences::show).post(handlers::preferences::save),
    );

    Router::new()
        .merge(public_routes)
        .merge(permission_routes)
        .merge(preference_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

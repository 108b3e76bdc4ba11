//! HTTP 中间件
//! 应用状态与请求追踪

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::AppError,
    i18n::{DirectoryLocales, IanaTimezones},
    repository::{ConfigBackend, IniFileBackend},
    services::{PreferenceService, RoleManager},
};

/// 应用状态
///
/// 配置后端在请求之间共享；每个请求各自打开自己的 RoleManager。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// roles.ini / config.ini 所在的后端
    pub config_backend: Arc<dyn ConfigBackend>,
    pub preference_service: Arc<PreferenceService>,
}

impl AppState {
    /// 按配置组装文件后端与服务
    pub fn from_config(config: AppConfig) -> Self {
        let config_backend: Arc<dyn ConfigBackend> =
            Arc::new(IniFileBackend::new(&config.storage.config_dir));
        let preference_service = Arc::new(PreferenceService::new(
            Arc::new(IniFileBackend::new(&config.storage.preferences_dir)),
            config_backend.clone(),
            Arc::new(DirectoryLocales::new(&config.i18n.locale_dir)),
            Arc::new(IanaTimezones),
            config.i18n.default_timezone.clone(),
        ));

        Self {
            config,
            config_backend,
            preference_service,
        }
    }

    /// 为当前请求读取角色集合
    pub fn role_manager(&self) -> Result<RoleManager, AppError> {
        RoleManager::open(self.config_backend.clone())
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();

        // 记录指标 - 使用静态字符串
        let status = response.status().as_u16();
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            _ => "OTHER",
        };
        let status_class = match status {
            200..=299 => "2xx",
            300..=399 => "3xx",
            400..=499 => "4xx",
            _ => "5xx",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_class)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        // 在响应头中添加 trace_id
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

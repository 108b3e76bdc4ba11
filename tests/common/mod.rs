//! 测试公共模块
//! 提供测试配置、应用状态与请求辅助函数

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use monitor_console::{
    config::{AppConfig, I18nConfig, LoggingConfig, ServerConfig, StorageConfig},
    i18n::{IanaTimezones, StaticLocales},
    middleware::AppState,
    repository::{ConfigBackend, IniDocument, IniFileBackend, MemoryBackend, ROLES_DOCUMENT},
    routes,
    services::PreferenceService,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

/// 创建测试配置
pub fn create_test_config(root: &Path) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
            graceful_shutdown_timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        storage: StorageConfig {
            config_dir: root.join("config"),
            preferences_dir: root.join("preferences"),
        },
        i18n: I18nConfig {
            locale_dir: root.join("locale"),
            default_timezone: "UTC".to_string(),
        },
    }
}

/// 内存后端组成的应用状态，方便注入故障
pub struct MemoryApp {
    pub roles: Arc<MemoryBackend>,
    pub preferences: Arc<MemoryBackend>,
    pub state: Arc<AppState>,
}

/// 以内存后端创建测试应用状态
pub fn create_memory_app(roles: IniDocument) -> MemoryApp {
    let root = std::env::temp_dir();
    let config = create_test_config(&root);

    let roles = Arc::new(MemoryBackend::new().with_document(ROLES_DOCUMENT, roles));
    let preferences = Arc::new(MemoryBackend::new());
    let preference_service = Arc::new(PreferenceService::new(
        preferences.clone(),
        roles.clone(),
        Arc::new(StaticLocales::new(["de_DE", "fr_FR"])),
        Arc::new(IanaTimezones),
        "UTC",
    ));

    let state = Arc::new(AppState {
        config,
        config_backend: roles.clone() as Arc<dyn ConfigBackend>,
        preference_service,
    });

    MemoryApp {
        roles,
        preferences,
        state,
    }
}

/// 以临时目录中的 INI 文件创建测试应用状态
pub fn create_file_app(root: &Path) -> Arc<AppState> {
    let config = create_test_config(root);
    let config_backend: Arc<dyn ConfigBackend> =
        Arc::new(IniFileBackend::new(&config.storage.config_dir));
    let preference_service = Arc::new(PreferenceService::new(
        Arc::new(IniFileBackend::new(&config.storage.preferences_dir)),
        config_backend.clone(),
        Arc::new(StaticLocales::new(["de_DE"])),
        Arc::new(IanaTimezones),
        config.i18n.default_timezone.clone(),
    ));

    Arc::new(AppState {
        config,
        config_backend,
        preference_service,
    })
}

/// 发送请求并解析 JSON 响应
pub async fn send(state: Arc<AppState>, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let app: Router = routes::create_router(state);
    let response: Response<Body> = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(uri: &str, user: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .header("x-remote-user", user)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// 带两个角色的初始 roles 文档
pub fn sample_roles() -> IniDocument {
    let mut doc = IniDocument::new();
    doc.set("admins", "permissions", "*");
    doc.set("operators", "permissions", "module/monitoring");
    doc.set("operators", "users", "jdoe");
    doc
}

//! 用户偏好 API 集成测试

use axum::http::StatusCode;
use monitor_console::repository::IniDocument;

mod common;
use common::{create_file_app, create_memory_app, get, post_form, send};

fn get_as(uri: &str, user: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .uri(uri)
        .header("x-remote-user", user)
        .body(axum::body::Body::empty())
        .unwrap()
}

fn field<'a>(json: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
    json["form"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == name)
        .unwrap()
}

#[tokio::test]
async fn test_preferences_require_remote_user() {
    let app = create_memory_app(IniDocument::new());

    let (status, json) = send(app.state, get("/preferences")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], 401);
}

#[tokio::test]
async fn test_fresh_user_sees_fallback_defaults() {
    let app = create_memory_app(IniDocument::new());

    let (status, json) = send(app.state, get_as("/preferences", "alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["form"]["name"], "form_preference_set");
    assert_eq!(field(&json, "default_language")["value"], "1");
    assert_eq!(field(&json, "language")["value"], "en_US");
    assert_eq!(field(&json, "language")["editable"], false);
    assert_eq!(field(&json, "timezone")["value"], "UTC");
    assert_eq!(field(&json, "date_format")["value"], "d/m/Y");
    assert_eq!(field(&json, "time_format")["value"], "g:i A");
    assert_eq!(field(&json, "default_time_format")["auto_submit"], true);
    assert_eq!(field(&json, "show_benchmark")["value"], "0");
}

#[tokio::test]
async fn test_toggle_off_makes_field_editable() {
    let app = create_memory_app(IniDocument::new());

    let (_, json) = send(
        app.state,
        get_as("/preferences?default_date_format=0", "alice"),
    )
    .await;

    let date = field(&json, "date_format");
    assert_eq!(date["editable"], true);
    assert_eq!(date["required"], true);
    assert_eq!(date["value"], "d/m/Y");
}

#[tokio::test]
async fn test_save_preferences() {
    let app = create_memory_app(IniDocument::new());

    let (status, json) = send(
        app.state,
        post_form(
            "/preferences",
            "alice",
            "default_language=0&language=de_DE&default_timezone=1&default_date_format=0&date_format=Y-m-d&default_time_format=1&show_benchmark=1",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "committed");
    assert_eq!(json["redirect"], "/preferences");
    assert_eq!(
        json["notifications"][0]["message"],
        "Preferences updated successfully"
    );

    let saved = app.preferences.snapshot("alice");
    assert_eq!(saved.get("app", "language"), Some("de_DE"));
    assert_eq!(saved.get("app", "dateFormat"), Some("Y-m-d"));
    assert_eq!(saved.get("app", "timezone"), None);
    assert_eq!(saved.get("app", "show_benchmark"), Some("1"));
}

#[tokio::test]
async fn test_disabled_field_value_is_ignored() {
    let app = create_memory_app(IniDocument::new());

    let (status, _) = send(
        app.state,
        post_form(
            "/preferences",
            "alice",
            "default_time_format=1&time_format=%25%25%25",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.preferences.snapshot("alice").get("app", "timeFormat"), None);
}

#[tokio::test]
async fn test_invalid_date_format_is_redisplayed() {
    let app = create_memory_app(IniDocument::new());

    let (status, json) = send(
        app.state,
        post_form(
            "/preferences",
            "alice",
            "default_date_format=0&date_format=Y%2Fm%2Fd+%25",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["state"], "invalid");
    let date = field(&json, "date_format");
    assert_eq!(date["value"], "Y/m/d %");
    assert!(date["errors"][0]
        .as_str()
        .unwrap()
        .starts_with("Invalid date format"));
    assert!(json.get("notifications").is_none());
    assert_eq!(app.preferences.save_count(), 0);
}

#[tokio::test]
async fn test_unknown_language_is_rejected() {
    let app = create_memory_app(IniDocument::new());

    let (status, json) = send(
        app.state,
        post_form("/preferences", "alice", "default_language=0&language=xx_XX"),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        field(&json, "language")["errors"][0],
        "\"xx_XX\" is not an available language"
    );
}

#[tokio::test]
async fn test_save_failure_has_no_notification() {
    let app = create_memory_app(IniDocument::new());
    app.preferences.set_fail_saves(true);

    let (status, json) = send(
        app.state,
        post_form("/preferences", "alice", "default_time_format=0&time_format=H%3Ai"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["state"], "failed");
    assert_eq!(field(&json, "time_format")["value"], "H:i");
    assert!(json.get("notifications").is_none());
}

#[tokio::test]
async fn test_preferences_written_per_user_file() {
    let dir = tempfile::tempdir().unwrap();
    let state = create_file_app(dir.path());

    let (status, _) = send(
        state,
        post_form(
            "/preferences",
            "bob",
            "default_timezone=0&timezone=Europe%2FBerlin",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let content =
        std::fs::read_to_string(dir.path().join("preferences").join("bob.ini")).unwrap();
    assert!(content.contains("[app]"));
    assert!(content.contains("Europe/Berlin"));
}

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pman_server::api::{build_app, AppState};
use pman_server::config::{DatabaseConfig, ServerConfig};
use pman_server::storage::{run_migrations, Database};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tower::ServiceExt;

/// 已初始化資料表的記憶體資料庫
pub async fn setup_test_db() -> Database {
    let db = Database::in_memory(Duration::from_secs(5))
        .await
        .expect("Failed to create in-memory database");
    run_migrations(db.pool())
        .await
        .expect("Failed to initialize schema");
    db
}

/// 指向目錄中 `pman.db` 的檔案資料庫配置
pub fn file_database_config(dir: &Path) -> DatabaseConfig {
    DatabaseConfig {
        url: format!("sqlite://{}", dir.join("pman.db").display()),
        create_if_missing: true,
        max_connections: 4,
        min_connections: 1,
        max_lifetime_secs: 60,
        acquire_timeout_secs: 3,
        idle_timeout_secs: 60,
        query_timeout_secs: 5,
    }
}

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout: 10,
        enable_compression: false,
        max_body_size: 64 * 1024,
        cors_allow_all: true,
        cors_origins: Vec::new(),
    }
}

pub async fn setup_app() -> (Router, Database) {
    let db = setup_test_db().await;
    let app = build_app(AppState::from_database(&db), &test_server_config());
    (app, db)
}

/// 發送請求並返回狀態碼與 JSON 內容
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

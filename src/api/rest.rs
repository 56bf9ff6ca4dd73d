// src/api/rest.rs
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn};

use crate::api::{error::ApiError, routes::api_routes, state::AppState};
use crate::config::ServerConfig;

pub struct RestApi {
    server_config: ServerConfig,
    state: AppState,
}

impl RestApi {
    pub fn new(server_config: ServerConfig, state: AppState) -> Self {
        Self {
            server_config,
            state,
        }
    }

    /// 啟動服務器，`shutdown` 完成後停止接受新連線並等待進行中的請求
    pub async fn start<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = build_app(self.state, &self.server_config);

        // 解析地址
        let addr = SocketAddr::from((
            self.server_config.host.parse::<std::net::IpAddr>()?,
            self.server_config.port,
        ));

        info!("Starting REST API server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("REST API server stopped");
        Ok(())
    }
}

/// 建立應用並逐層添加中間件
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let mut app = api_routes()
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            Duration::from_secs(config.request_timeout),
        ))
        .layer(middleware::map_response(timeout_body))
        .layer(build_cors_layer(config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false))
                .on_response(DefaultOnResponse::new().include_headers(false)),
        );

    if config.enable_compression {
        app = app.layer(CompressionLayer::new());
    }

    app
}

// 超時層回傳的 503 沒有內容，補上與其他基礎設施錯誤相同的 JSON
async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::SERVICE_UNAVAILABLE
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        return ApiError::Infrastructure("request timed out".to_string()).into_response();
    }
    response
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    // 根據配置設置允許的來源
    if config.cors_allow_all {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

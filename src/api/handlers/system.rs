use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
}

/// 存活探測
pub async fn root() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}

/// 就緒探測，資料庫無法連線時仍回 200 但標記為 degraded
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.health.ping().await {
        Ok(()) => "ok",
        Err(err) => {
            warn!(error = %err, "database health check failed");
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: if database == "ok" { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

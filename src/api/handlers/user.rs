use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::state::AppState;
use crate::storage::models::{User, UserInsert};

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UserInsert>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.users.create(payload).await?;
    info!(user_id = user.id, "created user");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<User>> {
    state
        .users
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound { entity: "user", id })
}

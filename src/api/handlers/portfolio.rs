use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::state::AppState;
use crate::storage::models::{Portfolio, PortfolioInsert};

#[derive(Debug, Default, Deserialize)]
pub struct PortfolioQuery {
    pub user_id: Option<i64>,
}

pub async fn create_portfolio(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PortfolioInsert>,
) -> ApiResult<(StatusCode, Json<Portfolio>)> {
    let portfolio = state.portfolios.create(payload).await?;
    info!(
        portfolio_id = portfolio.id,
        user_id = portfolio.user_id,
        "created portfolio"
    );
    Ok((StatusCode::CREATED, Json(portfolio)))
}

pub async fn list_portfolios(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PortfolioQuery>,
) -> ApiResult<Json<Vec<Portfolio>>> {
    Ok(Json(state.portfolios.list(query.user_id).await?))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Portfolio>> {
    state
        .portfolios
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound {
            entity: "portfolio",
            id,
        })
}

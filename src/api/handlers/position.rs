use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::state::AppState;
use crate::storage::models::{
    EventFields, Position, PositionEvent, PositionEventInsert, PositionEventKind, PositionFilter,
    PositionInsert,
};

#[derive(Debug, Default, Deserialize)]
pub struct PositionQuery {
    pub portfolio_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

/// 新增事件的請求，數值欄位依 kind 而定
#[derive(Debug, Deserialize)]
pub struct CreatePositionEventRequest {
    pub kind: PositionEventKind,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    #[serde(flatten)]
    pub fields: EventFields,
}

impl CreatePositionEventRequest {
    pub fn into_insert(self) -> Result<PositionEventInsert, ApiError> {
        let details = self.fields.into_details(self.kind)?;
        Ok(PositionEventInsert::new(self.kind, self.date, self.notes, details)?)
    }
}

pub async fn create_position(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PositionInsert>,
) -> ApiResult<Json<Position>> {
    let position = state.positions.create(payload).await?;
    info!(
        position_id = position.id,
        portfolio_id = position.portfolio_id,
        symbol = %position.symbol,
        "created position"
    );
    Ok(Json(position))
}

pub async fn list_positions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PositionQuery>,
) -> ApiResult<Json<Vec<Position>>> {
    Ok(Json(state.positions.list(query.portfolio_id).await?))
}

pub async fn delete_positions(
    State(state): State<AppState>,
    ApiJson(filter): ApiJson<PositionFilter>,
) -> ApiResult<Json<DeleteResponse>> {
    if filter.is_empty() {
        return Err(ApiError::Validation(
            "delete requires `id` or `portfolio_id`".to_string(),
        ));
    }

    let deleted_count = state.positions.delete(filter).await?;
    info!(?filter, deleted_count, "deleted positions");
    Ok(Json(DeleteResponse { deleted_count }))
}

pub async fn create_position_event(
    State(state): State<AppState>,
    ApiPath(position_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CreatePositionEventRequest>,
) -> ApiResult<(StatusCode, Json<PositionEvent>)> {
    let insert = payload.into_insert()?;
    let event = state.events.create(position_id, insert).await?;
    info!(
        event_id = event.id,
        position_id,
        kind = %event.kind,
        "created position event"
    );
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_position_events(
    State(state): State<AppState>,
    ApiPath(position_id): ApiPath<i64>,
) -> ApiResult<Json<Vec<PositionEvent>>> {
    Ok(Json(state.events.list_for_position(position_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::api_routes;
    use crate::storage::database::MockHealthProbe;
    use crate::storage::repository::portfolio::MockPortfolioRepository;
    use crate::storage::repository::position::MockPositionRepository;
    use crate::storage::repository::position_event::MockPositionEventRepository;
    use crate::storage::repository::user::MockUserRepository;
    use crate::storage::StorageError;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::Router;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(positions: MockPositionRepository, events: MockPositionEventRepository) -> Router {
        let state = AppState {
            users: Arc::new(MockUserRepository::new()),
            portfolios: Arc::new(MockPortfolioRepository::new()),
            positions: Arc::new(positions),
            events: Arc::new(events),
            health: Arc::new(MockHealthProbe::new()),
        };
        api_routes().with_state(state)
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_timeout_maps_to_service_unavailable() {
        let mut positions = MockPositionRepository::new();
        positions
            .expect_list()
            .returning(|_| Err(StorageError::Timeout(Duration::from_secs(5))));

        let response = app(positions, MockPositionEventRepository::new())
            .oneshot(Request::get("/position").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"], "infrastructure_error");
    }

    #[tokio::test]
    async fn test_missing_field_never_reaches_repository() {
        let mut positions = MockPositionRepository::new();
        positions.expect_create().never();

        let response = app(positions, MockPositionEventRepository::new())
            .oneshot(json_request(
                Method::POST,
                "/position",
                serde_json::json!({ "portfolio_id": 1, "exchange": "NASDAQ", "symbol": "AAPL" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_delete_without_target_is_rejected() {
        let mut positions = MockPositionRepository::new();
        positions.expect_delete().never();

        let response = app(positions, MockPositionEventRepository::new())
            .oneshot(json_request(Method::DELETE, "/position", serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_passes_filter_through() {
        let mut positions = MockPositionRepository::new();
        positions
            .expect_delete()
            .withf(|filter| *filter == PositionFilter::by_portfolio(3))
            .times(1)
            .returning(|_| Ok(2));

        let response = app(positions, MockPositionEventRepository::new())
            .oneshot(json_request(
                Method::DELETE,
                "/position",
                serde_json::json!({ "portfolio_id": 3 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["deleted_count"], 2);
    }

    #[tokio::test]
    async fn test_event_with_wrong_fields_is_rejected() {
        let mut events = MockPositionEventRepository::new();
        events.expect_create().never();

        let response = app(MockPositionRepository::new(), events)
            .oneshot(json_request(
                Method::POST,
                "/position/1/events",
                serde_json::json!({ "kind": "stock_split", "date": "2024-06-10", "amount": 4.0 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("amount"));
    }

    #[tokio::test]
    async fn test_non_numeric_path_is_validation_error() {
        let response = app(MockPositionRepository::new(), MockPositionEventRepository::new())
            .oneshot(Request::get("/position/abc/events").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_request_into_insert() {
        let request: CreatePositionEventRequest = serde_json::from_value(serde_json::json!({
            "kind": "dividend",
            "date": "2024-02-15",
            "amount": 2.4
        }))
        .unwrap();

        let insert = request.into_insert().unwrap();
        assert_eq!(insert.kind(), PositionEventKind::Dividend);
        assert_eq!(insert.notes(), "");
    }
}

use axum::{routing::get, Router};

use crate::api::handlers::position;
use crate::api::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/position",
            get(position::list_positions)
                .post(position::create_position)
                .delete(position::delete_positions),
        )
        .route(
            "/position/{id}/events",
            get(position::list_position_events).post(position::create_position_event),
        )
}

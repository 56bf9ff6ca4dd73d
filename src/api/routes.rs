use axum::Router;

use crate::api::state::AppState;

pub mod portfolio;
pub mod position;
pub mod system;
pub mod user;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(system::routes())
        .merge(user::routes())
        .merge(portfolio::routes())
        .merge(position::routes())
}

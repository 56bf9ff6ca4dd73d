use axum::{routing::get, Router};

use crate::api::handlers::portfolio;
use crate::api::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/portfolio",
            get(portfolio::list_portfolios).post(portfolio::create_portfolio),
        )
        .route("/portfolio/{id}", get(portfolio::get_portfolio))
}

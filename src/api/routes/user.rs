use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::user;
use crate::api::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(user::create_user))
        .route("/user/{id}", get(user::get_user))
}

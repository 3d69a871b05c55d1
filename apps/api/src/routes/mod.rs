pub mod apod;
pub mod health;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/apod", get(apod::handle_fetch_picture))
        .route("/entries", get(apod::handle_list_entries))
        .with_state(state)
}

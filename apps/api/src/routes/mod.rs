pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scan::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/scans",
            post(handlers::handle_create_scan).get(handlers::handle_list_scans),
        )
        .with_state(state)
}

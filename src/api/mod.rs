use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

pub mod handlers;
pub mod pages;
pub mod responses;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_index))
        .route("/calculate", post(handlers::post_calculate))
        .route("/api/calculate", post(handlers::post_api_calculate))
        .route("/api/results", get(handlers::get_results))
        .route("/api/health", get(handlers::get_health))
        .with_state(state)
}

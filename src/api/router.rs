use axum::{middleware, routing::get, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::health;
use super::middleware::access_log_middleware;
use super::state::AppState;
use super::teams;
use super::types::ApiError;
use super::users;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        // Resources
        .merge(users::create_users_router())
        .merge(teams::create_teams_router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(middleware::from_fn(access_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Resource not found!")
}

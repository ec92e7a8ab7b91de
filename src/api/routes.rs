use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::api::{handlers, middleware::log_requests, state::AppState};

pub fn create_router(state: AppState, request_timeout: Option<Duration>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        // Agent endpoints
        .route(
            "/agents",
            get(handlers::list_agents).post(handlers::create_agent),
        )
        .route(
            "/agents/:id",
            get(handlers::get_agent)
                .patch(handlers::update_agent_salary)
                .delete(handlers::delete_agent),
        )
        // Mission endpoints
        .route(
            "/missions",
            get(handlers::list_missions).post(handlers::create_mission),
        )
        .route(
            "/missions/:id",
            get(handlers::get_mission)
                .patch(handlers::update_mission)
                .delete(handlers::delete_mission),
        )
        // Target endpoints
        .route(
            "/missions/:id/targets",
            post(handlers::add_target),
        )
        .route(
            "/missions/:id/targets/:target_id",
            get(handlers::get_target)
                .patch(handlers::update_target)
                .delete(handlers::delete_target),
        )
        // System endpoints
        .route("/health", get(handlers::health_handler))
        .with_state(state);

    if let Some(timeout) = request_timeout {
        router = router.layer(TimeoutLayer::new(timeout));
    }

    router
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
}

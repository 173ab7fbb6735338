//! Route definitions for the PokéDash HTTP surface.

pub mod dashboard;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let dashboard_routes = Router::new()
        .route("/dashboard", get(dashboard::status))
        .route("/dashboard/count", get(dashboard::count))
        .route("/dashboard/charts/{chart_id}", get(dashboard::chart))
        .route("/dashboard/refresh", post(dashboard::refresh));

    Router::new()
        .route("/", get(dashboard::page))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", dashboard_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

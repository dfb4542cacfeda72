//! Application routing

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::{health, proxy};
use crate::middleware::{log_request, with_cors};
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let proxy_routes = Router::new()
        .route("/", post(proxy::proxy))
        .route("/ai-proxy", post(proxy::proxy))
        .layer(DefaultBodyLimit::max(state.settings.max_body_bytes));

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/liveness", get(health::liveness));

    let router = Router::new().merge(proxy_routes).merge(health_routes);

    // Layer order: last added = outermost = runs first
    with_cors(router)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

//! HTTP route definitions

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the router with all routes
pub fn create_router(app_state: AppState, cors_enabled: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::index))
        .route("/preview", post(handlers::preview))
        .route("/fetch", get(handlers::fetch))
        .route("/health", get(handlers::health))
        .with_state(app_state);

    if cors_enabled {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .allow_origin(Any);
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}

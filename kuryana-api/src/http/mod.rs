// Module: http
// JSON REST API over the dispatch facade

pub mod health;
pub mod resources;
pub mod response;

use axum::Router;
use kuryana_core::Dispatcher;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use response::ApiResponse;

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// Create the HTTP router with all routes
pub fn create_router(dispatcher: Dispatcher) -> Router {
    let state = AppState { dispatcher };

    let router = Router::new()
        // Index and health check endpoints
        .merge(health::create_health_router())
        // Catalog resources
        .merge(resources::create_resource_router());

    // Apply layers before state
    let router = router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Apply state to all routes (must be last)
    router.with_state(state)
}

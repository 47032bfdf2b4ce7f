//! HTTP surface of the service.

mod error;
pub mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use handlers::AppState;

/// Build the HTTP routes.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Locale
        .route("/languages", get(handlers::list_languages))
        .route("/locale", get(handlers::get_locale))
        // Analysis
        .route("/analyze", post(handlers::analyze))
        .route("/translate", post(handlers::translate))
        // Speech
        .route("/speech", post(handlers::synthesize_speech))
        .route("/transcribe", post(handlers::transcribe))
        // Hospital lookup
        .route("/hospital", get(handlers::nearest_hospital))
        // State
        .with_state(state)
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

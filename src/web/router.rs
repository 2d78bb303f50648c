//! Router configuration for the upload page.

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{index, upload, AppState};
use super::middleware::security_headers;

/// Create the application router.
///
/// Request bodies are unbounded unless `max_request_size` is given, in which
/// case larger requests get 413 before the handler runs.
pub fn create_router(app_state: AppState, max_request_size: Option<usize>) -> Router {
    let router = Router::new()
        .route("/", get(index).post(upload))
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(app_state);

    match max_request_size {
        Some(limit) => router.layer(RequestBodyLimitLayer::new(limit)),
        None => router,
    }
}

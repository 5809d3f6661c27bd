//! Axum router construction.
//!
//! Builds the application router with the conversion endpoint, operational
//! routes, middleware layers, and the landing page / static file serving.

use std::path::PathBuf;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Build the complete Axum router.
///
/// When `static_dir` contains an `index.html` it is served at `/` (together
/// with any other files in it); otherwise the built-in landing page is used.
pub fn build_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = ctx.config.server.max_upload_bytes();

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/tools", get(routes::tools::list_tools))
        .route(
            "/convert",
            post(routes::convert::convert).layer(DefaultBodyLimit::max(body_limit)),
        );

    match static_dir.filter(|dir| dir.join("index.html").is_file()) {
        Some(dir) => {
            tracing::info!("Serving static files from {}", dir.display());
            app = app.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
        }
        None => {
            app = app.route("/", get(routes::index::landing_page));
        }
    }

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

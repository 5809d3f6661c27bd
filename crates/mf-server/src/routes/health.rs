use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

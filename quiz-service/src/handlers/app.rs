use axum::{http::Uri, BoxError, Json};
use serde_json::{json, Value};
use service_core::error::AppError;
use std::time::Duration;

/// Liveness check. Does not touch the remote APIs.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "quiz-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}

/// Map an error from the request deadline layer. Only `Elapsed` is
/// expected there.
pub fn timeout_error(err: BoxError, limit: Duration) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!(limit = ?limit, "Request deadline exceeded");
        AppError::GatewayTimeout(format!("request did not complete within {:?}", limit))
    } else {
        AppError::InternalError(anyhow::anyhow!("unhandled middleware error: {}", err))
    }
}

pub mod cors;
pub mod metrics;
pub mod tracing;

pub use cors::cors_middleware;
pub use metrics::metrics_middleware;
pub use tracing::request_id_middleware;

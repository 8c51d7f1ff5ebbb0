//! service-core: shared HTTP plumbing for the quiz services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the ledger and the demo seeder shared by every handler
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use remit_core::LedgerResult;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> LedgerResult<Router> {
    let services = Arc::new(services::build_services(config)?);
    Ok(router(services))
}

/// Router over already-built services.
pub fn router(services: Arc<services::AppServices>) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::trace_requests))
            .layer(Extension(services)),
    )
}

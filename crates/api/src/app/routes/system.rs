use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode};

use crate::app::routes::reply;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Replace the previously seeded demo records with a fresh random set.
pub async fn seed_demo_data(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    if !services.demo_endpoint_enabled() {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "demo data endpoint is disabled");
    }
    reply(services.seed_demo_data(), StatusCode::CREATED, |report| {
        dto::seed_report_to_json(*report)
    })
}

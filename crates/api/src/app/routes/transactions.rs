use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};

use crate::app::routes::{reply, reply_items};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::TransferBody>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    reply(
        services.ledger().transfers().transfer(body.into()),
        StatusCode::CREATED,
        dto::transaction_to_json,
    )
}

pub async fn get_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    reply(
        services.ledger().transactions().get_by_id(&id),
        StatusCode::OK,
        dto::transaction_to_json,
    )
}

/// Every recorded transaction, oldest first.
pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    reply_items(
        services.ledger().transactions().list(),
        dto::transaction_to_json,
    )
}

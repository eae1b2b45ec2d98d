use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};

use crate::app::routes::{no_content, reply, reply_items};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::AccountRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    reply(
        services.ledger().accounts().create(body.into()),
        StatusCode::CREATED,
        dto::account_to_json,
    )
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    reply(services.ledger().accounts().get_by_id(&id), StatusCode::OK, dto::account_to_json)
}

/// Full replacement; every field is required and nothing changes unless all
/// of them validate.
pub async fn update_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::AccountRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    reply(
        services.ledger().accounts().update(&id, body.into()),
        StatusCode::OK,
        dto::account_to_json,
    )
}

pub async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    no_content(services.ledger().accounts().delete(&id))
}

pub async fn activate_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    reply(services.ledger().accounts().activate(&id), StatusCode::OK, dto::account_to_json)
}

pub async fn deactivate_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    reply(services.ledger().accounts().deactivate(&id), StatusCode::OK, dto::account_to_json)
}

pub async fn account_history(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    reply_items(
        services.ledger().transactions().list_for_account(&id),
        dto::transaction_to_json,
    )
}

pub async fn deposit(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::AmountRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    reply(
        services.ledger().transfers().deposit(&id, body.amount.as_deref()),
        StatusCode::CREATED,
        dto::transaction_to_json,
    )
}

pub async fn withdraw(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::AmountRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    reply(
        services.ledger().transfers().withdraw(&id, body.amount.as_deref()),
        StatusCode::CREATED,
        dto::transaction_to_json,
    )
}

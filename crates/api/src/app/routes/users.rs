use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    Json,
};

use remit_infra::AccountDraft;

use crate::app::routes::{no_content, reply, reply_items};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::UserRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    reply(
        services.ledger().users().create(body.into()),
        StatusCode::CREATED,
        dto::user_to_json,
    )
}

/// All users, or those whose name contains `?name=` (case-insensitive).
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::UserQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let users = services.ledger().users();
    let result = match query.name.as_deref() {
        Some(fragment) => users.find_by_name(Some(fragment)),
        None => users.list(),
    };
    reply_items(result, dto::user_to_json)
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    reply(services.ledger().users().get_by_id(&id), StatusCode::OK, dto::user_to_json)
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UserRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    reply(
        services.ledger().users().update(&id, body.into()),
        StatusCode::OK,
        dto::user_to_json,
    )
}

/// Deletes the user and deactivates its accounts.
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    no_content(services.ledger().users().delete(&id))
}

pub async fn list_user_accounts(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    reply_items(services.ledger().users().accounts_of(&id), dto::account_to_json)
}

/// Open an account owned by the user in the path; any `owner_id` in the
/// body is ignored.
pub async fn create_user_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::AccountRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let draft = AccountDraft {
        owner_id: Some(id),
        ..AccountDraft::from(body)
    };
    reply(
        services.ledger().accounts().create(draft),
        StatusCode::CREATED,
        dto::account_to_json,
    )
}

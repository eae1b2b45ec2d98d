use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::Value;

use remit_core::LedgerResult;

use crate::app::errors;

pub mod accounts;
pub mod system;
pub mod transactions;
pub mod users;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/demo-data", post(system::seed_demo_data))
        .route("/users", post(users::create_user).get(users::list_users))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/users/:id/accounts",
            get(users::list_user_accounts).post(users::create_user_account),
        )
        .route("/accounts", post(accounts::create_account))
        .route(
            "/accounts/:id",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/accounts/:id/activate", put(accounts::activate_account))
        .route("/accounts/:id/deactivate", put(accounts::deactivate_account))
        .route("/accounts/:id/transactions", get(accounts::account_history))
        .route("/accounts/:id/deposit", post(accounts::deposit))
        .route("/accounts/:id/withdraw", post(accounts::withdraw))
        .route("/transfers", post(transactions::transfer))
        .route("/transactions", get(transactions::list_transactions))
        .route("/transactions/:id", get(transactions::get_transaction))
}

/// `status` + mapped body on success, the error's own status otherwise.
pub(crate) fn reply<T>(
    result: LedgerResult<T>,
    status: StatusCode,
    to_json: impl FnOnce(&T) -> Value,
) -> axum::response::Response {
    match result {
        Ok(value) => (status, Json(to_json(&value))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// Listing endpoints wrap their rows as `{ "items": [...] }`.
pub(crate) fn reply_items<T>(
    result: LedgerResult<Vec<T>>,
    to_json: impl Fn(&T) -> Value,
) -> axum::response::Response {
    reply(result, StatusCode::OK, |items| {
        let items = items.iter().map(&to_json).collect::<Vec<_>>();
        serde_json::json!({ "items": items })
    })
}

pub(crate) fn no_content(result: LedgerResult<()>) -> axum::response::Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

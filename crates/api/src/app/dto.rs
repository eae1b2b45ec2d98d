use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use remit_core::Entity;
use remit_infra::seed::SeedReport;
use remit_infra::{AccountDraft, TransferRequest, UserDraft};
use remit_ledger::{Account, Transaction, User};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub name: Option<String>,
}

impl From<UserRequest> for UserDraft {
    fn from(req: UserRequest) -> Self {
        UserDraft { name: req.name }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    pub name: Option<String>,
    pub owner_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub balance: Option<String>,
    pub currency: Option<String>,
    pub active: Option<bool>,
}

impl From<AccountRequest> for AccountDraft {
    fn from(req: AccountRequest) -> Self {
        AccountDraft {
            name: req.name,
            owner_id: req.owner_id,
            balance: req.balance,
            currency: req.currency,
            active: req.active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    pub amount: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransferBody {
    pub source_account_id: Option<String>,
    pub destination_account_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub comment: Option<String>,
}

impl From<TransferBody> for TransferRequest {
    fn from(body: TransferBody) -> Self {
        TransferRequest {
            source_account_id: body.source_account_id,
            destination_account_id: body.destination_account_id,
            amount: body.amount,
            currency: body.currency,
            comment: body.comment,
        }
    }
}

/// Money fields arrive as `"12.50"` or `12.5`; both reach the ledger as text
/// so it can report format errors itself.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

// -------------------------
// Response mapping
// -------------------------

/// Two fraction digits, half away from zero.
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn user_to_json(user: &User) -> Value {
    serde_json::json!({
        "id": user.id().to_string(),
        "name": user.name,
        "created_at": timestamp(user.created_at()),
    })
}

pub fn account_to_json(account: &Account) -> Value {
    serde_json::json!({
        "id": account.id().to_string(),
        "owner_id": account.owner.map(|id| id.to_string()),
        "name": account.name,
        "balance": money(account.balance),
        "currency": account.currency.map(|c| c.code()),
        "active": account.active,
        "created_at": timestamp(account.created_at()),
    })
}

pub fn transaction_to_json(tx: &Transaction) -> Value {
    serde_json::json!({
        "id": tx.id().to_string(),
        "source": tx.source.as_ref().map(account_to_json),
        "destination": tx.destination.as_ref().map(account_to_json),
        "amount": money(tx.amount),
        "currency": tx.currency.map(|c| c.code()),
        "comment": tx.comment,
        "status": tx.status().as_str(),
        "created_at": timestamp(tx.created_at()),
        "executed_at": tx.executed_at().map(timestamp),
    })
}

pub fn seed_report_to_json(report: SeedReport) -> Value {
    serde_json::json!({
        "users": report.users,
        "accounts": report.accounts,
        "transactions": report.transactions,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn money_always_has_two_fraction_digits() {
        assert_eq!(money(Decimal::from_str("700").unwrap()), "700.00");
        assert_eq!(money(Decimal::from_str("0.5").unwrap()), "0.50");
        assert_eq!(money(Decimal::from_str("12.345").unwrap()), "12.35");
    }

    #[test]
    fn amount_accepts_text_and_numbers() {
        let text: AmountRequest = serde_json::from_str(r#"{"amount":"10.25"}"#).unwrap();
        assert_eq!(text.amount.as_deref(), Some("10.25"));

        let number: AmountRequest = serde_json::from_str(r#"{"amount":10}"#).unwrap();
        assert_eq!(number.amount.as_deref(), Some("10"));

        let missing: AmountRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.amount, None);
    }

    #[test]
    fn timestamps_use_space_separated_format() {
        let at = DateTime::parse_from_rfc3339("2024-03-01T09:05:07Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(timestamp(at), "2024-03-01 09:05:07");
    }
}

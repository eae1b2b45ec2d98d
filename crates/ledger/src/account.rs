use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use remit_core::{AccountId, Currency, Entity, UserId};

/// A balance-holding account.
///
/// `id` and `created_at` are fixed at reservation time. The remaining fields
/// are only mutated by whoever holds the account's lock: explicit updates
/// through the account repository, or the transfer executor for `balance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    /// `None` only for a freshly reserved account and for the external sentinel.
    pub owner: Option<UserId>,
    pub name: String,
    pub balance: Decimal,
    /// `None` only for a freshly reserved account and for the external sentinel.
    pub currency: Option<Currency>,
    pub active: bool,
    created_at: DateTime<Utc>,
}

impl Account {
    /// The external sentinel account: the outside world as a counterparty.
    ///
    /// Never stored, never locked, never mutated; its balance is meaningless.
    /// Each call returns a fresh value, there is no shared singleton.
    pub fn external() -> Self {
        Self {
            id: AccountId::EXTERNAL,
            owner: None,
            name: "Account for deposit and withdrawal".to_string(),
            balance: Decimal::ZERO,
            currency: None,
            active: true,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn is_external(&self) -> bool {
        self.id.is_external()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == Some(user)
    }

    pub fn can_cover(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> AccountId {
        self.id
    }

    fn reserve(id: AccountId) -> Self {
        Self {
            id,
            owner: None,
            name: String::new(),
            balance: Decimal::ZERO,
            currency: None,
            active: false,
            created_at: Utc::now(),
        }
    }
}

use rust_decimal::Decimal;
use serde::Deserialize;

use remit_core::{
    Currency, Entity, LedgerError, LedgerResult, UserId, parse_balance, require_text,
};
use remit_ledger::{Account, User};

use crate::entity_store::EntityHandle;
use crate::stores::StoreBundle;

use super::resolve;

/// Raw account fields as decoded by the boundary layer.
///
/// Every field is required for both create and update; the draft is
/// validated in full before anything is mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountDraft {
    pub name: Option<String>,
    pub owner_id: Option<String>,
    pub balance: Option<String>,
    pub currency: Option<String>,
    pub active: Option<bool>,
}

/// A draft that passed validation; applying it cannot fail.
#[derive(Debug, Clone)]
struct ValidAccount {
    name: String,
    owner: UserId,
    balance: Decimal,
    currency: Currency,
    active: bool,
}

impl ValidAccount {
    fn apply_to(self, account: &mut Account) {
        account.name = self.name;
        account.owner = Some(self.owner);
        account.balance = self.balance;
        account.currency = Some(self.currency);
        account.active = self.active;
    }
}

/// Account reads, updates and activation, built on the account store.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    stores: StoreBundle,
}

impl AccountRepository {
    pub fn new(stores: StoreBundle) -> Self {
        Self { stores }
    }

    pub(crate) fn resolve(&self, id: &str) -> LedgerResult<EntityHandle<Account>> {
        resolve(self.stores.accounts.as_ref(), "Account", id)
    }

    pub fn get_by_id(&self, id: &str) -> LedgerResult<Account> {
        Ok(self.resolve(id)?.snapshot()?)
    }

    pub fn list(&self) -> LedgerResult<Vec<Account>> {
        Ok(self.stores.accounts.list()?)
    }

    pub fn create(&self, draft: AccountDraft) -> LedgerResult<Account> {
        let valid = self.validate(draft)?;

        let handle = self.stores.accounts.create()?;
        let account = {
            let mut account = handle.lock()?;
            valid.apply_to(&mut account);
            self.stores.accounts.commit(&handle)?;
            account.clone()
        };

        tracing::info!(
            account_id = %account.id(),
            owner_id = ?account.owner,
            currency = ?account.currency,
            "account created"
        );
        Ok(account)
    }

    pub fn update(&self, id: &str, draft: AccountDraft) -> LedgerResult<Account> {
        let handle = self.resolve(id)?;
        let valid = self.validate(draft)?;

        let mut account = handle.lock()?;
        valid.apply_to(&mut account);
        self.stores.accounts.commit(&handle)?;
        Ok(account.clone())
    }

    pub fn activate(&self, id: &str) -> LedgerResult<Account> {
        self.set_active(&self.resolve(id)?, true)
    }

    pub fn deactivate(&self, id: &str) -> LedgerResult<Account> {
        self.set_active(&self.resolve(id)?, false)
    }

    pub fn delete(&self, id: &str) -> LedgerResult<()> {
        let handle = self.resolve(id)?;
        {
            let _account = handle.lock()?;
            self.stores.accounts.delete(&handle)?;
        }
        tracing::info!(account_id = %handle.id(), "account deleted");
        Ok(())
    }

    fn set_active(&self, handle: &EntityHandle<Account>, active: bool) -> LedgerResult<Account> {
        let mut account = handle.lock()?;
        account.active = active;
        self.stores.accounts.commit(handle)?;
        tracing::debug!(account_id = %handle.id(), active, "account activation changed");
        Ok(account.clone())
    }

    /// Check every field, in order, before anything is mutated.
    fn validate(&self, draft: AccountDraft) -> LedgerResult<ValidAccount> {
        let name = require_text("Name", draft.name.as_deref())?.to_string();

        let owner_id = require_text("Owner ID", draft.owner_id.as_deref())?;
        let owner = resolve::<User>(self.stores.users.as_ref(), "User", owner_id)?.id();

        let balance = parse_balance(draft.balance.as_deref())?;

        let currency = match draft.currency.as_deref() {
            Some(code) => code.parse::<Currency>()?,
            None => {
                return Err(LedgerError::validation(
                    "Currency cannot be empty or consist only of whitespaces.",
                ));
            }
        };

        let active = draft
            .active
            .ok_or_else(|| LedgerError::validation("Active flag cannot be null."))?;

        Ok(ValidAccount {
            name,
            owner,
            balance,
            currency,
            active,
        })
    }
}

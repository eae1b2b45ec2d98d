use serde::Deserialize;

use remit_core::{Entity, LedgerResult, UserId, require_text};
use remit_ledger::{Account, User};

use crate::entity_store::EntityHandle;
use crate::stores::StoreBundle;

use super::{resolve, sort_by_creation};

/// Fields accepted when creating or renaming a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserDraft {
    pub name: Option<String>,
}

impl UserDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// User CRUD plus the account queries and cascades that hang off a user.
#[derive(Debug, Clone)]
pub struct UserRepository {
    stores: StoreBundle,
}

impl UserRepository {
    pub fn new(stores: StoreBundle) -> Self {
        Self { stores }
    }

    pub(crate) fn resolve(&self, id: &str) -> LedgerResult<EntityHandle<User>> {
        resolve(self.stores.users.as_ref(), "User", id)
    }

    pub fn get_by_id(&self, id: &str) -> LedgerResult<User> {
        Ok(self.resolve(id)?.snapshot()?)
    }

    pub fn list(&self) -> LedgerResult<Vec<User>> {
        Ok(self.stores.users.list()?)
    }

    /// Case-insensitive substring search on the display name.
    pub fn find_by_name(&self, fragment: Option<&str>) -> LedgerResult<Vec<User>> {
        let fragment = require_text("Name", fragment)?;
        let mut users: Vec<User> = self
            .list()?
            .into_iter()
            .filter(|u| u.name_contains(fragment))
            .collect();
        sort_by_creation(&mut users, User::created_at);
        Ok(users)
    }

    pub fn create(&self, draft: UserDraft) -> LedgerResult<User> {
        let name = require_text("Name", draft.name.as_deref())?.to_string();

        let handle = self.stores.users.create()?;
        let user = {
            let mut user = handle.lock()?;
            user.name = name;
            self.stores.users.commit(&handle)?;
            user.clone()
        };

        tracing::info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    pub fn update(&self, id: &str, draft: UserDraft) -> LedgerResult<User> {
        let handle = self.resolve(id)?;
        let name = require_text("Name", draft.name.as_deref())?.to_string();

        let mut user = handle.lock()?;
        user.name = name;
        self.stores.users.commit(&handle)?;
        Ok(user.clone())
    }

    /// Delete the user, then deactivate (not delete) every account it owns.
    ///
    /// Accounts are only touched after the user's removal succeeded. Every
    /// owned account is attempted; the first failure is returned afterwards.
    pub fn delete(&self, id: &str) -> LedgerResult<()> {
        let handle = self.resolve(id)?;
        {
            let _user = handle.lock()?;
            self.stores.users.delete(&handle)?;
        }

        let mut deactivated = 0usize;
        let mut first_error = None;
        for account in self.owned_accounts(handle.id())? {
            match self.deactivate_owned(&account) {
                Ok(()) => deactivated += 1,
                Err(err) => {
                    tracing::warn!(
                        user_id = %handle.id(),
                        account_id = %account.id(),
                        error = %err,
                        "cascade deactivation failed"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }

        tracing::info!(user_id = %handle.id(), deactivated_accounts = deactivated, "user deleted");
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn deactivate_owned(&self, account: &EntityHandle<Account>) -> LedgerResult<()> {
        let mut guard = account.lock()?;
        guard.active = false;
        self.stores.accounts.commit(account)?;
        Ok(())
    }

    /// Copies of the user's accounts, oldest first.
    pub fn accounts_of(&self, id: &str) -> LedgerResult<Vec<Account>> {
        let owner = self.resolve(id)?.id();
        let mut accounts: Vec<Account> = self
            .stores
            .accounts
            .list()?
            .into_iter()
            .filter(|a| a.is_owned_by(owner))
            .collect();
        sort_by_creation(&mut accounts, Account::created_at);
        Ok(accounts)
    }

    /// Live handles of the accounts owned by `owner`. Accounts deleted between
    /// the listing and the lookup are skipped.
    fn owned_accounts(&self, owner: UserId) -> LedgerResult<Vec<EntityHandle<Account>>> {
        let mut handles = Vec::new();
        for account in self.stores.accounts.list()? {
            if !account.is_owned_by(owner) {
                continue;
            }
            if let Some(handle) = self.stores.accounts.get(account.id())? {
                handles.push(handle);
            }
        }
        Ok(handles)
    }
}

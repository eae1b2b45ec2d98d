//! Ledger facade: one entry point wiring repositories and transfers onto a
//! shared set of stores.

use crate::config::LedgerConfig;
use crate::repository::{AccountRepository, TransactionRepository, UserRepository};
use crate::stores::StoreBundle;
use crate::transfer::TransferService;

#[derive(Debug, Clone)]
pub struct Ledger {
    stores: StoreBundle,
    config: LedgerConfig,
    users: UserRepository,
    accounts: AccountRepository,
    transactions: TransactionRepository,
    transfers: TransferService,
}

impl Ledger {
    pub fn new(stores: StoreBundle, config: LedgerConfig) -> Self {
        Self {
            users: UserRepository::new(stores.clone()),
            accounts: AccountRepository::new(stores.clone()),
            transactions: TransactionRepository::new(stores.clone()),
            transfers: TransferService::new(stores.clone(), config),
            stores,
            config,
        }
    }

    /// Empty in-memory ledger with default configuration.
    pub fn in_memory() -> Self {
        Self::new(StoreBundle::in_memory(), LedgerConfig::default())
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn accounts(&self) -> &AccountRepository {
        &self.accounts
    }

    pub fn transactions(&self) -> &TransactionRepository {
        &self.transactions
    }

    pub fn transfers(&self) -> &TransferService {
        &self.transfers
    }

    pub fn stores(&self) -> &StoreBundle {
        &self.stores
    }

    pub fn config(&self) -> LedgerConfig {
        self.config
    }
}

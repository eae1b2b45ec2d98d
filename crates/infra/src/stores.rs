//! The three entity stores the ledger runs on, bundled together.

use std::sync::Arc;

use remit_ledger::{Account, Transaction, User};

use crate::entity_store::{EntityStore, InMemoryEntityStore};

/// Shared handles to the user, account and transaction stores.
///
/// Cloning is cheap; every clone refers to the same stores.
#[derive(Clone)]
pub struct StoreBundle {
    pub users: Arc<dyn EntityStore<User>>,
    pub accounts: Arc<dyn EntityStore<Account>>,
    pub transactions: Arc<dyn EntityStore<Transaction>>,
}

impl StoreBundle {
    pub fn new(
        users: Arc<dyn EntityStore<User>>,
        accounts: Arc<dyn EntityStore<Account>>,
        transactions: Arc<dyn EntityStore<Transaction>>,
    ) -> Self {
        Self {
            users,
            accounts,
            transactions,
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryEntityStore::<User>::new()),
            Arc::new(InMemoryEntityStore::<Account>::new()),
            Arc::new(InMemoryEntityStore::<Transaction>::new()),
        )
    }
}

impl core::fmt::Debug for StoreBundle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StoreBundle").finish_non_exhaustive()
    }
}

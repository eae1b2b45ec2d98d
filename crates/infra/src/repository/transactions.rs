use remit_ledger::Transaction;

use remit_core::LedgerResult;

use crate::stores::StoreBundle;

use super::{AccountRepository, resolve, sort_by_creation};

/// Read access to transaction records.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    stores: StoreBundle,
    accounts: AccountRepository,
}

impl TransactionRepository {
    pub fn new(stores: StoreBundle) -> Self {
        let accounts = AccountRepository::new(stores.clone());
        Self { stores, accounts }
    }

    pub fn get_by_id(&self, id: &str) -> LedgerResult<Transaction> {
        let handle = resolve(self.stores.transactions.as_ref(), "Transaction", id)?;
        Ok(handle.snapshot()?)
    }

    pub fn list(&self) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = self.stores.transactions.list()?;
        sort_by_creation(&mut transactions, Transaction::created_at);
        Ok(transactions)
    }

    /// Every transaction with the account on either leg, oldest first.
    pub fn list_for_account(&self, account_id: &str) -> LedgerResult<Vec<Transaction>> {
        let account = self.accounts.resolve(account_id)?.id();
        let mut transactions: Vec<Transaction> = self
            .stores
            .transactions
            .list()?
            .into_iter()
            .filter(|t| t.involves(account))
            .collect();
        sort_by_creation(&mut transactions, Transaction::created_at);
        Ok(transactions)
    }
}

//! Transfer execution: moving funds between two accounts atomically.
//!
//! ## Protocol
//!
//! ```text
//! 1. same account?                      -> Forbidden   (no locks held)
//! 2. lock both real accounts, ascending AccountId order
//! 3. both active?                       -> Forbidden
//! 4. currencies match the transaction?  -> Validation  (sentinel exempt)
//! 5. source covers the amount?          -> Forbidden   (sentinel exempt)
//! 6. both new balances representable?  -> Forbidden   (nothing mutated yet)
//! 7. debit/credit + commit each real leg
//! 8. EXECUTED if every commit succeeded, FAILED otherwise
//! 9. commit the transaction record, return a copy
//! ```
//!
//! Locks are always taken in id order, never source-then-destination, so two
//! transfers running in opposite directions over the same pair cannot
//! deadlock. The external sentinel is never locked, checked for funds,
//! mutated or committed.

use std::sync::MutexGuard;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use remit_core::{AccountId, Currency, Entity, LedgerError, LedgerResult, parse_amount};
use remit_ledger::{Account, Transaction};

use crate::config::LedgerConfig;
use crate::entity_store::{EntityHandle, StoreError};
use crate::repository::AccountRepository;
use crate::stores::StoreBundle;

/// One side of a transfer.
#[derive(Debug, Clone)]
pub enum Leg {
    /// The external sentinel account.
    External,
    /// A stored account, by live handle.
    Account(EntityHandle<Account>),
}

impl Leg {
    pub fn id(&self) -> AccountId {
        match self {
            Leg::External => AccountId::EXTERNAL,
            Leg::Account(handle) => handle.id(),
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Leg::External)
    }

    pub fn snapshot(&self) -> Result<Account, StoreError> {
        match self {
            Leg::External => Ok(Account::external()),
            Leg::Account(handle) => handle.snapshot(),
        }
    }

    fn lock(&self) -> Result<Option<MutexGuard<'_, Account>>, StoreError> {
        match self {
            Leg::External => Ok(None),
            Leg::Account(handle) => handle.lock().map(Some),
        }
    }
}

/// Applies a prepared transaction to its two accounts.
#[derive(Debug, Clone)]
pub struct TransferExecutor {
    stores: StoreBundle,
    config: LedgerConfig,
}

impl TransferExecutor {
    pub fn new(stores: StoreBundle, config: LedgerConfig) -> Self {
        Self { stores, config }
    }

    /// Execute `transaction` (already reserved in the transaction store, with
    /// amount and currency set) from `source` to `destination`.
    ///
    /// Precondition failures return an error before any balance changes and
    /// leave the record at `created` (or remove it, when
    /// `retain_rejected_transactions` is off).
    pub fn execute(
        &self,
        transaction: &EntityHandle<Transaction>,
        source: &Leg,
        destination: &Leg,
    ) -> LedgerResult<Transaction> {
        let (amount, currency) = {
            let tx = transaction.lock()?;
            let currency = tx
                .currency
                .ok_or_else(|| LedgerError::validation("Transaction currency is not set."))?;
            (tx.amount, currency)
        };

        let applied = match self.apply(source, destination, amount, currency) {
            Ok(applied) => applied,
            Err(err) => {
                tracing::warn!(
                    transaction_id = %transaction.id(),
                    source_id = %source.id(),
                    destination_id = %destination.id(),
                    error = %err,
                    "transfer rejected"
                );
                if !self.config.retain_rejected_transactions {
                    self.stores.transactions.delete(transaction)?;
                }
                return Err(err);
            }
        };

        let mut tx = transaction.lock()?;
        tx.source = Some(applied.source);
        tx.destination = Some(applied.destination);
        if applied.committed {
            tx.mark_executed(Utc::now())?;
        } else {
            tx.mark_failed()?;
        }
        self.stores.transactions.commit(transaction)?;

        tracing::info!(
            transaction_id = %tx.id(),
            source_id = %source.id(),
            destination_id = %destination.id(),
            %amount,
            %currency,
            status = %tx.status(),
            "transfer finished"
        );
        Ok(tx.clone())
    }

    /// Steps 1-6 of the protocol. Errors are precondition failures raised
    /// before any mutation (or a poisoned lock).
    fn apply(
        &self,
        source: &Leg,
        destination: &Leg,
        amount: Decimal,
        currency: Currency,
    ) -> LedgerResult<Applied> {
        if source.id() == destination.id() {
            return Err(LedgerError::forbidden(
                "Impossible to transfer to the same account.",
            ));
        }

        let (mut from, mut to) = if source.id() < destination.id() {
            let from = source.lock()?;
            let to = destination.lock()?;
            (from, to)
        } else {
            let to = destination.lock()?;
            let from = source.lock()?;
            (from, to)
        };

        let real_legs = [from.as_deref(), to.as_deref()];
        if real_legs.iter().flatten().any(|account| !account.active) {
            return Err(LedgerError::forbidden("Account is not active."));
        }

        for account in real_legs.into_iter().flatten() {
            if account.currency != Some(currency) {
                return Err(LedgerError::validation(
                    "Currencies do not match. Auto-conversion is not available.",
                ));
            }
        }

        if let Some(account) = from.as_ref() {
            if !account.can_cover(amount) {
                return Err(LedgerError::forbidden("Insufficient funds."));
            }
        }

        let debited = from
            .as_ref()
            .map(|account| exact(account.balance, amount, Decimal::checked_sub).ok_or_else(limit))
            .transpose()?;
        let credited = to
            .as_ref()
            .map(|account| exact(account.balance, amount, Decimal::checked_add).ok_or_else(limit))
            .transpose()?;

        let mut committed = true;
        if let (Some(account), Some(balance), Leg::Account(handle)) =
            (from.as_mut(), debited, source)
        {
            account.balance = balance;
            committed &= self.commit_leg(handle);
        }
        if let (Some(account), Some(balance), Leg::Account(handle)) =
            (to.as_mut(), credited, destination)
        {
            account.balance = balance;
            committed &= self.commit_leg(handle);
        }

        Ok(Applied {
            source: from.as_deref().cloned().unwrap_or_else(Account::external),
            destination: to.as_deref().cloned().unwrap_or_else(Account::external),
            committed,
        })
    }

    fn commit_leg(&self, handle: &EntityHandle<Account>) -> bool {
        match self.stores.accounts.commit(handle) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(account_id = %handle.id(), error = %err, "account commit failed");
                false
            }
        }
    }
}

/// `op(balance, amount)` unless it overflows or has to round away fraction
/// digits to fit.
fn exact(
    balance: Decimal,
    amount: Decimal,
    op: fn(Decimal, Decimal) -> Option<Decimal>,
) -> Option<Decimal> {
    let value = op(balance, amount)?;
    (value.scale() >= balance.scale().max(amount.scale())).then_some(value)
}

fn limit() -> LedgerError {
    LedgerError::forbidden("Balance limit exceeded.")
}

/// Outcome of a transfer that passed its preconditions.
struct Applied {
    source: Account,
    destination: Account,
    committed: bool,
}

/// Raw transfer fields as decoded by the boundary layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransferRequest {
    pub source_account_id: Option<String>,
    pub destination_account_id: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub comment: Option<String>,
}

/// Entry points for transfers, deposits and withdrawals.
///
/// Resolves ids and parses the amount and currency, reserves the transaction
/// record, then hands over to the [`TransferExecutor`].
#[derive(Debug, Clone)]
pub struct TransferService {
    stores: StoreBundle,
    accounts: AccountRepository,
    executor: TransferExecutor,
}

impl TransferService {
    pub fn new(stores: StoreBundle, config: LedgerConfig) -> Self {
        Self {
            accounts: AccountRepository::new(stores.clone()),
            executor: TransferExecutor::new(stores.clone(), config),
            stores,
        }
    }

    #[cfg(test)]
    pub(crate) fn executor(&self) -> &TransferExecutor {
        &self.executor
    }

    pub fn transfer(&self, request: TransferRequest) -> LedgerResult<Transaction> {
        let source = self.leg("Source account", request.source_account_id.as_deref())?;
        let destination =
            self.leg("Destination account", request.destination_account_id.as_deref())?;
        let amount = parse_amount(request.amount.as_deref())?;
        let currency = match request.currency.as_deref() {
            Some(code) => code.parse::<Currency>()?,
            None => {
                return Err(LedgerError::validation(
                    "Currency cannot be empty or consist only of whitespaces.",
                ));
            }
        };

        let transaction = self.stores.transactions.create()?;
        {
            let mut tx = transaction.lock()?;
            tx.source = Some(source.snapshot()?);
            tx.destination = Some(destination.snapshot()?);
            tx.amount = amount;
            tx.currency = Some(currency);
            tx.comment = request.comment.unwrap_or_default();
        }

        self.executor.execute(&transaction, &source, &destination)
    }

    /// Move `amount` from the outside world into the account, in the
    /// account's own currency.
    pub fn deposit(&self, account_id: &str, amount: Option<&str>) -> LedgerResult<Transaction> {
        let target = self.accounts.get_by_id(account_id)?;
        self.transfer(TransferRequest {
            source_account_id: Some(AccountId::EXTERNAL.to_string()),
            destination_account_id: Some(target.id().to_string()),
            amount: amount.map(str::to_string),
            currency: target.currency.map(|c| c.code().to_string()),
            comment: Some("Deposit".to_string()),
        })
    }

    /// Move `amount` from the account to the outside world, in the account's
    /// own currency.
    pub fn withdraw(&self, account_id: &str, amount: Option<&str>) -> LedgerResult<Transaction> {
        let target = self.accounts.get_by_id(account_id)?;
        self.transfer(TransferRequest {
            source_account_id: Some(target.id().to_string()),
            destination_account_id: Some(AccountId::EXTERNAL.to_string()),
            amount: amount.map(str::to_string),
            currency: target.currency.map(|c| c.code().to_string()),
            comment: Some("Withdrawal".to_string()),
        })
    }

    /// The sentinel id resolves to [`Leg::External`] without a store lookup.
    fn leg(&self, label: &str, raw: Option<&str>) -> LedgerResult<Leg> {
        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Err(LedgerError::validation(format!("{label} ID cannot be empty."))),
        };
        match raw.parse::<AccountId>() {
            Ok(id) if id.is_external() => Ok(Leg::External),
            _ => Ok(Leg::Account(self.accounts.resolve(raw)?)),
        }
    }
}

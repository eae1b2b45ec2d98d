use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use remit_core::{AccountId, Currency, Entity, LedgerError, LedgerResult, TransactionId};

use crate::account::Account;

/// Transaction lifecycle.
///
/// `Created` is the only non-terminal state; it moves to exactly one of
/// `Executed` or `Failed` and never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Created,
    Executed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Created => "created",
            TransactionStatus::Executed => "executed",
            TransactionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Created)
    }
}

impl core::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of a single transfer attempt.
///
/// `source` and `destination` are independent snapshots taken when the
/// record is finalized; later changes to the live accounts do not reach them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    pub source: Option<Account>,
    pub destination: Option<Account>,
    pub amount: Decimal,
    pub currency: Option<Currency>,
    pub comment: String,
    status: TransactionStatus,
    created_at: DateTime<Utc>,
    executed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.executed_at
    }

    pub fn source_id(&self) -> Option<AccountId> {
        self.source.as_ref().map(|account| account.id())
    }

    pub fn destination_id(&self) -> Option<AccountId> {
        self.destination.as_ref().map(|account| account.id())
    }

    /// True when `account` is either leg of this transaction.
    pub fn involves(&self, account: AccountId) -> bool {
        self.source_id() == Some(account) || self.destination_id() == Some(account)
    }

    /// `Created -> Executed`, stamping the execution time.
    pub fn mark_executed(&mut self, at: DateTime<Utc>) -> LedgerResult<()> {
        self.ensure_pending()?;
        self.status = TransactionStatus::Executed;
        self.executed_at = Some(at);
        Ok(())
    }

    /// `Created -> Failed`. No execution time is recorded.
    pub fn mark_failed(&mut self) -> LedgerResult<()> {
        self.ensure_pending()?;
        self.status = TransactionStatus::Failed;
        Ok(())
    }

    fn ensure_pending(&self) -> LedgerResult<()> {
        if self.status.is_terminal() {
            return Err(LedgerError::internal(format!(
                "transaction {} is already {}",
                self.id, self.status
            )));
        }
        Ok(())
    }
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> TransactionId {
        self.id
    }

    fn reserve(id: TransactionId) -> Self {
        Self {
            id,
            source: None,
            destination: None,
            amount: Decimal::ZERO,
            currency: None,
            comment: String::new(),
            status: TransactionStatus::Created,
            created_at: Utc::now(),
            executed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transaction_is_created_without_execution_time() {
        let tx = Transaction::reserve(TransactionId::new());
        assert_eq!(tx.status(), TransactionStatus::Created);
        assert!(tx.executed_at().is_none());
    }

    #[test]
    fn executed_sets_timestamp_once() {
        let mut tx = Transaction::reserve(TransactionId::new());
        let now = Utc::now();
        tx.mark_executed(now).unwrap();
        assert_eq!(tx.status(), TransactionStatus::Executed);
        assert_eq!(tx.executed_at(), Some(now));

        let err = tx.mark_failed().unwrap_err();
        assert!(matches!(err, LedgerError::Internal(_)));
        assert_eq!(tx.status(), TransactionStatus::Executed);
    }

    #[test]
    fn failed_has_no_execution_time() {
        let mut tx = Transaction::reserve(TransactionId::new());
        tx.mark_failed().unwrap();
        assert_eq!(tx.status(), TransactionStatus::Failed);
        assert!(tx.executed_at().is_none());
        assert!(tx.mark_executed(Utc::now()).is_err());
    }

    #[test]
    fn involves_checks_both_legs() {
        let mut tx = Transaction::reserve(TransactionId::new());
        let source = Account::reserve(AccountId::new());
        let source_id = source.id();
        tx.source = Some(source);
        tx.destination = Some(Account::external());

        assert!(tx.involves(source_id));
        assert!(tx.involves(AccountId::EXTERNAL));
        assert!(!tx.involves(AccountId::new()));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionStatus::Executed).unwrap();
        assert_eq!(json, "\"executed\"");
    }
}

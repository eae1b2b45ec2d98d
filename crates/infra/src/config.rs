//! Ledger behaviour configuration.

use serde::Deserialize;

/// Tunables for the ledger core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Keep the transaction record (at status `created`) when a transfer is
    /// rejected by a precondition. When `false` the record is removed from
    /// the transaction store, so only terminal transactions persist.
    pub retain_rejected_transactions: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            retain_rejected_transactions: true,
        }
    }
}

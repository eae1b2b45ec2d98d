//! Ledger entities: users, accounts and transaction records.
//!
//! Pure domain types only: no IO, no locking, no persistence concerns. The
//! infrastructure layer owns the shared instances and their locks.

pub mod account;
pub mod transaction;
pub mod user;

pub use account::Account;
pub use transaction::{Transaction, TransactionStatus};
pub use user::User;

//! `remit-core`: ledger foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, typed identifiers, the entity contract and money values.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::{Entity, EntityId};
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use id::{AccountId, TransactionId, UserId};
pub use money::{parse_amount, parse_balance, require_text, Currency};

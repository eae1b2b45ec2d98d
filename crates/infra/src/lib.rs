//! Infrastructure layer: concurrent in-memory stores, repositories and the
//! transfer engine that runs on top of them.

pub mod config;
pub mod entity_store;
pub mod ledger;
pub mod repository;
pub mod seed;
pub mod stores;
pub mod transfer;


pub use config::LedgerConfig;
pub use ledger::Ledger;
pub use repository::{AccountDraft, UserDraft};
pub use stores::StoreBundle;
pub use transfer::{Leg, TransferExecutor, TransferRequest, TransferService};

//! Repositories: domain rules layered over the entity stores.
//!
//! Every read returns an independent copy; every write happens under the
//! entity's own lock and ends with a `commit`. Store failures surface as
//! `LedgerError::Internal`.

use core::str::FromStr;

use remit_core::{Entity, LedgerError, LedgerResult};

use crate::entity_store::{EntityHandle, EntityStore};

pub mod accounts;
pub mod transactions;
pub mod users;

pub use accounts::{AccountDraft, AccountRepository};
pub use transactions::TransactionRepository;
pub use users::{UserDraft, UserRepository};

/// Resolve a caller-supplied id to the live handle.
///
/// Blank → validation error. Unparseable or unknown → not found: an id that
/// cannot be parsed cannot name a stored entity either.
pub(crate) fn resolve<T>(
    store: &dyn EntityStore<T>,
    label: &str,
    raw: &str,
) -> LedgerResult<EntityHandle<T>>
where
    T: Entity,
    T::Id: FromStr,
{
    if raw.trim().is_empty() {
        return Err(LedgerError::validation(format!("{label} ID cannot be empty.")));
    }

    let not_found = || {
        LedgerError::not_found(format!(
            "No {} found with ID: {raw}",
            label.to_lowercase()
        ))
    };

    let id = T::Id::from_str(raw.trim()).map_err(|_| not_found())?;
    store.get(id)?.ok_or_else(not_found)
}

/// Ascending creation time, ties broken by id so listings are deterministic.
pub(crate) fn sort_by_creation<T, K>(items: &mut [T], created_at: impl Fn(&T) -> K)
where
    T: Entity,
    K: Ord,
{
    items.sort_by(|a, b| {
        created_at(a)
            .cmp(&created_at(b))
            .then_with(|| a.id().cmp(&b.id()))
    });
}

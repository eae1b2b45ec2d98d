use thiserror::Error;

use remit_core::{Entity, LedgerError};

use super::handle::EntityHandle;

/// Entity store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors
/// (validation, not-found, forbidden). Callers surface them as
/// [`LedgerError::Internal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `commit` found no entry for the id: the entity was deleted after it
    /// was retrieved, or it was never reserved through `create`.
    #[error("no stored entry for id {0}")]
    Missing(String),

    /// A lock guarding the map or an entity was poisoned by a panicking holder.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        LedgerError::internal(format!("An error occurred, please try again. ({err})"))
    }
}

/// Concurrent-safe keyed collection for one entity kind.
///
/// ## Semantics
///
/// - `list()`: copies of all current entities, unspecified order.
/// - `get(id)`: the live shared handle, or `None`.
/// - `create()`: reserve a fresh unique id (regenerated on collision) and
///   insert a default-initialized entity under it.
/// - `commit(handle)`: confirm an entry still exists for the handle's id and
///   write the handle back. A no-op when the stored entry is already this
///   exact instance; fails with [`StoreError::Missing`] when the entry is gone.
/// - `delete(handle)`: remove the entry for the handle's id. Idempotent.
pub trait EntityStore<T: Entity>: Send + Sync {
    fn list(&self) -> Result<Vec<T>, StoreError>;

    fn get(&self, id: T::Id) -> Result<Option<EntityHandle<T>>, StoreError>;

    fn create(&self) -> Result<EntityHandle<T>, StoreError>;

    fn commit(&self, entity: &EntityHandle<T>) -> Result<(), StoreError>;

    fn delete(&self, entity: &EntityHandle<T>) -> Result<(), StoreError>;
}

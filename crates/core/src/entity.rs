//! Entity trait: identity + continuity across state changes.

use core::fmt::{Debug, Display};
use core::hash::Hash;

/// Identifier of a stored entity.
///
/// Identifiers are totally ordered; the ordering is what multi-entity
/// operations use to acquire locks without deadlocking.
pub trait EntityId: Copy + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static {
    /// Generate a fresh, random identifier. Uniqueness within a store is
    /// enforced by the store, which regenerates on collision.
    fn generate() -> Self;
}

/// Entity marker + minimal interface.
pub trait Entity: Clone + Debug + Send + 'static {
    /// Strongly-typed entity identifier.
    type Id: EntityId;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Default-initialized entity reserved under `id`.
    ///
    /// Stores call this from `create`; callers populate the remaining fields
    /// under the entity's lock and then commit.
    fn reserve(id: Self::Id) -> Self;
}

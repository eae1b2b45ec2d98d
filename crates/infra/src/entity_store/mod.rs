//! Concurrent keyed storage for one entity kind.
//!
//! Stores hold **live shared instances**: every entity sits behind its own
//! lock in an [`EntityHandle`], and `get` hands out that same handle. Mutating
//! a field under the handle's lock is immediately visible to every other
//! holder; `commit` is the consistency check that the entity still exists.

pub mod handle;
pub mod in_memory;
pub mod r#trait;

pub use handle::EntityHandle;
pub use in_memory::InMemoryEntityStore;
pub use r#trait::{EntityStore, StoreError};

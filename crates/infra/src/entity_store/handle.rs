use std::sync::{Arc, Mutex, MutexGuard};

use remit_core::Entity;

use super::r#trait::StoreError;

/// Shared, lock-guarded reference to one live entity.
///
/// Cloning a handle clones the reference, not the entity. The id is cached
/// outside the lock because it never changes after reservation, which lets
/// callers order locks by id without touching the entity.
#[derive(Debug)]
pub struct EntityHandle<T: Entity> {
    id: T::Id,
    cell: Arc<Mutex<T>>,
}

impl<T: Entity> Clone for EntityHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Entity> EntityHandle<T> {
    pub fn new(entity: T) -> Self {
        Self {
            id: entity.id(),
            cell: Arc::new(Mutex::new(entity)),
        }
    }

    pub fn id(&self) -> T::Id {
        self.id
    }

    /// Acquire the entity's own lock. Required before reading more than the
    /// id or mutating any field.
    pub fn lock(&self) -> Result<MutexGuard<'_, T>, StoreError> {
        self.cell
            .lock()
            .map_err(|_| StoreError::Poisoned(self.id.to_string()))
    }

    /// Independent copy of the entity, taken under its lock.
    pub fn snapshot(&self) -> Result<T, StoreError> {
        Ok(self.lock()?.clone())
    }

    /// True when both handles refer to the exact same live instance.
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remit_core::{Entity, UserId};
    use remit_ledger::User;

    #[test]
    fn clones_share_the_instance() {
        let handle = EntityHandle::new(User::reserve(UserId::new()));
        let other = handle.clone();
        other.lock().unwrap().name = "John Doe".to_string();

        assert!(handle.same_instance(&other));
        assert_eq!(handle.lock().unwrap().name, "John Doe");
    }

    #[test]
    fn snapshots_are_independent() {
        let handle = EntityHandle::new(User::reserve(UserId::new()));
        let mut copy = handle.snapshot().unwrap();
        copy.name = "changed".to_string();

        assert_eq!(handle.lock().unwrap().name, "");
    }

    #[test]
    fn equal_content_is_not_the_same_instance() {
        let user = User::reserve(UserId::new());
        let a = EntityHandle::new(user.clone());
        let b = EntityHandle::new(user);
        assert_eq!(a.id(), b.id());
        assert!(!a.same_instance(&b));
    }
}

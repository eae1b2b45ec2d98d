use std::collections::HashMap;
use std::sync::RwLock;

use remit_core::{Entity, EntityId};

use super::handle::EntityHandle;
use super::r#trait::{EntityStore, StoreError};

/// In-memory entity store. Lives for the process lifetime only.
///
/// The map lock is held only for the duration of a single map operation;
/// it is never held while waiting on an entity lock.
#[derive(Debug)]
pub struct InMemoryEntityStore<T: Entity> {
    entries: RwLock<HashMap<T::Id, EntityHandle<T>>>,
}

impl<T: Entity> InMemoryEntityStore<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Entity> Default for InMemoryEntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Poisoned("entity map".to_string())
}

impl<T: Entity> EntityStore<T> for InMemoryEntityStore<T> {
    fn list(&self) -> Result<Vec<T>, StoreError> {
        let handles: Vec<EntityHandle<T>> = {
            let entries = self.entries.read().map_err(|_| poisoned())?;
            entries.values().cloned().collect()
        };

        handles.iter().map(EntityHandle::snapshot).collect()
    }

    fn get(&self, id: T::Id) -> Result<Option<EntityHandle<T>>, StoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(&id).cloned())
    }

    fn create(&self) -> Result<EntityHandle<T>, StoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        let mut id = T::Id::generate();
        while entries.contains_key(&id) {
            tracing::debug!(%id, "id collision, regenerating");
            id = T::Id::generate();
        }

        let handle = EntityHandle::new(T::reserve(id));
        entries.insert(id, handle.clone());
        tracing::debug!(%id, "entity reserved");
        Ok(handle)
    }

    fn commit(&self, entity: &EntityHandle<T>) -> Result<(), StoreError> {
        let id = entity.id();
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        match entries.get(&id) {
            Some(stored) if stored.same_instance(entity) => Ok(()),
            Some(_) => {
                entries.insert(id, entity.clone());
                tracing::debug!(%id, "entity replaced on commit");
                Ok(())
            }
            None => {
                tracing::warn!(%id, "commit rejected: entity no longer stored");
                Err(StoreError::Missing(id.to_string()))
            }
        }
    }

    fn delete(&self, entity: &EntityHandle<T>) -> Result<(), StoreError> {
        let id = entity.id();
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if entries.remove(&id).is_some() {
            tracing::debug!(%id, "entity deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use remit_core::UserId;
    use remit_ledger::User;

    #[test]
    fn create_reserves_unique_ids() {
        let store = InMemoryEntityStore::<User>::new();
        let a = store.create().unwrap();
        let b = store.create().unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn get_returns_the_live_instance() {
        let store = InMemoryEntityStore::<User>::new();
        let created = store.create().unwrap();
        created.lock().unwrap().name = "Kate".to_string();

        let fetched = store.get(created.id()).unwrap().unwrap();
        assert!(fetched.same_instance(&created));
        assert_eq!(fetched.lock().unwrap().name, "Kate");
    }

    #[test]
    fn get_unknown_id_is_none() {
        let store = InMemoryEntityStore::<User>::new();
        assert!(store.get(UserId::new()).unwrap().is_none());
    }

    #[test]
    fn commit_same_instance_is_noop() {
        let store = InMemoryEntityStore::<User>::new();
        let handle = store.create().unwrap();
        {
            let mut user = handle.lock().unwrap();
            user.name = "John".to_string();
            store.commit(&handle).unwrap();
        }
        assert_eq!(store.list().unwrap()[0].name, "John");
    }

    #[test]
    fn commit_after_delete_fails() {
        let store = InMemoryEntityStore::<User>::new();
        let handle = store.create().unwrap();
        store.delete(&handle).unwrap();

        let err = store.commit(&handle).unwrap_err();
        assert_eq!(err, StoreError::Missing(handle.id().to_string()));
        assert!(store.is_empty());
    }

    #[test]
    fn commit_of_never_reserved_entity_fails() {
        let store = InMemoryEntityStore::<User>::new();
        let stray = EntityHandle::new(User::reserve(UserId::new()));
        assert!(matches!(store.commit(&stray), Err(StoreError::Missing(_))));
    }

    #[test]
    fn commit_of_foreign_instance_replaces_entry() {
        let store = InMemoryEntityStore::<User>::new();
        let handle = store.create().unwrap();
        let mut copy = handle.snapshot().unwrap();
        copy.name = "replacement".to_string();
        let foreign = EntityHandle::new(copy);

        store.commit(&foreign).unwrap();
        let stored = store.get(handle.id()).unwrap().unwrap();
        assert!(stored.same_instance(&foreign));
        assert_eq!(stored.lock().unwrap().name, "replacement");
    }

    #[test]
    fn delete_is_idempotent() {
        let store = InMemoryEntityStore::<User>::new();
        let handle = store.create().unwrap();
        store.delete(&handle).unwrap();
        store.delete(&handle).unwrap();
        assert!(store.get(handle.id()).unwrap().is_none());
    }

    #[test]
    fn list_returns_copies() {
        let store = InMemoryEntityStore::<User>::new();
        let handle = store.create().unwrap();
        let mut listed = store.list().unwrap();
        listed[0].name = "mutated copy".to_string();
        assert_eq!(handle.lock().unwrap().name, "");
    }

    #[test]
    fn concurrent_creates_never_collide() {
        let store = Arc::new(InMemoryEntityStore::<User>::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.create().unwrap();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(store.len(), 800);
    }
}

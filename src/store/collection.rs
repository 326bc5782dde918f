use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Store, StoreError};

/// One typed list per resource, with a cached decoded copy and a single
/// mutation entry point. Every mutation re-reads the persisted list, applies
/// the caller's transform, overwrites the whole document, and drops the
/// cache. Overlapping writers are last-write-wins; sequential callers always
/// observe each other's results.
pub struct Collection<T> {
    resource: &'static str,
    store: Option<Rc<Store>>,
    cache: RefCell<Option<Vec<T>>>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn bound(resource: &'static str, store: Rc<Store>) -> Self {
        Self {
            resource,
            store: Some(store),
            cache: RefCell::new(None),
        }
    }

    /// Storage not set up yet: reads stay empty and perform no I/O, while
    /// mutations refuse with an explicit error.
    #[allow(dead_code)]
    pub fn unbound(resource: &'static str) -> Self {
        Self {
            resource,
            store: None,
            cache: RefCell::new(None),
        }
    }

    pub fn read(&self) -> Result<Vec<T>, StoreError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(Vec::new());
        };
        if let Some(cached) = self.cache.borrow().as_ref() {
            return Ok(cached.clone());
        }
        let loaded = store
            .read_document::<Vec<T>>(self.resource)?
            .unwrap_or_default();
        *self.cache.borrow_mut() = Some(loaded.clone());
        Ok(loaded)
    }

    /// The sole write path. A mutation is never a silent no-op: without a
    /// bound store it fails, and on success the transform ran against the
    /// freshly persisted list, not the cache.
    pub fn mutate<F>(&self, transform: F) -> Result<Vec<T>, StoreError>
    where
        F: FnOnce(Vec<T>) -> Vec<T>,
    {
        let Some(store) = self.store.as_ref() else {
            return Err(StoreError::Unbound {
                resource: self.resource.to_string(),
            });
        };
        let current = store
            .read_document::<Vec<T>>(self.resource)?
            .unwrap_or_default();
        let next = transform(current);
        store.write_document(self.resource, &next)?;
        self.cache.borrow_mut().take();
        Ok(next)
    }

    pub fn invalidate(&self) {
        self.cache.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::rc::Rc;

    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    use super::Collection;
    use crate::store::{Store, StoreError};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "camelCase")]
    struct Record {
        id: String,
        created_at: String,
        #[serde(default)]
        label: String,
    }

    fn record(id: &str, label: &str) -> Record {
        Record {
            id: id.to_string(),
            created_at: "2026-03-01T10:00:00Z".to_string(),
            label: label.to_string(),
        }
    }

    fn unique_store() -> (PathBuf, Rc<Store>) {
        let root = std::env::temp_dir().join(format!("sitebook-coll-{}", Uuid::now_v7()));
        let store = Store::open_directory(&root).expect("root should open");
        (root, Rc::new(store))
    }

    #[test]
    fn read_treats_missing_document_as_empty() {
        let (root, store) = unique_store();
        let collection: Collection<Record> = Collection::bound("tasks", store);
        assert!(collection.read().expect("read should succeed").is_empty());
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn mutate_round_trips_records() {
        let (root, store) = unique_store();
        let collection: Collection<Record> = Collection::bound("tasks", store);

        let written = collection
            .mutate(|mut list| {
                list.push(record("t1", "pour foundation"));
                list
            })
            .expect("mutate should succeed");
        assert_eq!(written.len(), 1);

        let read_back = collection.read().expect("read should succeed");
        assert_eq!(read_back, written);

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn sequential_mutations_observe_prior_results() {
        let (root, store) = unique_store();
        let collection: Collection<Record> = Collection::bound("tasks", store);

        collection
            .mutate(|mut list| {
                list.push(record("t1", "first"));
                list
            })
            .expect("first mutate should succeed");
        let second = collection
            .mutate(|mut list| {
                assert_eq!(list.len(), 1, "second transform must see the first result");
                list.push(record("t2", "second"));
                list
            })
            .expect("second mutate should succeed");

        assert_eq!(second.len(), 2);
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn mutate_bypasses_a_stale_cache() {
        let (root, store) = unique_store();
        let collection: Collection<Record> = Collection::bound("tasks", Rc::clone(&store));
        let _ = collection.read().expect("prime the cache");

        // A second writer lands a record behind the cache's back.
        let other: Collection<Record> = Collection::bound("tasks", store);
        other
            .mutate(|mut list| {
                list.push(record("t9", "out of band"));
                list
            })
            .expect("out-of-band mutate should succeed");

        let merged = collection
            .mutate(|mut list| {
                assert_eq!(list.len(), 1, "transform input must be the persisted list");
                list.push(record("t2", "mine"));
                list
            })
            .expect("mutate should succeed");
        assert_eq!(merged.len(), 2);

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn unbound_collection_reads_empty_and_refuses_mutations() {
        let collection: Collection<Record> = Collection::unbound("tasks");
        assert!(collection.read().expect("read should succeed").is_empty());

        let result = collection.mutate(|list| list);
        match result {
            Err(StoreError::Unbound { resource }) => assert_eq!(resource, "tasks"),
            other => panic!("expected unbound error, got {other:?}"),
        }
    }

    #[test]
    fn cache_is_invalidated_after_every_successful_mutation() {
        let (root, store) = unique_store();
        let collection: Collection<Record> = Collection::bound("tasks", store);

        let _ = collection.read().expect("prime the cache");
        collection
            .mutate(|mut list| {
                list.push(record("t1", "fresh"));
                list
            })
            .expect("mutate should succeed");

        let read_back = collection.read().expect("read should succeed");
        assert_eq!(read_back.len(), 1, "read after mutate must reflect the write");

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn hand_edited_documents_with_extra_fields_still_load() {
        let (root, store) = unique_store();
        std::fs::write(
            root.join("tasks.json"),
            br#"[{"id":"t1","createdAt":"2026-03-01T10:00:00Z","surprise":true}]"#,
        )
        .expect("seed write");

        let collection: Collection<Record> = Collection::bound("tasks", store);
        let list = collection.read().expect("read should succeed");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].label, "");

        let _ = std::fs::remove_dir_all(root);
    }
}

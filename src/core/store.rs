//! Serialized load-modify-save cycles over a storage backend.

use std::sync::Mutex;

use crate::{domain::Document, errors::CoreResult, storage::StorageBackend};

/// Wraps a backend so that every mutating operation is a whole-document
/// read-modify-write transaction under a single writer lock. Concurrent
/// updates therefore always observe each other's effects; no write can be
/// silently lost.
pub struct DocumentStore<S: StorageBackend> {
    backend: S,
    write_lock: Mutex<()>,
}

impl<S: StorageBackend> DocumentStore<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Loads a snapshot for display without taking the write lock. The
    /// result may be stale by one in-flight write, which is acceptable for
    /// read-only views.
    pub fn read(&self) -> CoreResult<Document> {
        self.backend.load()
    }

    /// Runs `f` against the current document and persists the result. A
    /// failed closure aborts the cycle and leaves storage untouched.
    pub fn update<T, F>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&mut Document) -> CoreResult<T>,
    {
        // A poisoned lock only means an earlier writer panicked before its
        // save; the on-disk document is still consistent, so continue.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut document = self.backend.load()?;
        let value = f(&mut document)?;
        self.backend.save(&document)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::AccountService,
        errors::{CoreError, CoreResult},
    };
    use std::sync::Mutex as StdMutex;

    /// In-memory backend for exercising the transaction cycle.
    #[derive(Default)]
    struct MemoryBackend {
        document: StdMutex<Document>,
    }

    impl StorageBackend for MemoryBackend {
        fn load(&self) -> CoreResult<Document> {
            Ok(self
                .document
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone())
        }

        fn save(&self, document: &Document) -> CoreResult<()> {
            *self
                .document
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = document.clone();
            Ok(())
        }
    }

    #[test]
    fn update_persists_the_modified_document() {
        let store = DocumentStore::new(MemoryBackend::default());
        store
            .update(|document| AccountService::register(document, "alice", "a@example.com", "pw"))
            .expect("update succeeds");
        let document = store.read().expect("read succeeds");
        assert!(document.user("alice").is_some());
    }

    #[test]
    fn failed_closure_leaves_storage_untouched() {
        let store = DocumentStore::new(MemoryBackend::default());
        store
            .update(|document| AccountService::register(document, "alice", "a@example.com", "pw"))
            .expect("seed user");

        let err = store
            .update(|document| {
                document.users.clear();
                Err::<(), _>(CoreError::Validation("boom".into()))
            })
            .expect_err("closure error propagates");
        assert!(matches!(err, CoreError::Validation(_)));

        let document = store.read().expect("read succeeds");
        assert_eq!(document.users.len(), 1, "aborted cycle must not persist");
    }

    #[test]
    fn sequential_updates_compose() {
        let store = DocumentStore::new(MemoryBackend::default());
        for name in ["alice", "bob", "carol"] {
            store
                .update(|document| {
                    AccountService::register(document, name, &format!("{name}@example.com"), "pw")
                })
                .expect("register");
        }
        assert_eq!(store.read().expect("read").users.len(), 3);
    }
}

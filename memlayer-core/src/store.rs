//! Main record store interface.
//!
//! [`RecordStore`] owns a backend and hands out [`Collection`] handles, either raw
//! (records in, records out) or typed through an [`Entity`].
//!
//! # Example
//!
//! ```ignore
//! use memlayer::store::RecordStore;
//!
//! let store = RecordStore::new(backend);
//! let content = store.collection("Content");
//! let id = content.create(doc! { "name": "bar0", "ownerId": 42 }).await?;
//! ```

use crate::{
    backend::StoreBackend,
    collection::Collection,
    error::RecordStoreResult,
    hydrate::{EntityHydrator, Hydrator, RawHydrator},
    record::Entity,
};

/// A record store bound to a specific backend implementation.
#[derive(Debug)]
pub struct RecordStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> RecordStore<B> {
    /// Creates a new record store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gets a raw collection with the given name.
    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a, B, RawHydrator> {
        Collection::new(name.to_string(), &self.backend)
    }

    /// Gets a typed collection for the specified entity type.
    ///
    /// The collection name is determined by the entity's `collection_name()`.
    pub fn typed_collection<'a, E: Entity>(&'a self) -> Collection<'a, B, EntityHydrator<E>> {
        Collection::with_parts(
            E::collection_name().to_string(),
            &self.backend,
            EntityHydrator::new(),
        )
    }

    /// Gets a collection whose results are produced by `hydrator`.
    pub fn hydrated_collection<'a, H: Hydrator>(
        &'a self,
        name: &str,
        hydrator: H,
    ) -> Collection<'a, B, H> {
        Collection::with_parts(name.to_string(), &self.backend, hydrator)
    }

    /// Lists all collections in the store.
    pub async fn list_collections(&self) -> RecordStoreResult<Vec<String>> {
        self.backend.list_collections().await
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> RecordStoreResult<()> {
        self.backend.shutdown().await?;

        Ok(())
    }
}

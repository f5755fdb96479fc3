//! In-memory storage implementation for record stores.
//!
//! This module provides the in-memory backend: per-collection record tables and their
//! id sequences, held behind a single async-safe read-write lock.

use std::sync::Arc;
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::Bson;
use serde_json::Value;
use tracing::debug;

use memlayer_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::RecordStoreResult,
    query::{Filter, Query},
    record::{Record, RecordId},
};

use crate::{engine::QueryEngine, mutator, seed::SeedData, table::RecordTables};


/// Thread-safe in-memory record storage backend.
///
/// This struct implements the [`StoreBackend`] trait on top of plain in-memory
/// tables. Records are kept in creation order and every collection carries its own
/// id sequence starting at 1.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data. All state sits behind one read-write lock, so
/// reads run concurrently and each write (a create or an update, including its id
/// assignment) is atomic with respect to every other operation.
///
/// # Performance
///
/// Filtered queries scan the whole collection; loads by id use an index.
///
/// # Example
///
/// ```ignore
/// use memlayer_memory::InMemoryStore;
/// use memlayer::backend::StoreBackend;
/// use bson::{Bson, doc};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let id = store.create_record(doc! { "name": "bar0" }, "Content").await?;
///     let record = store.load_record(Bson::Int64(id), "Content").await?;
///     assert!(record.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    tables: Arc<RwLock<RecordTables>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory record store.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(RecordTables::new())),
        }
    }

    /// Creates a store holding the given seed data.
    ///
    /// # Errors
    ///
    /// Returns [`Initialization`](memlayer_core::error::RecordStoreError::Initialization)
    /// if the seed holds duplicate ids within a collection.
    pub fn with_seed(seed: SeedData) -> RecordStoreResult<Self> {
        let tables = seed.into_tables()?;

        debug!(collections = tables.collection_names().len(), "seeded in-memory store");

        Ok(Self {
            tables: Arc::new(RwLock::new(tables)),
        })
    }

    /// Creates a builder for constructing an `InMemoryStore` with custom options.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use memlayer_memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::builder()
    ///     .json_seed(fixture)
    ///     .build()
    ///     .await?;
    /// ```
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn create_record(&self, fields: Record, collection: &str) -> RecordStoreResult<RecordId> {
        let id = self.tables
            .write()
            .await
            .create(collection, fields)?;

        debug!(collection, id, "created record");

        Ok(id)
    }

    async fn list_records(&self, collection: &str) -> RecordStoreResult<Vec<Record>> {
        Ok(
            self.tables
                .read()
                .await
                .records(collection)
                .to_vec()
        )
    }

    async fn find_records(&self, query: Query, collection: &str) -> RecordStoreResult<Vec<Record>> {
        let tables = self.tables.read().await;

        Ok(QueryEngine::new(&tables).find(collection, &query.filter, &query.joins))
    }

    async fn count_records(&self, filter: Filter, collection: &str) -> RecordStoreResult<usize> {
        let tables = self.tables.read().await;

        Ok(QueryEngine::new(&tables).count(collection, &filter))
    }

    async fn load_record(&self, id: Bson, collection: &str) -> RecordStoreResult<Option<Record>> {
        let tables = self.tables.read().await;

        Ok(QueryEngine::new(&tables).load(collection, &id))
    }

    async fn update_record(
        &self,
        id: Bson,
        fields: Record,
        collection: &str,
    ) -> RecordStoreResult<bool> {
        let mut tables = self.tables.write().await;

        Ok(mutator::update(&mut tables, collection, &id, fields))
    }

    async fn list_collections(&self) -> RecordStoreResult<Vec<String>> {
        Ok(
            self.tables
                .read()
                .await
                .collection_names()
        )
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// Seed data given through [`seed`](InMemoryStoreBuilder::seed) and
/// [`json_seed`](InMemoryStoreBuilder::json_seed) is merged; records for the same
/// collection are appended in the order they were supplied.
///
/// # Example
///
/// ```ignore
/// use memlayer_memory::{InMemoryStore, SeedData};
/// use memlayer::backend::StoreBackendBuilder;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryStore::builder()
///         .seed(SeedData::new().with_collection("Content\\Section", []))
///         .build()
///         .await
///         .unwrap();
/// }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStoreBuilder {
    seed: SeedData,
    json_seeds: Vec<Value>,
}

impl InMemoryStoreBuilder {
    /// Adds seed records.
    pub fn seed(mut self, seed: SeedData) -> Self {
        self.seed = self.seed.merge(seed);
        self
    }

    /// Adds seed records from a JSON object keyed by collection name.
    ///
    /// The value is validated when the store is built.
    pub fn json_seed(mut self, value: Value) -> Self {
        self.json_seeds.push(value);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds the store, loading all configured seed data.
    async fn build(self) -> RecordStoreResult<Self::Backend> {
        let mut seed = self.seed;

        for value in self.json_seeds {
            seed = seed.merge(SeedData::from_json_value(value)?);
        }

        InMemoryStore::with_seed(seed)
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use serde_json::json;

    use memlayer_core::{
        error::RecordStoreError,
        query::{Join, JoinSpec},
    };

    use super::*;

    fn fixture() -> Value {
        json!({
            "Content": [{ "id": 1, "name": "eZ Publish" }],
            "Content\\Location": [{ "id": 2, "contentId": 1 }],
        })
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryStore::new();
        let clone = store.clone();

        let id = store.create_record(doc! { "name": "bar0" }, "Content").await.unwrap();

        assert_eq!(id, 1);
        assert_eq!(clone.list_records("Content").await.unwrap().len(), 1);
        assert_eq!(clone.list_collections().await.unwrap(), vec!["Content".to_string()]);
    }

    #[tokio::test]
    async fn builder_loads_json_seed() {
        let store = InMemoryStore::builder()
            .json_seed(fixture())
            .build()
            .await
            .unwrap();

        let location = store.load_record(Bson::String("2".into()), "Content\\Location").await.unwrap();
        assert_eq!(location.and_then(|r| r.get_i64("contentId").ok()), Some(1));

        let id = store.create_record(doc! { "name": "Users" }, "Content").await.unwrap();
        assert_eq!(id, 2);
    }

    #[tokio::test]
    async fn builder_rejects_bad_seed() {
        let err = InMemoryStore::builder()
            .json_seed(json!({ "Content": "nope" }))
            .build()
            .await
            .unwrap_err();

        assert!(matches!(err, RecordStoreError::Initialization(_)));
    }

    #[tokio::test]
    async fn find_count_and_update() {
        let store = InMemoryStore::builder().json_seed(fixture()).build().await.unwrap();

        let query = Query::builder()
            .filter(Filter::matching("id", "1"))
            .joins(JoinSpec::new().with("locations", Join::new("Content\\Location").on("contentId", "id")))
            .build();
        let found = store.find_records(query, "Content").await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_array("locations").map(Vec::len).ok(), Some(1));
        assert_eq!(store.count_records(Filter::matching("id", 1), "Content").await.unwrap(), 1);

        assert!(store.update_record(Bson::Int32(1), doc! { "name": "Testing" }, "Content").await.unwrap());
        assert!(!store.update_record(Bson::Int32(0), doc! { "name": "Testing" }, "Content").await.unwrap());

        let stored = store.list_records("Content").await.unwrap();
        assert_eq!(stored, vec![doc! { "id": 1_i64, "name": "Testing" }]);
    }
}

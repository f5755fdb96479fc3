//! Storage backend abstraction for the record store.
//!
//! This module defines the traits that abstract over record storage implementations.
//! Backends work on raw [`Record`]s; hydration into caller-facing values happens in
//! the [`collection`](crate::collection) layer.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Not found is not an error
//!
//! Unknown collections behave like empty ones, `load_record` signals a missing record
//! with `None` and `update_record` with `false`. Errors are reserved for failures of
//! the backend itself.

use async_trait::async_trait;
use bson::Bson;
use std::fmt::Debug;

use crate::{
    error::RecordStoreResult,
    query::{Filter, Query},
    record::{Record, RecordId},
};

/// Abstract interface for record storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. How concurrent callers are serialized is up
/// to the implementation and should be documented by it.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Creates a record in `collection` and returns its newly assigned identifier.
    ///
    /// Identifiers are assigned from a per-collection sequence starting at 1 and are
    /// never reused. The collection is created on first use. An `id` present in
    /// `fields` is replaced by the assigned one. Fails with a backend error once the
    /// collection's sequence would pass `i64::MAX`.
    async fn create_record(&self, fields: Record, collection: &str) -> RecordStoreResult<RecordId>;

    /// Returns every record of `collection` in creation order.
    ///
    /// Unknown collections yield an empty vector.
    async fn list_records(&self, collection: &str) -> RecordStoreResult<Vec<Record>>;

    /// Returns the records of `collection` matching the query's filter, in creation
    /// order, with the query's joins resolved and embedded.
    async fn find_records(&self, query: Query, collection: &str) -> RecordStoreResult<Vec<Record>>;

    /// Counts the records of `collection` matching `filter`.
    ///
    /// Always equal to the length of the corresponding `find_records` result, but
    /// computed without resolving joins.
    async fn count_records(&self, filter: Filter, collection: &str) -> RecordStoreResult<usize>;

    /// Looks a record up by its identifier.
    ///
    /// `id` is coerced with [`coerce_id`](crate::record::coerce_id); values that do
    /// not coerce, or that name no record, yield `None`.
    async fn load_record(&self, id: Bson, collection: &str) -> RecordStoreResult<Option<Record>>;

    /// Merges `fields` into the record identified by `id`.
    ///
    /// Returns `false` without touching the store when no such record exists.
    async fn update_record(
        &self,
        id: Bson,
        fields: Record,
        collection: &str,
    ) -> RecordStoreResult<bool>;

    /// Lists the names of all collections known to the store.
    async fn list_collections(&self) -> RecordStoreResult<Vec<String>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> RecordStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn create_record(&self, fields: Record, collection: &str) -> RecordStoreResult<RecordId> {
        (*self).create_record(fields, collection).await
    }

    async fn list_records(&self, collection: &str) -> RecordStoreResult<Vec<Record>> {
        (*self).list_records(collection).await
    }

    async fn find_records(&self, query: Query, collection: &str) -> RecordStoreResult<Vec<Record>> {
        (*self).find_records(query, collection).await
    }

    async fn count_records(&self, filter: Filter, collection: &str) -> RecordStoreResult<usize> {
        (*self).count_records(filter, collection).await
    }

    async fn load_record(&self, id: Bson, collection: &str) -> RecordStoreResult<Option<Record>> {
        (*self).load_record(id, collection).await
    }

    async fn update_record(
        &self,
        id: Bson,
        fields: Record,
        collection: &str,
    ) -> RecordStoreResult<bool> {
        (*self)
            .update_record(id, fields, collection)
            .await
    }

    async fn list_collections(&self) -> RecordStoreResult<Vec<String>> {
        (*self).list_collections().await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> RecordStoreResult<Self::Backend>;
}

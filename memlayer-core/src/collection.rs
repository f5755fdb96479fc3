//! Collection handles for record store operations.
//!
//! A [`Collection`] binds a collection name, a backend reference and a [`Hydrator`].
//! Raw collections use [`RawHydrator`] and return [`Record`]s; typed collections use
//! [`EntityHydrator`] and return entities. Any other hydrator can be plugged in with
//! [`Collection::with_hydrator`].
//!
//! # Example
//!
//! ```ignore
//! use memlayer::prelude::*;
//!
//! # async fn example(store: &RecordStore<impl StoreBackend>) -> RecordStoreResult<()> {
//! let content = store.typed_collection::<Content>();
//!
//! let found = content
//!     .find(
//!         Query::builder()
//!             .filter(Filter::matching("id", 1))
//!             .join("locations", Join::new("Content\\Location").on("contentId", "id"))
//!             .build(),
//!     )
//!     .await?;
//! # Ok(()) }
//! ```

use bson::Bson;

use crate::{
    backend::StoreBackend,
    error::RecordStoreResult,
    hydrate::{Hydrator, RawHydrator},
    query::{Filter, Query},
    record::{Record, RecordId},
};

/// A named collection bound to a backend and a hydrator.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the backend reference
/// * `B` - The storage backend type
/// * `H` - The hydrator applied to records returned by `find` and `load`
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend, H: Hydrator = RawHydrator> {
    name: String,
    backend: &'a B,
    hydrator: H,
}

impl<'a, B: StoreBackend> Collection<'a, B, RawHydrator> {
    /// Creates a new raw collection reference (internal use).
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, hydrator: RawHydrator }
    }
}

impl<'a, B: StoreBackend, H: Hydrator> Collection<'a, B, H> {
    pub(crate) fn with_parts(name: String, backend: &'a B, hydrator: H) -> Self {
        Self { name, backend, hydrator }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the same collection with a different hydrator.
    pub fn with_hydrator<T: Hydrator>(self, hydrator: T) -> Collection<'a, B, T> {
        Collection {
            name: self.name,
            backend: self.backend,
            hydrator,
        }
    }

    /// Creates a record and returns its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordStoreError`](crate::error::RecordStoreError) if the backend fails.
    pub async fn create(&self, fields: Record) -> RecordStoreResult<RecordId> {
        self.backend
            .create_record(fields, self.name())
            .await
    }

    /// Returns every record of the collection in creation order, without hydration.
    pub async fn records(&self) -> RecordStoreResult<Vec<Record>> {
        self.backend.list_records(self.name()).await
    }

    /// Finds the records matching `query`, resolves its joins and hydrates each result.
    ///
    /// Results are in creation order, which is ascending identifier order. A query
    /// that matches nothing yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordStoreError`](crate::error::RecordStoreError) if the backend or
    /// the hydrator fails.
    pub async fn find(&self, query: impl Into<Query>) -> RecordStoreResult<Vec<H::Output>> {
        self.backend
            .find_records(query.into(), self.name())
            .await?
            .into_iter()
            .map(|record| self.hydrator.hydrate(self.name(), record))
            .collect()
    }

    /// Counts the records matching `filter`. No joins are resolved and nothing is
    /// hydrated.
    pub async fn count(&self, filter: Filter) -> RecordStoreResult<usize> {
        self.backend
            .count_records(filter, self.name())
            .await
    }

    /// Loads a record by identifier and hydrates it.
    ///
    /// The identifier is loosely typed: `1` and `"1"` name the same record, while
    /// `0`, `"0"`, `""`, `0.1` and null never name one. Returns `Ok(None)` when
    /// nothing is found.
    pub async fn load(&self, id: impl Into<Bson>) -> RecordStoreResult<Option<H::Output>> {
        self.backend
            .load_record(id.into(), self.name())
            .await?
            .map(|record| self.hydrator.hydrate(self.name(), record))
            .transpose()
    }

    /// Merges `fields` into the record identified by `id`.
    ///
    /// Named fields are overwritten (an explicit null is stored as null), others are
    /// kept. Returns `Ok(false)` when no such record exists.
    pub async fn update(&self, id: impl Into<Bson>, fields: Record) -> RecordStoreResult<bool> {
        self.backend
            .update_record(id.into(), fields, self.name())
            .await
    }
}

//! Hydration of raw records into caller-facing values.
//!
//! Backends return raw [`Record`]s with any joined rows already embedded. A
//! [`Hydrator`] turns each surviving top-level record into the value handed back to
//! the caller. It is called once per record by `find` and `load`, and never by
//! `count`.

use bson::Bson;
use std::marker::PhantomData;

use crate::{
    error::RecordStoreResult,
    record::{Entity, EntityExt, Record},
};

/// Converts a raw record from a collection into a domain value.
///
/// Implementations must be pure: the same record always hydrates to the same value
/// and hydration has no effect on the store.
///
/// Any `Fn(&str, Record) -> RecordStoreResult<T>` closure is a hydrator.
pub trait Hydrator: Send + Sync {
    /// The hydrated value.
    type Output;

    /// Hydrates `record`, read from `collection`.
    fn hydrate(&self, collection: &str, record: Record) -> RecordStoreResult<Self::Output>;
}

/// Hands records back unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawHydrator;

impl Hydrator for RawHydrator {
    type Output = Record;

    fn hydrate(&self, _collection: &str, record: Record) -> RecordStoreResult<Record> {
        Ok(record)
    }
}

/// Deserializes records into an [`Entity`] type.
///
/// Joined rows are embedded in the record as arrays of documents, so an entity with a
/// field such as `locations: Vec<Location>` picks them up as typed values.
#[derive(Debug)]
pub struct EntityHydrator<E: Entity> {
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityHydrator<E> {
    pub fn new() -> Self {
        EntityHydrator { _marker: PhantomData }
    }
}

impl<E: Entity> Default for EntityHydrator<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for EntityHydrator<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: Entity> Hydrator for EntityHydrator<E> {
    type Output = E;

    fn hydrate(&self, _collection: &str, record: Record) -> RecordStoreResult<E> {
        E::from_bson(Bson::Document(record))
    }
}

impl<F, T> Hydrator for F
where
    F: Fn(&str, Record) -> RecordStoreResult<T> + Send + Sync,
{
    type Output = T;

    fn hydrate(&self, collection: &str, record: Record) -> RecordStoreResult<T> {
        self(collection, record)
    }
}

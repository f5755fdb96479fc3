//! Error types and result types for record store operations.
//!
//! Missing records and unknown collections are not errors in this crate: lookups
//! return `None`, updates return `false` and scans return empty results. The
//! variants below cover the genuinely exceptional paths such as invalid seed data,
//! malformed declarative join specifications or failed hydration.
//! Use [`RecordStoreResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a record store.
#[derive(Error, Debug)]
pub enum RecordStoreError {
    /// Serialization/deserialization error when converting between record formats (BSON, JSON)
    /// or when hydrating a record into a typed entity.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The seed data handed to a store builder could not be loaded.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A record does not have the shape an operation expects.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    /// A declarative query or join specification is malformed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// A specialized `Result` type for record store operations.
pub type RecordStoreResult<T> = Result<T, RecordStoreError>;

impl From<BsonError> for RecordStoreError {
    fn from(err: BsonError) -> Self {
        RecordStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for RecordStoreError {
    fn from(err: SerdeJsonError) -> Self {
        RecordStoreError::Serialization(err.to_string())
    }
}

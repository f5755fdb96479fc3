//! Convenient re-exports of commonly used types from memlayer.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use memlayer::prelude::*;
//! ```
//!
//! This provides access to:
//! - Records, identifiers and entity traits
//! - Store backends and builders
//! - Filters, joins and query construction
//! - Collections, the record store and hydrators
//! - Error types

pub use memlayer_core::{
    collection::Collection,
    store::RecordStore,
    record::{Record, RecordId, RecordExt, Entity, EntityExt, ID_FIELD, coerce_id},
    backend::{StoreBackend, StoreBackendBuilder},
    query::{Query, QueryBuilder, Filter, Join, JoinSpec},
    hydrate::{Hydrator, RawHydrator, EntityHydrator},
    processor::{FieldTypeProcessor, MediaProcessor, MediaType},
    error::{RecordStoreError, RecordStoreResult},
};

//! Main memlayer crate providing a unified interface for in-memory record storage.
//!
//! This crate is the primary entry point for users of memlayer. It re-exports the
//! core types and functionality from the sub-crates and provides access to the
//! in-memory backend.
//!
//! # Features
//!
//! - **Structural queries** - Find and count records with field-equality filters
//! - **Loose matching** - `1` and `"1"` compare equal, array fields match by containment
//! - **Joins** - Embed related rows of other collections, nested to any depth
//! - **Partial updates** - Merge fields into stored records by id
//! - **Typed entities** - Hydrate records into Serde types, or plug in your own hydrator
//!
//! # Quick Start
//!
//! ```ignore
//! use memlayer::{prelude::*, memory::InMemoryStore};
//! use serde::{Serialize, Deserialize};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! pub struct Location {
//!     pub id: RecordId,
//!     pub content_id: RecordId,
//! }
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Content {
//!     pub id: RecordId,
//!     pub name: String,
//!     #[serde(default)]
//!     pub locations: Vec<Location>,
//! }
//!
//! impl Entity for Content {
//!     fn collection_name() -> &'static str { "Content" }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // Create an in-memory store backend from fixture data
//!     let backend = InMemoryStore::builder()
//!         .json_seed(json!({
//!             "Content": [{ "id": 1, "name": "eZ Publish" }],
//!             "Content\\Location": [{ "id": 2, "contentId": 1 }],
//!         }))
//!         .build()
//!         .await
//!         .unwrap();
//!     let store = RecordStore::new(backend);
//!
//!     // Get a typed collection for Content records
//!     let content = store.typed_collection::<Content>();
//!
//!     // Find content 1 together with its locations
//!     let results = content
//!         .find(
//!             Query::builder()
//!                 .filter(Filter::matching("id", "1"))
//!                 .join("locations", Join::new("Content\\Location").on("contentId", "id"))
//!                 .build(),
//!         )
//!         .await
//!         .unwrap();
//!
//!     println!("Found content: {:?}", results);
//!
//!     // Rename it
//!     content
//!         .update(1, bson::doc! { "name": "Home" })
//!         .await
//!         .unwrap();
//!
//!     store.shutdown().await.unwrap();
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage seeded from fixture data

pub mod prelude;

pub use memlayer_core::{backend, collection, error, hydrate, processor, query, record, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use memlayer_memory::{InMemoryStore, InMemoryStoreBuilder, SeedData};
}

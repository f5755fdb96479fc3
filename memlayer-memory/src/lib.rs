//! In-memory record storage backend for memlayer.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It keeps every collection as an ordered table with its own id sequence, answers
//! filtered queries with loose value comparison and resolves joins between collections.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and exclusive writes using an async-aware RwLock
//! - **Loose matching** - Numeric strings match numbers, array fields match by containment
//! - **Joins** - Related rows of other collections are embedded as arrays, to any depth
//! - **Seeding** - Stores can start from fixture data given as JSON or records
//!
//! # Quick Start
//!
//! ```ignore
//! use memlayer::{RecordStore, memory::InMemoryStore, query::Filter, record::Entity};
//! use memlayer::backend::StoreBackendBuilder;
//! use serde::{Serialize, Deserialize};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Content {
//!     pub id: i64,
//!     pub name: String,
//! }
//!
//! impl Entity for Content {
//!     fn collection_name() -> &'static str { "Content" }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryStore::builder()
//!         .json_seed(json!({ "Content": [{ "id": 1, "name": "eZ Publish" }] }))
//!         .build()
//!         .await?;
//!     let store = RecordStore::new(backend);
//!
//!     let content = store
//!         .typed_collection::<Content>()
//!         .find(Filter::matching("id", "1"))
//!         .await?;
//!     assert_eq!(content[0].name, "eZ Publish");
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as memlayer_memory;

pub mod store;
pub mod seed;
mod engine;
mod evaluator;
mod join;
mod mutator;
mod table;

pub use seed::SeedData;
pub use store::{InMemoryStore, InMemoryStoreBuilder};

//! Core types and traits of memlayer, an in-memory record store for structural queries.
//!
//! This crate provides:
//!
//! - **Records** ([`record`]) - The record map type, identifier coercion and typed entities
//! - **Queries** ([`query`]) - Filters, declarative joins and query construction
//! - **Hydration** ([`hydrate`]) - Conversion of raw records into caller-facing values
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Collections interface** ([`collection`]) - find/count/load/update on a named collection
//! - **Record store** ([`store`]) - Main interface handing out raw or typed collections
//! - **Field settings processors** ([`processor`]) - Symbolic/stored settings translation
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use memlayer::{record::Entity, store::RecordStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! pub struct Content {
//!     pub id: i64,
//!     pub name: Option<String>,
//!     pub owner_id: Option<i64>,
//! }
//!
//! impl Entity for Content {
//!     fn collection_name() -> &'static str {
//!         "Content"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as memlayer_core;

pub mod backend;
pub mod collection;
pub mod error;
pub mod hydrate;
pub mod processor;
pub mod query;
pub mod record;
pub mod store;

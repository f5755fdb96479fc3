//! Initial store contents.

use std::collections::BTreeMap;
use serde_json::Value;
use tracing::{trace, warn};

use memlayer_core::{
    error::{RecordStoreError, RecordStoreResult},
    record::{Record, record_from_json},
};

use crate::table::{RecordTable, RecordTables};

/// The records a store starts out with, grouped by collection.
///
/// Each collection's id sequence resumes one past the highest seeded id. Seeded
/// records without an id are numbered after that, in list order.
///
/// # Example
///
/// ```ignore
/// use memlayer_memory::SeedData;
/// use serde_json::json;
///
/// let seed = SeedData::from_json_value(json!({
///     "Content": [{ "id": 1, "name": "eZ Publish" }],
///     "Content\\Location": [{ "id": 2, "contentId": 1 }],
/// }))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    collections: BTreeMap<String, Vec<Record>>,
}

impl SeedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds records to `collection`. An empty list declares an empty collection.
    pub fn with_collection(mut self, collection: impl Into<String>, records: impl IntoIterator<Item = Record>) -> Self {
        self.collections
            .entry(collection.into())
            .or_default()
            .extend(records);
        self
    }

    /// Appends every collection of `other` to this seed.
    pub fn merge(mut self, other: SeedData) -> Self {
        for (collection, records) in other.collections {
            self = self.with_collection(collection, records);
        }
        self
    }

    /// Reads seed data from a JSON object mapping collection names to arrays of
    /// record objects.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Initialization`] if the value does not have that
    /// shape.
    pub fn from_json_value(value: Value) -> RecordStoreResult<Self> {
        let Value::Object(collections) = value else {
            return Err(RecordStoreError::Initialization(
                "seed data must be an object keyed by collection name".to_string(),
            ));
        };

        let mut seed = SeedData::new();

        for (collection, records) in collections {
            let Value::Array(records) = records else {
                return Err(RecordStoreError::Initialization(format!(
                    "seed collection {collection} must be an array of records"
                )));
            };

            let records = records
                .iter()
                .map(|record| {
                    record_from_json(record).map_err(|err| {
                        RecordStoreError::Initialization(format!("invalid record in {collection}: {err}"))
                    })
                })
                .collect::<RecordStoreResult<Vec<_>>>()?;

            seed = seed.with_collection(collection, records);
        }

        Ok(seed)
    }

    /// Parses seed data from a JSON document, see [`SeedData::from_json_value`].
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Initialization`] if the input is not valid JSON or
    /// does not have the expected shape.
    pub fn from_json_str(json: &str) -> RecordStoreResult<Self> {
        let value = serde_json::from_str::<Value>(json)
            .map_err(|err| RecordStoreError::Initialization(format!("invalid seed JSON: {err}")))?;

        Self::from_json_value(value)
    }

    /// Returns the names of the seeded collections, sorted.
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub(crate) fn into_tables(self) -> RecordStoreResult<RecordTables> {
        let mut tables = RecordTables::new();

        for (collection, records) in self.collections {
            if records.is_empty() {
                trace!(collection = %collection, "seeding empty collection");
            }

            let table = RecordTable::from_records(&collection, records).inspect_err(|err| {
                warn!(collection = %collection, error = %err, "rejected seed data");
            })?;

            tables.insert_table(collection, table);
        }

        Ok(tables)
    }
}

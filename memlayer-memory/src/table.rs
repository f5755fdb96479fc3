//! Record tables: per-collection record storage and identifier sequences.
//!
//! Records are kept in creation order alongside an identifier index, so scans follow
//! insertion order and lookups by identifier do not scan.

use std::collections::HashMap;
use bson::doc;
use tracing::trace;

use memlayer_core::{
    error::{RecordStoreError, RecordStoreResult},
    record::{ID_FIELD, Record, RecordExt, RecordId},
};

/// The records of a single collection and its identifier sequence.
#[derive(Debug, Clone)]
pub(crate) struct RecordTable {
    records: Vec<Record>,
    positions: HashMap<RecordId, usize>,
    next_id: RecordId,
}

impl Default for RecordTable {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            positions: HashMap::new(),
            next_id: 1,
        }
    }
}

impl RecordTable {
    /// Builds a table from pre-existing records.
    ///
    /// Records keep their identifiers; the sequence resumes one past the highest of
    /// them. Records without a usable identifier are assigned one from the sequence,
    /// in order, after all identified records have been placed.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Initialization`] if two records share an identifier
    /// or if the highest identifier leaves no room for the sequence to continue.
    pub fn from_records(collection: &str, records: Vec<Record>) -> RecordStoreResult<Self> {
        let mut table = RecordTable::default();
        let mut pending = Vec::new();

        if let Some(max) = records.iter().filter_map(RecordExt::record_id).max() {
            table.next_id = max.checked_add(1).ok_or_else(|| {
                RecordStoreError::Initialization(format!(
                    "id {max} in collection {collection} exhausts the id sequence"
                ))
            })?;
        }

        for record in records {
            match record.record_id() {
                Some(id) => {
                    if table.positions.contains_key(&id) {
                        return Err(RecordStoreError::Initialization(format!(
                            "duplicate id {id} in collection {collection}"
                        )));
                    }
                    table.push(id, record);
                }
                None => pending.push(record),
            }
        }

        if !pending.is_empty() {
            trace!(collection, count = pending.len(), "assigning ids to seeded records");
        }

        for record in pending {
            table.insert(record).ok_or_else(|| {
                RecordStoreError::Initialization(format!(
                    "no ids left for unnumbered records in collection {collection}"
                ))
            })?;
        }

        Ok(table)
    }

    /// Stores `fields` under the next identifier and returns it.
    ///
    /// Returns `None`, storing nothing, once the sequence cannot advance past the
    /// identifier it would hand out.
    pub fn insert(&mut self, fields: Record) -> Option<RecordId> {
        let id = self.next_id;
        self.next_id = id.checked_add(1)?;
        self.push(id, fields);
        Some(id)
    }

    fn push(&mut self, id: RecordId, fields: Record) {
        let mut record = doc! { ID_FIELD: id };

        for (field, value) in fields {
            if field != ID_FIELD {
                record.insert(field, value);
            }
        }

        self.positions.insert(id, self.records.len());
        self.records.push(record);
    }

    /// Returns every record in creation order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the record with the given identifier.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.positions
            .get(&id)
            .map(|position| &self.records[*position])
    }

    /// Swaps the record with the given identifier for `record`, keeping its position
    /// and identifier. Returns `false` if no such record exists.
    pub fn replace(&mut self, id: RecordId, record: Record) -> bool {
        let Some(position) = self.positions.get(&id).copied() else {
            return false;
        };

        let mut replacement = doc! { ID_FIELD: id };
        for (field, value) in record {
            if field != ID_FIELD {
                replacement.insert(field, value);
            }
        }

        self.records[position] = replacement;
        true
    }
}

/// All collections of a store.
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordTables {
    tables: HashMap<String, RecordTable>,
}

impl RecordTables {
    pub fn new() -> Self {
        Self { tables: HashMap::new() }
    }

    /// Registers a table under `collection`, replacing any existing one.
    pub fn insert_table(&mut self, collection: String, table: RecordTable) {
        self.tables.insert(collection, table);
    }

    /// Creates a record in `collection`, creating the collection on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Backend`] if the collection's id sequence is
    /// exhausted.
    pub fn create(&mut self, collection: &str, fields: Record) -> RecordStoreResult<RecordId> {
        self.tables
            .entry(collection.to_string())
            .or_default()
            .insert(fields)
            .ok_or_else(|| {
                RecordStoreError::Backend(format!("id sequence of collection {collection} is exhausted"))
            })
    }

    /// Returns the records of `collection` in creation order; empty if unknown.
    pub fn records(&self, collection: &str) -> &[Record] {
        self.tables
            .get(collection)
            .map(RecordTable::records)
            .unwrap_or(&[])
    }

    /// Returns the record of `collection` with the given identifier.
    pub fn get(&self, collection: &str, id: RecordId) -> Option<&Record> {
        self.tables
            .get(collection)
            .and_then(|table| table.get(id))
    }

    /// Replaces a record in place. Returns `false` if the collection or record is
    /// unknown.
    pub fn replace(&mut self, collection: &str, id: RecordId, record: Record) -> bool {
        self.tables
            .get_mut(collection)
            .is_some_and(|table| table.replace(id, record))
    }

    /// Returns the names of all collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names = self.tables
            .keys()
            .cloned()
            .collect::<Vec<_>>();

        names.sort();
        names
    }
}

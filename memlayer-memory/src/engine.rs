//! Query execution over record tables: find, count and load.

use bson::Bson;
use tracing::trace;

use memlayer_core::{
    query::{Filter, JoinSpec},
    record::{Record, coerce_id},
};

use crate::{evaluator::RecordMatcher, join::JoinResolver, table::RecordTables};

/// Runs read queries against a snapshot of the record tables.
pub(crate) struct QueryEngine<'a> {
    tables: &'a RecordTables,
}

impl<'a> QueryEngine<'a> {
    pub fn new(tables: &'a RecordTables) -> Self {
        Self { tables }
    }

    /// Returns the records of `collection` matching `filter`, in creation order, with
    /// `joins` resolved on each of them.
    pub fn find(&self, collection: &str, filter: &Filter, joins: &JoinSpec) -> Vec<Record> {
        let resolver = JoinResolver::new(self);

        let found = RecordMatcher::filter_records(self.tables.records(collection), filter)
            .map(|record| resolver.resolve(record.clone(), joins))
            .collect::<Vec<_>>();

        trace!(collection, conditions = filter.len(), found = found.len(), "find");

        found
    }

    /// Counts the records of `collection` matching `filter`.
    pub fn count(&self, collection: &str, filter: &Filter) -> usize {
        let count = RecordMatcher::filter_records(self.tables.records(collection), filter).count();

        trace!(collection, conditions = filter.len(), count, "count");

        count
    }

    /// Looks a record up by a loosely typed identifier.
    pub fn load(&self, collection: &str, id: &Bson) -> Option<Record> {
        let record = coerce_id(id).and_then(|id| self.tables.get(collection, id));

        trace!(collection, %id, found = record.is_some(), "load");

        record.cloned()
    }
}

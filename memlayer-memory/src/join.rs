//! Join resolution: attaching related rows of other collections to a record.

use bson::Bson;

use memlayer_core::{query::JoinSpec, record::Record};

use crate::engine::QueryEngine;

/// Expands records with the rows their joins select.
///
/// Every join attribute is set to an array of the joined rows, which is empty when
/// nothing matches. Nested joins are resolved on each joined row, to any depth.
/// Resolution only reads the target collections.
pub(crate) struct JoinResolver<'e, 'a> {
    engine: &'e QueryEngine<'a>,
}

impl<'e, 'a> JoinResolver<'e, 'a> {
    pub fn new(engine: &'e QueryEngine<'a>) -> Self {
        Self { engine }
    }

    pub fn resolve(&self, mut record: Record, joins: &JoinSpec) -> Record {
        for (attribute, join) in joins.iter() {
            let filter = join.filter_for(&record);
            let rows = self
                .engine
                .find(&join.collection, &filter, &join.joins)
                .into_iter()
                .map(Bson::Document)
                .collect::<Vec<_>>();

            record.insert(attribute, Bson::Array(rows));
        }

        record
    }
}

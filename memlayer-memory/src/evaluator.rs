//! Filter evaluation for in-memory record matching.
//!
//! This module provides the matcher deciding whether a record satisfies a [`Filter`],
//! and the loose value comparison it is built on.

use std::collections::HashMap;
use bson::Bson;

use memlayer_core::{
    query::Filter,
    record::{LooseNumber, Record},
};

/// Comparable view of a BSON value implementing loose equality.
///
/// Equality rules:
///
/// - numbers compare by value across widths (`1_i32 == 1_i64 == 1.0`), integers
///   exactly and against floats only when the float holds that very integer;
/// - a string equals a number when the trimmed string parses to that number
///   (`"1" == 1`, `"1.0" == 1`), and otherwise never does;
/// - strings compare exactly with strings, booleans only with booleans;
/// - null equals only null, so neither `""` nor `0` match a null field;
/// - arrays and documents compare element-wise with the same rules.
///
/// Values with no meaningful loose form (dates, binary data, object ids, ...) fall
/// back to strict BSON equality.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value, integers kept exact
    Number(LooseNumber),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Any other BSON value, compared strictly
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        if let Some(number) = LooseNumber::from_bson(bson) {
            return Comparable::Number(number);
        }

        match bson {
            Bson::Null | Bson::Undefined => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::Number(a), Comparable::String(b))
            | (Comparable::String(b), Comparable::Number(a)) => LooseNumber::parse(b) == Some(*a),
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

/// Decides whether a single record satisfies a filter.
pub(crate) struct RecordMatcher<'a> {
    record: &'a Record,
}

impl<'a> RecordMatcher<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    /// Evaluates `filter` as a conjunction, stopping at the first failing condition.
    ///
    /// An empty filter matches every record.
    pub fn matches(&self, filter: &Filter) -> bool {
        filter
            .iter()
            .all(|(field, expected)| self.matches_field(field, expected))
    }

    /// Checks a single condition.
    ///
    /// Absent fields never match. Array-valued fields match when any element loosely
    /// equals `expected`; any other field must loosely equal it.
    pub fn matches_field(&self, field: &str, expected: &Bson) -> bool {
        let expected = Comparable::from(expected);

        match self.record.get(field) {
            Some(Bson::Array(items)) => items
                .iter()
                .any(|item| Comparable::from(item) == expected),
            Some(value) => Comparable::from(value) == expected,
            None => false,
        }
    }

    /// Keeps the records matching `filter`, preserving their order.
    pub fn filter_records(
        records: impl IntoIterator<Item = &'a Record>,
        filter: &Filter,
    ) -> impl Iterator<Item = &'a Record> {
        records
            .into_iter()
            .filter(move |record| RecordMatcher::new(record).matches(filter))
    }
}

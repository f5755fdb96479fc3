//! Filter, join and query construction for record stores.
//!
//! # Filters
//!
//! A [`Filter`] is a conjunction of `(field, expected)` pairs. A record matches when
//! every field is present and either loosely equals the expected value or, for
//! array-valued fields, contains it. An empty filter matches every record.
//!
//! ```ignore
//! use memlayer::query::Filter;
//!
//! let filter = Filter::matching("ownerId", 42).and("name", "bar0");
//! ```
//!
//! # Joins
//!
//! A [`JoinSpec`] attaches related rows from another collection to every matched
//! record. Each [`Join`] maps fields of the target collection to fields of the source
//! record and may carry nested joins of its own.
//!
//! ```ignore
//! use memlayer::query::{Join, Query, Filter};
//!
//! let query = Query::builder()
//!     .filter(Filter::matching("id", 1))
//!     .join("locations", Join::new("Content\\Location").on("contentId", "id"))
//!     .build();
//! ```

use bson::{Bson, Document};

use crate::error::{RecordStoreError, RecordStoreResult};

/// A conjunction of field/expected-value pairs used to select records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Bson)>,
}

impl Filter {
    /// Creates an empty filter, which matches every record.
    pub fn new() -> Self {
        Filter { conditions: Vec::new() }
    }

    /// Creates a filter with a single field condition.
    pub fn matching(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::new().and(field, value)
    }

    /// Adds a field condition to this filter.
    ///
    /// A condition on a field that is already constrained replaces the previous one.
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        let field = field.into();
        let value = value.into();

        match self.conditions.iter_mut().find(|(name, _)| *name == field) {
            Some(condition) => condition.1 = value,
            None => self.conditions.push((field, value)),
        }

        self
    }

    /// Creates a list-shaped filter from plain values.
    ///
    /// The values are keyed by their position (`"0"`, `"1"`, ...), so the resulting
    /// filter only ever matches records that happen to have such fields. Against
    /// regular records it selects nothing.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        values
            .into_iter()
            .enumerate()
            .fold(Filter::new(), |filter, (index, value)| filter.and(index.to_string(), value))
    }

    /// Builds a filter from a loosely shaped BSON value.
    ///
    /// Documents contribute one condition per key, arrays behave like [`Filter::list`],
    /// null yields an empty filter and any other scalar becomes a single positional
    /// condition.
    pub fn from_bson(value: Bson) -> Self {
        match value {
            Bson::Document(doc) => Filter::from(doc),
            Bson::Array(values) => Filter::list(values),
            Bson::Null => Filter::new(),
            scalar => Filter::list([scalar]),
        }
    }

    /// Returns `true` if this filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns the number of conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Iterates over the `(field, expected)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bson)> {
        self.conditions
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }
}

impl From<Document> for Filter {
    fn from(doc: Document) -> Self {
        doc.into_iter()
            .fold(Filter::new(), |filter, (field, value)| filter.and(field, value))
    }
}

impl<K: Into<String>, V: Into<Bson>> FromIterator<(K, V)> for Filter {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Filter::new(), |filter, (field, value)| filter.and(field, value))
    }
}

/// Describes how rows of another collection are attached to a source record.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// The collection the joined rows are read from.
    pub collection: String,
    /// Pairs of `(target field, source field)`: a target row is joined when its target
    /// field equals the source record's source field.
    pub on: Vec<(String, String)>,
    /// Joins applied to every joined row.
    pub joins: JoinSpec,
}

impl Join {
    /// Creates a join against the given collection with no match conditions.
    pub fn new(collection: impl Into<String>) -> Self {
        Join {
            collection: collection.into(),
            on: Vec::new(),
            joins: JoinSpec::new(),
        }
    }

    /// Requires the target row's `target` field to equal the source record's `source`
    /// field.
    pub fn on(mut self, target: impl Into<String>, source: impl Into<String>) -> Self {
        self.on.push((target.into(), source.into()));
        self
    }

    /// Adds a nested join applied to every row produced by this join.
    pub fn join(mut self, attribute: impl Into<String>, join: Join) -> Self {
        self.joins = self.joins.with(attribute, join);
        self
    }

    /// Builds the filter selecting the rows of the target collection that belong to
    /// `source`. Source fields missing from the record contribute null.
    pub fn filter_for(&self, source: &Document) -> Filter {
        self.on
            .iter()
            .fold(Filter::new(), |filter, (target, field)| {
                filter.and(
                    target.as_str(),
                    source.get(field).cloned().unwrap_or(Bson::Null),
                )
            })
    }

    fn from_descriptor(attribute: &str, descriptor: &Bson) -> RecordStoreResult<Self> {
        let descriptor = descriptor.as_document().ok_or_else(|| {
            RecordStoreError::InvalidQuery(format!("join '{attribute}' must be a document"))
        })?;

        let collection = descriptor
            .get("type")
            .and_then(Bson::as_str)
            .ok_or_else(|| {
                RecordStoreError::InvalidQuery(format!(
                    "join '{attribute}' is missing a string 'type'"
                ))
            })?;

        let mut join = Join::new(collection);

        match descriptor.get("match") {
            Some(Bson::Document(matches)) => {
                for (target, source) in matches {
                    let source = source.as_str().ok_or_else(|| {
                        RecordStoreError::InvalidQuery(format!(
                            "join '{attribute}' must map '{target}' to a field name"
                        ))
                    })?;
                    join = join.on(target.as_str(), source);
                }
            }
            Some(_) => {
                return Err(RecordStoreError::InvalidQuery(format!(
                    "join '{attribute}' has a 'match' that is not a document"
                )));
            }
            None => {}
        }

        match descriptor.get("sub") {
            Some(Bson::Document(sub)) => join.joins = JoinSpec::from_document(sub)?,
            Some(Bson::Null) | None => {}
            Some(_) => {
                return Err(RecordStoreError::InvalidQuery(format!(
                    "join '{attribute}' has a 'sub' that is not a document"
                )));
            }
        }

        Ok(join)
    }
}

/// An ordered set of joins keyed by the attribute they populate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinSpec {
    joins: Vec<(String, Join)>,
}

impl JoinSpec {
    /// Creates an empty join specification.
    pub fn new() -> Self {
        JoinSpec { joins: Vec::new() }
    }

    /// Adds a join populating `attribute`, replacing any join already registered for it.
    pub fn with(mut self, attribute: impl Into<String>, join: Join) -> Self {
        let attribute = attribute.into();

        match self.joins.iter_mut().find(|(name, _)| *name == attribute) {
            Some(entry) => entry.1 = join,
            None => self.joins.push((attribute, join)),
        }

        self
    }

    /// Parses a declarative join specification.
    ///
    /// The expected shape is `{ attribute: { type, match: { targetField: sourceField },
    /// sub: { ...nested joins... } } }`, where `match` and `sub` are optional.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::InvalidQuery`] if a descriptor is malformed.
    pub fn from_document(doc: &Document) -> RecordStoreResult<Self> {
        doc.iter()
            .try_fold(JoinSpec::new(), |spec, (attribute, descriptor)| {
                Ok(spec.with(attribute.as_str(), Join::from_descriptor(attribute, descriptor)?))
            })
    }

    /// Returns `true` if no joins are registered.
    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    /// Iterates over the `(attribute, join)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Join)> {
        self.joins
            .iter()
            .map(|(attribute, join)| (attribute.as_str(), join))
    }
}

/// A structured query: a filter plus the joins applied to every matched record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Filter selecting records.
    pub filter: Filter,
    /// Joins attached to every selected record.
    pub joins: JoinSpec,
}

impl Query {
    /// Creates a query matching every record with no joins.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

impl From<Filter> for Query {
    fn from(filter: Filter) -> Self {
        Query { filter, joins: JoinSpec::new() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter for this query.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.query.filter = filter;
        self
    }

    /// Adds a join populating `attribute` on every matched record.
    pub fn join(mut self, attribute: impl Into<String>, join: Join) -> Self {
        self.query.joins = self.query.joins.with(attribute, join);
        self
    }

    /// Replaces all joins with the given specification.
    pub fn joins(mut self, joins: JoinSpec) -> Self {
        self.query.joins = joins;
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn list_filter_uses_positional_keys() {
        let filter = Filter::list(["foo0", "bar"]);
        let fields = filter.iter().map(|(field, _)| field).collect::<Vec<_>>();

        assert_eq!(fields, vec!["0", "1"]);
    }

    #[test]
    fn from_bson_document_keeps_each_condition() {
        let filter = Filter::from_bson(Bson::Document(doc! { "foo0": "bar0", "baz0": "" }));

        assert_eq!(filter.len(), 2);
        assert_eq!(filter, Filter::matching("foo0", "bar0").and("baz0", ""));
    }

    #[test]
    fn repeated_field_replaces_condition() {
        let filter = Filter::matching("name", "a").and("name", "b");

        assert_eq!(filter.len(), 1);
        assert_eq!(filter.iter().next(), Some(("name", &Bson::String("b".into()))));
    }

    #[test]
    fn join_filter_reads_source_fields() {
        let join = Join::new("Content\\Location").on("contentId", "id");
        let filter = join.filter_for(&doc! { "id": 1_i64, "name": "eZ Publish" });

        assert_eq!(filter, Filter::matching("contentId", 1_i64));
    }

    #[test]
    fn join_filter_uses_null_for_missing_source_field() {
        let join = Join::new("Content\\Location").on("contentId", "missing");

        assert_eq!(
            join.filter_for(&doc! { "id": 1_i64 }),
            Filter::matching("contentId", Bson::Null)
        );
    }

    #[test]
    fn declarative_join_spec_parses_nested_joins() {
        let spec = JoinSpec::from_document(&doc! {
            "locations": {
                "type": "Content\\Location",
                "match": { "contentId": "id" },
                "sub": {
                    "parent": { "type": "Content\\Location", "match": { "id": "parentId" } },
                },
            },
        })
        .unwrap();

        let expected = JoinSpec::new().with(
            "locations",
            Join::new("Content\\Location")
                .on("contentId", "id")
                .join("parent", Join::new("Content\\Location").on("id", "parentId")),
        );

        assert_eq!(spec, expected);
    }

    #[test]
    fn declarative_join_spec_rejects_missing_type() {
        let err = JoinSpec::from_document(&doc! { "locations": { "match": { "contentId": "id" } } })
            .unwrap_err();

        assert!(matches!(err, RecordStoreError::InvalidQuery(_)));
    }

    #[test]
    fn declarative_join_spec_rejects_non_string_match() {
        let err = JoinSpec::from_document(&doc! {
            "locations": { "type": "Content\\Location", "match": { "contentId": 1 } },
        })
        .unwrap_err();

        assert!(matches!(err, RecordStoreError::InvalidQuery(_)));
    }
}

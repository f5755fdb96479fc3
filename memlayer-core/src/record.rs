//! Record representation, identifier coercion and typed entity conversion.
//!
//! A [`Record`] is a plain field-name-to-value map. Field values are BSON values, so a
//! record can hold nulls, scalars and arrays of scalars (such as group id lists), and
//! joined rows are embedded as arrays of sub-documents.
//!
//! Typed domain objects implement [`Entity`] and are converted to and from records
//! through serde with the helpers on [`EntityExt`].

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::error::{RecordStoreError, RecordStoreResult};

/// A stored record: field name to value.
pub type Record = Document;

/// Identifier assigned to a record by its collection's sequence.
pub type RecordId = i64;

/// Name of the identifier field every stored record carries.
pub const ID_FIELD: &str = "id";

/// A number read loosely from a record value or a numeric string.
///
/// Integers keep their exact value. Comparing an integer with a float only succeeds
/// when the float holds exactly that integer, so distinct integers beyond the range
/// a double represents exactly never compare equal.
#[derive(Debug, Clone, Copy)]
pub enum LooseNumber {
    Int(i64),
    Float(f64),
}

impl LooseNumber {
    /// Largest magnitude up to which every integer is exactly representable as a double.
    const EXACT_FLOAT_LIMIT: f64 = 9_007_199_254_740_992.0;

    /// Reads a BSON number of any width.
    pub fn from_bson(value: &Bson) -> Option<Self> {
        match value {
            Bson::Int32(v) => Some(LooseNumber::Int(i64::from(*v))),
            Bson::Int64(v) => Some(LooseNumber::Int(*v)),
            Bson::Double(v) => Some(LooseNumber::Float(*v)),
            _ => None,
        }
    }

    /// Parses a numeric string after trimming it.
    ///
    /// Integer strings parse exactly. Other notations (`"1.0"`, `"1e0"`) are read as
    /// doubles and only accepted when finite and within the exactly representable
    /// range, since a rounded parse could otherwise equal a different integer.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();

        if let Ok(int) = value.parse::<i64>() {
            return Some(LooseNumber::Int(int));
        }

        value
            .parse::<f64>()
            .ok()
            .filter(|float| float.is_finite() && float.abs() <= Self::EXACT_FLOAT_LIMIT)
            .map(LooseNumber::Float)
    }

    /// Returns the integer this number holds exactly, if any.
    pub fn as_int(self) -> Option<i64> {
        match self {
            LooseNumber::Int(v) => Some(v),
            // -2^63 and 2^63 are both exact doubles; the upper bound itself is out of range.
            LooseNumber::Float(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
                Some(v as i64)
            }
            LooseNumber::Float(_) => None,
        }
    }
}

impl PartialEq for LooseNumber {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LooseNumber::Int(a), LooseNumber::Int(b)) => a == b,
            (LooseNumber::Float(a), LooseNumber::Float(b)) => a == b,
            (LooseNumber::Int(a), float @ LooseNumber::Float(_))
            | (float @ LooseNumber::Float(_), LooseNumber::Int(a)) => float.as_int() == Some(*a),
        }
    }
}

/// Coerces a loosely typed identifier into a [`RecordId`].
///
/// Numbers and numeric strings are read with the same rules [`LooseNumber`] applies
/// when matching field values, and must hold a strictly positive integer. Everything
/// else, including `0`, `"0"`, `""`, `0.1`, `"0.1"`, null and non-numeric strings,
/// yields `None`.
///
/// # Example
///
/// ```ignore
/// use bson::Bson;
/// use memlayer_core::record::coerce_id;
///
/// assert_eq!(coerce_id(&Bson::Int32(1)), Some(1));
/// assert_eq!(coerce_id(&Bson::String("1.0".into())), Some(1));
/// assert_eq!(coerce_id(&Bson::Double(0.1)), None);
/// ```
pub fn coerce_id(value: &Bson) -> Option<RecordId> {
    let number = match value {
        Bson::String(s) => LooseNumber::parse(s)?,
        other => LooseNumber::from_bson(other)?,
    };

    number.as_int().filter(|id| *id > 0)
}

/// Convenience accessors on stored records.
pub trait RecordExt {
    /// Returns the record's identifier, if it carries a valid one.
    fn record_id(&self) -> Option<RecordId>;
}

impl RecordExt for Record {
    fn record_id(&self) -> Option<RecordId> {
        self.get(ID_FIELD).and_then(coerce_id)
    }
}

/// Converts a JSON object into a record.
///
/// # Errors
///
/// Returns [`RecordStoreError::InvalidRecord`] if the value is not a JSON object, or a
/// serialization error if it cannot be represented as BSON.
pub fn record_from_json(value: &Value) -> RecordStoreResult<Record> {
    match serialize_to_bson(value)? {
        Bson::Document(doc) => Ok(doc),
        other => Err(RecordStoreError::InvalidRecord(format!(
            "expected an object, found {:?}",
            other.element_type()
        ))),
    }
}

/// Trait implemented by typed domain objects that records are hydrated into.
///
/// Fields that may be missing from a stored record should be `Option`s or carry a
/// `#[serde(default)]`, since records only hold the attributes they were created with.
///
/// # Example
///
/// ```ignore
/// use memlayer::record::{Entity, RecordId};
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// pub struct Location {
///     pub id: RecordId,
///     pub content_id: RecordId,
/// }
///
/// impl Entity for Location {
///     fn collection_name() -> &'static str {
///         "Content\\Location"
///     }
/// }
/// ```
pub trait Entity: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this entity is stored in.
    fn collection_name() -> &'static str;
}

/// Extension trait providing serialization utilities for entities.
///
/// This trait is automatically implemented for all types that implement [`Entity`].
pub trait EntityExt: Entity {
    /// Converts this entity to a BSON value.
    fn to_bson(&self) -> RecordStoreResult<Bson>;

    /// Creates an entity from a BSON value.
    fn from_bson(bson: Bson) -> RecordStoreResult<Self>;

    /// Converts this entity to a JSON value.
    fn to_json(&self) -> RecordStoreResult<Value>;

    /// Creates an entity from a JSON value.
    fn from_json(value: Value) -> RecordStoreResult<Self>;

    /// Converts this entity to a record suitable for creation or update.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::InvalidRecord`] if the entity does not serialize to a
    /// document.
    fn to_record(&self) -> RecordStoreResult<Record>;
}

impl<E: Entity> EntityExt for E {
    fn to_bson(&self) -> RecordStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> RecordStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> RecordStoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> RecordStoreResult<Self> {
        Ok(from_value(value)?)
    }

    fn to_record(&self) -> RecordStoreResult<Record> {
        match self.to_bson()? {
            Bson::Document(doc) => Ok(doc),
            other => Err(RecordStoreError::InvalidRecord(format!(
                "{} serialized to {:?} instead of a document",
                E::collection_name(),
                other.element_type()
            ))),
        }
    }
}

//! Partial record updates.

use bson::Bson;
use tracing::{debug, warn};

use memlayer_core::record::{ID_FIELD, Record, coerce_id};

use crate::table::RecordTables;

/// Merges `fields` into the record of `collection` identified by `id`.
///
/// The merge is shallow: every named field is overwritten (an explicit null included,
/// and arrays are replaced wholesale) while other fields keep their values. An `id`
/// entry in `fields` is ignored. Returns `false`, leaving the tables untouched, when
/// `id` does not coerce or names no record.
pub(crate) fn update(tables: &mut RecordTables, collection: &str, id: &Bson, fields: Record) -> bool {
    let Some(record_id) = coerce_id(id) else {
        debug!(collection, %id, "update skipped, id does not name a record");
        return false;
    };

    let Some(mut record) = tables.get(collection, record_id).cloned() else {
        debug!(collection, id = record_id, "update skipped, record not found");
        return false;
    };

    let mut changed = 0;
    for (field, value) in fields {
        if field == ID_FIELD {
            warn!(collection, id = record_id, ignored = %value, "ignoring id in update fields");
            continue;
        }

        record.insert(field, value);
        changed += 1;
    }

    let updated = tables.replace(collection, record_id, record);
    debug!(collection, id = record_id, fields = changed, "updated record");

    updated
}

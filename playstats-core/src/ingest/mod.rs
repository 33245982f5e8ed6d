//! Ingestion: from raw history records to canonical listening events
//!
//! ## Stages
//!
//! 1. [`decode_records`] splits a history payload into [`RawRecord`]s
//! 2. [`classify`] keeps song playbacks and drops episodes and malformed entries
//! 3. [`normalize`] sanitizes fields and parses the timestamp
//!
//! Individual records never fail the run. A record that is dropped yields a
//! [`SkipReason`] which the aggregator tallies into provenance counters.

mod classify;
mod coerce;
mod normalize;

pub use classify::classify;
pub use coerce::{read_number, read_string, read_truthy, round_ms};
pub use normalize::{normalize, parse_timestamp};

use crate::error::{Error, Result};
use crate::types::{ListeningEvent, RawRecord, SkipReason};
use serde_json::Value;

/// Classify and normalize one record.
pub fn to_event(raw: &RawRecord) -> std::result::Result<ListeningEvent, SkipReason> {
    if !classify(raw) {
        return Err(SkipReason::NonSongRecord);
    }
    normalize(raw)
}

/// Decode a history payload (a JSON array of objects) into raw records.
///
/// Array elements that are not objects become empty records, so they are
/// still counted as read and later classified as non-song.
pub fn decode_records(json: &str) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(Error::Decode(
            "history payload must be a JSON array of records".to_string(),
        ));
    };

    let records = items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => map,
            other => {
                tracing::debug!(kind = value_kind(&other), "Non-object history entry");
                RawRecord::new()
            }
        })
        .collect();

    Ok(records)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

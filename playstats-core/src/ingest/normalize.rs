//! Event normalization
//!
//! Turns a classified record into a [`ListeningEvent`], sanitizing every
//! field on the way. The only rejection is an unparsable timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::{read_number, read_string, read_truthy, round_ms};
use crate::types::{fields, ListeningEvent, RawRecord, SkipReason};

/// Normalize a record that already passed [`super::classify`].
pub fn normalize(raw: &RawRecord) -> Result<ListeningEvent, SkipReason> {
    let timestamp = parse_timestamp(&read_string(raw, fields::TIMESTAMP))
        .ok_or(SkipReason::UnparsableTimestamp)?;

    Ok(ListeningEvent {
        song: read_string(raw, fields::TRACK_NAME),
        artist: read_string(raw, fields::ARTIST_NAME),
        album: read_string(raw, fields::ALBUM_NAME),
        track_uri: read_string(raw, fields::TRACK_URI),
        ms_played: round_ms(read_number(raw, fields::MS_PLAYED)),
        skipped: read_truthy(raw, fields::SKIPPED),
        timestamp,
    })
}

/// Parse a timestamp as a UTC instant.
///
/// Tries a direct ISO-8601 parse first. If that fails, repairs the common
/// `YYYY-MM-DD HH:MM[:SS]` shape by swapping the first space for `T` and
/// appending `Z` when no zone designator is present, then parses again.
/// Zone-less timestamps are therefore read as UTC.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if ts.is_empty() {
        return None;
    }

    parse_iso8601(ts).or_else(|| parse_iso8601(&repair_timestamp(ts)))
}

/// Accepted shapes: RFC 3339, minute precision with `Z` or an offset,
/// `YYYY-MM-DD` and `YYYY-MM`. Date-only forms are UTC midnight.
fn parse_iso8601(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(local) = ts.strip_suffix('Z').or_else(|| ts.strip_suffix('z')) {
        if let Ok(naive) = NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M") {
            return Some(naive.and_utc());
        }
    }
    if let Ok(dt) = DateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{ts}-01"), "%Y-%m-%d"))
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn repair_timestamp(ts: &str) -> String {
    let mut repaired = ts.replacen(' ', "T", 1);
    if !has_zone_designator(&repaired) {
        repaired.push('Z');
    }
    repaired
}

fn has_zone_designator(ts: &str) -> bool {
    match ts.split_once('T') {
        Some((_, time)) => {
            time.ends_with('Z') || time.ends_with('z') || time.contains('+') || time.contains('-')
        }
        None => false,
    }
}

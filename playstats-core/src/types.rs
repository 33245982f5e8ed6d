//! Core domain types for playstats
//!
//! These types represent the canonical data model that the aggregation
//! engine works on.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Record** | One loosely-typed JSON object from a streaming history export |
//! | **Event** | One normalized, accepted song playback |
//! | **Song** | A `(title, artist)` pair; album and track URI do not split a song |
//! | **Accumulator** | A running-total structure for one dimension (song, artist, month, year) |
//! | **Peak period** | The month or year with the most listening time, tie-broken by key |
//! | **Representative** | The most frequent album/URI for a song, tie-broken by first observation |

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================
// Raw records
// ============================================

/// An untyped key-value record as produced by the history decoder.
///
/// Values keep whatever JSON type the export used. Field access goes through
/// the read-or-default helpers in [`crate::ingest`].
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Field names read from a [`RawRecord`].
pub mod fields {
    pub const TRACK_NAME: &str = "master_metadata_track_name";
    pub const ARTIST_NAME: &str = "master_metadata_album_artist_name";
    pub const ALBUM_NAME: &str = "master_metadata_album_album_name";
    pub const TRACK_URI: &str = "spotify_track_uri";
    pub const EPISODE_NAME: &str = "episode_name";
    pub const EPISODE_URI: &str = "spotify_episode_uri";
    pub const TIMESTAMP: &str = "ts";
    pub const MS_PLAYED: &str = "ms_played";
    pub const SKIPPED: &str = "skipped";
}

// ============================================
// Events
// ============================================

/// A normalized song playback.
///
/// `song` and `artist` are never empty; classification guarantees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeningEvent {
    /// Track title, trimmed
    pub song: String,
    /// Album artist, trimmed
    pub artist: String,
    /// Album name, empty when the export had none
    pub album: String,
    /// Track URI, empty when the export had none
    pub track_uri: String,
    /// Milliseconds played, clamped to zero and rounded
    pub ms_played: u64,
    /// Whether the playback was skipped
    pub skipped: bool,
    /// When playback ended (UTC)
    pub timestamp: DateTime<Utc>,
}

impl ListeningEvent {
    /// Identity of the song this event belongs to.
    pub fn song_key(&self) -> SongKey {
        SongKey::new(self.song.clone(), self.artist.clone())
    }

    /// Calendar month bucket (UTC).
    pub fn month(&self) -> MonthKey {
        MonthKey::from_datetime(&self.timestamp)
    }

    /// Calendar year bucket (UTC).
    pub fn year(&self) -> YearKey {
        self.timestamp.year()
    }
}

/// Why a record was left out of aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Not a song playback (podcast episode, missing title or artist)
    NonSongRecord,
    /// Neither the direct nor the repaired timestamp parsed
    UnparsableTimestamp,
}

impl SkipReason {
    /// Short label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NonSongRecord => "non-song",
            SkipReason::UnparsableTimestamp => "bad timestamp",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Keys
// ============================================

/// Composite song identity: exact, case-sensitive `(song, artist)` after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SongKey {
    pub song: String,
    pub artist: String,
}

impl SongKey {
    pub fn new(song: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            song: song.into(),
            artist: artist.into(),
        }
    }
}

/// A UTC calendar month, displayed as `YYYY-MM`.
///
/// Ordering is `(year, month)`, which matches the string order of the
/// `YYYY-MM` form for the four-digit years timestamps can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    /// Month 1-12
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_datetime(ts: &DateTime<Utc>) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A UTC calendar year.
pub type YearKey = i32;

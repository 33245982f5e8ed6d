//! Report assembly
//!
//! Packages the ranked views, series and peaks into one immutable value.

use serde::Serialize;

use super::aggregate::{Accumulators, Provenance};
use super::peak::{select_peak, series, PeriodTotal};
use super::ranking::{
    monthly_top, song_table, top_artists_by_time, top_by_plays, top_by_time, top_skipped,
    ArtistRow, MonthlyTopEntry, SongRow,
};
use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::types::{MonthKey, YearKey};

/// Display value for `data_range` when there is no monthly data.
pub const DATA_RANGE_NOT_AVAILABLE: &str = "N/A";

/// The final aggregate for one listening history.
///
/// All rankings are pre-sorted and capped; consumers render them as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Input provenance counters
    pub provenance: Provenance,
    /// Every song, ordered by play count
    pub songs: Vec<SongRow>,
    /// Top artists by listening time
    pub top_artists: Vec<ArtistRow>,
    /// Top songs by play count
    pub top_by_plays: Vec<SongRow>,
    /// Top songs by listening time
    pub top_by_time: Vec<SongRow>,
    /// Most skipped songs (only songs skipped at least once)
    pub top_skipped: Vec<SongRow>,
    /// Top songs per month, months ascending
    pub monthly_top: Vec<MonthlyTopEntry>,
    /// Listening time per month, ascending
    pub monthly: Vec<PeriodTotal<MonthKey>>,
    /// Listening time per year, ascending
    pub yearly: Vec<PeriodTotal<YearKey>>,
    pub peak_month: Option<PeriodTotal<MonthKey>>,
    pub peak_year: Option<PeriodTotal<YearKey>>,
    /// Number of distinct `(song, artist)` pairs
    pub unique_songs: usize,
    /// Sum of all song totals (source of truth for time fields)
    pub total_ms: u64,
    /// First and last month with data, e.g. "2022-01 to 2023-12"
    pub data_range: String,
}

impl Report {
    pub fn total_minutes(&self) -> f64 {
        self.total_ms as f64 / 60_000.0
    }

    pub fn total_hours(&self) -> f64 {
        self.total_ms as f64 / 3_600_000.0
    }
}

/// Compose a [`Report`] from finished accumulators.
///
/// Fails with [`Error::NoUsableRecords`] when no event was accepted; an empty
/// report is never produced.
pub fn assemble(acc: &Accumulators, config: &ReportConfig) -> Result<Report> {
    let provenance = acc.provenance;
    if provenance.song_records_used == 0 {
        return Err(Error::NoUsableRecords {
            total_records_read: provenance.total_records_read,
            ignored_non_song: provenance.ignored_non_song,
            ignored_bad_timestamp: provenance.ignored_bad_timestamp,
        });
    }

    let songs = song_table(acc);
    let monthly = series(&acc.monthly);
    let data_range = data_range(&monthly);

    Ok(Report {
        provenance,
        top_artists: top_artists_by_time(&acc.artists, config.top_count),
        top_by_plays: top_by_plays(&songs, config.top_count),
        top_by_time: top_by_time(&songs, config.top_count),
        top_skipped: top_skipped(&songs, config.top_count),
        monthly_top: monthly_top(&acc.monthly_songs, config.monthly_top_count),
        yearly: series(&acc.yearly),
        peak_month: select_peak(&acc.monthly),
        peak_year: select_peak(&acc.yearly),
        unique_songs: songs.len(),
        total_ms: acc.total_ms(),
        monthly,
        songs,
        data_range,
    })
}

/// "<first month> to <last month>" of an ascending series.
pub fn data_range(monthly: &[PeriodTotal<MonthKey>]) -> String {
    match (monthly.first(), monthly.last()) {
        (Some(first), Some(last)) => format!("{} to {}", first.key, last.key),
        _ => DATA_RANGE_NOT_AVAILABLE.to_string(),
    }
}

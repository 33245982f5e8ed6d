//! Ranked views over finished accumulators
//!
//! Every comparator here is a total order over the accumulated keys, so
//! rankings never depend on hash-map iteration order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::aggregate::{Accumulators, ArtistAccumulator, MonthlySongAccumulator};
use crate::types::{MonthKey, SongKey};

/// Derived metrics shared by every row that carries listening totals.
///
/// Rows only store counts and milliseconds; rates and unit conversions
/// are computed on demand.
pub trait ListeningTotals {
    fn play_count(&self) -> u64;
    fn skip_count(&self) -> u64;
    fn total_ms(&self) -> u64;

    /// Skips per play (0 when there are no plays).
    fn skip_rate(&self) -> f64 {
        let plays = self.play_count();
        if plays == 0 {
            0.0
        } else {
            self.skip_count() as f64 / plays as f64
        }
    }

    fn minutes(&self) -> f64 {
        self.total_ms() as f64 / 60_000.0
    }

    fn hours(&self) -> f64 {
        self.total_ms() as f64 / 3_600_000.0
    }
}

/// One row of the song table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongRow {
    pub song: String,
    pub artist: String,
    /// Representative album (empty if none was ever reported)
    pub album: String,
    /// Representative track URI (empty if none was ever reported)
    pub track_uri: String,
    pub play_count: u64,
    pub skip_count: u64,
    pub total_ms: u64,
}

impl ListeningTotals for SongRow {
    fn play_count(&self) -> u64 {
        self.play_count
    }
    fn skip_count(&self) -> u64 {
        self.skip_count
    }
    fn total_ms(&self) -> u64 {
        self.total_ms
    }
}

/// One row of the artist ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistRow {
    pub artist: String,
    pub play_count: u64,
    pub skip_count: u64,
    pub total_ms: u64,
}

impl ListeningTotals for ArtistRow {
    fn play_count(&self) -> u64 {
        self.play_count
    }
    fn skip_count(&self) -> u64 {
        self.skip_count
    }
    fn total_ms(&self) -> u64 {
        self.total_ms
    }
}

/// One ranked song within a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTopEntry {
    pub month: MonthKey,
    /// 1-based rank within the month
    pub rank: u32,
    pub song: String,
    pub artist: String,
    pub play_count: u64,
    pub total_ms: u64,
}

impl MonthlyTopEntry {
    pub fn minutes(&self) -> f64 {
        self.total_ms as f64 / 60_000.0
    }
}

// ============================================
// Comparators
// ============================================

/// Plays desc, time desc, skips desc, artist asc, song asc.
pub fn cmp_by_plays(a: &SongRow, b: &SongRow) -> Ordering {
    b.play_count
        .cmp(&a.play_count)
        .then_with(|| b.total_ms.cmp(&a.total_ms))
        .then_with(|| b.skip_count.cmp(&a.skip_count))
        .then_with(|| a.artist.cmp(&b.artist))
        .then_with(|| a.song.cmp(&b.song))
}

/// Time desc, plays desc, artist asc, song asc.
pub fn cmp_by_time(a: &SongRow, b: &SongRow) -> Ordering {
    b.total_ms
        .cmp(&a.total_ms)
        .then_with(|| b.play_count.cmp(&a.play_count))
        .then_with(|| a.artist.cmp(&b.artist))
        .then_with(|| a.song.cmp(&b.song))
}

/// Skips desc, plays desc, artist asc, song asc.
pub fn cmp_by_skips(a: &SongRow, b: &SongRow) -> Ordering {
    b.skip_count
        .cmp(&a.skip_count)
        .then_with(|| b.play_count.cmp(&a.play_count))
        .then_with(|| a.artist.cmp(&b.artist))
        .then_with(|| a.song.cmp(&b.song))
}

/// Time desc, plays desc, artist asc.
pub fn cmp_artists_by_time(a: &ArtistRow, b: &ArtistRow) -> Ordering {
    b.total_ms
        .cmp(&a.total_ms)
        .then_with(|| b.play_count.cmp(&a.play_count))
        .then_with(|| a.artist.cmp(&b.artist))
}

fn cmp_monthly(
    (a_key, a): &(&SongKey, &MonthlySongAccumulator),
    (b_key, b): &(&SongKey, &MonthlySongAccumulator),
) -> Ordering {
    b.play_count
        .cmp(&a.play_count)
        .then_with(|| b.total_ms.cmp(&a.total_ms))
        .then_with(|| a_key.artist.cmp(&b_key.artist))
        .then_with(|| a_key.song.cmp(&b_key.song))
}

// ============================================
// Views
// ============================================

/// Build the full song table, ordered by play count.
pub fn song_table(acc: &Accumulators) -> Vec<SongRow> {
    let mut rows: Vec<SongRow> = acc
        .songs
        .iter()
        .map(|(key, song)| SongRow {
            song: key.song.clone(),
            artist: key.artist.clone(),
            album: song.albums.representative().unwrap_or_default().to_string(),
            track_uri: song
                .track_uris
                .representative()
                .unwrap_or_default()
                .to_string(),
            play_count: song.play_count,
            skip_count: song.skip_count,
            total_ms: song.total_ms,
        })
        .collect();
    rows.sort_by(cmp_by_plays);
    rows
}

/// First `limit` songs by play count.
pub fn top_by_plays(rows: &[SongRow], limit: usize) -> Vec<SongRow> {
    top_by(rows, limit, |_| true, cmp_by_plays)
}

/// First `limit` songs by listening time.
pub fn top_by_time(rows: &[SongRow], limit: usize) -> Vec<SongRow> {
    top_by(rows, limit, |_| true, cmp_by_time)
}

/// First `limit` songs by skip count, among songs skipped at least once.
pub fn top_skipped(rows: &[SongRow], limit: usize) -> Vec<SongRow> {
    top_by(rows, limit, |row| row.skip_count > 0, cmp_by_skips)
}

fn top_by<F, C>(rows: &[SongRow], limit: usize, keep: F, cmp: C) -> Vec<SongRow>
where
    F: Fn(&SongRow) -> bool,
    C: Fn(&SongRow, &SongRow) -> Ordering,
{
    let mut ranked: Vec<SongRow> = rows.iter().filter(|row| keep(row)).cloned().collect();
    ranked.sort_by(|a, b| cmp(a, b));
    ranked.truncate(limit);
    ranked
}

/// First `limit` artists by listening time.
pub fn top_artists_by_time(
    artists: &HashMap<String, ArtistAccumulator>,
    limit: usize,
) -> Vec<ArtistRow> {
    let mut rows: Vec<ArtistRow> = artists
        .iter()
        .map(|(artist, acc)| ArtistRow {
            artist: artist.clone(),
            play_count: acc.play_count,
            skip_count: acc.skip_count,
            total_ms: acc.total_ms,
        })
        .collect();
    rows.sort_by(cmp_artists_by_time);
    rows.truncate(limit);
    rows
}

/// Top `per_month` songs for every month, months ascending.
pub fn monthly_top(
    monthly_songs: &BTreeMap<MonthKey, HashMap<SongKey, MonthlySongAccumulator>>,
    per_month: usize,
) -> Vec<MonthlyTopEntry> {
    let mut entries = Vec::new();

    for (month, songs) in monthly_songs {
        let mut ranked: Vec<(&SongKey, &MonthlySongAccumulator)> = songs
            .iter()
            .filter(|(_, acc)| acc.play_count > 0)
            .collect();
        ranked.sort_by(cmp_monthly);

        entries.extend(
            ranked
                .into_iter()
                .take(per_month)
                .enumerate()
                .map(|(i, (key, acc))| MonthlyTopEntry {
                    month: *month,
                    rank: i as u32 + 1,
                    song: key.song.clone(),
                    artist: key.artist.clone(),
                    play_count: acc.play_count,
                    total_ms: acc.total_ms,
                }),
        );
    }

    entries
}

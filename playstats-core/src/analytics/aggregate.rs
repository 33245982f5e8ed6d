//! Single-pass aggregation
//!
//! Folds the record stream into per-song, per-artist, per-month, per-year
//! and per-(month, song) accumulators. The pass never fails: records that
//! are not usable are tallied in [`Provenance`] and skipped.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::counter::FirstSeenCounter;
use crate::ingest;
use crate::types::{ListeningEvent, MonthKey, RawRecord, SkipReason, SongKey, YearKey};

/// Input provenance counters.
///
/// `song_records_used + ignored_non_song + ignored_bad_timestamp == total_records_read`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub total_records_read: u64,
    pub song_records_used: u64,
    pub ignored_non_song: u64,
    pub ignored_bad_timestamp: u64,
}

impl Provenance {
    fn merge(&mut self, other: Provenance) {
        saturating_add_to(&mut self.total_records_read, other.total_records_read);
        saturating_add_to(&mut self.song_records_used, other.song_records_used);
        saturating_add_to(&mut self.ignored_non_song, other.ignored_non_song);
        saturating_add_to(&mut self.ignored_bad_timestamp, other.ignored_bad_timestamp);
    }
}

/// Running totals for one song.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongAccumulator {
    pub play_count: u64,
    pub skip_count: u64,
    pub total_ms: u64,
    /// Non-empty album names seen for this song
    pub albums: FirstSeenCounter,
    /// Non-empty track URIs seen for this song
    pub track_uris: FirstSeenCounter,
}

/// Running totals for one artist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtistAccumulator {
    pub play_count: u64,
    pub skip_count: u64,
    pub total_ms: u64,
}

/// Running totals for one song within one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlySongAccumulator {
    pub play_count: u64,
    pub total_ms: u64,
}

/// All accumulator tables for one aggregation run.
///
/// Mutated only while folding events; afterwards it is a read-only input to
/// ranking and peak selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulators {
    pub provenance: Provenance,
    pub songs: HashMap<SongKey, SongAccumulator>,
    pub artists: HashMap<String, ArtistAccumulator>,
    /// Total milliseconds per month, ascending
    pub monthly: BTreeMap<MonthKey, u64>,
    /// Total milliseconds per year, ascending
    pub yearly: BTreeMap<YearKey, u64>,
    pub monthly_songs: BTreeMap<MonthKey, HashMap<SongKey, MonthlySongAccumulator>>,
}

impl Accumulators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify, normalize and fold one record.
    ///
    /// `seq` is the record's index in the input and drives the first-seen
    /// tie-break for representative album/URI values.
    pub fn add_record(&mut self, seq: usize, raw: &RawRecord) {
        self.provenance.total_records_read = self.provenance.total_records_read.saturating_add(1);
        match ingest::to_event(raw) {
            Ok(event) => self.add_event(seq, &event),
            Err(reason) => self.record_skip(seq, reason),
        }
    }

    /// Fold one accepted event into every table.
    pub fn add_event(&mut self, seq: usize, event: &ListeningEvent) {
        self.provenance.song_records_used = self.provenance.song_records_used.saturating_add(1);

        let key = event.song_key();
        let skipped = u64::from(event.skipped);
        let month = event.month();

        let song = self.songs.entry(key.clone()).or_default();
        song.play_count = song.play_count.saturating_add(1);
        song.skip_count = song.skip_count.saturating_add(skipped);
        song.total_ms = song.total_ms.saturating_add(event.ms_played);
        song.albums.observe(&event.album, seq);
        song.track_uris.observe(&event.track_uri, seq);

        let artist = self.artists.entry(event.artist.clone()).or_default();
        artist.play_count = artist.play_count.saturating_add(1);
        artist.skip_count = artist.skip_count.saturating_add(skipped);
        artist.total_ms = artist.total_ms.saturating_add(event.ms_played);

        saturating_add_to(self.monthly.entry(month).or_insert(0), event.ms_played);
        saturating_add_to(self.yearly.entry(event.year()).or_insert(0), event.ms_played);

        let monthly_song = self
            .monthly_songs
            .entry(month)
            .or_default()
            .entry(key)
            .or_default();
        monthly_song.play_count = monthly_song.play_count.saturating_add(1);
        monthly_song.total_ms = monthly_song.total_ms.saturating_add(event.ms_played);
    }

    fn record_skip(&mut self, seq: usize, reason: SkipReason) {
        tracing::debug!(record = seq, reason = %reason, "Skipping history record");
        match reason {
            SkipReason::NonSongRecord => saturating_add_to(&mut self.provenance.ignored_non_song, 1),
            SkipReason::UnparsableTimestamp => {
                saturating_add_to(&mut self.provenance.ignored_bad_timestamp, 1)
            }
        }
    }

    /// Fold a partial accumulator (built over another slice of the same
    /// input, with global record indices) into this one.
    ///
    /// Counters add, so the merge is associative and commutative.
    pub fn merge(&mut self, other: Accumulators) {
        self.provenance.merge(other.provenance);

        for (key, theirs) in other.songs {
            let ours = self.songs.entry(key).or_default();
            ours.play_count = ours.play_count.saturating_add(theirs.play_count);
            ours.skip_count = ours.skip_count.saturating_add(theirs.skip_count);
            ours.total_ms = ours.total_ms.saturating_add(theirs.total_ms);
            ours.albums.merge(theirs.albums);
            ours.track_uris.merge(theirs.track_uris);
        }

        for (artist, theirs) in other.artists {
            let ours = self.artists.entry(artist).or_default();
            ours.play_count = ours.play_count.saturating_add(theirs.play_count);
            ours.skip_count = ours.skip_count.saturating_add(theirs.skip_count);
            ours.total_ms = ours.total_ms.saturating_add(theirs.total_ms);
        }

        for (month, total) in other.monthly {
            saturating_add_to(self.monthly.entry(month).or_insert(0), total);
        }
        for (year, total) in other.yearly {
            saturating_add_to(self.yearly.entry(year).or_insert(0), total);
        }

        for (month, songs) in other.monthly_songs {
            let ours = self.monthly_songs.entry(month).or_default();
            for (key, theirs) in songs {
                let entry = ours.entry(key).or_default();
                entry.play_count = entry.play_count.saturating_add(theirs.play_count);
                entry.total_ms = entry.total_ms.saturating_add(theirs.total_ms);
            }
        }
    }

    /// Sum of all song totals, saturating at `u64::MAX`.
    pub fn total_ms(&self) -> u64 {
        self.songs
            .values()
            .fold(0u64, |total, s| total.saturating_add(s.total_ms))
    }
}

// Durations near u64::MAX are valid input; totals saturate instead of wrapping.
fn saturating_add_to(slot: &mut u64, amount: u64) {
    *slot = slot.saturating_add(amount);
}

/// Fold a full record sequence in one forward pass.
pub fn aggregate(records: &[RawRecord]) -> Accumulators {
    let mut acc = Accumulators::new();
    for (seq, raw) in records.iter().enumerate() {
        acc.add_record(seq, raw);
    }

    tracing::info!(
        read = acc.provenance.total_records_read,
        used = acc.provenance.song_records_used,
        non_song = acc.provenance.ignored_non_song,
        bad_timestamp = acc.provenance.ignored_bad_timestamp,
        songs = acc.songs.len(),
        "Aggregated listening history"
    );

    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn play(song: &str, artist: &str, album: &str, ts: &str, ms: i64, skipped: bool) -> RawRecord {
        json!({
            "ts": ts,
            "ms_played": ms,
            "skipped": skipped,
            "master_metadata_track_name": song,
            "master_metadata_album_artist_name": artist,
            "master_metadata_album_album_name": album,
            "spotify_track_uri": format!("spotify:track:{}", album),
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn episode(ts: &str) -> RawRecord {
        json!({
            "ts": ts,
            "ms_played": 60000,
            "episode_name": "Weekly Pod",
            "spotify_episode_uri": "spotify:episode:1"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_song_totals() {
        let records = vec![
            play("Song X", "Artist A", "LP", "2023-05-01T10:00:00Z", 1000, false),
            play("Song X", "Artist A", "LP", "2023-05-02T10:00:00Z", 2000, true),
            play("Song X", "Artist A", "LP", "2023-06-01T10:00:00Z", 3000, false),
        ];
        let acc = aggregate(&records);

        let song = &acc.songs[&SongKey::new("Song X", "Artist A")];
        assert_eq!(song.play_count, 3);
        assert_eq!(song.total_ms, 6000);
        assert_eq!(song.skip_count, 1);

        let artist = &acc.artists["Artist A"];
        assert_eq!(artist.play_count, 3);
        assert_eq!(artist.skip_count, 1);

        assert_eq!(acc.monthly[&MonthKey::new(2023, 5)], 3000);
        assert_eq!(acc.monthly[&MonthKey::new(2023, 6)], 3000);
        assert_eq!(acc.yearly[&2023], 6000);
        assert_eq!(acc.total_ms(), 6000);
    }

    #[test]
    fn test_provenance_counts_every_record_once() {
        let records = vec![
            play("Song X", "Artist A", "LP", "2023-05-01T10:00:00Z", 1000, false),
            episode("2023-05-01T11:00:00Z"),
            play("Song Y", "Artist B", "LP", "garbage", 1000, false),
            RawRecord::new(),
        ];
        let acc = aggregate(&records);
        let p = acc.provenance;
        assert_eq!(p.total_records_read, 4);
        assert_eq!(p.song_records_used, 1);
        assert_eq!(p.ignored_non_song, 2);
        assert_eq!(p.ignored_bad_timestamp, 1);
        assert_eq!(
            p.song_records_used + p.ignored_non_song + p.ignored_bad_timestamp,
            p.total_records_read
        );
    }

    #[test]
    fn test_album_variants_do_not_split_song() {
        let records = vec![
            play("Song X", "Artist A", "Single", "2023-05-01T10:00:00Z", 1000, false),
            play("Song X", "Artist A", "Album", "2023-05-02T10:00:00Z", 1000, false),
            play("Song X", "Artist A", "Album", "2023-05-03T10:00:00Z", 1000, false),
        ];
        let acc = aggregate(&records);
        assert_eq!(acc.songs.len(), 1);
        let song = &acc.songs[&SongKey::new("Song X", "Artist A")];
        assert_eq!(song.albums.representative(), Some("Album"));
        assert_eq!(song.track_uris.representative(), Some("spotify:track:Album"));
    }

    #[test]
    fn test_monthly_song_table() {
        let records = vec![
            play("Song X", "Artist A", "LP", "2023-05-01T10:00:00Z", 1000, false),
            play("Song X", "Artist A", "LP", "2023-06-01T10:00:00Z", 500, false),
            play("Song Y", "Artist A", "LP", "2023-06-02T10:00:00Z", 700, false),
        ];
        let acc = aggregate(&records);
        let may = &acc.monthly_songs[&MonthKey::new(2023, 5)];
        assert_eq!(may.len(), 1);
        let june = &acc.monthly_songs[&MonthKey::new(2023, 6)];
        assert_eq!(june[&SongKey::new("Song Y", "Artist A")].total_ms, 700);
    }

    #[test]
    fn test_merge_matches_serial_pass() {
        let records = vec![
            play("Song X", "Artist A", "Deluxe", "2023-05-01T10:00:00Z", 1000, false),
            play("Song X", "Artist A", "Original", "2023-05-02T10:00:00Z", 2000, true),
            episode("2023-05-03T10:00:00Z"),
            play("Song X", "Artist A", "Original", "2023-06-01T10:00:00Z", 3000, false),
            play("Song X", "Artist A", "Deluxe", "2024-01-01T10:00:00Z", 4000, false),
            play("Song Z", "Artist B", "EP", "2024-01-02T10:00:00Z", 5000, false),
        ];
        let serial = aggregate(&records);

        let mut first = Accumulators::new();
        let mut second = Accumulators::new();
        for (seq, raw) in records.iter().enumerate() {
            if seq < 3 {
                first.add_record(seq, raw);
            } else {
                second.add_record(seq, raw);
            }
        }
        // Merge the later partition first; counters and tie-breaks must not care
        second.merge(first);

        assert_eq!(second.provenance, serial.provenance);
        assert_eq!(second.monthly, serial.monthly);
        assert_eq!(second.yearly, serial.yearly);
        assert_eq!(second.artists, serial.artists);
        assert_eq!(second.monthly_songs, serial.monthly_songs);

        let key = SongKey::new("Song X", "Artist A");
        assert_eq!(second.songs[&key].play_count, serial.songs[&key].play_count);
        assert_eq!(second.songs[&key].total_ms, serial.songs[&key].total_ms);
        assert_eq!(
            second.songs[&key].albums.representative(),
            serial.songs[&key].albums.representative()
        );
        assert_eq!(serial.songs[&key].albums.representative(), Some("Deluxe"));
    }

    #[test]
    fn test_huge_durations_saturate_instead_of_overflowing() {
        let huge = |ts: &str| {
            json!({
                "ts": ts,
                "ms_played": 1e20,
                "master_metadata_track_name": "Song X",
                "master_metadata_album_artist_name": "Artist A"
            })
            .as_object()
            .cloned()
            .unwrap()
        };
        let records = vec![huge("2023-05-01T10:00:00Z"), huge("2023-05-02T10:00:00Z")];
        let acc = aggregate(&records);

        let key = SongKey::new("Song X", "Artist A");
        assert_eq!(acc.songs[&key].play_count, 2);
        assert_eq!(acc.songs[&key].total_ms, u64::MAX);
        assert_eq!(acc.artists["Artist A"].total_ms, u64::MAX);
        assert_eq!(acc.monthly[&MonthKey::new(2023, 5)], u64::MAX);
        assert_eq!(acc.yearly[&2023], u64::MAX);
        assert_eq!(acc.total_ms(), u64::MAX);

        let mut doubled = acc.clone();
        doubled.merge(acc);
        assert_eq!(doubled.total_ms(), u64::MAX);
        assert_eq!(doubled.songs[&key].play_count, 4);
    }
}

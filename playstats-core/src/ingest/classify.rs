//! Record classification
//!
//! Separates song playbacks from podcast episodes and malformed entries.

use super::read_string;
use crate::types::{fields, RawRecord};

/// Returns true iff the record is a qualifying song playback.
///
/// Track and artist must both be non-empty after trimming, and the record
/// must not carry an episode name or episode URI. Episode entries are
/// rejected even when they also carry track/artist values.
pub fn classify(raw: &RawRecord) -> bool {
    let has_track = !read_string(raw, fields::TRACK_NAME).is_empty();
    let has_artist = !read_string(raw, fields::ARTIST_NAME).is_empty();
    let is_episode = !read_string(raw, fields::EPISODE_NAME).is_empty()
        || !read_string(raw, fields::EPISODE_URI).is_empty();

    has_track && has_artist && !is_episode
}

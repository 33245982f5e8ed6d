//! Peak period selection

use std::collections::BTreeMap;

use serde::Serialize;

/// Total listening time for one period (month or year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodTotal<K> {
    pub key: K,
    pub total_ms: u64,
}

impl<K> PeriodTotal<K> {
    pub fn minutes(&self) -> f64 {
        self.total_ms as f64 / 60_000.0
    }

    pub fn hours(&self) -> f64 {
        self.total_ms as f64 / 3_600_000.0
    }
}

/// Flatten a series into ascending [`PeriodTotal`]s.
pub fn series<K: Copy + Ord>(totals: &BTreeMap<K, u64>) -> Vec<PeriodTotal<K>> {
    totals
        .iter()
        .map(|(key, total_ms)| PeriodTotal {
            key: *key,
            total_ms: *total_ms,
        })
        .collect()
}

/// Period with the most listening time.
///
/// Ties go to the greatest key. Returns `None` for an empty series.
pub fn select_peak<K: Copy + Ord>(totals: &BTreeMap<K, u64>) -> Option<PeriodTotal<K>> {
    totals
        .iter()
        .max_by(|(a_key, a_ms), (b_key, b_ms)| a_ms.cmp(b_ms).then_with(|| a_key.cmp(b_key)))
        .map(|(key, total_ms)| PeriodTotal {
            key: *key,
            total_ms: *total_ms,
        })
}

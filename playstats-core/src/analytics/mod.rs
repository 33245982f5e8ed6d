//! Analytics module for playstats
//!
//! Turns raw history records into a [`Report`]:
//! - Single-pass aggregation into accumulators ([`aggregate`])
//! - Ranked top lists with total-order comparators ([`ranking`])
//! - Peak month / year selection ([`peak`])
//! - Report assembly ([`report`])
//!
//! ## Pipeline
//!
//! ```text
//! records ─► classify ─► normalize ─► Accumulators ─┬─► rankings ─┐
//!                                                   └─► peaks ────┴─► Report
//! ```

pub mod aggregate;
pub mod counter;
pub mod peak;
pub mod ranking;
pub mod report;

pub use aggregate::{
    aggregate, Accumulators, ArtistAccumulator, MonthlySongAccumulator, Provenance,
    SongAccumulator,
};
pub use counter::FirstSeenCounter;
pub use peak::{select_peak, PeriodTotal};
pub use ranking::{ArtistRow, ListeningTotals, MonthlyTopEntry, SongRow};
pub use report::{assemble, Report, DATA_RANGE_NOT_AVAILABLE};

use crate::config::ReportConfig;
use crate::error::Result;
use crate::types::RawRecord;

/// Generate a report for a full record sequence.
///
/// Runs classification, normalization and aggregation in one pass, then
/// ranking, peak selection and assembly. Returns
/// [`crate::Error::NoUsableRecords`] when no song playback survives.
pub fn generate_report(records: &[RawRecord], config: &ReportConfig) -> Result<Report> {
    config.validate()?;

    let acc = aggregate(records);
    let report = assemble(&acc, config)?;

    tracing::info!(
        unique_songs = report.unique_songs,
        total_ms = report.total_ms,
        data_range = %report.data_range,
        "Generated listening report"
    );

    Ok(report)
}

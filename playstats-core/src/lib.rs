//! # playstats-core
//!
//! Core library for playstats - listening statistics from a streaming history export.
//!
//! This library provides:
//! - Domain types for raw records, listening events and period keys
//! - Record classification and normalization
//! - The aggregation and ranking engine that produces a [`Report`]
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Layer 0 (Raw):** Loosely-typed JSON records as exported (never mutated)
//! - **Layer 1 (Canonical):** [`ListeningEvent`]s that passed classification and normalization
//! - **Layer 2 (Derived):** Accumulators, rankings and peaks packaged into a [`Report`]
//!
//! The whole pipeline is one synchronous call with no I/O.
//!
//! ## Example
//!
//! ```rust
//! use playstats_core::{generate_report, ingest, ReportConfig};
//!
//! let json = r#"[{
//!     "ts": "2023-05-01T10:00:00Z",
//!     "ms_played": 180000,
//!     "master_metadata_track_name": "Song X",
//!     "master_metadata_album_artist_name": "Artist A"
//! }]"#;
//!
//! let records = ingest::decode_records(json).expect("valid history");
//! let report = generate_report(&records, &ReportConfig::default()).expect("usable records");
//! assert_eq!(report.unique_songs, 1);
//! assert_eq!(report.data_range, "2023-05 to 2023-05");
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{generate_report, Report};
pub use config::{Config, ReportConfig};
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod types;

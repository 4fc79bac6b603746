//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the canonical region enumeration (`Region`)
//! - fetched record types (`CaseRecord`, `CaseMetric`, `SnapshotRecord`)
//! - resolved run configuration (`FetchConfig`, `RkiConfig`)

pub mod region;
pub mod types;

pub use region::*;
pub use types::*;

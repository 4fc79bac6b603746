//! Shared domain types.
//!
//! These types are intentionally lightweight value types:
//!
//! - fetched records are immutable snapshots of the remote sources
//! - run configuration is resolved once from CLI arguments
//! - nothing here touches the network or the filesystem

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::Region;

/// Which case series to request from the feature-query endpoint.
///
/// The two series share the query shape but differ in the selected count
/// field and in the `where` predicate (deaths are filtered to rows that
/// actually carry a death count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMetric {
    Infections,
    Deaths,
}

impl CaseMetric {
    /// The source attribute holding the count for this series.
    pub fn count_field(self) -> &'static str {
        match self {
            CaseMetric::Infections => "AnzahlFall",
            CaseMetric::Deaths => "AnzahlTodesfall",
        }
    }

    /// The `where` predicate selecting this series for one region.
    pub fn where_clause(self, region: Region) -> String {
        match self {
            CaseMetric::Infections => format!("Bundesland='{}'", region.label()),
            CaseMetric::Deaths => {
                format!("Bundesland='{}' AND AnzahlTodesfall>0", region.label())
            }
        }
    }
}

/// One reported attribute bundle from the feature-query endpoint.
///
/// `count` can be negative: the source publishes corrections to earlier
/// reports as negative deltas, and sums over a day are expected to absorb
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub report_date: NaiveDate,
    pub count: i64,
    pub sex: String,
    pub age_group: String,
    pub region: Region,
}

/// One row of the aggregated snapshot history: cumulative counts for a
/// region as of `date`.
///
/// Counts stay signed because upstream corrections occasionally push a
/// cumulative value down between snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub date: NaiveDate,
    pub region: Region,
    pub confirmed: i64,
    pub recovered: i64,
    pub deaths: i64,
}

/// Resolved configuration for the `fetch` command.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// First day of the dataset (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the dataset (inclusive); `None` means the current date.
    pub end_date: Option<NaiveDate>,
    /// Region reference CSV (`Bundesland`, `Einwohner`).
    pub reference_path: PathBuf,
    /// Where the merged dataset CSV is written.
    pub output_path: PathBuf,
}

/// Resolved configuration for the `rki` command.
#[derive(Debug, Clone)]
pub struct RkiConfig {
    /// Restrict fetching to one region; `None` fetches every region.
    ///
    /// The pivoted output always carries all region columns either way,
    /// since the region set is a closed enumeration, not source-derived.
    pub region: Option<Region>,
    /// Where the pivoted history CSV is written.
    pub output_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_quotes_the_exact_label() {
        assert_eq!(
            CaseMetric::Infections.where_clause(Region::BadenWuerttemberg),
            "Bundesland='Baden-Württemberg'"
        );
        assert_eq!(
            CaseMetric::Deaths.where_clause(Region::Hamburg),
            "Bundesland='Hamburg' AND AnzahlTodesfall>0"
        );
    }

    #[test]
    fn count_field_matches_series() {
        assert_eq!(CaseMetric::Infections.count_field(), "AnzahlFall");
        assert_eq!(CaseMetric::Deaths.count_field(), "AnzahlTodesfall");
    }
}

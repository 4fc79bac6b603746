//! Building the merged daily dataset.
//!
//! The dataset is dense: one row per calendar day across an inclusive
//! range, no matter how sparse the sources are. Per day and region the
//! merger copies cumulative confirmed/recovered/deaths from the snapshot
//! table on an exact (region, date) match and fills zero otherwise.
//! Population comes from the reference table when known. The feature-query
//! columns are part of the schema but stay unpopulated here.

use chrono::NaiveDate;
use tracing::debug;

use crate::data::SnapshotTable;
use crate::domain::Region;
use crate::io::ReferenceTable;

/// Metrics for one (day, region) pair of the merged dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMetrics {
    pub confirmed: i64,
    pub recovered: i64,
    pub deaths: i64,
    pub rki_infections: Option<i64>,
    pub rki_deaths: Option<i64>,
    pub population: Option<u64>,
}

/// One merged row; `metrics` is parallel to the dataset's region list.
#[derive(Debug, Clone)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub metrics: Vec<RegionMetrics>,
}

#[derive(Debug, Clone)]
pub struct MergedDataset {
    pub regions: Vec<Region>,
    pub rows: Vec<MergedRow>,
}

impl MergedDataset {
    /// The metrics for (date, region), if both exist in the dataset.
    pub fn metrics(&self, date: NaiveDate, region: Region) -> Option<&RegionMetrics> {
        let col = self.regions.iter().position(|&r| r == region)?;
        let row = self.rows.iter().find(|r| r.date == date)?;
        row.metrics.get(col)
    }

    /// First and last day of the dataset, if any rows exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?.date;
        let last = self.rows.last()?.date;
        Some((first, last))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Merge the snapshot history and the population reference over every
/// calendar day in `[start, end]`. An inverted range yields an empty
/// dataset rather than an error.
pub fn merge(
    start: NaiveDate,
    end: NaiveDate,
    snapshots: &SnapshotTable,
    reference: &ReferenceTable,
    regions: &[Region],
) -> MergedDataset {
    let mut rows = Vec::new();
    for date in start.iter_days() {
        if date > end {
            break;
        }

        let metrics = regions
            .iter()
            .map(|&region| {
                let snapshot = snapshots.lookup(region, date);
                RegionMetrics {
                    confirmed: snapshot.map_or(0, |s| s.confirmed),
                    recovered: snapshot.map_or(0, |s| s.recovered),
                    deaths: snapshot.map_or(0, |s| s.deaths),
                    // TODO: populate the feature-query columns from the
                    // pivoted history once the fetch command downloads both
                    // sources in one run.
                    rki_infections: None,
                    rki_deaths: None,
                    population: reference.population(region),
                }
            })
            .collect();

        debug!(date = %date, "merged day");
        rows.push(MergedRow { date, metrics });
    }

    MergedDataset {
        regions: regions.to_vec(),
        rows,
    }
}

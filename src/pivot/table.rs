//! Pivoting case records into one row per date.
//!
//! Records arrive as one row per reported attribute bundle. The pivoted
//! table aggregates them to one row per axis date with one cell per
//! region, then layers running totals on top:
//!
//! - `infections` / `deaths`: the day's summed counts (0 when absent)
//! - `cum_deaths`: running sum of daily deaths
//! - `cum_infections`: running sum of daily infections minus `cum_deaths`,
//!   so the column reads as confirmed-but-not-dead
//!
//! Absent (date, region) combinations contribute zero to the day and leave
//! the running totals untouched. The region list is injected and closed;
//! a region with no data at all yields a column of zeros.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{CaseRecord, Region};

/// Per-(date, region) cell of the pivoted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionCells {
    pub infections: i64,
    pub deaths: i64,
    pub cum_infections: i64,
    pub cum_deaths: i64,
}

/// One pivoted row; `cells` is parallel to the table's region list.
#[derive(Debug, Clone)]
pub struct PivotedRow {
    pub date: NaiveDate,
    pub cells: Vec<RegionCells>,
}

#[derive(Debug, Clone)]
pub struct PivotedTable {
    pub regions: Vec<Region>,
    pub rows: Vec<PivotedRow>,
}

impl PivotedTable {
    /// The cell for (date, region), if both exist in the table.
    pub fn cell(&self, date: NaiveDate, region: Region) -> Option<&RegionCells> {
        let col = self.regions.iter().position(|&r| r == region)?;
        let row = self.rows.iter().find(|r| r.date == date)?;
        row.cells.get(col)
    }

    /// Earliest and latest axis date, if any rows exist.
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

/// Pivot both record collections onto the aligned date axis.
pub fn pivot(
    infections: &[CaseRecord],
    deaths: &[CaseRecord],
    axis: &[NaiveDate],
    regions: &[Region],
) -> PivotedTable {
    let infection_sums = daily_sums(infections);
    let death_sums = daily_sums(deaths);

    // Running (raw infections, deaths) totals per region column.
    let mut totals = vec![(0i64, 0i64); regions.len()];

    let mut rows = Vec::with_capacity(axis.len());
    for &date in axis {
        let mut cells = Vec::with_capacity(regions.len());
        for (col, &region) in regions.iter().enumerate() {
            let day_infections = infection_sums.get(&(date, region)).copied().unwrap_or(0);
            let day_deaths = death_sums.get(&(date, region)).copied().unwrap_or(0);

            let (raw_infections, cum_deaths) = &mut totals[col];
            *raw_infections += day_infections;
            *cum_deaths += day_deaths;

            cells.push(RegionCells {
                infections: day_infections,
                deaths: day_deaths,
                cum_infections: *raw_infections - *cum_deaths,
                cum_deaths: *cum_deaths,
            });
        }
        rows.push(PivotedRow { date, cells });
    }

    PivotedTable {
        regions: regions.to_vec(),
        rows,
    }
}

/// Sum record counts per (date, region). Multiple bundles for the same day
/// (age groups, sexes, corrections) collapse into one signed total.
fn daily_sums(records: &[CaseRecord]) -> HashMap<(NaiveDate, Region), i64> {
    let mut sums = HashMap::new();
    for record in records {
        *sums.entry((record.report_date, record.region)).or_insert(0) += record.count;
    }
    sums
}

//! Shared pipeline logic behind the two commands.
//!
//! Keeping this in one place avoids duplicating the core workflows:
//! reference load -> snapshot download -> day-by-day merge for `fetch`,
//! and series fetch -> axis alignment -> pivot for `rki`.
//!
//! The app layer on top focuses on argument handling and presentation.

use chrono::Local;

use crate::data::{MorgenpostClient, RkiClient};
use crate::domain::{FetchConfig, Region, RkiConfig};
use crate::error::AppError;
use crate::io::{ReferenceTable, load_reference};
use crate::merge::{MergedDataset, merge};
use crate::pivot::{PivotedTable, aligned_dates, pivot};

/// All computed outputs of a `covid-data fetch` run.
#[derive(Debug, Clone)]
pub struct FetchOutput {
    pub dataset: MergedDataset,
    pub reference: ReferenceTable,
}

/// Execute the merge pipeline and return the computed outputs.
pub fn run_fetch(config: &FetchConfig) -> Result<FetchOutput, AppError> {
    // 1) Load the local region reference.
    let reference = load_reference(&config.reference_path)?;

    // 2) Download the full snapshot history.
    let client = MorgenpostClient::from_env();
    let snapshots = client.fetch_history()?;

    // 3) Merge day by day over the requested range.
    let end_date = config
        .end_date
        .unwrap_or_else(|| Local::now().date_naive());
    let dataset = merge(
        config.start_date,
        end_date,
        &snapshots,
        &reference,
        &Region::ALL,
    );

    Ok(FetchOutput { dataset, reference })
}

/// All computed outputs of a `covid-data rki` run.
#[derive(Debug, Clone)]
pub struct RkiOutput {
    pub table: PivotedTable,
    pub infection_rows: usize,
    pub death_rows: usize,
}

/// Execute the history pipeline and return the computed outputs.
pub fn run_rki(config: &RkiConfig) -> Result<RkiOutput, AppError> {
    // 1) Fetch both series, for one region or for all of them.
    let client = RkiClient::from_env();
    let fetch_regions: Vec<Region> = match config.region {
        Some(region) => vec![region],
        None => Region::ALL.to_vec(),
    };
    let (infections, deaths) = client.fetch_history(&fetch_regions)?;

    if infections.is_empty() && deaths.is_empty() {
        return Err(AppError::new(3, "The source returned no case records."));
    }

    // 2) Align both series onto one date axis.
    let axis = aligned_dates(&infections, &deaths);

    // 3) Pivot onto the full region set.
    let table = pivot(&infections, &deaths, &axis, &Region::ALL);

    Ok(RkiOutput {
        table,
        infection_rows: infections.len(),
        death_rows: deaths.len(),
    })
}

//! Formatted terminal summaries.
//!
//! We keep formatting code in one place so:
//! - the fetch/merge code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use std::path::Path;

use chrono::NaiveDate;

use crate::io::ReferenceTable;
use crate::merge::MergedDataset;
use crate::pivot::PivotedTable;

/// Format the summary printed after building the merged dataset.
pub fn format_fetch_summary(
    dataset: &MergedDataset,
    reference: &ReferenceTable,
    output_path: &Path,
) -> String {
    let mut out = String::new();

    out.push_str("=== covid-data - merged dataset ===\n");
    out.push_str(&format!("Days: {}\n", dataset.len()));
    out.push_str(&format!("Range: {}\n", fmt_range(dataset.date_range())));

    let with_population = dataset
        .regions
        .iter()
        .filter(|&&region| reference.population(region).is_some())
        .count();
    out.push_str(&format!(
        "Regions: {} ({} with population figures)\n",
        dataset.regions.len(),
        with_population
    ));
    out.push_str(&format!("Output: {}\n", output_path.display()));

    out
}

/// Format the summary printed after writing the pivoted history.
pub fn format_rki_summary(
    table: &PivotedTable,
    infection_rows: usize,
    death_rows: usize,
    output_path: &Path,
) -> String {
    let mut out = String::new();

    out.push_str("=== covid-data - RKI history ===\n");
    out.push_str(&format!("Dates: {}\n", table.len()));
    out.push_str(&format!("Range: {}\n", fmt_range(table.date_range())));
    out.push_str(&format!("Regions: {}\n", table.regions.len()));
    out.push_str(&format!(
        "Records: {infection_rows} infection rows, {death_rows} death rows\n"
    ));
    out.push_str(&format!("Output: {}\n", output_path.display()));

    out
}

fn fmt_range(range: Option<(NaiveDate, NaiveDate)>) -> String {
    match range {
        Some((first, last)) => format!("[{first}, {last}]"),
        None => "(empty)".to_string(),
    }
}

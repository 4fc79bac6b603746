//! CSV exports for the merged dataset and the pivoted history.
//!
//! Column names follow the `{region}:{source}:{metric}` scheme so the files
//! are easy to consume in spreadsheets or downstream scripts. Cells without
//! a value (unpopulated feature-query columns, unknown populations) are
//! written empty, not as zero.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Region;
use crate::error::AppError;
use crate::merge::{MergedDataset, MergedRow};
use crate::pivot::{PivotedRow, PivotedTable};

/// Write the merged daily dataset to a CSV file.
pub fn write_dataset_csv(path: &Path, dataset: &MergedDataset) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create dataset CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "{}", dataset_header(&dataset.regions))
        .map_err(|e| AppError::new(2, format!("Failed to write dataset CSV header: {e}")))?;

    for row in &dataset.rows {
        writeln!(file, "{}", dataset_line(row))
            .map_err(|e| AppError::new(2, format!("Failed to write dataset CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the pivoted per-date history to a CSV file.
pub fn write_pivoted_csv(path: &Path, table: &PivotedTable) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create history CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "{}", pivoted_header(&table.regions))
        .map_err(|e| AppError::new(2, format!("Failed to write history CSV header: {e}")))?;

    for row in &table.rows {
        writeln!(file, "{}", pivoted_line(row))
            .map_err(|e| AppError::new(2, format!("Failed to write history CSV row: {e}")))?;
    }

    Ok(())
}

fn dataset_header(regions: &[Region]) -> String {
    let mut columns = Vec::with_capacity(1 + regions.len() * 6);
    columns.push("date".to_string());
    for region in regions {
        let label = region.label();
        columns.push(format!("{label}:morgenpost:confirmed"));
        columns.push(format!("{label}:morgenpost:recovered"));
        columns.push(format!("{label}:morgenpost:deaths"));
        columns.push(format!("{label}:rki:infections"));
        columns.push(format!("{label}:rki:deaths"));
        columns.push(format!("{label}:info:population"));
    }
    columns.join(",")
}

fn dataset_line(row: &MergedRow) -> String {
    let mut fields = Vec::with_capacity(1 + row.metrics.len() * 6);
    fields.push(row.date.to_string());
    for metrics in &row.metrics {
        fields.push(metrics.confirmed.to_string());
        fields.push(metrics.recovered.to_string());
        fields.push(metrics.deaths.to_string());
        fields.push(metrics.rki_infections.map(|v| v.to_string()).unwrap_or_default());
        fields.push(metrics.rki_deaths.map(|v| v.to_string()).unwrap_or_default());
        fields.push(metrics.population.map(|v| v.to_string()).unwrap_or_default());
    }
    fields.join(",")
}

/// Daily pairs for every region come first, the cumulative pairs after, so
/// consumers selecting columns by prefix get each family contiguously.
fn pivoted_header(regions: &[Region]) -> String {
    let mut columns = Vec::with_capacity(1 + regions.len() * 4);
    columns.push("Datum".to_string());
    for region in regions {
        let label = region.label();
        columns.push(format!("RKI:Infektionen:{label}"));
        columns.push(format!("RKI:Todesfaelle:{label}"));
    }
    for region in regions {
        let label = region.label();
        columns.push(format!("RKI:Summe_Infektionen:{label}"));
        columns.push(format!("RKI:Summe_Todesfaelle:{label}"));
    }
    columns.join(",")
}

fn pivoted_line(row: &PivotedRow) -> String {
    let mut fields = Vec::with_capacity(1 + row.cells.len() * 4);
    fields.push(row.date.to_string());
    for cell in &row.cells {
        fields.push(cell.infections.to_string());
        fields.push(cell.deaths.to_string());
    }
    for cell in &row.cells {
        fields.push(cell.cum_infections.to_string());
        fields.push(cell.cum_deaths.to_string());
    }
    fields.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use chrono::NaiveDate;

    use crate::merge::RegionMetrics;
    use crate::pivot::RegionCells;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dataset_export_writes_header_and_rows() {
        let dataset = MergedDataset {
            regions: vec![Region::Hamburg, Region::Bremen],
            rows: vec![MergedRow {
                date: date(2020, 3, 1),
                metrics: vec![
                    RegionMetrics {
                        confirmed: 5,
                        recovered: 2,
                        deaths: 1,
                        rki_infections: None,
                        rki_deaths: None,
                        population: Some(1_841_179),
                    },
                    RegionMetrics {
                        confirmed: 0,
                        recovered: 0,
                        deaths: 0,
                        rki_infections: None,
                        rki_deaths: None,
                        population: None,
                    },
                ],
            }],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        write_dataset_csv(&path, &dataset).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,\
             Hamburg:morgenpost:confirmed,Hamburg:morgenpost:recovered,Hamburg:morgenpost:deaths,\
             Hamburg:rki:infections,Hamburg:rki:deaths,Hamburg:info:population,\
             Bremen:morgenpost:confirmed,Bremen:morgenpost:recovered,Bremen:morgenpost:deaths,\
             Bremen:rki:infections,Bremen:rki:deaths,Bremen:info:population"
        );
        assert_eq!(lines.next().unwrap(), "2020-03-01,5,2,1,,,1841179,0,0,0,,,");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn an_empty_dataset_still_gets_a_header() {
        let dataset = MergedDataset {
            regions: vec![Region::Hamburg],
            rows: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        write_dataset_csv(&path, &dataset).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 1);
    }

    #[test]
    fn pivoted_export_groups_daily_then_cumulative_columns() {
        let table = PivotedTable {
            regions: vec![Region::Hamburg, Region::Berlin],
            rows: vec![PivotedRow {
                date: date(2020, 3, 2),
                cells: vec![
                    RegionCells {
                        infections: 3,
                        deaths: 1,
                        cum_infections: 7,
                        cum_deaths: 1,
                    },
                    RegionCells::default(),
                ],
            }],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        write_pivoted_csv(&path, &table).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Datum,\
             RKI:Infektionen:Hamburg,RKI:Todesfaelle:Hamburg,\
             RKI:Infektionen:Berlin,RKI:Todesfaelle:Berlin,\
             RKI:Summe_Infektionen:Hamburg,RKI:Summe_Todesfaelle:Hamburg,\
             RKI:Summe_Infektionen:Berlin,RKI:Summe_Todesfaelle:Berlin"
        );
        assert_eq!(lines.next().unwrap(), "2020-03-02,3,1,0,0,7,1,0,0");
    }

    #[test]
    fn umlaut_labels_survive_the_export() {
        let table = PivotedTable {
            regions: vec![Region::BadenWuerttemberg],
            rows: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        write_pivoted_csv(&path, &table).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("RKI:Infektionen:Baden-Württemberg"));
    }

    #[test]
    fn an_unwritable_path_is_a_local_error() {
        let dataset = MergedDataset {
            regions: Vec::new(),
            rows: Vec::new(),
        };
        let err = write_dataset_csv(Path::new("/nonexistent/dir/out.csv"), &dataset).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

//! Region reference ingest.
//!
//! The reference file is a small local CSV listing federal states
//! (`Bundesland` column) with population figures (`Einwohner` column).
//! Parsing is header-addressed and case-insensitive. Unknown labels are
//! skipped with a warning and duplicates keep the first entry. A present
//! but malformed population number is fatal, while the population column
//! as a whole is optional; absent figures stay empty in the output rather
//! than being invented.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::warn;

use crate::domain::Region;
use crate::error::AppError;
use crate::io::table::{cell, column, header_map};

/// Per-region population lookup.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: HashMap<Region, Option<u64>>,
}

impl ReferenceTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table directly from (region, population) pairs. Later pairs
    /// for the same region are ignored, matching the file semantics.
    pub fn from_entries(pairs: impl IntoIterator<Item = (Region, Option<u64>)>) -> Self {
        let mut entries = HashMap::new();
        for (region, population) in pairs {
            entries.entry(region).or_insert(population);
        }
        Self { entries }
    }

    /// The population figure for `region`, when the file supplied one.
    pub fn population(&self, region: Region) -> Option<u64> {
        self.entries.get(&region).copied().flatten()
    }

    /// Whether the file listed `region` at all (with or without a figure).
    pub fn contains(&self, region: Region) -> bool {
        self.entries.contains_key(&region)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn load_reference(path: &Path) -> Result<ReferenceTable, AppError> {
    let data = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read {}: {e}", path.display())))?;
    parse_reference(&data)
}

fn parse_reference(data: &str) -> Result<ReferenceTable, AppError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read reference headers: {e}")))?
        .clone();
    let map = header_map(&headers);

    let label_idx = column(&map, "bundesland")
        .ok_or_else(|| AppError::new(2, "Reference CSV is missing a `Bundesland` column."))?;
    let population_idx = column(&map, "einwohner");

    let mut entries: HashMap<Region, Option<u64>> = HashMap::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = result
            .map_err(|e| AppError::new(2, format!("Reference CSV error on line {line}: {e}")))?;

        let Some(label) = cell(&record, label_idx) else {
            continue;
        };
        let Some(region) = Region::from_label(label) else {
            warn!(label, line, "ignoring unknown region in reference file");
            continue;
        };
        if entries.contains_key(&region) {
            warn!(region = %region, line, "duplicate region in reference file, keeping the first entry");
            continue;
        }

        let population = match population_idx.and_then(|idx| cell(&record, idx)) {
            None => None,
            Some(text) => Some(text.parse::<u64>().map_err(|e| {
                AppError::new(
                    2,
                    format!("Bad `Einwohner` value `{text}` on reference line {line}: {e}"),
                )
            })?),
        };
        entries.insert(region, population);
    }

    Ok(ReferenceTable { entries })
}

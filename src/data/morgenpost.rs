//! Snapshot-history client for the Morgenpost CSV feed.
//!
//! The feed is one flat CSV holding the full history: one row per
//! (label, date) with cumulative confirmed/recovered/deaths counts. The
//! file also carries countries and world regions; rows whose label is not
//! a known federal state are skipped. There is no pagination.
//!
//! Rows that do match a known region must parse cleanly (ISO date, integer
//! counts). An empty count cell reads as zero since the earliest rows of
//! the history are sparse.

use std::collections::HashMap;
use std::time::Instant;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::domain::{Region, SnapshotRecord};
use crate::error::AppError;
use crate::io::table::{cell, column, header_map};

const DEFAULT_ENDPOINT: &str = "https://interaktiv.morgenpost.de/corona-virus-karte-infektionen-deutschland-weltweit/data/Coronavirus.history.v2.csv";

/// Environment override for the endpoint.
const ENDPOINT_ENV: &str = "COVID_MORGENPOST_URL";

pub struct MorgenpostClient {
    client: Client,
    endpoint: String,
}

impl MorgenpostClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Build a client, honoring `COVID_MORGENPOST_URL` from the environment
    /// (and `.env`) when set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        match std::env::var(ENDPOINT_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_endpoint(url),
            _ => Self::new(),
        }
    }

    /// Download and parse the full snapshot history.
    pub fn fetch_history(&self) -> Result<SnapshotTable, AppError> {
        let start = Instant::now();

        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|e| AppError::new(4, format!("Snapshot download failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Snapshot download failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::new(4, format!("Failed to read snapshot response: {e}")))?;

        let table = parse_history(&body)?;
        info!(
            rows = table.len(),
            elapsed = ?start.elapsed(),
            "fetched snapshot history"
        );
        Ok(table)
    }
}

impl Default for MorgenpostClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot rows indexed for exact (region, date) lookup.
///
/// When the feed repeats a (region, date) pair the last row wins, matching
/// a reader that scans the file top to bottom.
#[derive(Debug)]
pub struct SnapshotTable {
    records: Vec<SnapshotRecord>,
    index: HashMap<(Region, NaiveDate), usize>,
}

impl SnapshotTable {
    pub fn from_records(records: Vec<SnapshotRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            index.insert((record.region, record.date), pos);
        }
        Self { records, index }
    }

    pub fn lookup(&self, region: Region, date: NaiveDate) -> Option<&SnapshotRecord> {
        self.index
            .get(&(region, date))
            .map(|&pos| &self.records[pos])
    }

    /// All rows for one region, ascending by date.
    pub fn region_history(&self, region: Region) -> Vec<&SnapshotRecord> {
        let mut rows: Vec<&SnapshotRecord> = self
            .records
            .iter()
            .filter(|r| r.region == region)
            .collect();
        rows.sort_by_key(|r| r.date);
        rows
    }

    /// Earliest and latest snapshot date, if any rows exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_history(data: &str) -> Result<SnapshotTable, AppError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(4, format!("Failed to read snapshot headers: {e}")))?
        .clone();
    let map = header_map(&headers);

    let label_idx = require_column(&map, "label")?;
    let date_idx = require_column(&map, "date")?;
    let confirmed_idx = require_column(&map, "confirmed")?;
    let recovered_idx = require_column(&map, "recovered")?;
    let deaths_idx = require_column(&map, "deaths")?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record =
            result.map_err(|e| AppError::new(4, format!("Snapshot CSV error on line {line}: {e}")))?;

        // Labels outside the known region set (countries, continents) are
        // expected and not worth a warning each.
        let region = cell(&record, label_idx).and_then(Region::from_label);
        let Some(region) = region else {
            skipped += 1;
            continue;
        };

        let date_text = cell(&record, date_idx).ok_or_else(|| {
            AppError::new(4, format!("Snapshot row on line {line} has no date."))
        })?;
        let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d").map_err(|e| {
            AppError::new(
                4,
                format!("Bad snapshot date `{date_text}` on line {line}: {e}"),
            )
        })?;

        records.push(SnapshotRecord {
            date,
            region,
            confirmed: parse_count(&record, confirmed_idx, "confirmed", line)?,
            recovered: parse_count(&record, recovered_idx, "recovered", line)?,
            deaths: parse_count(&record, deaths_idx, "deaths", line)?,
        });
    }

    debug!(kept = records.len(), skipped, "parsed snapshot history");
    Ok(SnapshotTable::from_records(records))
}

fn require_column(map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    column(map, name)
        .ok_or_else(|| AppError::new(4, format!("Snapshot CSV is missing a `{name}` column.")))
}

fn parse_count(
    record: &StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<i64, AppError> {
    match cell(record, idx) {
        None => Ok(0),
        Some(text) => text.parse::<i64>().map_err(|e| {
            AppError::new(
                4,
                format!("Bad `{name}` value `{text}` on snapshot line {line}: {e}"),
            )
        }),
    }
}

//! Feature-query client for the RKI COVID-19 layer.
//!
//! The source is an ArcGIS FeatureServer: one HTTP GET per page, selecting
//! output fields and a per-region `where` predicate, sorted ascending by
//! report date. The server caps a page at 2000 rows, so a full page means
//! "keep going" and a short page terminates the scan. Pagination is an
//! explicit loop over offsets; the result is the concatenation of all pages.
//!
//! Failures are fatal: network errors, non-success statuses and undecodable
//! payloads all propagate. There is no retry.

use std::time::Instant;

use chrono::{DateTime, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{CaseMetric, CaseRecord, Region};
use crate::error::AppError;

const DEFAULT_ENDPOINT: &str = "https://services7.arcgis.com/mOBPykOjAyBO2ZKk/arcgis/rest/services/RKI_COVID19/FeatureServer/0/query";

/// Environment override for the endpoint (useful against a mirror).
const ENDPOINT_ENV: &str = "COVID_RKI_URL";

/// Fixed page size of the feature query.
const PAGE_SIZE: usize = 2000;

pub struct RkiClient {
    client: Client,
    endpoint: String,
}

impl RkiClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Build a client, honoring `COVID_RKI_URL` from the environment (and
    /// `.env`) when set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        match std::env::var(ENDPOINT_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_endpoint(url),
            _ => Self::new(),
        }
    }

    /// Fetch the full infection history for one region.
    pub fn fetch_infections(&self, region: Region) -> Result<Vec<CaseRecord>, AppError> {
        self.fetch_series(region, CaseMetric::Infections)
    }

    /// Fetch the full death history for one region (rows with a death count
    /// of zero are filtered out server-side).
    pub fn fetch_deaths(&self, region: Region) -> Result<Vec<CaseRecord>, AppError> {
        self.fetch_series(region, CaseMetric::Deaths)
    }

    /// Fetch both series for every region in `regions`, sequentially.
    ///
    /// The per-region fetches are independent of each other; callers must
    /// not rely on any particular fetch order beyond the concatenation
    /// order of the returned vectors.
    pub fn fetch_history(
        &self,
        regions: &[Region],
    ) -> Result<(Vec<CaseRecord>, Vec<CaseRecord>), AppError> {
        let mut infections = Vec::new();
        let mut deaths = Vec::new();
        for &region in regions {
            infections.extend(self.fetch_infections(region)?);
            deaths.extend(self.fetch_deaths(region)?);
        }
        info!(
            regions = regions.len(),
            infection_rows = infections.len(),
            death_rows = deaths.len(),
            "fetched RKI history"
        );
        Ok((infections, deaths))
    }

    fn fetch_series(&self, region: Region, metric: CaseMetric) -> Result<Vec<CaseRecord>, AppError> {
        let start = Instant::now();
        let records = collect_pages(region, metric, |offset| self.fetch_page(region, metric, offset))?;
        info!(
            region = %region,
            ?metric,
            rows = records.len(),
            elapsed = ?start.elapsed(),
            "fetched series"
        );
        Ok(records)
    }

    fn fetch_page(
        &self,
        region: Region,
        metric: CaseMetric,
        offset: usize,
    ) -> Result<Vec<FeatureAttributes>, AppError> {
        let where_clause = metric.where_clause(region);
        let out_fields = format!(
            "ObjectId,{},Meldedatum,Geschlecht,Altersgruppe",
            metric.count_field()
        );
        let offset_value = offset.to_string();
        let page_size_value = PAGE_SIZE.to_string();

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("f", "json"),
                ("where", where_clause.as_str()),
                ("returnGeometry", "false"),
                ("spatialRel", "esriSpatialRelIntersects"),
                ("outFields", out_fields.as_str()),
                ("orderByFields", "Meldedatum asc"),
                ("resultOffset", offset_value.as_str()),
                ("resultRecordCount", page_size_value.as_str()),
                ("cacheHint", "true"),
            ])
            .send()
            .map_err(|e| AppError::new(4, format!("RKI request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("RKI request failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::new(4, format!("Failed to read RKI response: {e}")))?;

        parse_feature_page(&body)
    }
}

impl Default for RkiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct FeaturePage {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    attributes: FeatureAttributes,
}

/// Raw attribute bundle as returned by the endpoint. Only the requested
/// count field is present per series, hence both are optional here.
#[derive(Debug, Deserialize)]
struct FeatureAttributes {
    #[serde(rename = "AnzahlFall")]
    cases: Option<i64>,
    #[serde(rename = "AnzahlTodesfall")]
    deaths: Option<i64>,
    #[serde(rename = "Meldedatum")]
    report_stamp_ms: i64,
    #[serde(rename = "Geschlecht")]
    sex: String,
    #[serde(rename = "Altersgruppe")]
    age_group: String,
}

fn parse_feature_page(body: &str) -> Result<Vec<FeatureAttributes>, AppError> {
    let page: FeaturePage = serde_json::from_str(body)
        .map_err(|e| AppError::new(4, format!("Failed to parse RKI response: {e}")))?;
    Ok(page.features.into_iter().map(|f| f.attributes).collect())
}

/// Drive `fetch_page` from offset 0 until it returns a short page and
/// decode every bundle into a `CaseRecord`.
fn collect_pages<F>(
    region: Region,
    metric: CaseMetric,
    mut fetch_page: F,
) -> Result<Vec<CaseRecord>, AppError>
where
    F: FnMut(usize) -> Result<Vec<FeatureAttributes>, AppError>,
{
    let mut records = Vec::new();
    let mut offset = 0;
    loop {
        let page = fetch_page(offset)?;
        let page_len = page.len();
        for attributes in page {
            records.push(record_from_attributes(attributes, region, metric)?);
        }
        debug!(region = %region, ?metric, offset, rows = page_len, "decoded feature page");
        if page_len < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
    }
    Ok(records)
}

fn record_from_attributes(
    attributes: FeatureAttributes,
    region: Region,
    metric: CaseMetric,
) -> Result<CaseRecord, AppError> {
    let count = match metric {
        CaseMetric::Infections => attributes.cases,
        CaseMetric::Deaths => attributes.deaths,
    }
    .ok_or_else(|| {
        AppError::new(
            4,
            format!("RKI feature is missing the `{}` field.", metric.count_field()),
        )
    })?;

    let report_date = date_from_epoch_millis(attributes.report_stamp_ms).ok_or_else(|| {
        AppError::new(
            4,
            format!(
                "RKI report timestamp {} is out of range.",
                attributes.report_stamp_ms
            ),
        )
    })?;

    Ok(CaseRecord {
        report_date,
        count,
        sex: attributes.sex,
        age_group: attributes.age_group,
        region,
    })
}

/// The source reports `Meldedatum` as epoch milliseconds (midnight UTC).
fn date_from_epoch_millis(ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

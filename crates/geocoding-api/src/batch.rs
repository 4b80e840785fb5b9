//! Row-by-row geocoding of an uploaded table
//!
//! Rows are processed sequentially in their original order with a fixed
//! pause after each upstream lookup. Only the derived columns are touched.

use crate::error::AppError;
use crate::geocoder::Geocoder;
use crate::table::Table;
use maps_scraper::format_degrees;
use std::time::Duration;
use tracing::{info, warn};

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const ADDRESS_COLUMN: &str = "address";

/// Counts reported after a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    /// Rows that triggered an upstream lookup
    pub processed: usize,
    /// Rows with blank or unparseable inputs
    pub skipped: usize,
}

/// Add `latitude`/`longitude` columns by forward geocoding `address_column`
pub async fn process_forward(
    geocoder: &Geocoder,
    table: &mut Table,
    address_column: &str,
    delay: Duration,
) -> Result<BatchSummary, AppError> {
    let source = require_column(table, address_column)?;
    let lat_idx = table.ensure_column(LATITUDE_COLUMN);
    let lng_idx = table.ensure_column(LONGITUDE_COLUMN);

    let mut summary = BatchSummary {
        total: table.len(),
        ..Default::default()
    };

    for row in 0..table.len() {
        let Some(address) = non_blank(table.cell(row, source)).map(str::to_string) else {
            summary.skipped += 1;
            continue;
        };

        info!("Processing {}/{}: {}", row + 1, summary.total, address);

        let coordinate = geocoder.geocode(&address).await.coordinate();
        table.set_cell(row, lat_idx, coordinate.map(|c| format_degrees(c.latitude)));
        table.set_cell(row, lng_idx, coordinate.map(|c| format_degrees(c.longitude)));
        summary.processed += 1;

        pause(delay).await;
    }

    Ok(summary)
}

/// Add an `address` column by reverse geocoding `lat_column`/`long_column`
pub async fn process_reverse(
    geocoder: &Geocoder,
    table: &mut Table,
    lat_column: &str,
    long_column: &str,
    delay: Duration,
) -> Result<BatchSummary, AppError> {
    let lat_src = require_column(table, lat_column)?;
    let lng_src = require_column(table, long_column)?;
    let address_idx = table.ensure_column(ADDRESS_COLUMN);

    let mut summary = BatchSummary {
        total: table.len(),
        ..Default::default()
    };

    for row in 0..table.len() {
        let (Some(raw_lat), Some(raw_lng)) = (
            non_blank(table.cell(row, lat_src)),
            non_blank(table.cell(row, lng_src)),
        ) else {
            summary.skipped += 1;
            continue;
        };

        let (Some(latitude), Some(longitude)) = (parse_float(raw_lat), parse_float(raw_lng))
        else {
            warn!("Invalid coordinates at row {}: {}, {}", row + 1, raw_lat, raw_lng);
            summary.skipped += 1;
            continue;
        };

        info!(
            "Processing {}/{}: {}, {}",
            row + 1,
            summary.total,
            latitude,
            longitude
        );

        let result = geocoder.reverse_geocode(latitude, longitude).await;
        table.set_cell(row, address_idx, Some(result.address));
        summary.processed += 1;

        pause(delay).await;
    }

    Ok(summary)
}

fn require_column(table: &Table, name: &str) -> Result<usize, AppError> {
    table
        .column_index(name)
        .ok_or_else(|| AppError::ColumnNotFound {
            column: name.to_string(),
            available: table.headers().to_vec(),
        })
}

fn non_blank(cell: Option<&str>) -> Option<&str> {
    cell.filter(|value| !value.trim().is_empty())
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

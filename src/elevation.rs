//! Elevation table import.
//!
//! An elevation table maps every reservoir elevation between the configured
//! bounds, at hundredth-metre resolution, to its effective volume and
//! surface area. The table is a fixed physical lookup surface, so an upload
//! is only accepted when it provides exactly one in-bound row per grid point.

use crate::constants::{
    ELEVATION_STEP, GENERIC_IMPORT_FAILURE, MAX_ELEVATION, MAX_GRID_POINTS, MIN_ELEVATION,
    MIN_FIELDS_PER_ROW,
};
use crate::error::{HydroError, Result};
use crate::locale_number::parse_local_float;
use crate::models::{ElevationEntry, ElevationRecord, ElevationTable, ValidationOutcome};
use crate::rows::{data_rows, read_upload};
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::{debug, info, warn};

/// Inclusive elevation range covered by the lookup table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ElevationBounds {
    fn default() -> Self {
        Self {
            min: MIN_ELEVATION,
            max: MAX_ELEVATION,
            step: ELEVATION_STEP,
        }
    }
}

impl ElevationBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            ..Default::default()
        }
    }

    /// Number of grid points from `min` to `max` inclusive
    pub fn expected_count(&self) -> usize {
        ((self.max - self.min) / self.step).round() as usize + 1
    }

    /// Every grid point, rounded to hundredths
    pub fn grid(&self) -> Vec<f64> {
        (0..self.expected_count())
            .map(|i| to_hundredths(self.min + i as f64 * self.step) as f64 / 100.0)
            .collect()
    }

    /// Inclusive bound check at hundredth resolution
    pub fn contains(&self, elevation: f64) -> bool {
        let value = to_hundredths(elevation);
        value >= to_hundredths(self.min) && value <= to_hundredths(self.max)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Err(HydroError::configuration(
                "Elevation bounds must be finite numbers",
            ));
        }
        if self.min >= self.max {
            return Err(HydroError::configuration(format!(
                "Minimum elevation {:.2} must be below maximum {:.2}",
                self.min, self.max
            )));
        }
        if self.step < ELEVATION_STEP {
            return Err(HydroError::configuration(format!(
                "Elevation step {} is finer than the table resolution {}",
                self.step, ELEVATION_STEP
            )));
        }
        if self.expected_count() > MAX_GRID_POINTS {
            return Err(HydroError::configuration(format!(
                "Elevation range {:.2} - {:.2} spans more than {} grid points",
                self.min, self.max, MAX_GRID_POINTS
            )));
        }
        Ok(())
    }
}

fn to_hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Rows classified by the elevation bound check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElevationScan {
    pub accepted: Vec<ElevationRecord>,
    /// Out-of-bound elevations, in input order
    pub invalid: Vec<f64>,
}

/// Parse every data row and split it by the bound check.
///
/// Rows with fewer than three fields are dropped without being counted.
pub fn scan_elevation_rows(text: &str, bounds: &ElevationBounds) -> Result<ElevationScan> {
    let mut scan = ElevationScan::default();

    for row in data_rows(text)? {
        if !row.has_fields(MIN_FIELDS_PER_ROW) {
            debug!("Skipping line {}: {} fields", row.line_number, row.len());
            continue;
        }

        let record = ElevationRecord {
            elevation: parse_local_float(row.field(0)),
            volume: parse_local_float(row.field(1)),
            area: parse_local_float(row.field(2)),
        };

        if bounds.contains(record.elevation) {
            scan.accepted.push(record);
        } else {
            scan.invalid.push(record.elevation);
        }
    }

    Ok(scan)
}

/// Import an elevation table from uploaded text
pub fn import_elevation_table(
    text: &str,
    bounds: &ElevationBounds,
) -> ValidationOutcome<ElevationTable> {
    let scan = match scan_elevation_rows(text, bounds) {
        Ok(scan) => scan,
        Err(e) => {
            warn!("Failed to read elevation rows: {}", e);
            return ValidationOutcome::failure(GENERIC_IMPORT_FAILURE);
        }
    };
    let expected = bounds.expected_count();

    if scan.accepted.len() != expected {
        warn!(
            "Elevation table rejected: {} rows accepted, {} expected, {} out of range",
            scan.accepted.len(),
            expected,
            scan.invalid.len()
        );
        return ValidationOutcome::failure(rejection_message(&scan, bounds, expected));
    }

    let table = build_table(&scan.accepted);
    info!("Elevation table imported with {} entries", table.len());
    ValidationOutcome::success(table)
}

/// Import an elevation table from a reader.
///
/// Read or decoding failures become the generic failure message.
pub fn import_elevation_reader<R: Read>(
    reader: R,
    bounds: &ElevationBounds,
) -> ValidationOutcome<ElevationTable> {
    match read_upload(reader) {
        Ok(text) => import_elevation_table(&text, bounds),
        Err(e) => {
            warn!("Failed to read elevation upload: {}", e);
            ValidationOutcome::failure(GENERIC_IMPORT_FAILURE)
        }
    }
}

fn build_table(records: &[ElevationRecord]) -> ElevationTable {
    let mut table = ElevationTable::new();

    for record in records {
        if !(record.elevation.is_finite() && record.volume.is_finite() && record.area.is_finite())
        {
            debug!("Skipping non-numeric elevation row {:?}", record);
            continue;
        }
        table.insert(
            record.elevation,
            ElevationEntry::from_values(record.volume, record.area),
        );
    }

    table
}

fn rejection_message(scan: &ElevationScan, bounds: &ElevationBounds, expected: usize) -> String {
    let range = format!("{:.2} - {:.2} mdpl", bounds.min, bounds.max);

    if scan.invalid.is_empty() {
        return format!(
            "Jumlah data elevasi tidak sesuai: ditemukan {} baris valid, dibutuhkan {} baris untuk rentang {}.",
            scan.accepted.len(),
            expected,
            range
        );
    }

    let values = scan
        .invalid
        .iter()
        .map(|elevation| format!("{:.2}", elevation))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Ditemukan {} elevasi di luar rentang valid: {}. Rentang elevasi yang valid adalah {}. Data valid: {} dari {} baris.",
        scan.invalid.len(),
        values,
        range,
        scan.accepted.len(),
        expected
    )
}

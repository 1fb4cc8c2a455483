//! Application constants for hydro operations imports
//!
//! This module contains the reservoir bounds, accepted month names,
//! operator-facing messages and retry defaults used throughout the crate.

// =============================================================================
// Elevation Table
// =============================================================================

/// Lowest elevation (mdpl) present in the reservoir lookup table
pub const MIN_ELEVATION: f64 = 224.50;

/// Highest elevation (mdpl) present in the reservoir lookup table
pub const MAX_ELEVATION: f64 = 231.50;

/// Resolution of the lookup table
pub const ELEVATION_STEP: f64 = 0.01;

/// Grid points between MIN_ELEVATION and MAX_ELEVATION inclusive
pub const EXPECTED_ELEVATION_ROWS: usize = 701;

/// Largest grid a configured elevation range may span
pub const MAX_GRID_POINTS: usize = 100_000;

/// Divisor applied by the scaled number format (last two digits are the fraction)
pub const SCALED_NUMBER_DIVISOR: f64 = 100.0;

// =============================================================================
// Delimited Text Format
// =============================================================================

/// Preferred field delimiter, used whenever an upload contains it
pub const PRIMARY_DELIMITER: char = ';';

/// Fallback field delimiter
pub const SECONDARY_DELIMITER: char = ',';

/// Minimum number of fields in a data row for either importer
pub const MIN_FIELDS_PER_ROW: usize = 3;

/// Thousands separator in the regional number format
pub const THOUSANDS_SEPARATOR: char = '.';

/// Decimal separator in the regional number format
pub const DECIMAL_SEPARATOR: char = ',';

// =============================================================================
// Reservoir Operation Plan
// =============================================================================

/// Indonesian month names, January first
pub const MONTHS_ID: [&str; 12] = [
    "januari",
    "februari",
    "maret",
    "april",
    "mei",
    "juni",
    "juli",
    "agustus",
    "september",
    "oktober",
    "november",
    "desember",
];

/// English month names, January first
pub const MONTHS_EN: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

// =============================================================================
// Operator Messages
// =============================================================================

/// Returned when an import fails for a reason other than validation
pub const GENERIC_IMPORT_FAILURE: &str =
    "Terjadi kesalahan saat memproses file CSV. Pastikan format file sudah benar.";

/// Returned when a plan upload contains no recognizable rows
pub const EMPTY_PLAN_FAILURE: &str =
    "Tidak ada data RTOW yang valid. Periksa nama bulan, hari, dan target elevasi.";

// =============================================================================
// Retry Defaults
// =============================================================================

/// Default attempt budget for both retry policies
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Default delay before the first retry
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Default delay multiplier for exponential backoff
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Ceiling on any single backoff delay
pub const DEFAULT_MAX_RETRY_DELAY_MS: u64 = 60_000;

// =============================================================================
// Configuration
// =============================================================================

/// Directory under the user config dir holding the config file
pub const CONFIG_DIR_NAME: &str = "hydro-ops";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_sets_are_disjoint_except_shared_names() {
        let shared: Vec<_> = MONTHS_ID
            .iter()
            .filter(|name| MONTHS_EN.contains(*name))
            .collect();
        // "april", "september" and "november" are spelled the same in both
        assert_eq!(shared.len(), 3);
    }

    #[test]
    fn test_expected_rows_matches_bounds() {
        let steps = ((MAX_ELEVATION - MIN_ELEVATION) / ELEVATION_STEP).round() as usize;
        assert_eq!(steps + 1, EXPECTED_ELEVATION_ROWS);
    }
}

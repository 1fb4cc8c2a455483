//! Reservoir operation plan (RTOW) import.
//!
//! A plan is a variable-length schedule of `month;day;target elevation`
//! rows. Unlike the elevation table there is no completeness rule: any
//! non-empty list of recognisable rows is a usable plan.

use crate::constants::{
    EMPTY_PLAN_FAILURE, GENERIC_IMPORT_FAILURE, MIN_FIELDS_PER_ROW, MONTHS_EN, MONTHS_ID,
};
use crate::error::Result;
use crate::locale_number::parse_plain_float;
use crate::models::{ReservoirPlan, ReservoirPlanRecord, ValidationOutcome};
use crate::rows::{data_rows, read_upload};
use std::io::Read;
use tracing::{debug, info, warn};

/// Calendar month (1-12) for an Indonesian or English month name
pub fn month_number(name: &str) -> Option<u32> {
    let lower = name.trim().to_lowercase();

    MONTHS_ID
        .iter()
        .position(|month| *month == lower)
        .or_else(|| MONTHS_EN.iter().position(|month| *month == lower))
        .map(|index| index as u32 + 1)
}

/// Case-insensitive membership test against the bilingual month set
pub fn is_valid_month(name: &str) -> bool {
    month_number(name).is_some()
}

/// Parse plan rows in input order, dropping rows that are too short or name
/// an unknown month. An unreadable upload yields no rows.
pub fn import_reservoir_plan(text: &str) -> Vec<ReservoirPlanRecord> {
    parse_plan_rows(text).unwrap_or_else(|e| {
        warn!("Failed to read plan rows: {}", e);
        Vec::new()
    })
}

fn parse_plan_rows(text: &str) -> Result<Vec<ReservoirPlanRecord>> {
    let mut records = Vec::new();

    for row in data_rows(text)? {
        if !row.has_fields(MIN_FIELDS_PER_ROW) {
            debug!("Skipping line {}: {} fields", row.line_number, row.len());
            continue;
        }

        let month = row.field(0);
        if !is_valid_month(month) {
            debug!("Skipping line {}: unknown month '{}'", row.line_number, month);
            continue;
        }

        // Fractional days are truncated, negatives clamp to zero
        let day = parse_plain_float(row.field(1)).trunc() as u32;

        records.push(ReservoirPlanRecord {
            month: month.to_lowercase(),
            day,
            target_elevation: parse_plain_float(row.field(2)),
        });
    }

    Ok(records)
}

/// A plan is usable as soon as it holds one row
pub fn validate_rtow_data(records: &[ReservoirPlanRecord]) -> bool {
    !records.is_empty()
}

/// Import a plan for `year` from a reader
pub fn import_reservoir_plan_reader<R: Read>(
    reader: R,
    year: i32,
) -> ValidationOutcome<ReservoirPlan> {
    let text = match read_upload(reader) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read plan upload: {}", e);
            return ValidationOutcome::failure(GENERIC_IMPORT_FAILURE);
        }
    };

    let records = match parse_plan_rows(&text) {
        Ok(records) => records,
        Err(e) => {
            warn!("Failed to read plan rows: {}", e);
            return ValidationOutcome::failure(GENERIC_IMPORT_FAILURE);
        }
    };
    if !validate_rtow_data(&records) {
        warn!("Plan upload for {} has no usable rows", year);
        return ValidationOutcome::failure(EMPTY_PLAN_FAILURE);
    }

    info!("Imported {} plan rows for {}", records.len(), year);
    ValidationOutcome::success(ReservoirPlan::new(year, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_names_both_languages() {
        assert_eq!(month_number("Januari"), Some(1));
        assert_eq!(month_number("JANUARY"), Some(1));
        assert_eq!(month_number(" agustus "), Some(8));
        assert_eq!(month_number("Mei"), Some(5));
        assert_eq!(month_number("May"), Some(5));
        assert_eq!(month_number("desember"), Some(12));
        assert_eq!(month_number("Jan"), None);
        assert_eq!(month_number(""), None);
    }

    #[test]
    fn test_unknown_months_dropped() {
        let text = "Bulan;Hari;Target\nJanuari;1;228,50\nJan;2;228,60\nFebruary;3;229\n";
        let records = import_reservoir_plan(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].month, "januari");
        assert_eq!(records[0].target_elevation, 228.5);
        assert_eq!(records[1].month, "february");
        assert_eq!(records[1].day, 3);
    }

    #[test]
    fn test_fractional_day_truncated() {
        let records = import_reservoir_plan("h\nmaret;15.9;228.5\nmaret;-2;228.5\n");
        assert_eq!(records[0].day, 15);
        assert_eq!(records[1].day, 0);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let text = "h\nmaret,2,230\njanuari,1,228\nmaret,2,231\n";
        let records = import_reservoir_plan(text);

        let months: Vec<_> = records.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["maret", "januari", "maret"]);
        assert_eq!(records[2].target_elevation, 231.0);
    }

    #[test]
    fn test_quoted_comma_plan() {
        let text = "\"Bulan\",\"Hari\",\"Target\"\n\"Juni\",\"10\",\"229,75\"\n";
        let records = import_reservoir_plan(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month, "juni");
        assert_eq!(records[0].target_elevation, 229.75);
    }

    #[test]
    fn test_short_rows_dropped() {
        assert!(import_reservoir_plan("h\njanuari;1\n").is_empty());
    }

    #[test]
    fn test_validate_rtow_data() {
        assert!(!validate_rtow_data(&[]));
        assert!(validate_rtow_data(&[ReservoirPlanRecord {
            month: "januari".to_string(),
            day: 1,
            target_elevation: 228.5,
        }]));
    }

    #[test]
    fn test_reader_empty_plan_fails() {
        let outcome =
            import_reservoir_plan_reader("Bulan;Hari;Target\nJan;1;228\n".as_bytes(), 2024);
        assert_eq!(outcome.reason(), Some(EMPTY_PLAN_FAILURE));
    }

    #[test]
    fn test_reader_success() {
        let outcome = import_reservoir_plan_reader("h\napril;30;229,75\n".as_bytes(), 2025);
        let plan = outcome.into_result().unwrap();

        assert_eq!(plan.year, 2025);
        assert_eq!(plan.target_for(4, 30), Some(229.75));
    }
}

//! Core data structures for reservoir imports.
//!
//! Defines the records produced by the elevation and plan importers, the
//! lookup structures they aggregate into, and the submission payload handed
//! to the persistence backend.

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of an import: the parsed data or an operator-facing reason
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T> {
    Success { data: T },
    Failure { reason: String },
}

impl<T> ValidationOutcome<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason } => Some(reason),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { reason } => Err(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationOutcome<U> {
        match self {
            Self::Success { data } => ValidationOutcome::Success { data: f(data) },
            Self::Failure { reason } => ValidationOutcome::Failure { reason },
        }
    }
}

/// One parsed row of an elevation table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationRecord {
    pub elevation: f64,
    pub volume: f64,
    pub area: f64,
}

/// Volume and area at one elevation, formatted with two decimals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevationEntry {
    pub volume: String,
    pub area: String,
}

impl ElevationEntry {
    pub fn from_values(volume: f64, area: f64) -> Self {
        Self {
            volume: format!("{:.2}", volume),
            area: format!("{:.2}", area),
        }
    }
}

/// Elevation lookup table keyed by elevation at hundredth precision.
///
/// Iterates in insertion order. Inserting an elevation that is already
/// present replaces its entry in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElevationTable {
    entries: Vec<(f64, ElevationEntry)>,
    index: HashMap<OrderedFloat<f64>, usize>,
}

impl ElevationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry at `elevation`
    pub fn insert(&mut self, elevation: f64, entry: ElevationEntry) {
        let key = elevation_key(elevation);
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = entry,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key.0, entry));
            }
        }
    }

    /// Look up an elevation, rounding the query to hundredths
    pub fn get(&self, elevation: f64) -> Option<&ElevationEntry> {
        self.index
            .get(&elevation_key(elevation))
            .map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, elevation: f64) -> bool {
        self.index.contains_key(&elevation_key(elevation))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &ElevationEntry)> {
        self.entries.iter().map(|(elevation, entry)| (*elevation, entry))
    }
}

fn elevation_key(elevation: f64) -> OrderedFloat<f64> {
    OrderedFloat((elevation * 100.0).round() / 100.0)
}

/// One row of an elevation submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationSubmissionRow {
    pub elevation: f64,
    pub volume: String,
    pub area: String,
}

/// Elevation table flattened for the persistence backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationSubmission {
    pub year: i32,
    pub data: Vec<ElevationSubmissionRow>,
}

/// One target row of a reservoir operation plan (RTOW)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirPlanRecord {
    /// Lower-cased month name, Indonesian or English
    #[serde(rename = "bulan")]
    pub month: String,
    #[serde(rename = "hari")]
    pub day: u32,
    #[serde(rename = "targetElevasi")]
    pub target_elevation: f64,
}

impl ReservoirPlanRecord {
    /// Calendar month (1-12) of this row
    pub fn month_number(&self) -> Option<u32> {
        crate::plan::month_number(&self.month)
    }

    /// Calendar date of this row in `year`, if the day exists in that month
    pub fn date(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month_number()?, self.day)
    }
}

/// An imported plan for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirPlan {
    pub year: i32,
    pub records: Vec<ReservoirPlanRecord>,
}

impl ReservoirPlan {
    pub fn new(year: i32, records: Vec<ReservoirPlanRecord>) -> Self {
        Self { year, records }
    }

    /// Target elevation for a calendar day; the first matching row wins
    pub fn target_for(&self, month: u32, day: u32) -> Option<f64> {
        self.records
            .iter()
            .find(|record| record.month_number() == Some(month) && record.day == day)
            .map(|record| record.target_elevation)
    }

    pub fn is_valid(&self) -> bool {
        crate::plan::validate_rtow_data(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(volume: f64, area: f64) -> ElevationEntry {
        ElevationEntry::from_values(volume, area)
    }

    #[test]
    fn test_entry_formatting() {
        let e = entry(1135.3, 12.0);
        assert_eq!(e.volume, "1135.30");
        assert_eq!(e.area, "12.00");
    }

    #[test]
    fn test_table_duplicate_overwrites_in_place() {
        let mut table = ElevationTable::new();
        table.insert(224.50, entry(1.0, 1.0));
        table.insert(224.51, entry(2.0, 2.0));
        table.insert(224.50, entry(3.0, 3.0));

        assert_eq!(table.len(), 2);
        let order: Vec<_> = table.iter().map(|(elevation, _)| elevation).collect();
        assert_eq!(order, vec![224.50, 224.51]);
        assert_eq!(table.get(224.50).unwrap().volume, "3.00");
    }

    #[test]
    fn test_table_lookup_rounds_query() {
        let mut table = ElevationTable::new();
        table.insert(224.5 + 0.01 * 3.0, entry(5.0, 6.0));

        assert!(table.contains(224.53));
        assert!(table.get(224.5299999).is_some());
        assert!(table.get(224.54).is_none());
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: ValidationOutcome<u8> = ValidationOutcome::success(1);
        let bad: ValidationOutcome<u8> = ValidationOutcome::failure("nope");

        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&1));
        assert_eq!(bad.reason(), Some("nope"));
        assert_eq!(bad.clone().into_result(), Err("nope".to_string()));
        assert_eq!(ok.map(|v| v + 1).into_result(), Ok(2));
    }

    #[test]
    fn test_plan_record_wire_names() {
        let record = ReservoirPlanRecord {
            month: "januari".to_string(),
            day: 1,
            target_elevation: 228.5,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "bulan": "januari", "hari": 1, "targetElevasi": 228.5 })
        );
    }

    #[test]
    fn test_plan_record_dates() {
        let record = |month: &str, day| ReservoirPlanRecord {
            month: month.to_string(),
            day,
            target_elevation: 228.0,
        };

        assert_eq!(
            record("maret", 15).date(2024),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            record("february", 29).date(2024).map(|d| d.to_string()),
            Some("2024-02-29".to_string())
        );
        assert_eq!(record("februari", 30).date(2024), None);
        assert_eq!(record("bogus", 1).date(2024), None);
    }

    #[test]
    fn test_plan_target_lookup() {
        let plan = ReservoirPlan::new(
            2024,
            vec![
                ReservoirPlanRecord {
                    month: "januari".into(),
                    day: 1,
                    target_elevation: 228.5,
                },
                ReservoirPlanRecord {
                    month: "january".into(),
                    day: 1,
                    target_elevation: 229.0,
                },
            ],
        );

        assert_eq!(plan.target_for(1, 1), Some(228.5));
        assert_eq!(plan.target_for(2, 1), None);
        assert!(plan.is_valid());
    }
}

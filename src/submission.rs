//! Submission payloads for the persistence backend.

use crate::error::Result;
use crate::models::{ElevationSubmission, ElevationSubmissionRow, ElevationTable};

/// Flatten an elevation table into rows tagged with `year`.
///
/// Rows keep the table's insertion order; they are not re-sorted by
/// elevation.
pub fn build_elevation_submission(table: &ElevationTable, year: i32) -> ElevationSubmission {
    let data = table
        .iter()
        .map(|(elevation, entry)| ElevationSubmissionRow {
            elevation,
            volume: entry.volume.clone(),
            area: entry.area.clone(),
        })
        .collect();

    ElevationSubmission { year, data }
}

/// Render a submission as pretty-printed JSON
pub fn to_json(submission: &ElevationSubmission) -> Result<String> {
    Ok(serde_json::to_string_pretty(submission)?)
}

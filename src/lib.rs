//! Hydro Operations Import Library
//!
//! Parsing and validation core for the data-entry side of a hydropower plant
//! operations dashboard.
//!
//! This library provides tools for:
//! - Reading regionally formatted numbers (`1.135,30`)
//! - Importing the reservoir elevation to volume/area lookup table, which must
//!   cover every 0.01 m step between the configured bounds
//! - Importing the yearly reservoir operation target schedule (RTOW)
//! - Building submission payloads for the persistence backend
//! - Retrying fallible async operations with fixed or exponential backoff

pub mod cli;
pub mod config;
pub mod constants;
pub mod elevation;
pub mod error;
pub mod locale_number;
pub mod models;
pub mod plan;
pub mod retry;
pub mod rows;
pub mod submission;

// Re-export commonly used types
pub use config::HydroConfig;
pub use elevation::{ElevationBounds, import_elevation_reader, import_elevation_table};
pub use error::{HydroError, NumberParseError, Result};
pub use locale_number::{parse_local_float, parse_plain_float};
pub use models::{
    ElevationEntry, ElevationRecord, ElevationSubmission, ElevationTable, ReservoirPlan,
    ReservoirPlanRecord, ValidationOutcome,
};
pub use plan::{import_reservoir_plan, import_reservoir_plan_reader, validate_rtow_data};
pub use retry::{RetryPolicy, fetch_with_retry, retry_operation};
pub use submission::build_elevation_submission;

//! Error handling for hydro operations imports.
//!
//! Provides error types for file reading, configuration loading and
//! numeric token parsing. Importers themselves never return these across
//! their boundary; they convert failures into a `ValidationOutcome`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HydroError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse config file: {path} - {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HydroError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Failure to read a single regionally formatted number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberParseError {
    #[error("empty numeric token")]
    Empty,

    #[error("malformed numeric token '{token}'")]
    Malformed { token: String },

    #[error("numeric token '{token}' is out of range")]
    OutOfRange { token: String },
}

pub type Result<T> = std::result::Result<T, HydroError>;

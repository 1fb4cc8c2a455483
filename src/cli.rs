//! Command-line interface components.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Import and validate reservoir elevation tables and operation plans
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hydro-ops",
    version,
    about = "Import and validate reservoir elevation tables and operation plans",
    long_about = "Parses operator uploads for the plant dashboard: the elevation to volume/area \
                  lookup table (exactly one row per 0.01 m between the configured bounds) and the \
                  yearly reservoir operation target schedule (RTOW). Accepted uploads are written \
                  as JSON submission payloads."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Import an elevation table and emit its submission payload
    Elevation(ImportArgs),
    /// Import a reservoir operation plan (RTOW)
    Plan(ImportArgs),
    /// Show the elevation grid implied by the configured bounds
    Grid(GridArgs),
}

/// Arguments shared by the import commands
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Delimited text file to import
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Year the upload applies to (defaults to the current year)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Write JSON here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the grid command
#[derive(Debug, Clone, Parser)]
pub struct GridArgs {
    /// Override the minimum elevation
    #[arg(long)]
    pub min: Option<f64>,

    /// Override the maximum elevation
    #[arg(long)]
    pub max: Option<f64>,

    /// Print every grid point
    #[arg(long)]
    pub list: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elevation_command() {
        let args = Args::try_parse_from([
            "hydro-ops",
            "elevation",
            "tma.csv",
            "--year",
            "2024",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.get_log_level(), "debug");
        match args.command {
            Commands::Elevation(import) => {
                assert_eq!(import.file, PathBuf::from("tma.csv"));
                assert_eq!(import.year, Some(2024));
                assert!(import.output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_grid_overrides() {
        let args =
            Args::try_parse_from(["hydro-ops", "grid", "--min", "225", "--max", "226", "-q"])
                .unwrap();

        assert_eq!(args.get_log_level(), "warn");
        match args.command {
            Commands::Grid(grid) => {
                assert_eq!(grid.min, Some(225.0));
                assert_eq!(grid.max, Some(226.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["hydro-ops", "grid", "-v", "-q"]).is_err());
    }
}

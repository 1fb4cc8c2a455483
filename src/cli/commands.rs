//! Command implementations for the hydro-ops binary.

use crate::cli::{Args, Commands, GridArgs, ImportArgs};
use crate::config::HydroConfig;
use crate::elevation::import_elevation_reader;
use crate::models::ValidationOutcome;
use crate::plan::import_reservoir_plan_reader;
use crate::retry::{RetryPolicy, retry};
use crate::submission::{build_elevation_submission, to_json};
use anyhow::{Context, Result, bail};
use chrono::Datelike;
use colored::*;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Dispatch a parsed command line
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;

    let config = HydroConfig::load(args.config_file.as_deref())
        .context("Failed to load configuration")?;
    debug!("Configuration: {:?}", config);

    match &args.command {
        Commands::Elevation(import) => run_elevation(import, &config).await,
        Commands::Plan(import) => run_plan(import, &config).await,
        Commands::Grid(grid) => run_grid(grid, &config),
    }
}

/// Set up structured logging on stderr.
///
/// Quiet runs get compact lines; otherwise each line carries the uptime.
/// `RUST_LOG` overrides the level chosen on the command line.
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hydro_ops={}", log_level)));

    let compact = args.quiet.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
    });
    let timed = (!args.quiet).then(|| {
        fmt::layer()
            .with_target(false)
            .with_timer(fmt::time::uptime())
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(timed)
        .try_init()
        .context("Failed to install the log subscriber")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

async fn run_elevation(args: &ImportArgs, config: &HydroConfig) -> Result<()> {
    let bytes = read_upload_file(&args.file, &config.retry.fixed_policy()).await?;

    let table = match import_elevation_reader(bytes.as_slice(), &config.elevation) {
        ValidationOutcome::Success { data } => data,
        ValidationOutcome::Failure { reason } => bail!("{}", reason),
    };

    let year = args.year.unwrap_or_else(current_year);
    let submission = build_elevation_submission(&table, year);
    write_output(args.output.as_deref(), &to_json(&submission)?).await?;

    eprintln!(
        "{} {} elevation entries for {}",
        "Imported".bright_green().bold(),
        table.len().to_string().bright_white().bold(),
        year
    );
    Ok(())
}

async fn run_plan(args: &ImportArgs, config: &HydroConfig) -> Result<()> {
    let bytes = read_upload_file(&args.file, &config.retry.fixed_policy()).await?;
    let year = args.year.unwrap_or_else(current_year);

    let plan = match import_reservoir_plan_reader(bytes.as_slice(), year) {
        ValidationOutcome::Success { data } => data,
        ValidationOutcome::Failure { reason } => bail!("{}", reason),
    };

    let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
    write_output(args.output.as_deref(), &json).await?;

    eprintln!(
        "{} {} plan rows for {}",
        "Imported".bright_green().bold(),
        plan.len().to_string().bright_white().bold(),
        year
    );
    Ok(())
}

fn run_grid(args: &GridArgs, config: &HydroConfig) -> Result<()> {
    let mut bounds = config.elevation;
    if let Some(min) = args.min {
        bounds.min = min;
    }
    if let Some(max) = args.max {
        bounds.max = max;
    }
    bounds.validate()?;

    println!(
        "{} {:.2} - {:.2} mdpl, step {}",
        "Range:".bright_cyan(),
        bounds.min,
        bounds.max,
        bounds.step
    );
    println!(
        "{} {}",
        "Expected rows:".bright_cyan(),
        bounds.expected_count().to_string().bright_white().bold()
    );

    if args.list {
        for elevation in bounds.grid() {
            println!("{:.2}", elevation);
        }
    }
    Ok(())
}

/// Read an upload.
///
/// Only transient I/O errors go through `policy`; a missing or unreadable
/// file fails on the first call.
async fn read_upload_file(path: &Path, policy: &RetryPolicy) -> Result<Vec<u8>> {
    info!("Reading {}", path.display());

    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if is_transient(&e) => {
            warn!("Transient error reading {}: {}", path.display(), e);
            retry(policy, || tokio::fs::read(path))
                .await
                .with_context(|| format!("Failed to read {}", path.display()))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

async fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            tokio::fs::write(path, content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_missing_upload_fails_without_waiting() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1000));
        let start = Instant::now();

        let err = read_upload_file(Path::new("/nonexistent/elevasi.csv"), &policy)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("/nonexistent/elevasi.csv"));
        assert!(start.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_upload_read_once() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TMA;Volume;Luas").unwrap();

        let bytes = read_upload_file(file.path(), &RetryPolicy::default())
            .await
            .unwrap();
        assert_eq!(bytes, b"TMA;Volume;Luas\n");
    }

    #[test]
    fn test_second_logging_setup_is_an_error() {
        let args = Args::try_parse_from(["hydro-ops", "grid", "-q"]).unwrap();

        let _ = setup_logging(&args);
        let err = setup_logging(&args).unwrap_err();
        assert!(err.to_string().contains("log subscriber"));
    }

    #[test]
    fn test_grid_rejects_oversized_range() {
        let args = GridArgs {
            min: Some(-1.0e12),
            max: Some(1.0e12),
            list: false,
        };
        assert!(run_grid(&args, &HydroConfig::default()).is_err());
    }

    #[test]
    fn test_transient_error_kinds() {
        assert!(is_transient(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }
}

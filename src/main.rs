//! ncexport - Convert netCDF soundings into CSV tables and flight records.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use ncexport::batch::{run_batch, BatchOptions};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "ncexport")]
#[command(
    about = "Convert 1-D netCDF files into CSV tables and flt.dat flight records",
    long_about = None
)]
struct Args {
    /// NetCDF files to convert
    files: Vec<PathBuf>,

    /// Write a debug log to the specified file instead of stderr
    #[arg(long)]
    log: Option<PathBuf>,

    /// Stop at the first file that fails to convert
    #[arg(long)]
    fail_fast: bool,
}

fn init_logging(log: Option<&PathBuf>) -> Result<()> {
    if let Some(log_path) = log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.files.is_empty() {
        eprintln!("NetCDF filename argument required");
        eprintln!("{}", Args::command().render_usage());
        std::process::exit(-1);
    }

    init_logging(args.log.as_ref())?;
    tracing::info!("Starting ncexport on {} files", args.files.len());

    let report = run_batch(
        &args.files,
        BatchOptions {
            fail_fast: args.fail_fast,
        },
    );

    // Failures were logged as they happened; with --log that went to the file.
    if args.log.is_some() {
        for (path, err) in &report.failures {
            eprintln!("Error: {}: {}", path.display(), err);
        }
    }
    tracing::info!(
        "converted {} of {} files",
        report.converted.len(),
        args.files.len()
    );

    std::process::exit(report.exit_code());
}

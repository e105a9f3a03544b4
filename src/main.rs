use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use photomover::config;
use photomover::fonts::FontCache;
use photomover::imaging::RustBackend;
use photomover::report::{ErrorClass, ErrorReporter};
use photomover::runner;
use photomover::storage::LocalSink;

#[derive(Parser)]
#[command(
    name = "photomover",
    version,
    about = "Resize, caption and geotag photos from watched folders"
)]
struct Cli {
    /// CSV file listing the jobs to run.
    #[arg(long, global = true, default_value = "mover_config.csv")]
    config: PathBuf,

    /// Folder that failed images are moved into.
    #[arg(long, global = true, default_value = "failed")]
    quarantine: PathBuf,

    /// Log file, truncated on every start.
    #[arg(long, global = true, default_value = "log.txt")]
    log_file: PathBuf,

    /// Folder searched for <font>.ttf files named in the config.
    #[arg(long, global = true, default_value = ".")]
    font_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run passes forever, reloading the config before each one.
    Run {
        /// Seconds to wait between passes; 0 loops without pausing.
        #[arg(long, default_value_t = 30)]
        interval: u64,

        /// Stop after this many passes instead of running forever.
        #[arg(long)]
        max_passes: Option<u64>,
    },
    /// Run a single pass and exit.
    Once,
    /// Validate the config file and referenced folders without processing.
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Check => check(&cli),
        Command::Once => {
            init_logging(&cli.log_file)?;
            run(&cli, 0, Some(1));
            Ok(())
        }
        Command::Run { interval, max_passes } => {
            let (interval, max_passes) = (*interval, *max_passes);
            init_logging(&cli.log_file)?;
            run(&cli, interval, max_passes);
            Ok(())
        }
    }
}

fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,photomover=info")),
        )
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    Ok(())
}

fn run(cli: &Cli, interval: u64, max_passes: Option<u64>) {
    let backend = RustBackend::new();
    let sink = LocalSink::new();
    let reporter = ErrorReporter::new(&cli.quarantine);
    let mut fonts = FontCache::new();
    let mut passes = 0u64;

    loop {
        // Reloaded every pass so config edits take effect without a restart.
        let jobs = match config::load_jobs(&cli.config) {
            Ok(jobs) => jobs,
            Err(e) => {
                reporter.report(
                    "could not read the config file",
                    &cli.config,
                    &e,
                    ErrorClass::Config,
                );
                break;
            }
        };
        info!("lines read: {}", jobs.len());

        let pass = runner::run_pass(
            &jobs,
            &backend,
            &mut fonts,
            &cli.font_dir,
            &sink,
            &reporter,
        );
        info!(
            "pass complete: {} processed, {} failed, {} jobs skipped",
            pass.images_processed, pass.images_failed, pass.jobs_skipped
        );

        passes += 1;
        if max_passes.is_some_and(|max| passes >= max) {
            break;
        }
        if interval > 0 {
            thread::sleep(Duration::from_secs(interval));
        }
    }
}

fn check(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = config::load_jobs(&cli.config)?;
    println!("==> {} job(s) in {}", jobs.len(), cli.config.display());

    let mut problems = 0usize;
    for (index, job) in jobs.iter().enumerate() {
        let line = index + 1;
        if !job.source_dir.is_dir() {
            println!("==> line {line}: source folder missing: {}", job.source_dir.display());
            problems += 1;
        }
        if let Err(e) = config::parse_dimensions(&job.size) {
            println!("==> line {line}: {e}");
            problems += 1;
        }
        let font = cli.font_dir.join(format!("{}.ttf", job.font));
        if !font.is_file() {
            println!("==> line {line}: font file missing: {}", font.display());
            problems += 1;
        }
    }

    if problems > 0 {
        return Err(format!("{problems} problem(s) found").into());
    }
    println!("==> all jobs look runnable");
    Ok(())
}

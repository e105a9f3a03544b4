//! The per-pass job runner.
//!
//! A pass walks the job list from the config file. For each job it
//! enumerates `.jpg` files in the source folder, transforms up to
//! [`MAX_IMAGES_PER_PASS`] of them through the [`ImageBackend`], stores the
//! results through the [`StorageSink`] under a timestamped name, and cleans
//! up the source and intermediate files. Failures are reported per image
//! and never abort the pass; a job whose setup fails (unreadable folder,
//! bad dimensions, missing font) is skipped whole.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use crate::config::{self, Job};
use crate::fonts::FontCache;
use crate::imaging::{ImageBackend, TransformParams};
use crate::report::{ErrorClass, ErrorReporter, TIMESTAMP_FORMAT};
use crate::storage::StorageSink;

/// Upper bound on images handled per job per pass; the remainder waits for
/// the next pass so one flooded folder cannot starve the other jobs.
pub const MAX_IMAGES_PER_PASS: usize = 10;

/// Only plain `.jpg` files are picked up. The match is case sensitive, so
/// `.JPG` and `.jpeg` files sit in the source folder untouched.
const EXTENSION: &str = ".jpg";

/// What happened to one job during a pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JobOutcome {
    /// Setup failed and no image was attempted.
    pub skipped: bool,
    /// Images transformed (each consumed one counter slot).
    pub processed: usize,
    /// Images that hit a reported failure.
    pub failed: usize,
}

/// Aggregate of all jobs in one pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassOutcome {
    pub jobs_skipped: usize,
    pub images_processed: usize,
    pub images_failed: usize,
}

/// Enumerate `.jpg` files directly inside `dir`, sorted by name so the
/// counter assignment is deterministic.
fn list_images(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut images = Vec::new();
    for entry in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(EXTENSION) {
            images.push(entry.into_path());
        }
    }
    images.sort();
    Ok(images)
}

/// Run one job. `line` is the 1-based row number in the config file, used
/// only for logging.
pub fn run_job<B: ImageBackend, S: StorageSink>(
    line: usize,
    job: &Job,
    backend: &B,
    fonts: &mut FontCache<B>,
    font_dir: &Path,
    sink: &S,
    reporter: &ErrorReporter,
) -> JobOutcome {
    let skipped = JobOutcome { skipped: true, ..JobOutcome::default() };

    info!("line {line}: reading folder {}", job.source_dir.display());
    let images = match list_images(&job.source_dir) {
        Ok(images) => images,
        Err(e) => {
            reporter.report(
                "could not read the server folder",
                &job.source_dir,
                &e,
                ErrorClass::Config,
            );
            return skipped;
        }
    };

    let (width, height) = match config::parse_dimensions(&job.size) {
        Ok(dims) => dims,
        Err(e) => {
            reporter.report("invalid image size", &job.source_dir, &e, ErrorClass::Config);
            return skipped;
        }
    };

    let font = match fonts.ensure(backend, font_dir, &job.font, job.font_size) {
        Ok(font) => font,
        Err(e) => {
            let path = font_dir.join(format!("{}.ttf", job.font));
            reporter.report("failed to load font", &path, &e, ErrorClass::Config);
            return skipped;
        }
    };

    let mut outcome = JobOutcome::default();
    for source in images {
        if outcome.processed == MAX_IMAGES_PER_PASS {
            info!("line {line}: pass limit reached, leaving the rest for later");
            break;
        }

        info!("line {line}: processing {}", source.display());
        let counter = outcome.processed + 1;
        let transformed = job
            .source_dir
            .join(format!("{}_{counter:04}{EXTENSION}", job.name_prefix));

        let params = TransformParams {
            source: source.clone(),
            output: transformed.clone(),
            width,
            height,
            text: job.text.clone(),
            font_size: job.font_size,
            latitude: job.latitude,
            longitude: job.longitude,
        };

        if let Err(e) = backend.transform(font, &params) {
            // The source is removed before reporting so a poisoned file
            // cannot be retried forever; quarantine then finds nothing and
            // logs as much.
            if let Err(remove_err) = fs::remove_file(&source) {
                warn!("cannot remove {}: {remove_err}", source.display());
            }
            reporter.report("failed to process image", &source, &e, ErrorClass::Image);
            outcome.failed += 1;
            continue;
        }
        outcome.processed += 1;

        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let destination = job
            .destination_dir
            .join(format!("{}_{counter:04}_{stamp}{EXTENSION}", job.name_prefix));

        if let Err(e) = sink.store(&transformed, &destination) {
            reporter.report("failed to copy image", &source, &e, ErrorClass::Image);
            if let Err(remove_err) = fs::remove_file(&transformed) {
                warn!("cannot remove {}: {remove_err}", transformed.display());
            }
            outcome.failed += 1;
            continue;
        }
        info!("line {line}: copied {}", destination.display());

        let mut cleanup_failed = false;
        for leftover in [&transformed, &source] {
            if let Err(e) = fs::remove_file(leftover) {
                reporter.report("failed to remove image", leftover, &e, ErrorClass::Image);
                cleanup_failed = true;
            }
        }
        // Both leftovers failing to delete is still one failed image.
        if cleanup_failed {
            outcome.failed += 1;
        }
    }
    outcome
}

/// Run every job once.
pub fn run_pass<B: ImageBackend, S: StorageSink>(
    jobs: &[Job],
    backend: &B,
    fonts: &mut FontCache<B>,
    font_dir: &Path,
    sink: &S,
    reporter: &ErrorReporter,
) -> PassOutcome {
    let mut pass = PassOutcome::default();
    for (index, job) in jobs.iter().enumerate() {
        let outcome = run_job(index + 1, job, backend, fonts, font_dir, sink, reporter);
        if outcome.skipped {
            pass.jobs_skipped += 1;
        }
        pass.images_processed += outcome.processed;
        pass.images_failed += outcome.failed;
    }
    pass
}

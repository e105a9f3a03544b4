//! Error reporting and quarantine.
//!
//! Every recoverable failure in the pipeline funnels through
//! [`ErrorReporter::report`], which writes a timestamped block to the log
//! and, for image-level failures, moves the offending file into the
//! quarantine folder so it stops being retried on the next pass.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{error, warn};

/// Timestamp format shared by log blocks, quarantine names and destination
/// file suffixes.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// What kind of failure is being reported.
///
/// Config failures (unreadable folders, bad job rows) have no file to put
/// aside; image failures quarantine the named file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Config,
    Image,
}

/// Sink for pipeline failures.
///
/// Reporting never returns an error: a reporter that could itself fail
/// would need a second reporter. Problems moving files to quarantine are
/// logged and swallowed.
pub struct ErrorReporter {
    quarantine: PathBuf,
}

impl ErrorReporter {
    pub fn new(quarantine: impl Into<PathBuf>) -> Self {
        ErrorReporter { quarantine: quarantine.into() }
    }

    pub fn quarantine_dir(&self) -> &Path {
        &self.quarantine
    }

    /// Log a failure block and, for [`ErrorClass::Image`], quarantine the
    /// file at `location`.
    pub fn report(&self, message: &str, location: &Path, cause: &dyn Display, class: ErrorClass) {
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        error!("{stamp}: {message}");
        error!("location: {}", location.display());
        error!("error: {cause}");
        error!("================================================");

        if class == ErrorClass::Image {
            self.quarantine_file(location, &stamp);
        }
    }

    /// Move `location` to `<quarantine>/<stamp>_<basename>`. The stamp
    /// prefix keeps repeated failures of a recycled file name from
    /// clobbering each other.
    fn quarantine_file(&self, location: &Path, stamp: &str) {
        let Some(name) = location.file_name() else {
            warn!("cannot quarantine {}: no file name", location.display());
            return;
        };
        if !location.exists() {
            warn!("cannot quarantine {}: file is gone", location.display());
            return;
        }
        if let Err(e) = fs::create_dir_all(&self.quarantine) {
            warn!("cannot create quarantine folder {}: {e}", self.quarantine.display());
            return;
        }

        let target = self
            .quarantine
            .join(format!("{stamp}_{}", name.to_string_lossy()));
        if let Err(e) = move_file(location, &target) {
            warn!("cannot quarantine {}: {e}", location.display());
        }
    }
}

/// Rename with a copy-and-remove fallback for cross-device moves.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quarantined_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    #[test]
    fn image_failures_move_the_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("broken.jpg");
        fs::write(&file, b"bytes").unwrap();
        let quarantine = tmp.path().join("failed");

        let reporter = ErrorReporter::new(&quarantine);
        reporter.report("failed to resize image", &file, &"boom", ErrorClass::Image);

        assert!(!file.exists());
        let names = quarantined_names(&quarantine);
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with("_broken.jpg"));
        assert_eq!(
            fs::read(quarantine.join(&names[0])).unwrap(),
            b"bytes"
        );
    }

    #[test]
    fn config_failures_leave_files_alone() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("jobs.csv");
        fs::write(&file, b"rows").unwrap();
        let quarantine = tmp.path().join("failed");

        let reporter = ErrorReporter::new(&quarantine);
        reporter.report("could not read the config file", &file, &"boom", ErrorClass::Config);

        assert!(file.exists());
        assert!(!quarantine.exists());
    }

    #[test]
    fn missing_files_are_reported_without_panicking() {
        let tmp = TempDir::new().unwrap();
        let quarantine = tmp.path().join("failed");
        let reporter = ErrorReporter::new(&quarantine);

        reporter.report(
            "failed to copy image",
            &tmp.path().join("already_deleted.jpg"),
            &"gone",
            ErrorClass::Image,
        );

        assert!(quarantined_names(&quarantine).is_empty());
    }
}

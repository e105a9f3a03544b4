//! Job table loading.
//!
//! Jobs are configured as rows of a CSV file with a header row and nine
//! columns:
//!
//! ```text
//! windows_server_folder,destination_folder,size,text,font,font_size,name_prefix,latitude,longitude
//! /srv/photos/in,/srv/photos/out,800x600,Visit Riga,LiberationSans,36,riga,56.9496,24.1052
//! ```
//!
//! | Column | Meaning |
//! |---|---|
//! | `windows_server_folder` | source directory holding raw `.jpg` files |
//! | `destination_folder` | directory receiving the finished copies |
//! | `size` | target dimensions as `<width>x<height>` |
//! | `text` | watermark text drawn onto each image |
//! | `font` | font name, resolved as `<font>.ttf` in the font directory |
//! | `font_size` | point size for the watermark |
//! | `name_prefix` | prefix for generated output filenames |
//! | `latitude` / `longitude` | decimal coordinates written into EXIF GPS |
//!
//! Row order is preserved; jobs run top to bottom. Any failure to open or
//! parse the file — including a missing column or a malformed numeric field —
//! is a configuration error that aborts the whole pass; configuration errors
//! never quarantine files. The `size` column alone stays a string here and is
//! parsed per job at run time, so one bad size skips only its own job.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Delimiter between width and height in the `size` column.
pub const DIMENSION_SPLITTER: char = 'x';

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid size '{0}': expected <width>x<height> with non-zero values")]
    InvalidSize(String),
}

/// One row of the job table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Job {
    /// Source directory holding raw `.jpg` files.
    #[serde(rename = "windows_server_folder")]
    pub source_dir: PathBuf,
    /// Directory the finished copies are stored into.
    #[serde(rename = "destination_folder")]
    pub destination_dir: PathBuf,
    /// Target dimensions as `"<width>x<height>"`; parsed per job.
    pub size: String,
    /// Watermark text.
    pub text: String,
    /// Font name, resolved as `<font>.ttf`.
    pub font: String,
    pub font_size: u32,
    /// Prefix for generated output filenames.
    pub name_prefix: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Load the job table, preserving row order.
pub fn load_jobs(path: &Path) -> Result<Vec<Job>, ConfigError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut jobs = Vec::new();
    for row in reader.deserialize() {
        jobs.push(row?);
    }
    Ok(jobs)
}

/// Parse a `"<width>x<height>"` size string into a dimension pair.
///
/// Zero dimensions are rejected here rather than left to fail image by image.
pub fn parse_dimensions(size: &str) -> Result<(u32, u32), ConfigError> {
    let invalid = || ConfigError::InvalidSize(size.to_string());
    let (w, h) = size.split_once(DIMENSION_SPLITTER).ok_or_else(invalid)?;
    let width: u32 = w.trim().parse().map_err(|_| invalid())?;
    let height: u32 = h.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

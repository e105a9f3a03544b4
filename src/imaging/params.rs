//! Parameter types for the image transform.
//!
//! [`TransformParams`] describes *what* to do to one image, not *how*: it is
//! the interface between the [`runner`](crate::runner) (which decides which
//! images to process and where results go) and the
//! [`backend`](super::backend) (which does the actual pixel and metadata
//! work). Keeping the description separate lets tests swap in a recording
//! mock without touching runner logic.

use std::path::PathBuf;

/// JPEG encoding quality for saved images.
pub const JPEG_QUALITY: u8 = 75;

/// Everything needed to transform one image.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformParams {
    /// Source image on disk.
    pub source: PathBuf,
    /// Where the transformed JPEG is written.
    pub output: PathBuf,
    /// Exact target width in pixels.
    pub width: u32,
    /// Exact target height in pixels.
    pub height: u32,
    /// Watermark text, drawn bottom-center.
    pub text: String,
    /// Watermark point size.
    pub font_size: u32,
    /// Decimal coordinates written into the rebuilt EXIF GPS block.
    pub latitude: f64,
    pub longitude: f64,
}

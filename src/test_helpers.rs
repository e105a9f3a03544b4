//! Shared fixtures for unit tests.

use std::path::{Path, PathBuf};

use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;

use crate::imaging::exif;

/// Bundled TrueType font, so font-dependent tests run without touching the
/// host's font directories.
pub fn fixture_font_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("DejaVuSans.ttf")
}

fn encoded_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 64])
    });
    let mut bytes = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut bytes);
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, 90)
        .encode_image(&img)
        .unwrap();
    bytes
}

/// Write a JPEG with a non-GPS EXIF tag, the shape of a real camera file.
pub fn jpeg_with_exif(path: &Path, width: u32, height: u32) {
    let mut metadata = Metadata::new();
    metadata.set_tag(ExifTag::ImageDescription("test fixture".to_string()));
    let bytes = exif::embed_exif(encoded_jpeg(width, height), &metadata).unwrap();
    std::fs::write(path, bytes).unwrap();
}

/// Write a JPEG with no EXIF block at all.
pub fn jpeg_plain(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encoded_jpeg(width, height)).unwrap();
}

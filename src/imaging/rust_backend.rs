//! Production [`ImageBackend`] built on the `image`, `imageproc` and
//! `little_exif` crates.
//!
//! A transform runs as a fixed stage list over in-memory buffers: read,
//! decode and resize, load the source EXIF, strip it down, rebuild a
//! GPS-only block, draw the caption, re-encode at the pipeline quality,
//! splice the metadata back in, write. Each stage maps to its own
//! [`BackendError`] variant so callers can log which stage broke.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use super::backend::{BackendError, ImageBackend};
use super::exif;
use super::params::{TransformParams, JPEG_QUALITY};

/// Caption fill: white at half opacity, composited over the photo.
const WATERMARK_FILL: Rgba<u8> = Rgba([255, 255, 255, 128]);

/// Backend used by the real pipeline.
#[derive(Debug, Default)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        RustBackend
    }
}

impl ImageBackend for RustBackend {
    type Font = FontVec;

    fn load_font(&self, path: &Path) -> Result<Self::Font, BackendError> {
        let bytes = fs::read(path)?;
        FontVec::try_from_vec(bytes)
            .map_err(|_| BackendError::Font(format!("not a usable font: {}", path.display())))
    }

    fn transform(&self, font: &Self::Font, params: &TransformParams) -> Result<(), BackendError> {
        let source_bytes = fs::read(&params.source)?;

        let image = image::load_from_memory(&source_bytes)
            .map_err(|e| BackendError::Resize(e.to_string()))?;
        let resized = image.resize_exact(params.width, params.height, FilterType::Lanczos3);

        // Source metadata is read and stripped before the GPS-only block is
        // built; saved files carry only the rebuilt block.
        let mut source_meta = exif::load_source_exif(&source_bytes)?;
        exif::strip_ifds(&mut source_meta);
        let gps_meta = exif::gps_only_metadata(params.latitude, params.longitude)?;

        let captioned = draw_caption(resized, font, &params.text, params.font_size);

        let mut encoded = Vec::new();
        let mut cursor = Cursor::new(&mut encoded);
        JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY)
            .encode_image(&captioned.to_rgb8())
            .map_err(|e| BackendError::Encode(e.to_string()))?;

        let final_bytes = exif::embed_exif(encoded, &gps_meta)?;
        fs::write(&params.output, final_bytes)?;
        Ok(())
    }
}

/// Draw the caption bottom-centered at half opacity.
///
/// The text is rendered onto a transparent overlay which is then composited
/// onto the photo, so fully-covered pixels land at exactly the fill alpha
/// instead of being repeatedly blended per glyph.
fn draw_caption(image: DynamicImage, font: &FontVec, text: &str, font_size: u32) -> DynamicImage {
    if text.is_empty() {
        return image;
    }

    let mut base = image.to_rgba8();
    let scale = PxScale::from(font_size as f32);
    let (text_width, text_height) = text_size(scale, font, text);
    let (x, y) = caption_origin((base.width(), base.height()), (text_width, text_height));

    let mut overlay = RgbaImage::new(base.width(), base.height());
    draw_text_mut(&mut overlay, WATERMARK_FILL, x, y, scale, font, text);
    imageops::overlay(&mut base, &overlay, 0, 0);

    DynamicImage::ImageRgba8(base)
}

/// Top-left corner for a caption of the given size: horizontally centered,
/// flush with the bottom edge. Captions wider or taller than the image clamp
/// toward the origin rather than going negative off the left edge only.
fn caption_origin(image: (u32, u32), text: (u32, u32)) -> (i32, i32) {
    let (width, height) = image;
    let (text_width, text_height) = text;
    let x = (width as i32 - text_width as i32) / 2;
    let y = height as i32 - text_height as i32;
    (x, y)
}

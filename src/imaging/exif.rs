//! EXIF read, strip, rebuild, and JPEG embedding.
//!
//! `little_exif` owns the tag model and TIFF serialization; `img-parts`
//! handles splicing the serialized block into the JPEG's APP1 segment. The
//! split matters because `little_exif::Metadata::as_u8_vec` returns a
//! complete APP1 segment (marker, length, `Exif\0\0` header, TIFF data)
//! while `img_parts::Jpeg::set_exif` expects only the TIFF data after the
//! header, so the first [`APP1_OVERHEAD`] bytes are dropped when embedding.

use super::backend::BackendError;
use crate::gps::{self, GpsError};
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};
use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::ifd::ExifTagGroup;
use little_exif::metadata::Metadata;

/// `as_u8_vec(JPEG)` prefix: APP1 marker (2) + length (2) + `Exif\0\0` (6).
const APP1_OVERHEAD: usize = 10;

/// Parse the EXIF block out of JPEG bytes.
///
/// A file with no EXIF at all parses to an empty tag list, which counts as
/// absent here: the pipeline requires source images to carry metadata.
pub fn load_source_exif(bytes: &[u8]) -> Result<Metadata, BackendError> {
    let data = bytes.to_vec();
    let metadata = Metadata::new_from_vec(&data, FileExtension::JPEG)
        .map_err(|e| BackendError::Exif(e.to_string()))?;
    if metadata.get_ifds().iter().all(|ifd| ifd.get_tags().is_empty()) {
        return Err(BackendError::Exif("no EXIF tags present".to_string()));
    }
    Ok(metadata)
}

/// Strip the primary, thumbnail, interoperability and Exif-specific IFDs,
/// leaving only GPS tags in place.
pub fn strip_ifds(metadata: &mut Metadata) {
    let doomed: Vec<ExifTag> = metadata
        .get_ifds()
        .iter()
        .flat_map(|ifd| ifd.get_tags().iter())
        .filter(|tag| tag.get_group() != ExifTagGroup::GPS)
        .cloned()
        .collect();
    for tag in doomed {
        metadata.remove_tag(tag);
    }
}

/// Build a fresh metadata block holding only the GPS group for the given
/// coordinates. This is what actually ends up in saved files: it replaces
/// the stripped source metadata wholesale.
pub fn gps_only_metadata(latitude: f64, longitude: f64) -> Result<Metadata, GpsError> {
    let block = gps::build_gps_block(latitude, longitude)?;
    let mut metadata = Metadata::new();
    for tag in block.to_tags() {
        metadata.set_tag(tag);
    }
    Ok(metadata)
}

/// Embed a metadata block into encoded JPEG bytes, replacing any EXIF the
/// encoder left behind.
pub fn embed_exif(jpeg_bytes: Vec<u8>, metadata: &Metadata) -> Result<Vec<u8>, BackendError> {
    let mut jpeg = Jpeg::from_bytes(Bytes::from(jpeg_bytes))
        .map_err(|e| BackendError::Encode(e.to_string()))?;

    let segment = metadata
        .as_u8_vec(FileExtension::JPEG)
        .map_err(|e| BackendError::Encode(e.to_string()))?;
    if segment.len() <= APP1_OVERHEAD {
        return Err(BackendError::Encode("empty EXIF segment".to_string()));
    }
    jpeg.set_exif(Some(Bytes::copy_from_slice(&segment[APP1_OVERHEAD..])));

    Ok(jpeg.encoder().bytes().to_vec())
}

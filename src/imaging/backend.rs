//! Image transform backend trait.
//!
//! The [`ImageBackend`] trait defines the two operations the job runner
//! needs: load a font and transform one image. The production implementation
//! is [`RustBackend`](super::rust_backend::RustBackend), pure Rust with
//! everything statically linked. Tests use the recording `MockBackend` in
//! [`tests`] so runner behavior can be exercised without fonts or real JPEG
//! decoding.

use super::params::TransformParams;
use crate::gps::GpsError;
use std::path::Path;
use thiserror::Error;

/// Stage-tagged error from the per-image transform pipeline.
///
/// Each variant corresponds to one guarded stage; the first failing stage
/// aborts the image, and the runner reports the error and moves on to the
/// next image.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to load font: {0}")]
    Font(String),
    #[error("failed to decode or resize image: {0}")]
    Resize(String),
    #[error("missing or unreadable EXIF data: {0}")]
    Exif(String),
    #[error("failed to build GPS EXIF block: {0}")]
    Gps(#[from] GpsError),
    #[error("failed to encode image: {0}")]
    Encode(String),
}

/// Trait for image transform backends.
///
/// The font handle is an associated type so the mock can use `()` while the
/// production backend carries a parsed TrueType font.
pub trait ImageBackend {
    type Font;

    /// Load and parse a font file.
    fn load_font(&self, path: &Path) -> Result<Self::Font, BackendError>;

    /// Run the full per-image pipeline (resize, EXIF rewrite, watermark,
    /// save) described by `params`, writing the result to `params.output`.
    fn transform(&self, font: &Self::Font, params: &TransformParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations and writes placeholder output.
    #[derive(Default)]
    pub struct MockBackend {
        /// When set, every `load_font` call fails.
        pub fail_font: bool,
        /// Source file names whose transform fails with an EXIF error.
        pub fail_sources: Vec<String>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        LoadFont(String),
        Transform {
            source: String,
            output: String,
            width: u32,
            height: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Backend whose transform fails for the named source files.
        pub fn failing_on(sources: &[&str]) -> Self {
            Self {
                fail_sources: sources.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        type Font = ();

        fn load_font(&self, path: &Path) -> Result<(), BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::LoadFont(path.to_string_lossy().to_string()));
            if self.fail_font {
                return Err(BackendError::Font("mock font failure".to_string()));
            }
            Ok(())
        }

        fn transform(&self, _font: &(), params: &TransformParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Transform {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
            });

            let name = params
                .source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if self.fail_sources.contains(&name) {
                return Err(BackendError::Exif("mock exif failure".to_string()));
            }

            std::fs::write(&params.output, b"transformed")?;
            Ok(())
        }
    }

    #[test]
    fn mock_records_font_loads() {
        let backend = MockBackend::new();
        backend.load_font(Path::new("/fonts/Sans.ttf")).unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::LoadFont(p) if p == "/fonts/Sans.ttf"));
    }

    #[test]
    fn mock_transform_writes_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::new();

        let params = TransformParams {
            source: tmp.path().join("a.jpg"),
            output: tmp.path().join("out.jpg"),
            width: 800,
            height: 600,
            text: "hello".to_string(),
            font_size: 36,
            latitude: 1.0,
            longitude: 2.0,
        };
        backend.transform(&(), &params).unwrap();

        assert!(params.output.exists());
        let ops = backend.get_operations();
        assert!(matches!(
            &ops[0],
            RecordedOp::Transform { width: 800, height: 600, .. }
        ));
    }

    #[test]
    fn mock_fails_for_scripted_sources() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::failing_on(&["bad.jpg"]);

        let params = TransformParams {
            source: tmp.path().join("bad.jpg"),
            output: tmp.path().join("out.jpg"),
            width: 10,
            height: 10,
            text: String::new(),
            font_size: 12,
            latitude: 0.0,
            longitude: 0.0,
        };
        let err = backend.transform(&(), &params).unwrap_err();
        assert!(matches!(err, BackendError::Exif(_)));
        assert!(!params.output.exists());
    }
}

//! Image transformation layer.
//!
//! [`backend::ImageBackend`] is the seam between the pipeline and the image
//! stack: the pipeline describes a transform with [`params::TransformParams`]
//! and the backend carries it out. [`rust_backend::RustBackend`] is the
//! production implementation; tests swap in a recording mock.

pub mod backend;
pub mod exif;
pub mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::TransformParams;
pub use rust_backend::RustBackend;

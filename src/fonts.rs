//! Font loading and caching.
//!
//! Jobs name fonts by family (`arial`) and size; the cache resolves the
//! family to `<font-dir>/<name>.ttf` and keeps one loaded font per
//! `(name, size)` pair so reloading the job list across passes does not
//! re-read font files from disk.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use crate::imaging::{BackendError, ImageBackend};

/// Per-run font cache, keyed by family name and pixel size.
///
/// The size is part of the key even though backends scale at draw time;
/// two jobs sharing a family but not a size stay independent entries,
/// which keeps eviction and diagnostics simple.
pub struct FontCache<B: ImageBackend> {
    fonts: HashMap<(String, u32), B::Font>,
}

impl<B: ImageBackend> FontCache<B> {
    pub fn new() -> Self {
        FontCache { fonts: HashMap::new() }
    }

    /// Return the cached font for `(name, size)`, loading it through the
    /// backend on first use.
    pub fn ensure(
        &mut self,
        backend: &B,
        font_dir: &Path,
        name: &str,
        size: u32,
    ) -> Result<&B::Font, BackendError> {
        match self.fonts.entry((name.to_string(), size)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = font_dir.join(format!("{name}.ttf"));
                let font = backend.load_font(&path)?;
                Ok(entry.insert(font))
            }
        }
    }
}

impl<B: ImageBackend> Default for FontCache<B> {
    fn default() -> Self {
        Self::new()
    }
}

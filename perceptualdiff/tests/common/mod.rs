//! Common test utilities for perceptualdiff tests.
//!
//! Provides path resolution for fixture images without hardcoded paths.
//!
//! ## Environment Variables
//! - `PDIFF_TESTDATA`: Path to the directory holding the fixture PNGs
//!   (`alpha1.png`, `fish1.png`, `Aqsis_vase.png`, ...)

#![allow(dead_code)]

pub mod generators;

use std::path::{Path, PathBuf};

use perceptualdiff::RgbaImage;

/// Try to get path to the fixture directory. Returns None if not found.
pub fn try_get_testdata_dir() -> Option<PathBuf> {
    // Check environment variable first
    if let Ok(dir) = std::env::var("PDIFF_TESTDATA") {
        let path = PathBuf::from(dir);
        if path.exists() {
            return Some(path);
        }
    }

    // Check relative to manifest dir
    if let Ok(manifest) = std::env::var("CARGO_MANIFEST_DIR") {
        let candidates = [
            PathBuf::from(&manifest).join("testdata"),
            PathBuf::from(&manifest).join("../testdata"),
            PathBuf::from(&manifest).join("../data"),
        ];
        for path in candidates {
            if path.exists() {
                return Some(path);
            }
        }
    }

    None
}

/// Try to get the path of a fixture file. Returns None if not found.
pub fn try_get_fixture(name: &str) -> Option<PathBuf> {
    let path = try_get_testdata_dir()?.join(name);
    if path.exists() { Some(path) } else { None }
}

/// Decode a PNG into an [`RgbaImage`].
///
/// # Panics
/// Panics if the file cannot be decoded.
#[track_caller]
pub fn load_rgba(path: &Path) -> RgbaImage {
    let img = image::open(path)
        .unwrap_or_else(|e| panic!("failed to decode {}: {e}", path.display()))
        .to_rgba8();
    let (w, h) = img.dimensions();
    RgbaImage::from_rgba8(img.as_raw(), w as usize, h as usize).expect("decoder output is RGBA8")
}

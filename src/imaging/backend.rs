//! Image backend trait and shared types.
//!
//! The layout engine never opens files itself. Everything it needs to know
//! about a source image comes through [`ImageBackend`]:
//!
//! - `is_image_file`: is this directory entry an image at all?
//! - `identify`: pixel dimensions, read from the header
//! - `read_metadata`: optional camera fields for the caption
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the
//! recording [`tests::MockBackend`].

use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read image: {0}")]
    Unreadable(String),
    #[error("No metadata: {0}")]
    NoMetadata(String),
}

/// Pixel size of a source image as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Exposure time as the rational the camera recorded, e.g. `1/125`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExposureTime {
    pub numerator: u32,
    pub denominator: u32,
}

/// Camera metadata used for captions.
///
/// Every field is optional. An absent field is left out of the caption; it is
/// never treated as zero. Images without any readable metadata simply get
/// `ImageMetadata::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ImageMetadata {
    /// Aperture as an f-number (`2.8` for f/2.8).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_number: Option<f64>,
    /// Focal length in millimeters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f64>,
    /// ISO speed rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_speed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<ExposureTime>,
}

/// Source of everything the layout engine learns about image files.
///
/// `Sync` so that probing can fan out over a rayon pool.
pub trait ImageBackend: Sync {
    /// Whether the file is an image this backend can read.
    fn is_image_file(&self, path: &Path) -> bool;

    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Read camera metadata (aperture, focal length, ISO, exposure).
    fn read_metadata(&self, path: &Path) -> Result<ImageMetadata, BackendError>;
}

//! Pure Rust image backend.
//!
//! Nothing is decoded: dimensions come from the image header and camera
//! fields from the EXIF block.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Image type check | `image::ImageFormat::from_path` + `reading_enabled` |
//! | Identify (JPEG, PNG, TIFF, WebP) | `image::image_dimensions` (header only) |
//! | Camera metadata | `kamadak-exif` (`exif::Reader::read_from_container`) |

use super::backend::{BackendError, Dimensions, ExposureTime, ImageBackend, ImageMetadata};
use exif::{Exif, In, Reader, Tag, Value};
use image::ImageFormat;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Formats a contact sheet can be made from.
const PHOTO_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

/// Header-only backend built on the `image` and `kamadak-exif` crates.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn read_exif(path: &Path) -> Result<Exif, BackendError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| BackendError::NoMetadata(format!("{}: {e}", path.display())))
}

/// First rational of a field as `f64`, ignoring zero denominators.
fn rational_f64(exif: &Exif, tag: Tag) -> Option<f64> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(values) => values
            .first()
            .filter(|r| r.denom != 0)
            .map(|r| r.to_f64()),
        _ => None,
    }
}

fn exposure_time(exif: &Exif) -> Option<ExposureTime> {
    match &exif.get_field(Tag::ExposureTime, In::PRIMARY)?.value {
        Value::Rational(values) => values
            .first()
            .filter(|r| r.num > 0 && r.denom > 0)
            .map(|r| ExposureTime {
                numerator: r.num,
                denominator: r.denom,
            }),
        _ => None,
    }
}

fn iso_speed(exif: &Exif) -> Option<u32> {
    exif.get_field(Tag::PhotographicSensitivity, In::PRIMARY)?
        .value
        .get_uint(0)
}

impl ImageBackend for RustBackend {
    fn is_image_file(&self, path: &Path) -> bool {
        ImageFormat::from_path(path)
            .is_ok_and(|format| PHOTO_FORMATS.contains(&format) && format.reading_enabled())
    }

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::Unreadable(format!("{}: {e}", path.display()))
        })?;
        Ok(Dimensions { width, height })
    }

    fn read_metadata(&self, path: &Path) -> Result<ImageMetadata, BackendError> {
        let exif = read_exif(path)?;
        Ok(ImageMetadata {
            f_number: rational_f64(&exif, Tag::FNumber).filter(|f| *f > 0.0),
            focal_length: rational_f64(&exif, Tag::FocalLength).filter(|mm| *mm > 0.0),
            iso_speed: iso_speed(&exif).filter(|iso| *iso > 0),
            exposure_time: exposure_time(&exif),
        })
    }
}

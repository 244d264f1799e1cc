//! Source directory scanning.
//!
//! Lists the photographs in one directory and probes each for its pixel size
//! and camera metadata, producing the ordered [`SourceImage`] list that
//! [`paginate`](crate::layout::paginate) consumes.
//!
//! ## Order
//!
//! Only the top level of the directory is read. Entries are sorted by file
//! name, so a given directory always lays out the same way. Which entries
//! count as images is up to the backend's
//! [`is_image_file`](ImageBackend::is_image_file).
//!
//! ## Probing
//!
//! Headers and EXIF blocks are read in parallel on the global rayon pool.
//! Results are collected back into directory order before anything else
//! happens, since row, column and sheet all depend on position.
//!
//! A file whose header cannot be read is left out and reported in
//! [`ScanResult::skipped`]. Missing or unreadable metadata is not a problem:
//! the image is kept with every caption field absent.

use crate::imaging::{ImageBackend, ImageMetadata};
use crate::layout::{SkipReason, SkippedImage, SourceImage};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {0}")]
    NotADirectory(PathBuf),
}

/// Images found in a source directory, in layout order.
#[derive(Debug, Serialize)]
pub struct ScanResult {
    pub images: Vec<SourceImage>,
    /// Files that looked like images but could not be read.
    pub skipped: Vec<SkippedImage>,
}

/// Scan `dir` for images and probe each one through `backend`.
pub fn scan(dir: &Path, backend: &impl ImageBackend) -> Result<ScanResult, ScanError> {
    let candidates = list_images(dir, backend)?;
    debug!("{} candidate images in {}", candidates.len(), dir.display());

    let probed: Vec<Result<SourceImage, SkippedImage>> = candidates
        .par_iter()
        .map(|path| probe(path, backend))
        .collect();

    let mut images = Vec::with_capacity(probed.len());
    let mut skipped = Vec::new();
    for result in probed {
        match result {
            Ok(image) => images.push(image),
            Err(skip) => {
                warn!("Skipping {}: {}", skip.path.display(), skip.reason);
                skipped.push(skip);
            }
        }
    }

    info!(
        "Found {} images in {} ({} unreadable)",
        images.len(),
        dir.display(),
        skipped.len()
    );
    Ok(ScanResult { images, skipped })
}

/// Image files directly inside `dir`, sorted by file name.
fn list_images(dir: &Path, backend: &impl ImageBackend) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && backend.is_image_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

fn probe(path: &Path, backend: &impl ImageBackend) -> Result<SourceImage, SkippedImage> {
    let dimensions = backend.identify(path).map_err(|e| SkippedImage {
        path: path.to_path_buf(),
        reason: SkipReason::LoadFailed(e.to_string()),
    })?;

    let metadata = backend.read_metadata(path).unwrap_or_else(|e| {
        debug!("No caption metadata for {}: {}", path.display(), e);
        ImageMetadata::default()
    });

    Ok(SourceImage {
        path: path.to_path_buf(),
        width: dimensions.width,
        height: dimensions.height,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::{ExposureTime, RustBackend};
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    /// Create empty files with the given names. The mock decides what they are.
    fn touch_all(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    fn file_names(images: &[SourceImage]) -> Vec<String> {
        images.iter().map(|i| i.file_name()).collect()
    }

    // =========================================================================
    // Listing
    // =========================================================================

    #[test]
    fn images_sorted_by_file_name() {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &["c.jpg", "a.jpg", "b.jpg"]);
        let backend = MockBackend::new()
            .with_image("a.jpg", 10, 10)
            .with_image("b.jpg", 10, 10)
            .with_image("c.jpg", 10, 10);

        let result = scan(tmp.path(), &backend).unwrap();
        assert_eq!(file_names(&result.images), vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn non_images_are_ignored() {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &["a.jpg", "notes.txt", "contact-sheet.toml"]);
        let backend = MockBackend::new().with_image("a.jpg", 10, 10);

        let result = scan(tmp.path(), &backend).unwrap();
        assert_eq!(result.images.len(), 1);
        assert!(result.skipped.is_empty());
        // Non-images are never probed
        assert!(
            !backend
                .get_operations()
                .contains(&RecordedOp::Identify("notes.txt".to_string()))
        );
    }

    #[test]
    fn subdirectories_are_not_descended() {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &["a.jpg"]);
        fs::create_dir(tmp.path().join("rejects")).unwrap();
        touch_all(&tmp.path().join("rejects"), &["b.jpg"]);
        let backend = MockBackend::new()
            .with_image("a.jpg", 10, 10)
            .with_image("b.jpg", 10, 10);

        let result = scan(tmp.path(), &backend).unwrap();
        assert_eq!(file_names(&result.images), vec!["a.jpg"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"), &MockBackend::new());
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn empty_directory_scans_to_nothing() {
        let tmp = TempDir::new().unwrap();
        let result = scan(tmp.path(), &MockBackend::new()).unwrap();
        assert!(result.images.is_empty());
    }

    // =========================================================================
    // Probing
    // =========================================================================

    #[test]
    fn dimensions_and_metadata_are_attached() {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &["a.jpg"]);
        let metadata = ImageMetadata {
            f_number: Some(4.0),
            iso_speed: Some(200),
            exposure_time: Some(ExposureTime {
                numerator: 1,
                denominator: 60,
            }),
            ..Default::default()
        };
        let backend = MockBackend::new()
            .with_image("a.jpg", 6000, 4000)
            .with_metadata("a.jpg", metadata);

        let result = scan(tmp.path(), &backend).unwrap();
        let image = &result.images[0];
        assert_eq!((image.width, image.height), (6000, 4000));
        assert_eq!(image.metadata, metadata);
        assert_eq!(image.path, tmp.path().join("a.jpg"));
    }

    #[test]
    fn missing_metadata_means_all_fields_absent() {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &["a.jpg"]);
        let backend = MockBackend::new().with_image("a.jpg", 10, 10);

        let result = scan(tmp.path(), &backend).unwrap();
        assert_eq!(result.images[0].metadata, ImageMetadata::default());
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn unreadable_image_is_skipped_and_order_kept() {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &["a.jpg", "b.jpg", "c.jpg"]);
        let backend = MockBackend::new()
            .with_image("a.jpg", 10, 10)
            .with_broken_image("b.jpg", "truncated header")
            .with_image("c.jpg", 10, 10);

        let result = scan(tmp.path(), &backend).unwrap();
        assert_eq!(file_names(&result.images), vec!["a.jpg", "c.jpg"]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].path, tmp.path().join("b.jpg"));
        assert!(matches!(
            &result.skipped[0].reason,
            SkipReason::LoadFailed(msg) if msg.contains("truncated header")
        ));
    }

    #[test]
    fn broken_image_metadata_not_read() {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &["b.jpg"]);
        let backend = MockBackend::new().with_broken_image("b.jpg", "bad");

        scan(tmp.path(), &backend).unwrap();
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Identify("b.jpg".to_string())]
        );
    }

    #[test]
    fn order_survives_parallel_probing() {
        let tmp = TempDir::new().unwrap();
        let names: Vec<String> = (0..64).map(|i| format!("{i:03}.jpg")).collect();
        let mut backend = MockBackend::new();
        for (i, name) in names.iter().enumerate() {
            fs::write(tmp.path().join(name), b"").unwrap();
            backend = backend.with_image(name, 100 + i as u32, 50);
        }

        let result = scan(tmp.path(), &backend).unwrap();
        assert_eq!(file_names(&result.images), names);
        let widths: Vec<u32> = result.images.iter().map(|i| i.width).collect();
        assert_eq!(widths, (0..64).map(|i| 100 + i).collect::<Vec<u32>>());
    }

    #[test]
    fn scan_real_pngs_with_rust_backend() {
        let tmp = TempDir::new().unwrap();
        RgbImage::from_pixel(30, 20, Rgb([0, 0, 0]))
            .save(tmp.path().join("landscape.png"))
            .unwrap();
        RgbImage::from_pixel(20, 30, Rgb([255, 255, 255]))
            .save(tmp.path().join("portrait.png"))
            .unwrap();
        fs::write(tmp.path().join("readme.txt"), "not an image").unwrap();

        let result = scan(tmp.path(), &RustBackend::new()).unwrap();
        assert_eq!(file_names(&result.images), vec!["landscape.png", "portrait.png"]);
        assert_eq!((result.images[0].width, result.images[0].height), (30, 20));
        assert_eq!((result.images[1].width, result.images[1].height), (20, 30));
    }
}

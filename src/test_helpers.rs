//! Shared test utilities for layout tests.
//!
//! Builders for pixel-unit configs and lists of probed source images, so
//! tests can state a grid in whole pixels and skip unit conversion.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let config = pixel_config(400, 400, 0, 2, 2);
//! let images = square_images(5, 1000);
//! let result = paginate(&config, &images, &LineHeightMeasure::default()).unwrap();
//! assert_eq!(sheet_sizes(&result), vec![4, 1]);
//! ```

use std::path::PathBuf;

use crate::config::SheetConfig;
use crate::imaging::ImageMetadata;
use crate::layout::{PaginationResult, SourceImage};
use crate::units::Unit;

// =========================================================================
// Configs
// =========================================================================

/// A config measured in pixels, with captions off.
///
/// `gap` is used for both gutters. Everything not named keeps its default.
pub fn pixel_config(
    sheet_width: u32,
    sheet_height: u32,
    gap: u32,
    rows: u32,
    columns: u32,
) -> SheetConfig {
    let mut config = SheetConfig::default();
    config.sheet.width = f64::from(sheet_width);
    config.sheet.height = f64::from(sheet_height);
    config.sheet.unit = Unit::Pixel;
    config.gap.vertical = f64::from(gap);
    config.gap.horizontal = f64::from(gap);
    config.gap.unit = Unit::Pixel;
    config.grid.rows = rows;
    config.grid.columns = columns;
    config.caption.enabled = false;
    config
}

// =========================================================================
// Source images
// =========================================================================

/// One image without metadata. The path is just `name`.
pub fn source_image(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage {
        path: PathBuf::from(name),
        width,
        height,
        metadata: ImageMetadata::default(),
    }
}

/// `count` square images named `img_000.jpg`, `img_001.jpg`, ...
pub fn square_images(count: usize, side: u32) -> Vec<SourceImage> {
    (0..count)
        .map(|i| source_image(&format!("img_{i:03}.jpg"), side, side))
        .collect()
}

// =========================================================================
// Result extractors
// =========================================================================

/// Placement count per sheet, in sheet order.
pub fn sheet_sizes(result: &PaginationResult) -> Vec<usize> {
    result.sheets.iter().map(|s| s.placements.len()).collect()
}

//! Sheet layout: pure geometry from config and image sizes to placements.
//!
//! Three stages, each a pure function over plain values:
//!
//! 1. [`cell::CellGeometry::from_config`] converts every configured
//!    measurement to whole pixels and derives the cell size. A grid that
//!    leaves no room for cells is a [`LayoutError`] and stops the run.
//! 2. [`fit::fit_image`] scales one image into one cell, turning portrait
//!    shots a quarter turn when asked.
//! 3. [`paginate::paginate`] walks the images in order, filling cells left
//!    to right, top to bottom, one sheet after another.
//!
//! Problems with a single image never abort the run. They come back as
//! [`SkippedImage`] entries next to the placements that did succeed.

pub mod cell;
pub mod fit;
pub mod paginate;

pub use cell::{Axis, CellGeometry};
pub use fit::{Fit, FitError, fit_image};
pub use paginate::{
    CaptionPlacement, GridCursor, ImageFrame, PaginationResult, Placement, Sheet, SourceImage,
    paginate,
};

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems that make any layout impossible.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Grid has no cells ({rows} rows x {columns} columns)")]
    EmptyGrid { rows: u32, columns: u32 },
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),
    #[error("Cell {axis} is {pixels}px; gaps and grid leave no room on the sheet")]
    NonPositiveCell { axis: Axis, pixels: i64 },
}

/// Why an image was left off the sheets.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    #[error("invalid image dimensions {width}x{height}")]
    InvalidImageDimensions { width: u32, height: u32 },
    #[error("failed to load: {0}")]
    LoadFailed(String),
    #[error("caption is {caption_height}px but the cell is only {cell_height}px tall")]
    CaptionOverflow { caption_height: u32, cell_height: u32 },
}

/// An image that could not be placed, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: SkipReason,
}

//! Sheet pagination.
//!
//! Images are placed one at a time, in the order given, into the cell under
//! a [`GridCursor`]. The cursor moves left to right, then down a row, then on
//! to a fresh sheet once the grid is full. Moving it is a pure step
//! ([`GridCursor::advance`]); the paginator only decides what goes into the
//! cell.
//!
//! Sheets come into existence with their first placement, so a run never
//! ends with an empty sheet, even when the last image exactly fills a grid.
//!
//! ## Cell contents
//!
//! ```text
//! cursor ─► ┌──────────────────────┐
//!           │    ┌────────────┐    │  image, centred, top-aligned,
//!           │    │            │    │  fitted into cell_height - caption
//!           │    └────────────┘    │
//!           │ caption, full width  │  directly under the image
//!           │                      │
//!           └──────────────────────┘
//! ```

use super::cell::CellGeometry;
use super::fit::{FitError, fit_image};
use super::{LayoutError, SkipReason, SkippedImage};
use crate::caption::build_caption;
use crate::config::SheetConfig;
use crate::imaging::{ImageMetadata, TextMeasure};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One probed source image, ready to lay out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub metadata: ImageMetadata,
}

impl SourceImage {
    /// File name as shown in captions.
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Where the next image goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    pub sheet: usize,
    pub column: u32,
    pub row: u32,
    /// Top-left corner of the current cell, in sheet pixels.
    pub x: u32,
    pub y: u32,
}

impl GridCursor {
    /// First cell of the first sheet, inset by one gap on each axis.
    pub fn start(cell: &CellGeometry) -> Self {
        Self::sheet_start(0, cell)
    }

    fn sheet_start(sheet: usize, cell: &CellGeometry) -> Self {
        Self {
            sheet,
            column: 0,
            row: 0,
            x: cell.gap_x,
            y: cell.gap_y,
        }
    }

    /// The cell after this one: next column, else next row, else next sheet.
    pub fn advance(self, cell: &CellGeometry) -> Self {
        let column = self.column + 1;
        if column < cell.columns {
            return Self {
                column,
                x: self.x + cell.cell_width + cell.gap_x,
                ..self
            };
        }

        let row = self.row + 1;
        if row < cell.rows {
            return Self {
                column: 0,
                row,
                x: cell.gap_x,
                y: self.y + cell.cell_height + cell.gap_y,
                ..self
            };
        }

        Self::sheet_start(self.sheet + 1, cell)
    }
}

/// Where an image lands on its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageFrame {
    pub x: u32,
    pub y: u32,
    /// Size on the sheet, after rotation.
    pub width: u32,
    pub height: u32,
    /// Turned a quarter turn counter-clockwise.
    pub rotated: bool,
}

impl ImageFrame {
    /// Sheet position of the source image's top-left corner.
    ///
    /// A rotated image is turned −90° about that corner, which swings the
    /// image above it. Translating by the frame height brings it back, so the
    /// corner ends up at the frame's bottom-left.
    pub fn pivot(&self) -> (u32, u32) {
        if self.rotated {
            (self.x, self.y + self.height)
        } else {
            (self.x, self.y)
        }
    }
}

/// A caption text element, spanning the cell width, centred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptionPlacement {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Computed geometry for one image and its caption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub path: PathBuf,
    pub sheet: usize,
    pub column: u32,
    pub row: u32,
    pub image: ImageFrame,
    /// `None` when captions are off or the caption came out empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<CaptionPlacement>,
}

/// One output canvas and everything placed on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub index: usize,
    /// `<prefix>_<index>`
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub background: String,
    /// Renderer hint: merge the sheet down to one layer when done.
    pub flatten: bool,
    pub placements: Vec<Placement>,
}

impl Sheet {
    fn new(index: usize, config: &SheetConfig, cell: &CellGeometry) -> Self {
        Self {
            index,
            name: format!("{}_{}", config.output.prefix, index),
            width: cell.sheet_width,
            height: cell.sheet_height,
            background: config.sheet.background.clone(),
            flatten: config.output.flatten,
            placements: Vec::new(),
        }
    }
}

/// Sheets in order, plus every image that could not be placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationResult {
    pub cell: CellGeometry,
    pub sheets: Vec<Sheet>,
    pub skipped: Vec<SkippedImage>,
}

impl PaginationResult {
    pub fn placement_count(&self) -> usize {
        self.sheets.iter().map(|s| s.placements.len()).sum()
    }
}

/// Lay out `images` across as many sheets as they need.
///
/// The config is checked first; a grid without room for cells returns a
/// [`LayoutError`] and nothing else. After that, no single image can stop
/// the run: one that cannot be placed is logged, listed in
/// [`PaginationResult::skipped`], and does not use up a cell.
pub fn paginate(
    config: &SheetConfig,
    images: &[SourceImage],
    measure: &impl TextMeasure,
) -> Result<PaginationResult, LayoutError> {
    let cell = CellGeometry::from_config(config)?;
    debug!(
        "Cell {}x{} on {}x{} sheet ({} columns, {} rows)",
        cell.cell_width, cell.cell_height, cell.sheet_width, cell.sheet_height, cell.columns, cell.rows
    );

    let mut cursor = GridCursor::start(&cell);
    let mut current: Option<Sheet> = None;
    let mut sheets = Vec::new();
    let mut skipped = Vec::new();

    for image in images {
        let placement = match place(image, &cursor, &cell, config, measure) {
            Ok(placement) => placement,
            Err(reason) => {
                warn!("Skipping {}: {}", image.path.display(), reason);
                skipped.push(SkippedImage {
                    path: image.path.clone(),
                    reason,
                });
                continue;
            }
        };
        debug!(
            "{} -> sheet {} cell ({}, {}) at {},{} {}x{}{}",
            image.path.display(),
            placement.sheet,
            placement.column,
            placement.row,
            placement.image.x,
            placement.image.y,
            placement.image.width,
            placement.image.height,
            if placement.image.rotated { " rotated" } else { "" }
        );

        current
            .get_or_insert_with(|| Sheet::new(cursor.sheet, config, &cell))
            .placements
            .push(placement);

        let next = cursor.advance(&cell);
        if next.sheet != cursor.sheet
            && let Some(full) = current.take()
        {
            finish_sheet(full, &mut sheets);
        }
        cursor = next;
    }

    if let Some(partial) = current.take() {
        finish_sheet(partial, &mut sheets);
    }

    info!(
        "Laid out {} images on {} sheets ({} skipped)",
        images.len() - skipped.len(),
        sheets.len(),
        skipped.len()
    );

    Ok(PaginationResult {
        cell,
        sheets,
        skipped,
    })
}

fn finish_sheet(sheet: Sheet, sheets: &mut Vec<Sheet>) {
    info!("Sheet {} done: {} images", sheet.name, sheet.placements.len());
    sheets.push(sheet);
}

/// Geometry for one image in the cell under `cursor`.
fn place(
    image: &SourceImage,
    cursor: &GridCursor,
    cell: &CellGeometry,
    config: &SheetConfig,
    measure: &impl TextMeasure,
) -> Result<Placement, SkipReason> {
    let fields = config.caption.fields();
    let caption_text = if config.caption.enabled && fields.any() {
        build_caption(&image.metadata, &image.file_name(), fields)
    } else {
        String::new()
    };
    let caption_height = if caption_text.is_empty() {
        0
    } else {
        measure.measure_caption_height(&caption_text, &config.caption.font, cell.caption_size)
    };

    let fit = fit_image(
        image.width,
        image.height,
        cell.cell_width,
        cell.cell_height.saturating_sub(caption_height),
        config.rotate_to_fit,
    )
    .map_err(|e| match e {
        FitError::InvalidImageDimensions { width, height } => {
            SkipReason::InvalidImageDimensions { width, height }
        }
        FitError::EmptyTarget { .. } => SkipReason::CaptionOverflow {
            caption_height,
            cell_height: cell.cell_height,
        },
    })?;

    let caption = (caption_height > 0).then(|| CaptionPlacement {
        text: caption_text,
        x: cursor.x,
        y: cursor.y + fit.height,
        width: cell.cell_width,
        height: caption_height,
    });

    Ok(Placement {
        path: image.path.clone(),
        sheet: cursor.sheet,
        column: cursor.column,
        row: cursor.row,
        image: ImageFrame {
            x: cursor.x + fit.x_offset,
            y: cursor.y + fit.y_offset,
            width: fit.width,
            height: fit.height,
            rotated: fit.rotated,
        },
        caption,
    })
}

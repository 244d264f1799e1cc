//! Cell geometry: the pixel grid every sheet shares.
//!
//! Measurements are converted and rounded to whole pixels first, then the
//! cell size falls out of integer division:
//!
//! ```text
//! cell_width  = (sheet_width  - gap_x × (columns + 1)) / columns
//! cell_height = (sheet_height - gap_y × (rows + 1))    / rows
//! ```
//!
//! `gap_x` is the vertical gap (the gutters that run between columns) and
//! `gap_y` the horizontal one. Gutters sit on the leading edge of each cell
//! plus one trailing gutter, hence `count + 1`.

use super::LayoutError;
use crate::config::SheetConfig;
use serde::Serialize;
use std::fmt;

/// Which side of a cell a measurement refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
        }
    }
}

/// Pixel layout shared by every sheet in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellGeometry {
    pub sheet_width: u32,
    pub sheet_height: u32,
    /// Horizontal distance between columns (and the left margin).
    pub gap_x: u32,
    /// Vertical distance between rows (and the top margin).
    pub gap_y: u32,
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Caption text size in pixels. At least 1.
    pub caption_size: u32,
}

impl CellGeometry {
    /// Derive the grid from a config.
    ///
    /// Fails before anything is laid out if the grid is empty, a measurement
    /// is out of range, or the cells would have no area.
    pub fn from_config(config: &SheetConfig) -> Result<Self, LayoutError> {
        let rows = config.grid.rows;
        let columns = config.grid.columns;
        if rows == 0 || columns == 0 {
            return Err(LayoutError::EmptyGrid { rows, columns });
        }
        config
            .validate_measurements()
            .map_err(LayoutError::InvalidMeasurement)?;

        let sheet_width = to_u32("sheet.width", config.sheet.width().to_whole_pixels())?;
        let sheet_height = to_u32("sheet.height", config.sheet.height().to_whole_pixels())?;
        let gap_x = to_u32("gap.vertical", config.gap.vertical().to_whole_pixels())?;
        let gap_y = to_u32("gap.horizontal", config.gap.horizontal().to_whole_pixels())?;
        let caption_size = to_u32("caption.size", config.caption.size().to_whole_pixels())?;

        let cell_width = cell_extent(Axis::Width, sheet_width, gap_x, columns)?;
        let cell_height = cell_extent(Axis::Height, sheet_height, gap_y, rows)?;

        Ok(Self {
            sheet_width,
            sheet_height,
            gap_x,
            gap_y,
            columns,
            rows,
            cell_width,
            cell_height,
            caption_size: caption_size.max(1),
        })
    }

    /// Number of cells on one sheet.
    pub fn cells_per_sheet(&self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

/// Gutters that do not fit in `i64` leave no room either.
fn cell_extent(axis: Axis, sheet: u32, gap: u32, count: u32) -> Result<u32, LayoutError> {
    let count = i64::from(count);
    let pixels = i64::from(gap)
        .checked_mul(count + 1)
        .and_then(|gutters| i64::from(sheet).checked_sub(gutters))
        .map_or(i64::MIN, |room| room.div_euclid(count));
    if pixels <= 0 {
        return Err(LayoutError::NonPositiveCell { axis, pixels });
    }
    // never more than `sheet`
    Ok(pixels as u32)
}

fn to_u32(name: &str, pixels: i64) -> Result<u32, LayoutError> {
    u32::try_from(pixels).map_err(|_| {
        LayoutError::InvalidMeasurement(format!(
            "{name} is {pixels} px, outside 0..={} px",
            u32::MAX
        ))
    })
}

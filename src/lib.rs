//! # Contact Sheet
//!
//! Lays out a directory of photographs as contact sheets: a grid of cells per
//! sheet, one image per cell, each optionally captioned with its camera
//! settings. The crate computes geometry only. Resampling, text rendering and
//! compositing belong to whatever consumes the layout.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan       source dir  →  Vec<SourceImage>     (sorted, probed in parallel)
//! 2. Paginate   config + images  →  PaginationResult (sheets of placements)
//! 3. Output     PaginationResult  →  JSON + inventory on stdout
//! ```
//!
//! Pagination is a pure function of the config and the probed images. The
//! same directory and config always produce the same sheets.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`units`] | Pixel, inch, millimeter and point conversion at a given resolution |
//! | [`caption`] | Caption text from camera metadata, with the fixed field order and capacity |
//! | [`layout`] | Cell geometry, aspect-preserving fit, and the sheet paginator |
//! | [`imaging`] | Backend trait for image headers and EXIF, caption height measurement |
//! | [`scan`] | Deterministic directory listing and parallel probing |
//! | [`config`] | `contact-sheet.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for `layout` and `check` |
//!
//! # Design Decisions
//!
//! ## Units Are Resolved Up Front
//!
//! Sheet size, gaps and caption size each carry their own unit and
//! resolution. All three are converted to whole pixels before any layout
//! math, so the paginator only ever sees integers.
//!
//! ## Per-Image Failures Are Data
//!
//! A config that leaves no room for cells is an error and nothing is laid
//! out. An unreadable or zero-sized image is not: it is listed with a reason
//! and the run carries on. It does not take a cell.
//!
//! ## No Empty Sheets
//!
//! Sheets are created by their first placement. A run whose last image fills
//! the grid exactly ends there.

pub mod caption;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod scan;
pub mod units;

#[cfg(test)]
pub(crate) mod test_helpers;

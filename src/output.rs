//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output reads as an inventory of sheets and photos, not of files. Each
//! entity leads with its positional index and name; geometry, captions and
//! source paths follow as indented context lines.
//!
//! # Output Format
//!
//! ## Layout
//!
//! ```text
//! Sheets
//! 001 Untitled_0 (4 photos, 400x400px)
//!     001 img_001.jpg
//!         Cell: column 1, row 1
//!         Frame: 200x150 at 0,25
//!         Caption: img_001.jpg - f/2.8, 50mm
//!     002 portrait.jpg
//!         Cell: column 2, row 1
//!         Frame: 200x133 at 200,0 (rotated)
//!
//! Skipped
//!     broken.jpg: invalid image dimensions 0x600
//!
//! Laid out 5 photos on 2 sheets (1 skipped) → contact-sheet.json
//! ```
//!
//! ## Check
//!
//! ```text
//! Sheet
//!     2490x3510px, 6 columns x 5 rows
//!     Cell: 410x697px
//!     Gaps: 4px between columns, 4px between rows
//!     Caption: 25px Sans-serif
//!
//! Images
//! 001 dawn.jpg (6000x4000)
//!     Caption: dawn.jpg - f/8, 24mm, 100ISO, 1/250s
//!
//! Config
//!     contact-sheet.toml
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::caption::build_caption;
use crate::config::SheetConfig;
use crate::layout::{CellGeometry, PaginationResult, Placement, SkippedImage, SourceImage};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path relative to the source directory when possible.
fn display_path(path: &Path, source_root: &Path) -> String {
    path.strip_prefix(source_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Truncate text to `max` characters, appending "..." if truncated.
fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn skipped_lines(skipped: &[SkippedImage], source_root: &Path) -> Vec<String> {
    skipped
        .iter()
        .map(|s| {
            format!(
                "{}{}: {}",
                indent(1),
                display_path(&s.path, source_root),
                s.reason
            )
        })
        .collect()
}

fn placement_lines(index: usize, placement: &Placement, source_root: &Path) -> Vec<String> {
    let frame = &placement.image;
    let rotated = if frame.rotated { " (rotated)" } else { "" };
    let mut lines = vec![
        format!(
            "{}{} {}",
            indent(1),
            format_index(index),
            display_path(&placement.path, source_root)
        ),
        format!(
            "{}Cell: column {}, row {}",
            indent(2),
            placement.column + 1,
            placement.row + 1
        ),
        format!(
            "{}Frame: {}x{} at {},{}{}",
            indent(2),
            frame.width,
            frame.height,
            frame.x,
            frame.y,
            rotated
        ),
    ];
    if let Some(caption) = &placement.caption {
        lines.push(format!(
            "{}Caption: {}",
            indent(2),
            truncate_text(&caption.text, 60)
        ));
    }
    lines
}

// ============================================================================
// Layout
// ============================================================================

/// Format the result of a `layout` run.
///
/// `scan_skipped` lists files that could not be read at all; they are shown
/// together with the images the paginator had to leave out.
pub fn format_layout_output(
    result: &PaginationResult,
    scan_skipped: &[SkippedImage],
    source_root: &Path,
    output_path: &Path,
) -> Vec<String> {
    let mut lines = vec!["Sheets".to_string()];

    for (i, sheet) in result.sheets.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}, {}x{}px)",
            format_index(i + 1),
            sheet.name,
            plural(sheet.placements.len(), "photo"),
            sheet.width,
            sheet.height
        ));
        for (j, placement) in sheet.placements.iter().enumerate() {
            lines.extend(placement_lines(j + 1, placement, source_root));
        }
    }
    if result.sheets.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }

    let skipped_count = scan_skipped.len() + result.skipped.len();
    if skipped_count > 0 {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        lines.extend(skipped_lines(scan_skipped, source_root));
        lines.extend(skipped_lines(&result.skipped, source_root));
    }

    lines.push(String::new());
    lines.push(format!(
        "Laid out {} on {} ({} skipped) → {}",
        plural(result.placement_count(), "photo"),
        plural(result.sheets.len(), "sheet"),
        skipped_count,
        output_path.display()
    ));
    lines
}

/// Print layout output to stdout.
pub fn print_layout_output(
    result: &PaginationResult,
    scan_skipped: &[SkippedImage],
    source_root: &Path,
    output_path: &Path,
) {
    for line in format_layout_output(result, scan_skipped, source_root, output_path) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the `check` report: grid geometry, the images that would be laid
/// out with their caption text, and which config file was used.
pub fn format_check_output(
    config: &SheetConfig,
    cell: &CellGeometry,
    images: &[SourceImage],
    skipped: &[SkippedImage],
    source_root: &Path,
    config_file: Option<&Path>,
) -> Vec<String> {
    let mut lines = vec![
        "Sheet".to_string(),
        format!(
            "{}{}x{}px, {} x {}",
            indent(1),
            cell.sheet_width,
            cell.sheet_height,
            plural(cell.columns as usize, "column"),
            plural(cell.rows as usize, "row")
        ),
        format!("{}Cell: {}x{}px", indent(1), cell.cell_width, cell.cell_height),
        format!(
            "{}Gaps: {}px between columns, {}px between rows",
            indent(1),
            cell.gap_x,
            cell.gap_y
        ),
    ];
    if config.caption.enabled {
        lines.push(format!(
            "{}Caption: {}px {}",
            indent(1),
            cell.caption_size,
            config.caption.font
        ));
    } else {
        lines.push(format!("{}Caption: off", indent(1)));
    }

    lines.push(String::new());
    lines.push("Images".to_string());
    for (i, image) in images.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}x{})",
            format_index(i + 1),
            display_path(&image.path, source_root),
            image.width,
            image.height
        ));
        if config.caption.enabled {
            let caption =
                build_caption(&image.metadata, &image.file_name(), config.caption.fields());
            if !caption.is_empty() {
                lines.push(format!(
                    "{}Caption: {}",
                    indent(1),
                    truncate_text(&caption, 60)
                ));
            }
        }
    }
    if images.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }

    if !skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        lines.extend(skipped_lines(skipped, source_root));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    match config_file {
        Some(path) => lines.push(format!("{}{}", indent(1), path.display())),
        None => lines.push(format!("{}(stock defaults)", indent(1))),
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(
    config: &SheetConfig,
    cell: &CellGeometry,
    images: &[SourceImage],
    skipped: &[SkippedImage],
    source_root: &Path,
    config_file: Option<&Path>,
) {
    for line in format_check_output(config, cell, images, skipped, source_root, config_file) {
        println!("{}", line);
    }
}

// ============================================================================

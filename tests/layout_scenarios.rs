//! End-to-end layout scenarios through the public API.
//!
//! Real PNG files are written to a scratch directory, scanned with the
//! production backend, and paginated with a config loaded from TOML.

use contact_sheet::config::{self, SheetConfig};
use contact_sheet::imaging::{LineHeightMeasure, RustBackend};
use contact_sheet::layout::{self, LayoutError, SkipReason, SourceImage};
use contact_sheet::scan;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TWO_BY_TWO: &str = r#"
rotate_to_fit = true

[sheet]
width = 400
height = 400
unit = "pixel"

[gap]
vertical = 0
horizontal = 0
unit = "px"

[grid]
rows = 2
columns = 2

[caption]
enabled = false
"#;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([90, 90, 90]))
        .save(dir.join(name))
        .unwrap();
}

fn roll_with_config(toml: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(config::CONFIG_FILE_NAME), toml).unwrap();
    tmp
}

fn sheet_sizes(result: &layout::PaginationResult) -> Vec<usize> {
    result.sheets.iter().map(|s| s.placements.len()).collect()
}

fn square(name: &str, side: u32) -> SourceImage {
    SourceImage {
        path: PathBuf::from(name),
        width: side,
        height: side,
        metadata: Default::default(),
    }
}

// =========================================================================
// Directory to sheets
// =========================================================================

#[test]
fn five_squares_make_four_and_one() {
    let roll = roll_with_config(TWO_BY_TWO);
    for i in 1..=5 {
        write_png(roll.path(), &format!("frame-{i:02}.png"), 64, 64);
    }

    let config = config::load_config(roll.path()).unwrap();
    let scanned = scan::scan(roll.path(), &RustBackend::new()).unwrap();
    let result = layout::paginate(&config, &scanned.images, &LineHeightMeasure::default()).unwrap();

    assert_eq!((result.cell.cell_width, result.cell.cell_height), (200, 200));
    assert_eq!(sheet_sizes(&result), vec![4, 1]);

    let last = &result.sheets[1].placements[0];
    assert_eq!((last.column, last.row), (0, 0));
    assert_eq!(last.path, roll.path().join("frame-05.png"));
    assert_eq!(result.sheets[1].name, "Untitled_1");
}

#[test]
fn unreadable_file_is_reported_and_skipped() {
    let roll = roll_with_config(TWO_BY_TWO);
    write_png(roll.path(), "a.png", 64, 48);
    fs::write(roll.path().join("b.png"), b"not really a png").unwrap();
    write_png(roll.path(), "c.png", 48, 64);

    let config = config::load_config(roll.path()).unwrap();
    let scanned = scan::scan(roll.path(), &RustBackend::new()).unwrap();
    assert_eq!(scanned.skipped.len(), 1);
    assert!(matches!(scanned.skipped[0].reason, SkipReason::LoadFailed(_)));

    let result = layout::paginate(&config, &scanned.images, &LineHeightMeasure::default()).unwrap();
    let placements = &result.sheets[0].placements;
    assert_eq!(placements.len(), 2);
    // c.png takes the cell b.png would have had, turned to landscape
    assert_eq!(placements[1].column, 1);
    assert!(placements[1].image.rotated);
}

#[test]
fn captions_from_file_names() {
    let roll = roll_with_config(
        r#"
[sheet]
width = 400
height = 400
unit = "px"

[gap]
vertical = 0
horizontal = 0
unit = "px"

[grid]
rows = 2
columns = 2

[caption]
size = 20
unit = "px"
line_spacing = 1.0
"#,
    );
    write_png(roll.path(), "img1.png", 80, 40);

    let config = config::load_config(roll.path()).unwrap();
    let scanned = scan::scan(roll.path(), &RustBackend::new()).unwrap();
    let measure = LineHeightMeasure::new(config.caption.line_spacing);
    let result = layout::paginate(&config, &scanned.images, &measure).unwrap();

    let placement = &result.sheets[0].placements[0];
    // PNG without EXIF: only the file name makes it in
    let caption = placement.caption.as_ref().unwrap();
    assert_eq!(caption.text, "img1.png -");
    assert_eq!(caption.height, 20);
    assert_eq!(caption.width, 200);
    // 80x40 into 200x180: width binds
    assert_eq!((placement.image.width, placement.image.height), (200, 100));
    assert_eq!(caption.y, placement.image.y + placement.image.height);
}

// =========================================================================
// Pagination properties
// =========================================================================

#[test]
fn every_non_final_sheet_is_full() {
    let mut config: SheetConfig = toml::from_str(TWO_BY_TWO).unwrap();
    config.grid.rows = 3;
    config.grid.columns = 2;

    for count in 1..=20usize {
        let images: Vec<SourceImage> = (0..count).map(|i| square(&format!("{i}.jpg"), 10)).collect();
        let result = layout::paginate(&config, &images, &LineHeightMeasure::default()).unwrap();
        let sizes = sheet_sizes(&result);

        assert_eq!(sizes.len(), count.div_ceil(6), "{count} images");
        let (last, full) = sizes.split_last().unwrap();
        assert!(full.iter().all(|&n| n == 6), "{count} images: {sizes:?}");
        assert!(*last >= 1, "{count} images: trailing sheet is empty");
    }
}

#[test]
fn zero_width_image_lands_in_skipped_list() {
    let config: SheetConfig = toml::from_str(TWO_BY_TWO).unwrap();
    let mut images = vec![square("a.jpg", 10), square("b.jpg", 10)];
    images[1].width = 0;
    images.push(square("c.jpg", 10));

    let result = layout::paginate(&config, &images, &LineHeightMeasure::default()).unwrap();
    assert_eq!(result.placement_count(), 2);
    assert_eq!(result.skipped.len(), 1);
    assert!(matches!(
        result.skipped[0].reason,
        SkipReason::InvalidImageDimensions { width: 0, .. }
    ));
}

#[test]
fn impossible_grid_stops_before_layout() {
    let mut config: SheetConfig = toml::from_str(TWO_BY_TWO).unwrap();
    config.gap.vertical = 150.0;

    let err = layout::paginate(&config, &[square("a.jpg", 10)], &LineHeightMeasure::default())
        .unwrap_err();
    assert!(matches!(err, LayoutError::NonPositiveCell { .. }));
}

#[test]
fn layout_serializes_to_json() {
    let config: SheetConfig = toml::from_str(TWO_BY_TWO).unwrap();
    let result = layout::paginate(
        &config,
        &[square("a.jpg", 10), square("b.jpg", 0)],
        &LineHeightMeasure::default(),
    )
    .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["sheets"][0]["name"], "Untitled_0");
    assert_eq!(json["sheets"][0]["placements"][0]["image"]["width"], 200);
    assert_eq!(json["cell"]["cell_width"], 200);
    assert_eq!(
        json["skipped"][0]["reason"]["invalid_image_dimensions"]["width"],
        0
    );
}

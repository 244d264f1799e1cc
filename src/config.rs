//! Contact sheet configuration.
//!
//! Handles loading, validating, and merging `contact-sheet.toml`. Stock
//! defaults are overridden by whatever keys the user file sets; everything
//! else keeps its default.
//!
//! ## Config File Location
//!
//! `--config <file>` wins. Without it, `contact-sheet.toml` is looked up in
//! the source directory. No file at all means stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "."          # Directory holding the photographs
//! rotate_to_fit = true      # Turn portrait photos to landscape
//!
//! [sheet]
//! width = 8.3               # A4 at 300 dpi
//! height = 11.7
//! unit = "inch"             # pixel | inch | millimeter | point
//! resolution = 300.0        # pixels per inch
//! background = "#ffffff"
//!
//! [gap]
//! vertical = 0.014          # gutter between columns
//! horizontal = 0.014        # gutter between rows
//! unit = "inch"
//! resolution = 300.0
//!
//! [grid]
//! rows = 5
//! columns = 6
//!
//! [caption]
//! enabled = true
//! font = "Sans-serif"
//! size = 6.0
//! unit = "point"
//! resolution = 300.0
//! line_spacing = 1.2
//! file_name = true
//! aperture = true
//! focal_length = true
//! iso = true
//! exposure = true
//!
//! [output]
//! prefix = "Untitled"       # sheets are named <prefix>_<n>
//! flatten = true
//!
//! [processing]
//! max_processes = 4         # Max parallel probes (omit for auto = CPU cores)
//! ```
//!
//! Each dimension group (sheet, gap, caption) carries its own unit and
//! resolution; they are converted to pixels independently.
//!
//! Unknown keys are rejected to catch typos early.

use crate::caption::CaptionFields;
use crate::units::{Measurement, Unit};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the source directory.
pub const CONFIG_FILE_NAME: &str = "contact-sheet.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything one contact sheet run needs to know.
///
/// Read-only for the whole run. User files need only specify the values they
/// want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Directory holding the source photographs.
    pub source_dir: String,
    /// Rotate portrait photos a quarter turn so they fill landscape cells.
    pub rotate_to_fit: bool,
    pub sheet: SheetSizeConfig,
    pub gap: GapConfig,
    pub grid: GridConfig,
    pub caption: CaptionConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            source_dir: ".".to_string(),
            rotate_to_fit: true,
            sheet: SheetSizeConfig::default(),
            gap: GapConfig::default(),
            grid: GridConfig::default(),
            caption: CaptionConfig::default(),
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SheetConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_measurements()
            .map_err(ConfigError::Validation)?;
        if self.grid.rows == 0 || self.grid.columns == 0 {
            return Err(ConfigError::Validation(
                "grid.rows and grid.columns must be at least 1".into(),
            ));
        }
        if !self.caption.line_spacing.is_finite() || self.caption.line_spacing <= 0.0 {
            return Err(ConfigError::Validation(
                "caption.line_spacing must be > 0".into(),
            ));
        }
        if !is_hex_color(&self.sheet.background) {
            return Err(ConfigError::Validation(format!(
                "sheet.background must be a #rrggbb color (got '{}')",
                self.sheet.background
            )));
        }
        if self.output.prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.prefix must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Source directory, resolved against the directory the config came from.
    ///
    /// An absolute `source_dir` is used as is.
    pub fn resolve_source_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.source_dir)
    }

    /// Range checks on every dimension, gaps allowed to be zero.
    pub fn validate_measurements(&self) -> Result<(), String> {
        self.sheet.width().validate("sheet.width")?;
        self.sheet.height().validate("sheet.height")?;
        self.gap.vertical().validate_non_negative("gap.vertical")?;
        self.gap.horizontal().validate_non_negative("gap.horizontal")?;
        self.caption.size().validate("caption.size")
    }
}

fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Sheet size and background. Width and height share one unit and resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetSizeConfig {
    pub width: f64,
    pub height: f64,
    pub unit: Unit,
    /// Pixels per inch.
    pub resolution: f64,
    /// Fill colour as `#rrggbb`.
    pub background: String,
}

impl SheetSizeConfig {
    pub fn width(&self) -> Measurement {
        Measurement::new(self.width, self.unit, self.resolution)
    }

    pub fn height(&self) -> Measurement {
        Measurement::new(self.height, self.unit, self.resolution)
    }
}

impl Default for SheetSizeConfig {
    fn default() -> Self {
        Self {
            width: 8.3,
            height: 11.7,
            unit: Unit::Inch,
            resolution: 300.0,
            background: "#ffffff".to_string(),
        }
    }
}

/// Gutters around and between cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GapConfig {
    /// Width of the vertical gutters: left margin and between columns.
    pub vertical: f64,
    /// Height of the horizontal gutters: top margin and between rows.
    pub horizontal: f64,
    pub unit: Unit,
    pub resolution: f64,
}

impl GapConfig {
    pub fn vertical(&self) -> Measurement {
        Measurement::new(self.vertical, self.unit, self.resolution)
    }

    pub fn horizontal(&self) -> Measurement {
        Measurement::new(self.horizontal, self.unit, self.resolution)
    }
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            vertical: 0.014,
            horizontal: 0.014,
            unit: Unit::Inch,
            resolution: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub rows: u32,
    pub columns: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 6,
        }
    }
}

/// Caption text settings and per-field toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    /// Master switch. Off means images take the whole cell.
    pub enabled: bool,
    pub font: String,
    pub size: f64,
    pub unit: Unit,
    pub resolution: f64,
    /// Line height as a multiple of the text size.
    pub line_spacing: f64,
    pub file_name: bool,
    pub aperture: bool,
    pub focal_length: bool,
    pub iso: bool,
    pub exposure: bool,
}

impl CaptionConfig {
    pub fn size(&self) -> Measurement {
        Measurement::new(self.size, self.unit, self.resolution)
    }

    pub fn fields(&self) -> CaptionFields {
        CaptionFields {
            file_name: self.file_name,
            aperture: self.aperture,
            focal_length: self.focal_length,
            iso: self.iso,
            exposure: self.exposure,
        }
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            font: "Sans-serif".to_string(),
            size: 6.0,
            unit: Unit::Point,
            resolution: 300.0,
            line_spacing: 1.2,
            file_name: true,
            aperture: true,
            focal_length: true,
            iso: true,
            exposure: true,
        }
    }
}

/// Hints forwarded to whatever renders the sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Sheets are named `<prefix>_<index>`.
    pub prefix: String,
    /// Flatten each finished sheet to a single layer.
    pub flatten: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: "Untitled".to_string(),
            flatten: true,
        }
    }
}

/// Parallel probing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel header/metadata readers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SheetConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(file: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !file.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(file)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SheetConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SheetConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file, merged over stock defaults.
pub fn load_config_file(file: &Path) -> Result<SheetConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(file)?)
}

/// Load `contact-sheet.toml` from the given directory, merged over stock
/// defaults. A missing file yields the defaults.
pub fn load_config(dir: &Path) -> Result<SheetConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Returns a fully-commented stock `contact-sheet.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Contact Sheet Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Dimensions are given as a value plus the unit and resolution they were
# measured in. Units: "pixel", "inch", "millimeter", "point"
# (or "px", "in", "mm", "pt"). Resolution is in pixels per inch.
#
# Unknown keys will cause an error.

# Directory holding the photographs (--source overrides this).
source_dir = "."

# Turn portrait photos a quarter turn so they fill landscape cells.
rotate_to_fit = true

# ---------------------------------------------------------------------------
# Sheet
# ---------------------------------------------------------------------------
[sheet]
# A4 at 300 dpi.
width = 8.3
height = 11.7
unit = "inch"
resolution = 300.0

# Background fill, as #rrggbb.
background = "#ffffff"

# ---------------------------------------------------------------------------
# Gaps
# ---------------------------------------------------------------------------
[gap]
# Vertical gutters: left margin and the space between columns.
vertical = 0.014
# Horizontal gutters: top margin and the space between rows.
horizontal = 0.014
unit = "inch"
resolution = 300.0

# ---------------------------------------------------------------------------
# Grid
# ---------------------------------------------------------------------------
[grid]
rows = 5
columns = 6

# ---------------------------------------------------------------------------
# Captions
# ---------------------------------------------------------------------------
[caption]
# Master switch. When off, photos take the whole cell.
enabled = true
font = "Sans-serif"
size = 6.0
unit = "point"
resolution = 300.0
# Caption line height as a multiple of the text size.
line_spacing = 1.2

# Fields, in caption order.
file_name = true
aperture = true
focal_length = true
iso = true
exposure = true

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Sheets are named <prefix>_<n>, counting from 0.
prefix = "Untitled"
# Ask the renderer to flatten each sheet to one layer.
flatten = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers reading image headers and metadata.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

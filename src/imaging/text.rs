//! Caption height measurement.
//!
//! Text shaping belongs to whatever renders the sheet. The layout engine only
//! needs to know how tall a caption will be so it can take that height away
//! from the image, and it asks through [`TextMeasure`].

/// Reports the rendered height of a caption.
pub trait TextMeasure {
    /// Height in pixels of `text` set in `font` at `size_px`.
    ///
    /// Must return 0 for empty text.
    fn measure_caption_height(&self, text: &str, font: &str, size_px: u32) -> u32;
}

/// Single-line estimate: the caption is one line, `size × line_spacing` tall.
///
/// Captions are laid out as one centred line spanning the cell, so the
/// font face does not change the height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHeightMeasure {
    pub line_spacing: f64,
}

impl LineHeightMeasure {
    pub fn new(line_spacing: f64) -> Self {
        Self { line_spacing }
    }
}

impl Default for LineHeightMeasure {
    fn default() -> Self {
        Self::new(1.2)
    }
}

impl TextMeasure for LineHeightMeasure {
    fn measure_caption_height(&self, text: &str, _font: &str, size_px: u32) -> u32 {
        if text.is_empty() {
            return 0;
        }
        (size_px as f64 * self.line_spacing).ceil().max(1.0) as u32
    }
}

//! Caption text assembled from camera metadata.
//!
//! Fields are appended in a fixed order, each only when its toggle is on and
//! the value is usable:
//!
//! | Field | Condition | Segment |
//! |---|---|---|
//! | file name | toggle | `"<name> - "` |
//! | aperture | toggle, f-number present | `"f/<2 sig. digits>, "` |
//! | focal length | toggle, present and > 1 mm | `"<2 sig. digits>mm, "` |
//! | ISO | toggle, present and > 1 | `"<int>ISO, "` |
//! | exposure | toggle, both terms present | `"<num>/<den>s, "` |
//!
//! The last two characters are then cut off, whatever they are. For a caption
//! ending in a metadata field that removes the trailing `", "`; for a
//! file-name-only caption it leaves `"img1.jpg -"`. Existing sheets were made
//! with that exact text, so it is kept.
//!
//! The buffer holds at most [`CAPTION_CAPACITY`] characters. Anything past
//! that is dropped without error.

use crate::imaging::ImageMetadata;

/// Maximum caption length in characters.
pub const CAPTION_CAPACITY: usize = 255;

/// Which metadata fields go into a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionFields {
    pub file_name: bool,
    pub aperture: bool,
    pub focal_length: bool,
    pub iso: bool,
    pub exposure: bool,
}

impl CaptionFields {
    pub fn all() -> Self {
        Self {
            file_name: true,
            aperture: true,
            focal_length: true,
            iso: true,
            exposure: true,
        }
    }

    pub fn none() -> Self {
        Self {
            file_name: false,
            aperture: false,
            focal_length: false,
            iso: false,
            exposure: false,
        }
    }

    pub fn any(&self) -> bool {
        self.file_name || self.aperture || self.focal_length || self.iso || self.exposure
    }
}

impl Default for CaptionFields {
    fn default() -> Self {
        Self::all()
    }
}

/// Fixed-capacity text accumulator. Appends past capacity are cut, not rejected.
#[derive(Debug, Default)]
struct CaptionBuffer {
    text: String,
    chars: usize,
}

impl CaptionBuffer {
    fn push(&mut self, segment: &str) {
        for c in segment.chars() {
            if self.chars >= CAPTION_CAPACITY {
                return;
            }
            self.text.push(c);
            self.chars += 1;
        }
    }

    /// Remove the final separator: exactly two characters, if there are two.
    fn finish(mut self) -> String {
        if self.chars >= 2 {
            self.text.pop();
            self.text.pop();
        }
        self.text
    }
}

/// Build the caption for one image.
///
/// Returns an empty string when no field produced any text; the paginator
/// emits no caption element in that case.
pub fn build_caption(metadata: &ImageMetadata, filename: &str, fields: CaptionFields) -> String {
    let mut buf = CaptionBuffer::default();

    if fields.file_name {
        buf.push(&format!("{filename} - "));
    }
    if fields.aperture
        && let Some(f_number) = metadata.f_number
    {
        buf.push(&format!("f/{}, ", format_significant(f_number)));
    }
    if fields.focal_length
        && let Some(focal) = metadata.focal_length.filter(|&mm| mm > 1.0)
    {
        buf.push(&format!("{}mm, ", format_significant(focal)));
    }
    if fields.iso
        && let Some(iso) = metadata.iso_speed.filter(|&iso| iso > 1)
    {
        buf.push(&format!("{iso}ISO, "));
    }
    if fields.exposure
        && let Some(exposure) = metadata.exposure_time
    {
        buf.push(&format!("{}/{}s, ", exposure.numerator, exposure.denominator));
    }

    buf.finish()
}

/// Format a positive value with two significant digits in plain decimal.
///
/// Trailing zeros after the decimal point are dropped, so `2.0` renders as
/// `"2"` and `5.6` as `"5.6"`. Values of 100 and above are rounded to tens.
/// An exact half goes to the even digit (`10.5` → `"10"`, `105` → `"100"`,
/// `115` → `"120"`).
pub fn format_significant(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let text = if magnitude >= 1 {
        let step = 10f64.powi(magnitude - 1);
        format!("{:.0}", (value / step).round_ties_even() * step)
    } else {
        let decimals = (1 - magnitude) as usize;
        let rounded = format!("{value:.decimals$}");
        // 9.96 → "10.0": rounding gained a digit, so drop one decimal.
        match rounded.parse::<f64>() {
            Ok(r) if r.abs().log10().floor() as i32 > magnitude && decimals > 0 => {
                format!("{value:.prec$}", prec = decimals - 1)
            }
            _ => rounded,
        }
    };

    trim_decimal_zeros(text)
}

fn trim_decimal_zeros(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

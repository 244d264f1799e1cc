//! Aspect-preserving fit of one image into one cell.
//!
//! Pure arithmetic, no I/O. All sizes are whole pixels.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    #[error("invalid image dimensions {width}x{height}")]
    InvalidImageDimensions { width: u32, height: u32 },
    #[error("no room to fit into ({width}x{height})")]
    EmptyTarget { width: u32, height: u32 },
}

/// Result of fitting an image into a target box.
///
/// `width` and `height` describe the image as it appears on the sheet, i.e.
/// after any rotation. The offsets are relative to the box's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fit {
    pub width: u32,
    pub height: u32,
    pub rotated: bool,
    pub x_offset: u32,
    pub y_offset: u32,
}

/// Scale a `source` image to fit inside a `target` box, keeping its aspect.
///
/// With `rotate_to_fit`, a portrait source (narrower than tall) is turned a
/// quarter turn first and fitted with its sides swapped. The binding axis
/// lands exactly on the target; the other is rounded and never exceeds it.
///
/// The image is centred horizontally and top-aligned.
///
/// # Examples
/// ```
/// # use contact_sheet::layout::fit_image;
/// // 800x600 into 200x200: width binds, height follows → 200x150
/// let fit = fit_image(800, 600, 200, 200, true).unwrap();
/// assert_eq!((fit.width, fit.height, fit.x_offset), (200, 150, 0));
///
/// // 600x800 rotated becomes 800x600 before fitting
/// let fit = fit_image(600, 800, 200, 200, true).unwrap();
/// assert!(fit.rotated);
/// assert_eq!((fit.width, fit.height), (200, 150));
/// ```
pub fn fit_image(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
    rotate_to_fit: bool,
) -> Result<Fit, FitError> {
    if source_width == 0 || source_height == 0 {
        return Err(FitError::InvalidImageDimensions {
            width: source_width,
            height: source_height,
        });
    }
    if target_width == 0 || target_height == 0 {
        return Err(FitError::EmptyTarget {
            width: target_width,
            height: target_height,
        });
    }

    let rotated = rotate_to_fit && source_width < source_height;
    let (src_w, src_h) = if rotated {
        (source_height as f64, source_width as f64)
    } else {
        (source_width as f64, source_height as f64)
    };

    let aspect = target_width as f64 / src_w;
    let (width, height) = if src_h * aspect > target_height as f64 {
        // Height binds
        let aspect = target_height as f64 / src_h;
        (scale(src_w, aspect, target_width), target_height)
    } else {
        // Width binds
        (target_width, scale(src_h, aspect, target_height))
    };

    Ok(Fit {
        width,
        height,
        rotated,
        x_offset: (target_width - width) / 2,
        y_offset: 0,
    })
}

fn scale(side: f64, aspect: f64, limit: u32) -> u32 {
    ((side * aspect).round() as u32).clamp(1, limit)
}

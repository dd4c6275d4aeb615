//! Preview/print size mapping
//!
//! Preview images are downsampled from the print-resolution originals.
//! Font sizes and pixel offsets are stored in print space and shown in
//! preview space; the ratio of the two widths converts between them.

use crate::{GeometryError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Print width assumed when an image carries no original-width metadata
pub const DEFAULT_ORIGINAL_WIDTH: u32 = 4096;

/// Line-height correction applied when estimating a print font size
/// from a measured preview line
const LINE_HEIGHT_CORRECTION: f64 = 1.2;

/// Compute `display_width / original_width`
///
/// Both widths must be positive. A zero display width means the preview
/// image has not loaded yet, which is reported instead of coerced.
pub fn compute_scale_factor(original_width: u32, display_width: u32) -> Result<f64> {
    if original_width == 0 || display_width == 0 {
        return Err(GeometryError::InvalidScale {
            original_width: original_width as f64,
            display_width: display_width as f64,
        });
    }

    let factor = display_width as f64 / original_width as f64;
    debug!("Scale: {}/{} = {:.3}", display_width, original_width, factor);
    Ok(factor)
}

/// Accept a raw scale factor only when it is positive and finite
pub fn check_scale_factor(scale_factor: f64) -> Result<f64> {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        Ok(scale_factor)
    } else {
        Err(GeometryError::InvalidScaleFactor(scale_factor))
    }
}

/// Convert a print-space value to preview space
pub fn to_display_size(print_value: f64, scale_factor: f64) -> f64 {
    print_value * scale_factor
}

/// Convert a preview-space value to print space, rounded to whole pixels
pub fn to_print_size(display_value: f64, scale_factor: f64) -> f64 {
    (display_value / scale_factor).round()
}

/// Scale factor bound to a specific original/preview width pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleMapper {
    original_width: u32,
    display_width: u32,
    factor: f64,
}

impl ScaleMapper {
    /// Create a mapper for the given original and display widths
    pub fn new(original_width: u32, display_width: u32) -> Result<Self> {
        let factor = compute_scale_factor(original_width, display_width)?;
        Ok(Self {
            original_width,
            display_width,
            factor,
        })
    }

    /// Create a mapper, falling back to `default_original` when the image
    /// has no declared original width
    pub fn for_image(
        display_width: u32,
        original_width: Option<u32>,
        default_original: u32,
    ) -> Result<Self> {
        Self::new(original_width.unwrap_or(default_original), display_width)
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn original_width(&self) -> u32 {
        self.original_width
    }

    pub fn display_width(&self) -> u32 {
        self.display_width
    }

    pub fn to_display(&self, print_value: f64) -> f64 {
        to_display_size(print_value, self.factor)
    }

    pub fn to_print(&self, display_value: f64) -> f64 {
        to_print_size(display_value, self.factor)
    }

    /// Estimate the print font size of a block from the height of its first
    /// rendered preview line
    pub fn estimate_print_font_size(&self, first_line_height_px: f64) -> f64 {
        (first_line_height_px / self.factor * LINE_HEIGHT_CORRECTION).round()
    }
}

//! Page Core - Print geometry for book page overlays
//!
//! This crate provides functionality for:
//! - Computing printable safe zones for single pages and spread halves
//! - Mapping sizes between preview pixels and print pixels
//! - Sampling background luminance to pick a legible text color
//!
//! # Example
//!
//! ```
//! use page_core::{compute_safe_zone, PageType, ScaleMapper};
//!
//! let zone = compute_safe_zone(4096, 5461, PageType::Single, 300);
//! assert_eq!(zone.left, 225);
//! assert_eq!(zone.right, 3871);
//!
//! let mapper = ScaleMapper::new(4096, 1200).unwrap();
//! assert_eq!(mapper.factor(), 0.29296875);
//! ```

mod color;
mod luminance;
mod safe_zone;
mod scale;

pub use color::Rgb;
pub use luminance::{
    average_luminance, pick_text_color, LuminancePicker, SampleRegion, EMPTY_REGION_LUMA,
    LUMINANCE_THRESHOLD,
};
pub use safe_zone::{
    compute_safe_zone, map_page_type, PageType, PercentMargins, SafeZone, SafeZoneConfig,
};
pub use scale::{
    check_scale_factor, compute_scale_factor, to_display_size, to_print_size, ScaleMapper,
    DEFAULT_ORIGINAL_WIDTH,
};

use thiserror::Error;

/// Errors that can occur during geometry operations
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Invalid scale inputs: original width {original_width}, display width {display_width}")]
    InvalidScale {
        original_width: f64,
        display_width: f64,
    },

    #[error("Invalid scale factor: {0} (must be positive and finite)")]
    InvalidScaleFactor(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, GeometryError>;

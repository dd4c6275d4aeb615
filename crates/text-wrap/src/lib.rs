//! Text Wrap - Pixel-width word wrapping
//!
//! This crate provides:
//! - The [`TextMeasurer`] capability (`measure(text, family, size) -> width`)
//! - A TrueType-backed [`FontBook`] with sans-serif fallback metrics
//! - A deterministic [`FixedAdvanceMeasurer`] for tests and headless use
//! - Greedy word-level wrapping into [`WrappedLines`]
//!
//! # Example
//!
//! ```
//! use text_wrap::{FixedAdvanceMeasurer, TextWrapper};
//!
//! let wrapper = TextWrapper::new(FixedAdvanceMeasurer::new(0.5));
//! let lines = wrapper.wrap("The quick brown fox jumps", "Arial", 10.0, 60.0);
//! assert_eq!(lines.as_slice(), ["The quick", "brown fox", "jumps"]);
//! ```

mod font;
mod measure;
mod wrapper;

pub use font::{normalize_family, FontBook, FontData};
pub use measure::{FallbackMetrics, FixedAdvanceMeasurer, TextMeasurer, FALLBACK_ADVANCE_EM};
pub use wrapper::{wrap_text, TextWrapper, WrappedLines};

use thiserror::Error;

/// Errors that can occur while loading fonts for measurement
#[derive(Debug, Error)]
pub enum WrapError {
    #[error("Failed to parse font: {0}")]
    FontParse(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),
}

/// Result type for text wrap operations
pub type Result<T> = std::result::Result<T, WrapError>;

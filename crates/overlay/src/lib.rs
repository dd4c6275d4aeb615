//! Overlay - Text overlay layout for book page previews
//!
//! This crate provides:
//! - The per-page text specification schema and page configuration parsing
//! - Layout configuration (DPI, margins, default sizes, thresholds)
//! - The overlay renderer: safe zone, scale, wrap, position and color in one call
//! - An explicit editor session holding global defaults and page overrides
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use overlay::{LayoutConfig, OverlayRenderer, PageImage, TextSpecification};
//! use text_wrap::FixedAdvanceMeasurer;
//!
//! let renderer = OverlayRenderer::new(LayoutConfig::default(), FixedAdvanceMeasurer::default());
//! let pixels = RgbaImage::from_pixel(1200, 1600, Rgba([240, 240, 240, 255]));
//! let page = PageImage::new(&pixels);
//! let spec = TextSpecification::new("Once upon a time");
//!
//! let overlay = renderer.layout(&page, &spec, "single").unwrap();
//! assert_eq!(overlay.lines.len(), 1);
//! ```

pub mod config;
pub mod parser;
mod renderer;
mod schema;
pub mod session;

pub use config::LayoutConfig;
pub use parser::{parse_page_config, parse_text_spec, PageConfig, PageEntry};
pub use renderer::{
    Anchor, ColorSource, OverlayRenderer, PageImage, PixelRect, RenderedOverlay,
    ResolvedBackground,
};
pub use schema::*;
pub use session::{ColorMode, EditorSession, GlobalDefaults, TextSettingsExport};

pub use page_core::{PageType, Rgb, SafeZone};

use thiserror::Error;

/// Errors that can occur during overlay layout
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Image not loaded: natural size is {width}x{height}")]
    ImageNotLoaded { width: u32, height: u32 },

    #[error("Failed to parse page configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Page not found: {0}")]
    PageNotFound(u32),

    #[error("Geometry error: {0}")]
    Geometry(#[from] page_core::GeometryError),

    #[error("Font error: {0}")]
    Wrap(#[from] text_wrap::WrapError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for overlay operations
pub type Result<T> = std::result::Result<T, OverlayError>;

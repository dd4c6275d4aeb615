//! Layout configuration

use crate::{OverlayError, Result};
use page_core::{SafeZoneConfig, DEFAULT_ORIGINAL_WIDTH, LUMINANCE_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Print font size used when a page sets none
pub const DEFAULT_PRINT_FONT_SIZE: f64 = 240.0;

/// Configuration for overlay layout.
///
/// Every field has a default, so a partial JSON document only needs the
/// keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// DPI and safe zone margins.
    #[serde(flatten)]
    pub safe_zone: SafeZoneConfig,

    /// Print font size when the page sets none.
    /// Default: 240.
    pub default_print_font_size: f64,

    /// Print width assumed when an image declares none.
    /// Default: 4096.
    pub default_original_width: u32,

    /// Average luma below which automatic text turns white.
    /// Default: 128.
    pub luminance_threshold: f64,

    /// Line height as a multiple of the font size.
    /// Default: 1.2.
    pub line_height: f64,

    /// Height of the band sampled for `top` and `bottom` text.
    /// Default: 200 pixels.
    pub sample_band_px: f64,

    /// Half height of the band sampled around the center for `center` text.
    /// Default: 100 pixels.
    pub center_sample_half_px: f64,

    /// Family used when the page names no font file.
    /// Default: "sans-serif".
    pub default_font_family: String,

    /// Background padding when the page sets none.
    /// Default: 20 pixels.
    pub default_background_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            safe_zone: SafeZoneConfig::default(),
            default_print_font_size: DEFAULT_PRINT_FONT_SIZE,
            default_original_width: DEFAULT_ORIGINAL_WIDTH,
            luminance_threshold: LUMINANCE_THRESHOLD,
            line_height: 1.2,
            sample_band_px: 200.0,
            center_sample_half_px: 100.0,
            default_font_family: "sans-serif".to_string(),
            default_background_padding: 20.0,
        }
    }
}

impl LayoutConfig {
    /// Parse a (possibly partial) configuration document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the print DPI.
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.safe_zone.dpi = dpi;
        self
    }

    /// Set the default print font size.
    pub fn default_print_font_size(mut self, size: f64) -> Self {
        self.default_print_font_size = size;
        self
    }

    /// Set the default original image width.
    pub fn default_original_width(mut self, width: u32) -> Self {
        self.default_original_width = width;
        self
    }

    /// Set the luminance threshold.
    pub fn luminance_threshold(mut self, threshold: f64) -> Self {
        self.luminance_threshold = threshold;
        self
    }

    /// Set the default font family.
    pub fn default_font_family(mut self, family: &str) -> Self {
        self.default_font_family = family.to_string();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.safe_zone.validate()?;

        if self.default_original_width == 0 {
            return Err(OverlayError::InvalidConfig(
                "defaultOriginalWidth must be greater than 0".to_string(),
            ));
        }
        if !is_positive(self.default_print_font_size) {
            return Err(OverlayError::InvalidConfig(
                "defaultPrintFontSize must be greater than 0".to_string(),
            ));
        }
        if !is_positive(self.line_height) {
            return Err(OverlayError::InvalidConfig(
                "lineHeight must be greater than 0".to_string(),
            ));
        }
        if self.sample_band_px < 0.0 || self.center_sample_half_px < 0.0 {
            return Err(OverlayError::InvalidConfig(
                "sample bands must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

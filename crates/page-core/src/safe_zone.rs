//! Printable safe zones for single pages and spread halves

use crate::{GeometryError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default print resolution
pub const DEFAULT_DPI: u32 = 300;

/// Margin on edges away from the spine, in inches
pub const OUTER_SAFE_ZONE_INCHES: f64 = 0.75;

/// Margin on the spine edge, in inches
pub const GUTTER_SAFE_ZONE_INCHES: f64 = 1.0;

/// Page layout kind used for margin selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    #[default]
    Single,
    /// Left half of a spread, gutter on the right edge
    SpreadLeft,
    /// Right half of a spread, gutter on the left edge
    SpreadRight,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Single => "single",
            PageType::SpreadLeft => "spread-left",
            PageType::SpreadRight => "spread-right",
        }
    }
}

/// Map the story page-type vocabulary onto [`PageType`]
///
/// `spread-start` is the left half of a spread and `spread-companion`
/// the right half. Anything else, including unknown values, is a single page.
pub fn map_page_type(story_type: &str) -> PageType {
    match story_type {
        "spread-start" => PageType::SpreadLeft,
        "spread-companion" => PageType::SpreadRight,
        _ => PageType::Single,
    }
}

/// Safe zone margin settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SafeZoneConfig {
    /// Print resolution in dots per inch.
    /// Default: 300.
    pub dpi: u32,

    /// Margin on non-gutter edges.
    /// Default: 0.75 inches.
    pub outer_inches: f64,

    /// Margin on the spine edge of a spread half.
    /// Default: 1.0 inch.
    pub gutter_inches: f64,
}

impl Default for SafeZoneConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            outer_inches: OUTER_SAFE_ZONE_INCHES,
            gutter_inches: GUTTER_SAFE_ZONE_INCHES,
        }
    }
}

impl SafeZoneConfig {
    /// Create a config with the default margins at the given DPI.
    pub fn with_dpi(dpi: u32) -> Self {
        Self {
            dpi,
            ..Default::default()
        }
    }

    /// Set the outer margin in inches.
    pub fn outer_inches(mut self, inches: f64) -> Self {
        self.outer_inches = inches;
        self
    }

    /// Set the gutter margin in inches.
    pub fn gutter_inches(mut self, inches: f64) -> Self {
        self.gutter_inches = inches;
        self
    }

    /// Outer margin in pixels, `floor(outer_inches * dpi)`
    pub fn outer_margin_px(&self) -> i64 {
        (self.outer_inches * self.dpi as f64).floor() as i64
    }

    /// Gutter margin in pixels, `floor(gutter_inches * dpi)`
    pub fn gutter_margin_px(&self) -> i64 {
        (self.gutter_inches * self.dpi as f64).floor() as i64
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(GeometryError::InvalidConfig(
                "dpi must be greater than 0".to_string(),
            ));
        }
        let margins = [self.outer_inches, self.gutter_inches];
        if margins.iter().any(|m| m.is_nan() || *m < 0.0) {
            return Err(GeometryError::InvalidConfig(
                "safe zone margins must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Compute the safe zone for an image of the given size
    ///
    /// No clamping is applied: when the margins exceed half the image the
    /// returned zone has a zero or negative extent and the caller decides
    /// how to fall back.
    pub fn compute(&self, image_width: u32, image_height: u32, page_type: PageType) -> SafeZone {
        let outer = self.outer_margin_px();
        let gutter = self.gutter_margin_px();
        let width = image_width as i64;
        let height = image_height as i64;

        let (left, right) = match page_type {
            PageType::Single => (outer, width - outer),
            PageType::SpreadLeft => (outer, width - gutter),
            PageType::SpreadRight => (gutter, width - outer),
        };

        let zone = SafeZone {
            left,
            right,
            top: outer,
            bottom: height - outer,
        };

        if zone.is_degenerate() {
            warn!(
                "Degenerate safe zone for {}x{} {} page: {:?}",
                image_width,
                image_height,
                page_type.as_str(),
                zone
            );
        }

        zone
    }
}

/// Compute the safe zone with the default margins at `dpi`
///
/// # Arguments
/// * `image_width` - Image width in pixels
/// * `image_height` - Image height in pixels
/// * `page_type` - Which edge (if any) carries the gutter margin
/// * `dpi` - Resolution used to convert inch margins to pixels
pub fn compute_safe_zone(
    image_width: u32,
    image_height: u32,
    page_type: PageType,
    dpi: u32,
) -> SafeZone {
    SafeZoneConfig::with_dpi(dpi).compute(image_width, image_height, page_type)
}

/// Rectangle inside which text may be placed, in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeZone {
    pub left: i64,
    pub right: i64,
    pub top: i64,
    pub bottom: i64,
}

impl SafeZone {
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// True when the zone has no usable area
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left as f64
            && x <= self.right as f64
            && y >= self.top as f64
            && y <= self.bottom as f64
    }

    /// Express the zone as margins in percent of the container
    pub fn to_percent_margins(
        &self,
        container_width: u32,
        container_height: u32,
    ) -> PercentMargins {
        let width = container_width as f64;
        let height = container_height as f64;

        PercentMargins {
            left: self.left as f64 / width * 100.0,
            right: (width - self.right as f64) / width * 100.0,
            top: self.top as f64 / height * 100.0,
            bottom: (height - self.bottom as f64) / height * 100.0,
        }
    }
}

/// Safe zone margins as percentages of the container size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

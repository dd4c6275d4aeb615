//! Text specification schema types

use page_core::Rgb;
use serde::{Deserialize, Serialize};

/// Vertical placement within the safe zone
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Center,
    #[default]
    Bottom,
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Text color as written in a page configuration
///
/// Only an `[r, g, b]` array is an explicit color. Any string (`"auto"`,
/// a hex value typed into the editor) leaves the color automatic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ColorSpec {
    Rgb(Rgb),
    Named(String),
}

impl ColorSpec {
    /// The explicit color, if this is one
    pub fn explicit(&self) -> Option<Rgb> {
        match self {
            ColorSpec::Rgb(color) => Some(*color),
            ColorSpec::Named(_) => None,
        }
    }
}

impl From<Rgb> for ColorSpec {
    fn from(color: Rgb) -> Self {
        ColorSpec::Rgb(color)
    }
}

/// Background box drawn behind the text
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Background {
    /// Box color, white when unset
    #[serde(default)]
    pub color: Option<Rgb>,

    /// Inner padding in pixels
    #[serde(default)]
    pub padding: Option<f64>,
}

/// Per-page text configuration
///
/// Sizes are in print space. Percent fields are set by the editor when the
/// user drags or resizes an overlay and are relative to the page image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextSpecification {
    /// Text to place on the page
    pub content: String,

    /// Font file name (e.g. `Quicksand-Medium.ttf`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    /// Font size in print pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    /// Font size the user picked in preview pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_font_size: Option<f64>,

    /// Explicit text color; automatic when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,

    /// Vertical placement
    #[serde(default)]
    pub position: Position,

    /// Horizontal alignment
    #[serde(default, alias = "align")]
    pub alignment: Alignment,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_percent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_percent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_percent: Option<f64>,

    /// Background box
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,

    /// Take font, size and color from the global defaults
    #[serde(default)]
    pub use_global: bool,
}

impl TextSpecification {
    /// Create a specification with only content set
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            ..Default::default()
        }
    }

    /// Set the vertical position
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the print font size
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set an explicit text color
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(ColorSpec::Rgb(color));
        self
    }

    /// Set the font file
    pub fn with_font(mut self, font: &str) -> Self {
        self.font = Some(font.to_string());
        self
    }

    /// Manual position as `(left%, top%)` when both are present
    pub fn manual_position(&self) -> Option<(f64, f64)> {
        match (self.left_percent, self.top_percent) {
            (Some(left), Some(top)) => Some((left, top)),
            _ => None,
        }
    }

    /// Print font size; zero, negative and non-finite values count as unset
    pub fn font_size_override(&self) -> Option<f64> {
        self.font_size.filter(|size| size.is_finite() && *size > 0.0)
    }

    /// Explicit width override in percent; zero or negative values are ignored
    pub fn width_override(&self) -> Option<f64> {
        self.width_percent.filter(|pct| *pct > 0.0)
    }

    /// Explicit RGB color, if any
    pub fn explicit_color(&self) -> Option<Rgb> {
        self.color.as_ref().and_then(ColorSpec::explicit)
    }

    /// True when the page overrides font, size or color
    pub fn has_style_overrides(&self) -> bool {
        self.font.is_some() || self.font_size.is_some() || self.color.is_some()
    }
}

/// Derive a font family name from a font file name
///
/// # Examples
/// ```
/// use overlay::font_family_from_file;
/// assert_eq!(font_family_from_file("Quicksand-Medium.ttf"), "Quicksand Medium");
/// assert_eq!(font_family_from_file("Nunito_Bold.WOFF2"), "Nunito Bold");
/// ```
pub fn font_family_from_file(font_file: &str) -> String {
    let lower = font_file.to_ascii_lowercase();
    let stem = [".ttf", ".otf", ".woff2", ".woff"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &font_file[..font_file.len() - ext.len()])
        .unwrap_or(font_file);

    stem.replace(['-', '_'], " ")
}

//! TrueType font metrics for text measurement

use crate::measure::{FallbackMetrics, TextMeasurer};
use crate::{Result, WrapError};
use std::collections::HashMap;
use tracing::debug;

/// Normalize a CSS-style family name for lookup
///
/// Strips surrounding quotes and whitespace and lowercases, so
/// `'Quicksand Medium'` and `quicksand medium` name the same family.
pub fn normalize_family(family: &str) -> String {
    family
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_lowercase()
}

/// Font data for a registered family
#[derive(Debug, Clone)]
pub struct FontData {
    /// Family name as registered
    pub name: String,
    /// Raw TTF/OTF data
    ttf_data: Vec<u8>,
    units_per_em: u16,
}

impl FontData {
    /// Create font data from TTF bytes
    ///
    /// # Arguments
    /// * `name` - Family name
    /// * `ttf_data` - TrueType/OpenType file bytes
    pub fn from_ttf(name: &str, ttf_data: Vec<u8>) -> Result<Self> {
        let face = ttf_parser::Face::parse(&ttf_data, 0)
            .map_err(|e| WrapError::FontParse(format!("{name}: {e:?}")))?;
        let units_per_em = face.units_per_em();

        Ok(Self {
            name: name.to_string(),
            ttf_data,
            units_per_em,
        })
    }

    /// Get font units per em
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Calculate text width in font units
    ///
    /// Characters without a glyph advance by the `.notdef` glyph.
    pub fn text_width(&self, text: &str) -> u32 {
        let Ok(face) = ttf_parser::Face::parse(&self.ttf_data, 0) else {
            return 0;
        };

        text.chars()
            .map(|c| {
                let glyph = face.glyph_index(c).unwrap_or(ttf_parser::GlyphId(0));
                face.glyph_hor_advance(glyph).unwrap_or(0) as u32
            })
            .sum()
    }

    /// Calculate text width in pixels for a given font size
    pub fn text_width_px(&self, text: &str, font_size_px: f64) -> f64 {
        let units_per_em = self.units_per_em.max(1) as f64;
        self.text_width(text) as f64 / units_per_em * font_size_px
    }
}

/// Registered font families used for measurement
///
/// Families that are not registered measure with the default family when
/// one is set, otherwise with [`FallbackMetrics`]. Missing fonts degrade
/// measurement quality; they never fail it.
#[derive(Debug, Clone, Default)]
pub struct FontBook {
    fonts: HashMap<String, FontData>,
    default_family: Option<String>,
    fallback: FallbackMetrics,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font family from TTF bytes
    pub fn register(&mut self, family: &str, ttf_data: Vec<u8>) -> Result<()> {
        let key = normalize_family(family);
        if self.fonts.contains_key(&key) {
            return Err(WrapError::FontAlreadyExists(family.to_string()));
        }

        let font = FontData::from_ttf(family, ttf_data)?;
        debug!("Registered font family '{}'", family);
        self.fonts.insert(key, font);
        Ok(())
    }

    /// Use `family` for measuring families that are not registered
    pub fn set_default_family(&mut self, family: &str) {
        self.default_family = Some(normalize_family(family));
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(&normalize_family(family))
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Resolve a family to loaded font data, trying the default family next
    pub fn resolve(&self, family: &str) -> Option<&FontData> {
        self.fonts.get(&normalize_family(family)).or_else(|| {
            self.default_family
                .as_ref()
                .and_then(|default| self.fonts.get(default))
        })
    }
}

impl TextMeasurer for FontBook {
    fn measure_text_width(&self, text: &str, font_family: &str, font_size_px: f64) -> f64 {
        match self.resolve(font_family) {
            Some(font) => font.text_width_px(text, font_size_px),
            None => {
                debug!(
                    "Font family '{}' unavailable, using fallback metrics",
                    font_family
                );
                self.fallback
                    .measure_text_width(text, font_family, font_size_px)
            }
        }
    }
}

//! Text width measurement capability

/// Approximate advance of an average sans-serif glyph, in em
pub const FALLBACK_ADVANCE_EM: f64 = 0.5;

/// Measures the rendered width of a string
///
/// Implementations must be deterministic: the same text, family and size
/// always measure the same. Wrapping is only reproducible if measurement is.
pub trait TextMeasurer {
    /// Width in pixels of `text` set in `font_family` at `font_size_px`
    fn measure_text_width(&self, text: &str, font_family: &str, font_size_px: f64) -> f64;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &str, f64) -> f64,
{
    fn measure_text_width(&self, text: &str, font_family: &str, font_size_px: f64) -> f64 {
        self(text, font_family, font_size_px)
    }
}

/// Every character advances by a fixed fraction of the font size
///
/// Ignores the family entirely. Useful as a deterministic fake and as
/// the degraded metric when no real font is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMeasurer {
    advance_em: f64,
}

impl FixedAdvanceMeasurer {
    pub fn new(advance_em: f64) -> Self {
        Self { advance_em }
    }

    pub fn advance_em(&self) -> f64 {
        self.advance_em
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure_text_width(&self, text: &str, _font_family: &str, font_size_px: f64) -> f64 {
        text.chars().count() as f64 * self.advance_em * font_size_px
    }
}

/// Host default sans-serif approximation
pub type FallbackMetrics = FixedAdvanceMeasurer;

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self::new(FALLBACK_ADVANCE_EM)
    }
}

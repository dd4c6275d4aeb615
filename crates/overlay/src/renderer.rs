//! Overlay rendering
//!
//! Turns a page image, its text specification and its page type into a
//! render description. Nothing here paints or stores anything: the editor
//! paints the result and persists user edits separately.

use crate::config::LayoutConfig;
use crate::schema::{font_family_from_file, Alignment, Position, TextSpecification};
use crate::{OverlayError, Result};
use image::{GenericImageView, Pixel};
use page_core::{
    map_page_type, LuminancePicker, PageType, PercentMargins, Rgb, SafeZone, SampleRegion,
    ScaleMapper,
};
use serde::{Deserialize, Serialize};
use text_wrap::{TextMeasurer, TextWrapper, WrappedLines};
use tracing::debug;

/// A loaded page image
///
/// `original_width` is the declared print width of the source image; the
/// configured default applies when it is absent.
#[derive(Debug, Clone, Copy)]
pub struct PageImage<'a, I> {
    pixels: &'a I,
    original_width: Option<u32>,
}

impl<'a, I> PageImage<'a, I>
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    pub fn new(pixels: &'a I) -> Self {
        Self {
            pixels,
            original_width: None,
        }
    }

    /// Declare the print width this preview was downsampled from
    pub fn with_original_width(mut self, original_width: u32) -> Self {
        self.original_width = Some(original_width);
        self
    }

    pub fn original_width(&self) -> Option<u32> {
        self.original_width
    }

    /// Natural (decoded) size of the preview
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &I {
        self.pixels
    }
}

/// Rectangle in preview pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// How the block is attached to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// Top edge on the safe zone top
    Top,
    /// Vertically centered on the page (translate by half its height)
    Center,
    /// Bottom edge on the safe zone bottom
    Bottom,
    /// User-dragged, placed at the stored percentages
    Manual,
}

/// Where the text color came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSource {
    Explicit,
    Sampled,
}

/// Resolved background box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBackground {
    pub color: Rgb,
    pub padding: f64,
}

/// Render description for one text block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedOverlay {
    /// Wrapped lines, top to bottom
    pub lines: WrappedLines,
    /// Block bounds in preview pixels
    pub bounds_px: PixelRect,
    pub anchor: Anchor,
    pub color: Rgb,
    pub color_source: ColorSource,
    pub font_family: String,
    /// Font size in preview pixels
    pub font_size_px: f64,
    /// Font size in print pixels
    pub print_font_size: f64,
    pub scale_factor: f64,
    pub line_height: f64,
    pub alignment: Alignment,
    pub page_type: PageType,
    /// Safe zone in preview pixels
    pub safe_zone: SafeZone,
    /// Safe zone margins in percent, absent for manually placed blocks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins_percent: Option<PercentMargins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<ResolvedBackground>,
}

impl RenderedOverlay {
    /// Bounds converted to print pixels
    pub fn print_bounds(&self) -> PixelRect {
        let to_print = |value: f64| page_core::to_print_size(value, self.scale_factor);
        PixelRect {
            left: to_print(self.bounds_px.left),
            top: to_print(self.bounds_px.top),
            width: to_print(self.bounds_px.width),
            height: to_print(self.bounds_px.height),
        }
    }
}

/// Overlay renderer
pub struct OverlayRenderer<M> {
    config: LayoutConfig,
    wrapper: TextWrapper<M>,
}

impl<M: TextMeasurer> OverlayRenderer<M> {
    /// Create a new renderer with the given configuration and text measurer
    pub fn new(config: LayoutConfig, measurer: M) -> Self {
        Self {
            config,
            wrapper: TextWrapper::new(measurer),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn measurer(&self) -> &M {
        self.wrapper.measurer()
    }

    /// Lay out a text block, with the page type in story vocabulary
    /// (`single`, `spread-start`, `spread-companion`)
    pub fn layout<I>(
        &self,
        image: &PageImage<'_, I>,
        spec: &TextSpecification,
        story_page_type: &str,
    ) -> Result<RenderedOverlay>
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        self.layout_page(image, spec, map_page_type(story_page_type))
    }

    /// Lay out a text block on a page of known type
    ///
    /// # Arguments
    /// * `image` - Loaded preview image
    /// * `spec` - Text specification (print-space sizes)
    /// * `page_type` - Which edge carries the gutter
    pub fn layout_page<I>(
        &self,
        image: &PageImage<'_, I>,
        spec: &TextSpecification,
        page_type: PageType,
    ) -> Result<RenderedOverlay>
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OverlayError::ImageNotLoaded { width, height });
        }

        let safe_zone = self.config.safe_zone.compute(width, height, page_type);
        let scale = ScaleMapper::for_image(
            width,
            image.original_width(),
            self.config.default_original_width,
        )?;

        // Font size: print space in `spec`, preview space on screen
        let print_font_size = spec
            .font_size_override()
            .unwrap_or(self.config.default_print_font_size);
        let font_size_px = scale.to_display(print_font_size);

        // An explicit width from a resize wins over the safe zone
        let max_width_px = match spec.width_override() {
            Some(pct) => width as f64 * pct / 100.0,
            None => safe_zone.width() as f64,
        };

        let font_family = spec
            .font
            .as_deref()
            .map(font_family_from_file)
            .unwrap_or_else(|| self.config.default_font_family.clone());

        let lines = self
            .wrapper
            .wrap(&spec.content, &font_family, font_size_px, max_width_px);

        let block_height = lines.len() as f64 * font_size_px * self.config.line_height;
        let (bounds_px, anchor) = self.place(
            spec,
            &safe_zone,
            width,
            height,
            max_width_px,
            block_height,
        );

        let margins_percent = match anchor {
            Anchor::Manual => None,
            _ => Some(safe_zone.to_percent_margins(width, height)),
        };

        let (color, color_source) = match spec.explicit_color() {
            Some(color) => (color, ColorSource::Explicit),
            None => {
                let region = self.sample_region(spec.position, &safe_zone, height);
                let picker = LuminancePicker::new(self.config.luminance_threshold);
                (picker.pick(image.pixels(), region), ColorSource::Sampled)
            }
        };

        let background = spec.background.map(|bg| ResolvedBackground {
            color: bg.color.unwrap_or(Rgb::WHITE),
            padding: bg
                .padding
                .unwrap_or(self.config.default_background_padding),
        });

        debug!(
            "Laid out {} line(s) on {}x{} {} page at {:?}, {:.1}px {}",
            lines.len(),
            width,
            height,
            page_type.as_str(),
            bounds_px,
            font_size_px,
            color
        );

        Ok(RenderedOverlay {
            lines,
            bounds_px,
            anchor,
            color,
            color_source,
            font_family,
            font_size_px,
            print_font_size,
            scale_factor: scale.factor(),
            line_height: self.config.line_height,
            alignment: spec.alignment,
            page_type,
            safe_zone,
            margins_percent,
            background,
        })
    }

    /// Resolve block bounds and anchoring
    fn place(
        &self,
        spec: &TextSpecification,
        safe_zone: &SafeZone,
        image_width: u32,
        image_height: u32,
        block_width: f64,
        block_height: f64,
    ) -> (PixelRect, Anchor) {
        // Dragged overlays keep their stored position verbatim
        if let Some((left_pct, top_pct)) = spec.manual_position() {
            let rect = PixelRect {
                left: image_width as f64 * left_pct / 100.0,
                top: image_height as f64 * top_pct / 100.0,
                width: block_width,
                height: block_height,
            };
            return (rect, Anchor::Manual);
        }

        let (top, anchor) = match spec.position {
            Position::Top => (safe_zone.top as f64, Anchor::Top),
            Position::Center => (
                image_height as f64 / 2.0 - block_height / 2.0,
                Anchor::Center,
            ),
            Position::Bottom => (safe_zone.bottom as f64 - block_height, Anchor::Bottom),
        };

        let rect = PixelRect {
            left: safe_zone.left as f64,
            top,
            width: block_width,
            height: block_height,
        };
        (rect, anchor)
    }

    /// Band of the page sampled for automatic color
    fn sample_region(
        &self,
        position: Position,
        safe_zone: &SafeZone,
        image_height: u32,
    ) -> SampleRegion {
        let left = safe_zone.left as f64;
        let right = safe_zone.right as f64;
        let band = self.config.sample_band_px;

        match position {
            Position::Top => {
                let top = safe_zone.top as f64;
                SampleRegion::new(left, top, right, top + band)
            }
            Position::Center => {
                let middle = image_height as f64 / 2.0;
                let half = self.config.center_sample_half_px;
                SampleRegion::new(left, middle - half, right, middle + half)
            }
            Position::Bottom => {
                let bottom = safe_zone.bottom as f64;
                SampleRegion::new(left, bottom - band, right, bottom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use text_wrap::FixedAdvanceMeasurer;

    fn renderer() -> OverlayRenderer<FixedAdvanceMeasurer> {
        OverlayRenderer::new(LayoutConfig::default(), FixedAdvanceMeasurer::new(0.5))
    }

    fn page(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    #[test]
    fn test_print_resolution_single_page() {
        let pixels = page(4096, 5461, 255);
        let image = PageImage::new(&pixels);
        let spec = TextSpecification::new("Hello world");

        let overlay = renderer().layout(&image, &spec, "single").unwrap();

        assert_eq!(overlay.scale_factor, 1.0);
        assert_eq!(overlay.font_size_px, 240.0);
        assert_eq!(
            overlay.safe_zone,
            SafeZone {
                left: 225,
                right: 3871,
                top: 225,
                bottom: 5236
            }
        );
        assert_eq!(overlay.lines.as_slice(), ["Hello world"]);
        assert_eq!(overlay.bounds_px.left, 225.0);
        assert_eq!(overlay.bounds_px.width, 3646.0);
        assert_eq!(overlay.bounds_px.height, 240.0 * 1.2);
        assert_eq!(overlay.bounds_px.bottom(), 5236.0);
        assert_eq!(overlay.anchor, Anchor::Bottom);
    }

    #[test]
    fn test_preview_scales_font() {
        let pixels = page(1200, 1600, 255);
        let image = PageImage::new(&pixels);
        let spec = TextSpecification::new("Hi");

        let overlay = renderer().layout(&image, &spec, "single").unwrap();
        assert_eq!(overlay.scale_factor, 0.29296875);
        assert!((overlay.font_size_px - 70.3125).abs() < 1e-9);
        assert_eq!(overlay.print_font_size, 240.0);
    }

    #[test]
    fn test_declared_original_width() {
        let pixels = page(1000, 1000, 255);
        let image = PageImage::new(&pixels).with_original_width(2000);
        let spec = TextSpecification::new("Hi").with_font_size(100.0);

        let overlay = renderer().layout(&image, &spec, "single").unwrap();
        assert_eq!(overlay.scale_factor, 0.5);
        assert_eq!(overlay.font_size_px, 50.0);
    }

    #[test]
    fn test_unusable_font_size_uses_default() {
        let pixels = page(1000, 1000, 255);
        let image = PageImage::new(&pixels).with_original_width(2000);
        let content = vec!["word"; 200].join(" ");

        for size in [0.0, -240.0, f64::NAN] {
            let spec = TextSpecification::new(&content).with_font_size(size);
            let overlay = renderer().layout(&image, &spec, "single").unwrap();

            assert_eq!(overlay.print_font_size, 240.0);
            assert_eq!(overlay.font_size_px, 120.0);
            assert!(overlay.lines.len() > 1);
            assert_eq!(
                overlay.bounds_px.height,
                overlay.lines.len() as f64 * 120.0 * 1.2
            );
        }
    }

    #[test]
    fn test_unloaded_image_is_error() {
        let pixels = RgbaImage::new(0, 0);
        let image = PageImage::new(&pixels);
        let err = renderer()
            .layout(&image, &TextSpecification::new("x"), "single")
            .unwrap_err();
        assert!(matches!(
            err,
            OverlayError::ImageNotLoaded {
                width: 0,
                height: 0
            }
        ));
    }

    #[test]
    fn test_top_and_center_placement() {
        let pixels = page(4096, 4096, 255);
        let image = PageImage::new(&pixels);

        let top = renderer()
            .layout(
                &image,
                &TextSpecification::new("x").with_position(Position::Top),
                "single",
            )
            .unwrap();
        assert_eq!(top.anchor, Anchor::Top);
        assert_eq!(top.bounds_px.top, 225.0);

        let center = renderer()
            .layout(
                &image,
                &TextSpecification::new("x").with_position(Position::Center),
                "single",
            )
            .unwrap();
        assert_eq!(center.anchor, Anchor::Center);
        assert_eq!(center.bounds_px.top, 2048.0 - 144.0);
    }

    #[test]
    fn test_manual_position_verbatim() {
        let pixels = page(2000, 1000, 255);
        let image = PageImage::new(&pixels).with_original_width(2000);
        let mut spec = TextSpecification::new("x");
        spec.left_percent = Some(10.0);
        spec.top_percent = Some(50.0);

        let overlay = renderer().layout(&image, &spec, "spread-start").unwrap();
        assert_eq!(overlay.anchor, Anchor::Manual);
        assert_eq!(overlay.bounds_px.left, 200.0);
        assert_eq!(overlay.bounds_px.top, 500.0);
        assert!(overlay.margins_percent.is_none());
    }

    #[test]
    fn test_width_percent_overrides_safe_zone() {
        let pixels = page(2000, 3000, 255);
        let image = PageImage::new(&pixels).with_original_width(2000);
        let mut spec = TextSpecification::new("aa bb cc dd").with_font_size(10.0);
        spec.width_percent = Some(1.5); // 30px, 6 chars at 5px

        let overlay = renderer().layout(&image, &spec, "single").unwrap();
        assert_eq!(overlay.bounds_px.width, 30.0);
        assert_eq!(overlay.lines.as_slice(), ["aa bb", "cc dd"]);
    }

    #[test]
    fn test_dark_page_gets_white_text() {
        let pixels = page(1200, 1600, 10);
        let image = PageImage::new(&pixels);
        let overlay = renderer()
            .layout(&image, &TextSpecification::new("x"), "single")
            .unwrap();
        assert_eq!(overlay.color, Rgb::WHITE);
        assert_eq!(overlay.color_source, ColorSource::Sampled);
    }

    #[test]
    fn test_explicit_color_bypasses_sampling() {
        let pixels = page(1200, 1600, 10);
        let image = PageImage::new(&pixels);
        let spec = TextSpecification::new("x").with_color(Rgb::new(200, 10, 10));
        let overlay = renderer().layout(&image, &spec, "single").unwrap();
        assert_eq!(overlay.color, Rgb::new(200, 10, 10));
        assert_eq!(overlay.color_source, ColorSource::Explicit);
    }

    #[test]
    fn test_samples_band_for_position() {
        // Dark top half, light bottom half
        let mut pixels = page(4096, 4096, 250);
        for y in 0..2048 {
            for x in 0..4096 {
                pixels.put_pixel(x, y, Rgba([5, 5, 5, 255]));
            }
        }
        let image = PageImage::new(&pixels);

        let top = renderer()
            .layout(
                &image,
                &TextSpecification::new("x").with_position(Position::Top),
                "single",
            )
            .unwrap();
        let bottom = renderer()
            .layout(&image, &TextSpecification::new("x"), "single")
            .unwrap();

        assert_eq!(top.color, Rgb::WHITE);
        assert_eq!(bottom.color, Rgb::BLACK);
    }

    #[test]
    fn test_background_defaults() {
        let pixels = page(1200, 1600, 255);
        let image = PageImage::new(&pixels);
        let mut spec = TextSpecification::new("x");
        spec.background = Some(crate::Background::default());

        let overlay = renderer().layout(&image, &spec, "single").unwrap();
        assert_eq!(
            overlay.background,
            Some(ResolvedBackground {
                color: Rgb::WHITE,
                padding: 20.0
            })
        );
    }

    #[test]
    fn test_font_file_maps_to_family() {
        let pixels = page(1200, 1600, 255);
        let image = PageImage::new(&pixels);
        let spec = TextSpecification::new("x").with_font("Quicksand-Medium.ttf");
        let overlay = renderer().layout(&image, &spec, "single").unwrap();
        assert_eq!(overlay.font_family, "Quicksand Medium");

        let overlay = renderer()
            .layout(&image, &TextSpecification::new("x"), "single")
            .unwrap();
        assert_eq!(overlay.font_family, "sans-serif");
    }

    #[test]
    fn test_print_bounds() {
        let pixels = page(1000, 1000, 255);
        let image = PageImage::new(&pixels).with_original_width(2000);
        let mut spec = TextSpecification::new("x");
        spec.left_percent = Some(10.0);
        spec.top_percent = Some(20.0);
        let overlay = renderer().layout(&image, &spec, "single").unwrap();

        let print = overlay.print_bounds();
        assert_eq!(print.left, 200.0);
        assert_eq!(print.top, 400.0);
    }

    #[test]
    fn test_does_not_mutate_spec() {
        let pixels = page(1200, 1600, 255);
        let image = PageImage::new(&pixels);
        let spec = TextSpecification::new("Hello there");
        let before = spec.clone();
        let _ = renderer().layout(&image, &spec, "single").unwrap();
        assert_eq!(spec, before);
    }
}

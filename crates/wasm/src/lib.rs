//! WASM bindings for the page overlay editor
//!
//! This crate provides JavaScript-friendly API for:
//! - Safe zone and scale factor math
//! - Laying out a text overlay on a loaded preview image
//! - An editor session holding global defaults and page overrides
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { OverlayLayout, EditorSession } from 'overlay-wasm';
//!
//! await init();
//!
//! const ctx = canvas.getContext('2d');
//! const layout = new OverlayLayout();
//! layout.setMeasure((text, family, size) => {
//!   ctx.font = `${size}px ${family}`;
//!   return ctx.measureText(text).width;
//! });
//!
//! const session = EditorSession.fromJson(storyJson);
//! const { data, width, height } = ctx.getImageData(0, 0, w, h);
//! const overlay = session.layoutPage(3, layout, data, width, height, 4096);
//!
//! // Persist edits, then export
//! session.moveOverlay(3, 12.5, 70);
//! const patch = session.exportJson(4096, width);
//! ```

use image::RgbaImage;
use js_sys::Function;
use overlay::{LayoutConfig, OverlayRenderer, PageImage, TextSpecification};
use page_core::{map_page_type, PageType, SafeZoneConfig, ScaleMapper};
use serde::Serialize;
use text_wrap::{FontBook, TextMeasurer};
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Accept either a layout page type or a story page type
fn page_type_from_str(value: &str) -> PageType {
    match value {
        "spread-left" => PageType::SpreadLeft,
        "spread-right" => PageType::SpreadRight,
        other => map_page_type(other),
    }
}

/// Serialize maps as plain objects so results read like JSON
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// A spec given either as a JSON string or as a plain object
fn spec_from_js(spec: JsValue) -> Result<TextSpecification, JsValue> {
    match spec.as_string() {
        Some(json) => {
            overlay::parse_text_spec(&json).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        None => Ok(serde_wasm_bindgen::from_value(spec)?),
    }
}

fn page_pixels(rgba: &[u8], width: u32, height: u32) -> Result<RgbaImage, JsValue> {
    RgbaImage::from_raw(width, height, rgba.to_vec()).ok_or_else(|| {
        JsValue::from_str(&format!(
            "RGBA buffer of {} bytes does not match {}x{}",
            rgba.len(),
            width,
            height
        ))
    })
}

/// Map a story page type to a layout page type
///
/// @param storyType - "single", "spread-start" or "spread-companion"
/// @returns "single", "spread-left" or "spread-right"
#[wasm_bindgen(js_name = mapPageType)]
pub fn map_page_type_js(story_type: &str) -> String {
    map_page_type(story_type).as_str().to_string()
}

/// @param originalWidth - Print image width
/// @param displayWidth - Preview image width
/// @returns displayWidth / originalWidth
#[wasm_bindgen(js_name = computeScaleFactor)]
pub fn compute_scale_factor(original_width: u32, display_width: u32) -> Result<f64, JsValue> {
    page_core::compute_scale_factor(original_width, display_width)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(js_name = toDisplaySize)]
pub fn to_display_size(print_value: f64, scale_factor: f64) -> f64 {
    page_core::to_display_size(print_value, scale_factor)
}

#[wasm_bindgen(js_name = toPrintSize)]
pub fn to_print_size(display_value: f64, scale_factor: f64) -> f64 {
    page_core::to_print_size(display_value, scale_factor)
}

/// Safe zone calculation
#[wasm_bindgen]
pub struct SafeZones;

#[wasm_bindgen]
impl SafeZones {
    /// Compute the safe zone of an image
    ///
    /// @param width - Image width in pixels
    /// @param height - Image height in pixels
    /// @param pageType - Layout or story page type
    /// @param dpi - Print DPI (default 300)
    /// @returns { left, right, top, bottom }
    pub fn compute(
        width: u32,
        height: u32,
        page_type: &str,
        dpi: Option<u32>,
    ) -> Result<JsValue, JsValue> {
        let config = dpi.map(SafeZoneConfig::with_dpi).unwrap_or_default();
        to_js(&config.compute(width, height, page_type_from_str(page_type)))
    }

    /// Safe zone margins as percentages of the image
    ///
    /// @returns { left, right, top, bottom } in percent
    #[wasm_bindgen(js_name = percentMargins)]
    pub fn percent_margins(
        width: u32,
        height: u32,
        page_type: &str,
        dpi: Option<u32>,
    ) -> Result<JsValue, JsValue> {
        let config = dpi.map(SafeZoneConfig::with_dpi).unwrap_or_default();
        let zone = config.compute(width, height, page_type_from_str(page_type));
        to_js(&zone.to_percent_margins(width, height))
    }
}

/// Measures with the JS callback, falling back to loaded fonts
struct JsMeasurer<'a> {
    callback: Option<&'a Function>,
    fonts: &'a FontBook,
}

impl TextMeasurer for JsMeasurer<'_> {
    fn measure_text_width(&self, text: &str, font_family: &str, font_size_px: f64) -> f64 {
        if let Some(callback) = self.callback {
            let measured = callback.call3(
                &JsValue::NULL,
                &JsValue::from_str(text),
                &JsValue::from_str(font_family),
                &JsValue::from_f64(font_size_px),
            );
            if let Some(width) = measured.ok().and_then(|v| v.as_f64()) {
                if width.is_finite() && width >= 0.0 {
                    return width;
                }
            }
        }
        self.fonts.measure_text_width(text, font_family, font_size_px)
    }
}

/// Overlay layout engine
#[wasm_bindgen]
pub struct OverlayLayout {
    config: LayoutConfig,
    fonts: FontBook,
    measure: Option<Function>,
}

#[wasm_bindgen]
impl OverlayLayout {
    /// Create a layout engine
    ///
    /// @param configJson - Optional partial LayoutConfig JSON
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<OverlayLayout, JsValue> {
        let config = match config_json {
            Some(json) => {
                LayoutConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => LayoutConfig::default(),
        };

        Ok(OverlayLayout {
            config,
            fonts: FontBook::new(),
            measure: None,
        })
    }

    /// Set the text measurement callback
    ///
    /// @param measure - (text, family, sizePx) => width in pixels
    #[wasm_bindgen(js_name = setMeasure)]
    pub fn set_measure(&mut self, measure: Function) {
        self.measure = Some(measure);
    }

    /// Load a TrueType font used when no callback is set or it fails
    ///
    /// @param family - Font family name
    /// @param data - TTF file bytes (Uint8Array)
    #[wasm_bindgen(js_name = loadFont)]
    pub fn load_font(&mut self, family: &str, data: &[u8]) -> Result<(), JsValue> {
        self.fonts
            .register(family, data.to_vec())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setDefaultFamily)]
    pub fn set_default_family(&mut self, family: &str) {
        self.fonts.set_default_family(family);
    }

    /// Current configuration as an object
    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_js(&self.config)
    }

    /// Lay out a text block on a loaded image
    ///
    /// @param rgba - Image pixels (Uint8Array / ImageData.data)
    /// @param width - Image natural width
    /// @param height - Image natural height
    /// @param originalWidth - Print width, if known (default 4096)
    /// @param spec - Text specification (JSON string or object)
    /// @param pageType - Story page type
    /// @returns Rendered overlay object
    pub fn layout(
        &self,
        rgba: &[u8],
        width: u32,
        height: u32,
        original_width: Option<u32>,
        spec: JsValue,
        page_type: &str,
    ) -> Result<JsValue, JsValue> {
        let spec = spec_from_js(spec)?;
        let pixels = page_pixels(rgba, width, height)?;
        let page = with_original_width(PageImage::new(&pixels), original_width);

        let overlay = self
            .renderer()
            .layout_page(&page, &spec, page_type_from_str(page_type))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&overlay)
    }
}

impl OverlayLayout {
    fn renderer(&self) -> OverlayRenderer<JsMeasurer<'_>> {
        OverlayRenderer::new(
            self.config.clone(),
            JsMeasurer {
                callback: self.measure.as_ref(),
                fonts: &self.fonts,
            },
        )
    }
}

fn with_original_width<'a>(
    page: PageImage<'a, RgbaImage>,
    original_width: Option<u32>,
) -> PageImage<'a, RgbaImage> {
    match original_width {
        Some(width) => page.with_original_width(width),
        None => page,
    }
}

/// Editor session for one book
#[wasm_bindgen(js_name = EditorSession)]
pub struct Session {
    inner: overlay::EditorSession,
}

#[wasm_bindgen(js_class = EditorSession)]
impl Session {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Session {
        Session {
            inner: overlay::EditorSession::new(),
        }
    }

    /// Create a session from a story page configuration
    ///
    /// @param json - `{ globalDefaults?, pages: [{ pageNumber, type, text }] }`
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<Session, JsValue> {
        let config =
            overlay::parse_page_config(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Session {
            inner: config.to_session(),
        })
    }

    /// Global defaults as an object
    pub fn globals(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.globals())
    }

    #[wasm_bindgen(js_name = setGlobals)]
    pub fn set_globals(&mut self, globals: JsValue) -> Result<(), JsValue> {
        *self.inner.globals_mut() = serde_wasm_bindgen::from_value(globals)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setPageText)]
    pub fn set_page_text(
        &mut self,
        page: u32,
        page_type: &str,
        spec: JsValue,
    ) -> Result<(), JsValue> {
        let spec = spec_from_js(spec)?;
        self.inner.set_page_text(page, page_type, spec);
        Ok(())
    }

    /// Stored page specification, or undefined
    #[wasm_bindgen(js_name = pageSpec)]
    pub fn page_spec(&self, page: u32) -> Result<JsValue, JsValue> {
        match self.inner.page_spec(page) {
            Some(spec) => to_js(spec),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Page specification with global defaults applied
    #[wasm_bindgen(js_name = effectiveSpec)]
    pub fn effective_spec(&self, page: u32) -> Result<JsValue, JsValue> {
        let spec = self
            .inner
            .effective_spec(page)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&spec)
    }

    #[wasm_bindgen(js_name = setDisplayFontSize)]
    pub fn set_display_font_size(
        &mut self,
        page: u32,
        display_size: f64,
        scale: f64,
    ) -> Result<(), JsValue> {
        self.inner
            .set_display_font_size(page, display_size, scale)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setGlobalDisplayFontSize)]
    pub fn set_global_display_font_size(
        &mut self,
        display_size: f64,
        scale: f64,
    ) -> Result<(), JsValue> {
        self.inner
            .set_global_display_font_size(display_size, scale)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = moveOverlay)]
    pub fn move_overlay(
        &mut self,
        page: u32,
        left_percent: f64,
        top_percent: f64,
    ) -> Result<(), JsValue> {
        self.inner
            .move_overlay(page, left_percent, top_percent)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = resizeOverlay)]
    pub fn resize_overlay(
        &mut self,
        page: u32,
        width_percent: f64,
        left_percent: f64,
        top_percent: f64,
    ) -> Result<(), JsValue> {
        self.inner
            .resize_overlay(page, width_percent, left_percent, top_percent)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = resetToGlobal)]
    pub fn reset_to_global(&mut self, page: u32) -> Result<(), JsValue> {
        self.inner
            .reset_to_global(page)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Lay out a page with its effective specification
    #[wasm_bindgen(js_name = layoutPage)]
    pub fn layout_page(
        &self,
        page: u32,
        layout: &OverlayLayout,
        rgba: &[u8],
        width: u32,
        height: u32,
        original_width: Option<u32>,
    ) -> Result<JsValue, JsValue> {
        let pixels = page_pixels(rgba, width, height)?;
        let image = with_original_width(PageImage::new(&pixels), original_width);
        let overlay = self
            .inner
            .layout_page(page, &layout.renderer(), &image)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&overlay)
    }

    /// Export text settings as pretty JSON
    ///
    /// @param originalWidth - Print image width, if known
    /// @param previewWidth - Preview image width, if known
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(
        &self,
        original_width: Option<u32>,
        preview_width: Option<u32>,
    ) -> Result<String, JsValue> {
        let scale = match (original_width, preview_width) {
            (Some(original), Some(preview)) => Some(
                ScaleMapper::new(original, preview).map_err(|e| JsValue::from_str(&e.to_string()))?,
            ),
            _ => None,
        };

        self.inner
            .export_text_settings(scale.as_ref())
            .to_json_pretty()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

//! Editor session state
//!
//! Holds global style defaults and per-page text specifications for one
//! open book. Layout never writes into the session; user edits are
//! applied through the explicit methods here.

use crate::renderer::{OverlayRenderer, PageImage, RenderedOverlay};
use crate::schema::{ColorSpec, Position, TextSpecification};
use crate::{OverlayError, Result};
use image::{GenericImageView, Pixel};
use page_core::{check_scale_factor, to_print_size, Rgb, ScaleMapper};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use text_wrap::TextMeasurer;

/// How page text picks its color when it sets none
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Manual,
}

/// Style applied to pages that do not override it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalDefaults {
    /// Font file name
    pub font: Option<String>,
    /// Print font size
    pub font_size: f64,
    /// Preview font size shown in the editor
    pub display_font_size: f64,
    pub color_mode: ColorMode,
    pub manual_color: Rgb,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 240.0,
            display_font_size: 70.0,
            color_mode: ColorMode::Auto,
            manual_color: Rgb::BLACK,
        }
    }
}

impl GlobalDefaults {
    /// The global color when manual mode is on
    pub fn color(&self) -> Option<Rgb> {
        match self.color_mode {
            ColorMode::Manual => Some(self.manual_color),
            ColorMode::Auto => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PageState {
    story_type: String,
    spec: TextSpecification,
}

/// One book's editing context
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    globals: GlobalDefaults,
    pages: BTreeMap<u32, PageState>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_globals(globals: GlobalDefaults) -> Self {
        Self {
            globals,
            pages: BTreeMap::new(),
        }
    }

    pub fn globals(&self) -> &GlobalDefaults {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut GlobalDefaults {
        &mut self.globals
    }

    /// Set or replace the text of a page
    ///
    /// `story_type` is the page type in story vocabulary
    /// (`single`, `spread-start`, `spread-companion`).
    pub fn set_page_text(&mut self, page: u32, story_type: &str, spec: TextSpecification) {
        self.pages.insert(
            page,
            PageState {
                story_type: story_type.to_string(),
                spec,
            },
        );
    }

    pub fn remove_page(&mut self, page: u32) -> Option<TextSpecification> {
        self.pages.remove(&page).map(|state| state.spec)
    }

    /// Stored specification, without cascading
    pub fn page_spec(&self, page: u32) -> Option<&TextSpecification> {
        self.pages.get(&page).map(|state| &state.spec)
    }

    pub fn page_type(&self, page: u32) -> Option<&str> {
        self.pages.get(&page).map(|state| state.story_type.as_str())
    }

    /// Page numbers in ascending order
    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn state_mut(&mut self, page: u32) -> Result<&mut PageState> {
        self.pages
            .get_mut(&page)
            .ok_or(OverlayError::PageNotFound(page))
    }

    /// Specification with the global defaults cascaded in
    ///
    /// A page marked `useGlobal` takes font, size and color from the
    /// globals. Otherwise its own values win and the globals fill gaps.
    pub fn effective_spec(&self, page: u32) -> Result<TextSpecification> {
        let state = self
            .pages
            .get(&page)
            .ok_or(OverlayError::PageNotFound(page))?;
        let mut spec = state.spec.clone();
        let globals = &self.globals;

        if spec.use_global {
            spec.font = globals.font.clone();
            spec.font_size = Some(globals.font_size);
            spec.color = globals.color().map(ColorSpec::Rgb);
        } else {
            if spec.font.is_none() {
                spec.font = globals.font.clone();
            }
            if spec.font_size_override().is_none() {
                spec.font_size = Some(globals.font_size);
            }
            if spec.color.is_none() {
                spec.color = globals.color().map(ColorSpec::Rgb);
            }
        }

        Ok(spec)
    }

    /// Lay out a page using its cascaded specification
    pub fn layout_page<M, I>(
        &self,
        page: u32,
        renderer: &OverlayRenderer<M>,
        image: &PageImage<'_, I>,
    ) -> Result<RenderedOverlay>
    where
        M: TextMeasurer,
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        let spec = self.effective_spec(page)?;
        let story_type = self.page_type(page).unwrap_or("single");
        renderer.layout(image, &spec, story_type)
    }

    /// Store a preview font size picked by the user, with its print size
    ///
    /// The page is left untouched when the size or scale is rejected.
    pub fn set_display_font_size(
        &mut self,
        page: u32,
        display_size: f64,
        scale: f64,
    ) -> Result<()> {
        let print_size = print_font_size(display_size, scale)?;
        let state = self.state_mut(page)?;
        state.spec.display_font_size = Some(display_size);
        state.spec.font_size = Some(print_size);
        state.spec.use_global = false;
        Ok(())
    }

    /// Store a global preview font size, with its print size
    pub fn set_global_display_font_size(&mut self, display_size: f64, scale: f64) -> Result<()> {
        let print_size = print_font_size(display_size, scale)?;
        self.globals.display_font_size = display_size;
        self.globals.font_size = print_size;
        Ok(())
    }

    pub fn set_page_font(&mut self, page: u32, font: &str) -> Result<()> {
        let state = self.state_mut(page)?;
        state.spec.font = Some(font.to_string());
        state.spec.use_global = false;
        Ok(())
    }

    /// Set or clear (automatic) the color of a page
    pub fn set_page_color(&mut self, page: u32, color: Option<Rgb>) -> Result<()> {
        let state = self.state_mut(page)?;
        state.spec.color = color.map(ColorSpec::Rgb);
        state.spec.use_global = false;
        Ok(())
    }

    pub fn set_position(&mut self, page: u32, position: Position) -> Result<()> {
        self.state_mut(page)?.spec.position = position;
        Ok(())
    }

    /// Persist the result of a drag
    pub fn move_overlay(&mut self, page: u32, left_percent: f64, top_percent: f64) -> Result<()> {
        let spec = &mut self.state_mut(page)?.spec;
        spec.left_percent = Some(left_percent);
        spec.top_percent = Some(top_percent);
        Ok(())
    }

    /// Persist the result of a resize
    pub fn resize_overlay(
        &mut self,
        page: u32,
        width_percent: f64,
        left_percent: f64,
        top_percent: f64,
    ) -> Result<()> {
        let spec = &mut self.state_mut(page)?.spec;
        spec.width_percent = Some(width_percent);
        spec.left_percent = Some(left_percent);
        spec.top_percent = Some(top_percent);
        Ok(())
    }

    /// Drop the page's style overrides and follow the globals again
    pub fn reset_to_global(&mut self, page: u32) -> Result<()> {
        let spec = &mut self.state_mut(page)?.spec;
        spec.font = None;
        spec.font_size = None;
        spec.display_font_size = None;
        spec.color = None;
        spec.use_global = true;
        Ok(())
    }

    /// Build the text settings export
    ///
    /// `scale` describes the preview images, when known, and is recorded
    /// in the metadata.
    pub fn export_text_settings(&self, scale: Option<&ScaleMapper>) -> TextSettingsExport {
        let pages: Vec<ExportedPage> = self
            .pages
            .iter()
            .map(|(number, state)| ExportedPage {
                page_number: *number,
                text: ExportedText::from_spec(&state.spec),
            })
            .collect();

        let pages_with_overrides = pages
            .iter()
            .filter(|p| p.text.has_overrides())
            .count();

        TextSettingsExport {
            global_defaults: ExportedGlobals {
                font: self.globals.font.clone(),
                font_size: self.globals.font_size,
                color: self.globals.color(),
            },
            metadata: ExportMetadata {
                total_pages: pages.len(),
                pages_with_overrides,
                pages_using_global: pages.len() - pages_with_overrides,
                scale_factor: scale.map(ScaleMapper::factor),
                original_image_width: scale.map(ScaleMapper::original_width),
                preview_image_width: scale.map(ScaleMapper::display_width),
            },
            pages,
        }
    }
}

/// Print size for a preview size, rejecting sizes and scales that would
/// store a non-finite or non-positive font size
fn print_font_size(display_size: f64, scale: f64) -> Result<f64> {
    let scale = check_scale_factor(scale)?;
    if !(display_size.is_finite() && display_size > 0.0) {
        return Err(OverlayError::InvalidConfig(format!(
            "display font size must be positive, got {display_size}"
        )));
    }
    Ok(to_print_size(display_size, scale))
}

/// Text settings for merging back into the story configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSettingsExport {
    pub global_defaults: ExportedGlobals,
    pub pages: Vec<ExportedPage>,
    #[serde(rename = "_metadata")]
    pub metadata: ExportMetadata,
}

impl TextSettingsExport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedGlobals {
    pub font: Option<String>,
    pub font_size: f64,
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedPage {
    pub page_number: u32,
    pub text: ExportedText,
}

/// Page text as exported: style only when the page overrides the globals,
/// position only when it differs from the default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedText {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_percent: Option<f64>,
}

impl ExportedText {
    /// True when the page sets its own font, size or RGB color
    ///
    /// A string color such as `"auto"` leaves automatic coloring on and
    /// does not count.
    pub fn has_overrides(&self) -> bool {
        self.font.is_some()
            || self.font_size.is_some()
            || self.color.as_ref().and_then(ColorSpec::explicit).is_some()
    }

    fn from_spec(spec: &TextSpecification) -> Self {
        let overrides = !spec.use_global;
        Self {
            content: spec.content.clone(),
            font: spec.font.clone().filter(|_| overrides),
            font_size: spec.font_size.filter(|_| overrides),
            color: spec.color.clone().filter(|_| overrides),
            position: Some(spec.position).filter(|p| *p != Position::Bottom),
            width_percent: spec.width_override(),
            left_percent: spec.left_percent,
            top_percent: spec.top_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub total_pages: usize,
    pub pages_with_overrides: usize,
    pub pages_using_global: usize,
    pub scale_factor: Option<f64>,
    pub original_image_width: Option<u32>,
    pub preview_image_width: Option<u32>,
}

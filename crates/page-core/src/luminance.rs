//! Background luminance sampling for automatic text color

use crate::Rgb;
use image::{GenericImageView, Pixel};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Average luma below which text is drawn white
pub const LUMINANCE_THRESHOLD: f64 = 128.0;

/// Luma reported for a region with no pixels ("assume a light background")
pub const EMPTY_REGION_LUMA: f64 = 255.0;

/// Rectangle to sample, in image pixels
///
/// Coordinates may be fractional or fall outside the image; they are
/// clamped before sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRegion {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl SampleRegion {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Clamp to `width` x `height`, returning `(left, top, right, bottom)`
    /// or `None` when nothing remains
    fn clamp(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let left = self.left.floor().max(0.0);
        let top = self.top.floor().max(0.0);
        let right = self.right.ceil().min(width as f64);
        let bottom = self.bottom.ceil().min(height as f64);

        if right.is_nan() || bottom.is_nan() || right <= left || bottom <= top {
            return None;
        }

        Some((left as u32, top as u32, right as u32, bottom as u32))
    }
}

/// Average luma (`0.299 R + 0.587 G + 0.114 B`) over a region
///
/// Returns [`EMPTY_REGION_LUMA`] when the clamped region is empty.
pub fn average_luminance<I>(image: &I, region: SampleRegion) -> f64
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    let Some((left, top, right, bottom)) = region.clamp(width, height) else {
        debug!("Empty luminance region {:?}, assuming light background", region);
        return EMPTY_REGION_LUMA;
    };

    let mut total = 0.0;
    for y in top..bottom {
        for x in left..right {
            let [r, g, b] = image.get_pixel(x, y).to_rgb().0;
            total += Rgb::new(r, g, b).luma();
        }
    }

    let pixels = (right - left) as f64 * (bottom - top) as f64;
    total / pixels
}

/// Picks black or white text from background brightness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LuminancePicker {
    threshold: f64,
}

impl LuminancePicker {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Text color for a background of the given average luma
    pub fn color_for_luma(&self, luma: f64) -> Rgb {
        if luma < self.threshold {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        }
    }

    /// Sample `region` of `image` and return a contrasting text color
    pub fn pick<I>(&self, image: &I, region: SampleRegion) -> Rgb
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        self.color_for_luma(average_luminance(image, region))
    }
}

impl Default for LuminancePicker {
    fn default() -> Self {
        Self::new(LUMINANCE_THRESHOLD)
    }
}

/// Pick a contrasting text color with the standard threshold
pub fn pick_text_color<I>(image: &I, region: SampleRegion) -> Rgb
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    LuminancePicker::default().pick(image, region)
}

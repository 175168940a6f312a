//! Human-readable caption under barcodes.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::{EngineError, Result};

/// Default caption size in pixels.
pub const DEFAULT_CAPTION_SIZE: f32 = 32.0;

/// Gap between the bars and the caption, and below the caption.
pub const CAPTION_MARGIN: u32 = 8;

/// A loaded font used to print the encoded data under a barcode.
pub struct CaptionFont {
    font: FontVec,
    scale: PxScale,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont")
            .field("scale", &self.scale.y)
            .finish_non_exhaustive()
    }
}

impl CaptionFont {
    /// Load a TTF/OTF font from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
            .map_err(|e| EngineError::Font(format!("{}: {e}", path.display())))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(bytes).map_err(|e| EngineError::Font(e.to_string()))?;
        Ok(Self {
            font,
            scale: PxScale::from(DEFAULT_CAPTION_SIZE),
        })
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.scale = PxScale::from(size);
        self
    }

    /// Return a copy of `bars` extended downwards with `text` centered below it.
    pub fn append_caption(&self, bars: &GrayImage, text: &str) -> GrayImage {
        let (text_w, text_h) = text_size(self.scale, &self.font, text);
        let width = bars.width().max(text_w + 2 * CAPTION_MARGIN);
        let height = bars.height() + text_h + 2 * CAPTION_MARGIN;

        let mut img = GrayImage::from_pixel(width, height, Luma([255u8]));
        let bars_x = (width - bars.width()) / 2;
        for (x, y, pixel) in bars.enumerate_pixels() {
            img.put_pixel(bars_x + x, y, *pixel);
        }

        let text_x = ((width - text_w) / 2) as i32;
        let text_y = (bars.height() + CAPTION_MARGIN) as i32;
        draw_text_mut(
            &mut img,
            Luma([0u8]),
            text_x,
            text_y,
            self.scale,
            &self.font,
            text,
        );
        img
    }
}

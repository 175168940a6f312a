//! Code128 barcode rasterization.

use barcoders::sym::code128::Code128;
use image::{GrayImage, Luma};

use crate::caption::CaptionFont;
use crate::{EngineError, Result};

/// Pixels per narrow bar module.
pub const BAR_MODULE_PX: u32 = 3;

/// Height of the bars in pixels (caption excluded).
pub const BAR_HEIGHT_PX: u32 = 150;

/// Light margin left and right of the bars, in modules.
pub const BAR_QUIET_ZONE: u32 = 10;

/// Punctuation accepted next to ASCII letters and digits.
pub const CODE128_PUNCTUATION: &str = " -$./+%";

// barcoders selects the Code128 character set from a leading marker char.
const CODE_SET_B: char = 'Ɓ';

/// Whether `data` only uses the characters the catalog prints as Code128.
///
/// The encoder accepts more than this; the restriction keeps labels readable
/// by common handheld scanners.
pub fn is_code128_safe(data: &str) -> bool {
    !data.is_empty()
        && data
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || CODE128_PUNCTUATION.contains(c))
}

/// Encode `data` into Code128 modules (`1` = bar, `0` = space).
pub fn encode_code128(data: &str) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(EngineError::Encode("Code128 data is empty".into()));
    }
    let barcode = Code128::new(format!("{CODE_SET_B}{data}"))
        .map_err(|e| EngineError::Encode(format!("Code128 encode error: {e:?}")))?;
    Ok(barcode.encode())
}

/// Encode `data` as Code128 and rasterize it, with an optional caption
/// of the data printed under the bars.
pub fn render_code128(data: &str, caption: Option<&CaptionFont>) -> Result<GrayImage> {
    let modules = encode_code128(data)?;
    let width = (modules.len() as u32 + 2 * BAR_QUIET_ZONE) * BAR_MODULE_PX;

    let mut bars = GrayImage::from_pixel(width, BAR_HEIGHT_PX, Luma([255u8]));
    for (i, module) in modules.iter().enumerate() {
        if *module == 0 {
            continue;
        }
        let x0 = (i as u32 + BAR_QUIET_ZONE) * BAR_MODULE_PX;
        for x in x0..x0 + BAR_MODULE_PX {
            for y in 0..BAR_HEIGHT_PX {
                bars.put_pixel(x, y, Luma([0u8]));
            }
        }
    }

    match caption {
        Some(font) => Ok(font.append_caption(&bars, data)),
        None => Ok(bars),
    }
}

/// Sample a rendered barcode back into its module sequence.
///
/// Reads the middle row of the bar area; returns `None` when the width does
/// not match the geometry `render_code128` produces.
pub fn read_code128_modules(img: &GrayImage) -> Option<Vec<u8>> {
    if img.height() < BAR_HEIGHT_PX || img.width() % BAR_MODULE_PX != 0 {
        return None;
    }
    let module_count = (img.width() / BAR_MODULE_PX).checked_sub(2 * BAR_QUIET_ZONE)?;
    let y = BAR_HEIGHT_PX / 2;

    let modules = (0..module_count)
        .map(|i| {
            let x = (i + BAR_QUIET_ZONE) * BAR_MODULE_PX + BAR_MODULE_PX / 2;
            u8::from(img.get_pixel(x, y)[0] < 128)
        })
        .collect();
    Some(modules)
}

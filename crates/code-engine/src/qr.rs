//! QR symbol rasterization.

use image::{GrayImage, Luma};
use qrcode::QrCode;

use crate::{EngineError, Result};

/// Pixels per QR module.
pub const QR_MODULE_PX: u32 = 10;

/// Light border around the symbol, in modules.
pub const QR_QUIET_ZONE: u32 = 4;

/// Encode `data` as a QR symbol and rasterize it.
///
/// Version and error correction are picked by the encoder to fit the data.
/// The result is square: `(modules + 2 * QR_QUIET_ZONE) * QR_MODULE_PX` pixels.
pub fn render_qr(data: &str) -> Result<GrayImage> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| EngineError::Encode(format!("QR encode error: {e}")))?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;

    let img_size = (module_count + 2 * QR_QUIET_ZONE) * QR_MODULE_PX;
    let mut img = GrayImage::from_pixel(img_size, img_size, Luma([255u8]));

    for (i, color) in modules.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let x = ((i as u32) % module_count + QR_QUIET_ZONE) * QR_MODULE_PX;
        let y = ((i as u32) / module_count + QR_QUIET_ZONE) * QR_MODULE_PX;

        for dx in 0..QR_MODULE_PX {
            for dy in 0..QR_MODULE_PX {
                img.put_pixel(x + dx, y + dy, Luma([0u8]));
            }
        }
    }

    Ok(img)
}

/// Sample a rendered QR image back into its module grid (`true` = dark).
///
/// Returns `None` when the image does not have the geometry `render_qr` produces.
pub fn read_qr_modules(img: &GrayImage) -> Option<Vec<bool>> {
    if img.width() != img.height() || img.width() % QR_MODULE_PX != 0 {
        return None;
    }
    let total = img.width() / QR_MODULE_PX;
    let module_count = total.checked_sub(2 * QR_QUIET_ZONE)?;

    let half = QR_MODULE_PX / 2;
    let mut grid = Vec::with_capacity((module_count * module_count) as usize);
    for y in 0..module_count {
        for x in 0..module_count {
            let px = (x + QR_QUIET_ZONE) * QR_MODULE_PX + half;
            let py = (y + QR_QUIET_ZONE) * QR_MODULE_PX + half;
            grid.push(img.get_pixel(px, py)[0] < 128);
        }
    }
    Some(grid)
}

//! QR encoding: text payload → module grid → RGBA raster.
//!
//! The symbol is always built at error-correction level H, at the smallest
//! version that holds the payload. Rasterisation paints each dark module as a
//! `box_size × box_size` black block on an opaque white canvas, with a quiet
//! zone of `border` modules on every side:
//!
//! ```text
//! side_px = (modules + 2 × border) × box_size      modules = 4 × version + 17
//! ```
//!
//! A symbol whose raster would exceed `max_side` pixels is refused before the
//! canvas is allocated.

use crate::error::QrLogoError;
use crate::request::validate_payload;
use image::{Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode, Version};
use tracing::debug;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A rasterised QR symbol plus the facts about how it was built.
#[derive(Debug, Clone)]
pub struct QrRaster {
    pub image: RgbaImage,
    /// Symbol version, 1–40.
    pub version: i16,
    /// Modules per side, excluding the quiet zone.
    pub modules: u32,
}

/// Encode `payload` at level H into a module grid.
pub fn encode_modules(payload: &str) -> Result<QrCode, QrLogoError> {
    validate_payload(payload)?;
    QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H).map_err(|e| {
        QrLogoError::DataTooLong {
            detail: format!("{e} ({} bytes at error correction level H)", payload.len()),
        }
    })
}

/// Pixel side of the raster for a `modules`-wide symbol.
pub fn raster_side(modules: u32, box_size: u32, border: u32) -> u64 {
    (modules as u64 + 2 * border as u64) * box_size as u64
}

/// Paint a module grid onto an opaque RGBA canvas.
pub fn rasterize(code: &QrCode, box_size: u32, border: u32) -> RgbaImage {
    let modules = code.width() as u32;
    let side = (modules + 2 * border) * box_size;
    let mut img = RgbaImage::from_pixel(side, side, LIGHT);

    for (i, color) in code.to_colors().iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = (i as u32) % modules;
        let my = (i as u32) / modules;
        let x0 = (mx + border) * box_size;
        let y0 = (my + border) * box_size;
        for y in y0..y0 + box_size {
            for x in x0..x0 + box_size {
                img.put_pixel(x, y, DARK);
            }
        }
    }

    img
}

/// Encode and rasterise in one step, refusing rasters wider than `max_side`.
pub fn encode_qr(
    payload: &str,
    box_size: u32,
    border: u32,
    max_side: u32,
) -> Result<QrRaster, QrLogoError> {
    let code = encode_modules(payload)?;
    let version = match code.version() {
        Version::Normal(v) | Version::Micro(v) => v,
    };
    let modules = code.width() as u32;
    let side = raster_side(modules, box_size, border);
    if side > max_side as u64 {
        return Err(QrLogoError::DataTooLong {
            detail: format!(
                "version {version} needs a {side}px image at box size {box_size}, above the {max_side}px limit"
            ),
        });
    }
    let image = rasterize(&code, box_size, border);
    debug!(
        "QR version {} ({}x{} modules) → {}x{} px",
        version,
        modules,
        modules,
        image.width(),
        image.height()
    );
    Ok(QrRaster {
        image,
        version,
        modules,
    })
}

//! Logo placement: square, cap, center, and paste onto the QR raster.
//!
//! A non-square logo is shrunk to `min(w, h)` on both axes. It is never
//! cropped or padded, so a wide logo comes out horizontally squeezed. The
//! squared logo is then capped at a quarter of the QR side.
//!
//! The paste uses the logo's own alpha as the mask, per channel:
//!
//! ```text
//! out = src × a + dst × (1 − a)        a = src.alpha / 255
//! ```
//!
//! so fully transparent logo pixels leave the modules underneath untouched.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The logo may be at most `1 / LOGO_DIVISOR` of the QR side.
pub const LOGO_DIVISOR: u32 = 4;

/// Where and how large the logo ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoPlacement {
    /// Side of the (square) pasted logo, in pixels.
    pub size: u32,
    pub x: u32,
    pub y: u32,
}

/// Resize to `min(w, h)` on both axes with a Lanczos3 filter.
pub fn square(logo: &RgbaImage) -> RgbaImage {
    let size = logo.width().min(logo.height());
    resize_square(logo, size)
}

/// Largest logo side allowed on a QR raster of the given dimensions.
pub fn max_logo_size(qr_width: u32, qr_height: u32) -> u32 {
    (qr_width.min(qr_height) / LOGO_DIVISOR).max(1)
}

/// Shrink an already-square logo to `max_size` if it is wider than that.
pub fn cap(logo: RgbaImage, max_size: u32) -> RgbaImage {
    if logo.width() > max_size {
        resize_square(&logo, max_size)
    } else {
        logo
    }
}

/// Top-left offset that centers a `logo` box inside a `qr` box (floor division).
pub fn center_offset(qr: (u32, u32), logo: (u32, u32)) -> (u32, u32) {
    (
        qr.0.saturating_sub(logo.0) / 2,
        qr.1.saturating_sub(logo.1) / 2,
    )
}

/// Blend `src` onto `dst` at `(x, y)` using `src`'s alpha channel as mask.
///
/// All four channels are blended, including alpha. Pixels falling outside
/// `dst` are skipped.
pub fn paste_with_alpha_mask(dst: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
    for (sx, sy, s) in src.enumerate_pixels() {
        let (dx, dy) = (x + sx, y + sy);
        if dx >= dst.width() || dy >= dst.height() {
            continue;
        }
        let m = s.0[3] as u32;
        match m {
            0 => {}
            255 => dst.put_pixel(dx, dy, *s),
            _ => {
                let d = dst.get_pixel_mut(dx, dy);
                for c in 0..4 {
                    d.0[c] = ((s.0[c] as u32 * m + d.0[c] as u32 * (255 - m) + 127) / 255) as u8;
                }
            }
        }
    }
}

/// Square, cap and center `logo`, then paste it onto `qr` in place.
pub fn embed_logo(qr: &mut RgbaImage, logo: &RgbaImage) -> LogoPlacement {
    let squared = square(logo);
    let capped = cap(squared, max_logo_size(qr.width(), qr.height()));
    let (x, y) = center_offset(qr.dimensions(), capped.dimensions());

    paste_with_alpha_mask(qr, &capped, x, y);

    debug!(
        "Logo {}x{} → {}px square at ({}, {}) on {}x{} QR",
        logo.width(),
        logo.height(),
        capped.width(),
        x,
        y,
        qr.width(),
        qr.height()
    );

    LogoPlacement {
        size: capped.width(),
        x,
        y,
    }
}

fn resize_square(img: &RgbaImage, size: u32) -> RgbaImage {
    if img.dimensions() == (size, size) {
        return img.clone();
    }
    imageops::resize(img, size, size, FilterType::Lanczos3)
}

//! Final composition: the fetched image, stretched to the QR size, sits
//! underneath; the logo-bearing QR raster is laid over it with the
//! Porter-Duff "over" operator.
//!
//! Because the QR raster is opaque everywhere the logo paste left alpha at
//! 255, the background only shows through where the logo itself was partly
//! transparent.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Stretch `source` to exactly `width × height` (aspect ratio is not kept).
pub fn fit_background(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if source.dimensions() == (width, height) {
        return source.clone();
    }
    imageops::resize(source, width, height, FilterType::Lanczos3)
}

/// Composite `top` over `background` in place, anchored at the origin.
pub fn composite_over(background: &mut RgbaImage, top: &RgbaImage) {
    imageops::overlay(background, top, 0, 0);
}

/// Build the output raster: `qr` over `source` resized to `qr`'s dimensions.
pub fn compose_final(source: &RgbaImage, qr: &RgbaImage) -> RgbaImage {
    let (w, h) = qr.dimensions();
    let mut out = fit_background(source, w, h);
    composite_over(&mut out, qr);
    out
}

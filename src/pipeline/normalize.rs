//! Image normalisation: raw bytes → RGBA raster.
//!
//! The format is sniffed from the magic bytes, never from the URL or the
//! `Content-Type` header, which are routinely wrong for hotlinked images.
//! PNG, JPEG, GIF, WebP, BMP, ICO and TIFF are decoded. Whatever the source
//! colour model (grey, grey+alpha, palette, RGB, 16-bit), the result is 8-bit
//! RGBA with an opaque alpha channel filled in where none existed.

use crate::error::QrLogoError;
use image::{ImageReader, Limits, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// Decode `bytes` into an RGBA raster, refusing images wider or taller than
/// `max_dimension` pixels.
pub fn decode_rgba(bytes: &[u8], max_dimension: u32) -> Result<RgbaImage, QrLogoError> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| QrLogoError::DecodeFailed {
            detail: e.to_string(),
        })?;

    let Some(format) = reader.format() else {
        return Err(QrLogoError::DecodeFailed {
            detail: format!("unrecognised image format (first bytes: {:?})", magic(bytes)),
        });
    };

    let mut limits = Limits::default();
    limits.max_image_width = Some(max_dimension);
    limits.max_image_height = Some(max_dimension);
    reader.limits(limits);

    let image = reader.decode().map_err(|e| QrLogoError::DecodeFailed {
        detail: e.to_string(),
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(QrLogoError::DecodeFailed {
            detail: "image has no pixels".into(),
        });
    }

    debug!(
        "Decoded {:?} logo → {}x{} {:?}",
        format,
        image.width(),
        image.height(),
        image.color()
    );

    Ok(image.into_rgba8())
}

fn magic(bytes: &[u8]) -> &[u8] {
    &bytes[..bytes.len().min(4)]
}

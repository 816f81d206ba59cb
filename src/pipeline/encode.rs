//! PNG encoding: final RGBA raster → bytes for transport.
//!
//! PNG is lossless and keeps the alpha channel, so module edges stay sharp
//! enough for scanners. The encoder runs at the image crate's default
//! compression; no knob is exposed.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// Content type of everything this module produces.
pub const MIME_TYPE: &str = "image/png";

/// Serialise `img` as PNG.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    debug!(
        "Encoded {}x{} image → {} bytes PNG",
        img.width(),
        img.height(),
        buf.len()
    );
    Ok(buf)
}

/// Wrap PNG bytes in a `data:` URI, for callers embedding the result in HTML or JSON.
pub fn to_data_uri(png: &[u8]) -> String {
    format!("data:{};base64,{}", MIME_TYPE, STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn encode_small_image() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 128]));
        let png = encode_png(&img).expect("encode should succeed");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let back = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .unwrap()
            .into_rgba8();
        assert_eq!(back, img);
    }

    #[test]
    fn data_uri_prefix() {
        let uri = to_data_uri(b"\x89PNG");
        assert!(uri.starts_with("data:image/png;base64,"));
        let b64 = uri.trim_start_matches("data:image/png;base64,");
        assert_eq!(STANDARD.decode(b64).unwrap(), b"\x89PNG");
    }
}

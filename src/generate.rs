//! Generation entry points.
//!
//! [`generate`] is the full pipeline for one request: validate, download the
//! logo, then hand the bytes to [`generate_from_bytes`] on the blocking pool.
//! Everything after the download is a pure function of `(payload, bytes,
//! config)`; nothing is cached or shared between calls, so any number of
//! requests can run concurrently.

use crate::config::GenerateConfig;
use crate::error::QrLogoError;
use crate::output::{GeneratedImage, GenerationStats};
use crate::pipeline::{composite, encode, fetch, logo, normalize, qr};
use crate::request::{validate_payload, GenerateRequest};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Produce a QR code for `request.qr_payload` with the logo at
/// `request.logo_url` embedded in its center.
///
/// # Errors
/// - [`QrLogoError::MissingContent`] / [`QrLogoError::InvalidUrl`] before any I/O
/// - `Download*` variants when the logo cannot be fetched
/// - [`QrLogoError::DecodeFailed`] when the body is not an image
/// - [`QrLogoError::DataTooLong`] when the payload exceeds QR capacity at level H
///
/// # Example
/// ```rust,no_run
/// use qrlogo::{generate, GenerateConfig, GenerateRequest};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = GenerateRequest::new("https://example.com", "https://example.com/logo.png");
/// let image = generate(&request, &GenerateConfig::default()).await?;
/// std::fs::write("qr.png", &image.png)?;
/// # Ok(())
/// # }
/// ```
pub async fn generate(
    request: &GenerateRequest,
    config: &GenerateConfig,
) -> Result<GeneratedImage, QrLogoError> {
    let total_start = Instant::now();

    // ── Step 1: Validate ─────────────────────────────────────────────────
    let url = request.validate()?;
    info!(
        "Generating QR ({} bytes payload) with logo {}",
        request.qr_payload.len(),
        url
    );

    // ── Step 2: Download logo ────────────────────────────────────────────
    let fetch_start = Instant::now();
    let bytes = fetch::fetch_logo(&url, config).await?;
    let fetch_duration_ms = fetch_start.elapsed().as_millis() as u64;
    info!("Downloaded {} bytes in {}ms", bytes.len(), fetch_duration_ms);

    // ── Step 3: Decode, encode, composite (CPU-bound) ────────────────────
    let payload = request.qr_payload.clone();
    let cfg = config.clone();
    let mut image =
        tokio::task::spawn_blocking(move || generate_from_bytes(&payload, &bytes, &cfg))
            .await
            .map_err(|e| QrLogoError::Internal(format!("Compose task panicked: {}", e)))??;

    image.stats.fetch_duration_ms = fetch_duration_ms;
    image.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Generated {}x{} PNG ({} bytes) in {}ms",
        image.width, image.height, image.stats.png_bytes, image.stats.total_duration_ms
    );

    Ok(image)
}

/// Run every stage after the download on bytes already in memory.
///
/// Synchronous and free of I/O; useful when the logo comes from disk, a
/// database, or a test fixture.
pub fn generate_from_bytes(
    qr_payload: &str,
    logo_bytes: &[u8],
    config: &GenerateConfig,
) -> Result<GeneratedImage, QrLogoError> {
    let start = Instant::now();
    validate_payload(qr_payload)?;

    let source = normalize::decode_rgba(logo_bytes, config.max_logo_dimension)?;
    let qr::QrRaster {
        image: mut qr_image,
        version,
        modules,
    } = qr::encode_qr(
        qr_payload,
        config.box_size,
        config.border,
        config.max_output_dimension,
    )?;

    let placement = logo::embed_logo(&mut qr_image, &source);
    let final_image = composite::compose_final(&source, &qr_image);

    let png = encode::encode_png(&final_image)
        .map_err(|e| QrLogoError::Internal(format!("PNG encoding failed: {}", e)))?;

    let (width, height) = final_image.dimensions();
    let compose_duration_ms = start.elapsed().as_millis() as u64;
    debug!("Composed in {}ms", compose_duration_ms);

    let stats = GenerationStats {
        qr_version: version,
        qr_modules: modules,
        image_size: width,
        logo: Some(placement),
        source_width: source.width(),
        source_height: source.height(),
        fetched_bytes: logo_bytes.len(),
        png_bytes: png.len(),
        fetch_duration_ms: 0,
        compose_duration_ms,
        total_duration_ms: compose_duration_ms,
    };

    Ok(GeneratedImage {
        png,
        width,
        height,
        stats,
    })
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    request: &GenerateRequest,
    config: &GenerateConfig,
) -> Result<GeneratedImage, QrLogoError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| QrLogoError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(request, config))
}

/// Generate and write the PNG directly to a file.
///
/// Uses atomic write (temp file + rename) so a failed run never leaves a
/// truncated image behind.
pub async fn generate_to_file(
    request: &GenerateRequest,
    output_path: impl AsRef<Path>,
    config: &GenerateConfig,
) -> Result<GenerationStats, QrLogoError> {
    let image = generate(request, config).await?;
    write_png(&image, output_path.as_ref()).await?;
    Ok(image.stats)
}

/// Atomically write `image.png` to `path`, creating parent directories.
///
/// The bytes go to a uniquely named temp file beside `path`, which is then
/// renamed over it. The temp file is removed if any step fails.
pub async fn write_png(image: &GeneratedImage, path: &Path) -> Result<(), QrLogoError> {
    let write_err = |e| QrLogoError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&dir).await.map_err(write_err)?;

    let png = image.png.clone();
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&png)?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| QrLogoError::Internal(format!("Write task panicked: {}", e)))?
    .map_err(write_err)?;

    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn logo_png(w: u32, h: u32, px: Rgba<u8>) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, px))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn from_bytes_produces_square_png_of_qr_size() {
        let bytes = logo_png(200, 200, Rgba([255, 0, 0, 255]));
        let out = generate_from_bytes("https://example.com", &bytes, &GenerateConfig::default())
            .unwrap();

        let expected = (out.stats.qr_modules + 8) * 10;
        assert_eq!((out.width, out.height), (expected, expected));
        assert_eq!(out.stats.fetched_bytes, bytes.len());
        assert_eq!(out.stats.png_bytes, out.png.len());

        let decoded = image::load_from_memory(&out.png).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (expected, expected));

        let logo = out.stats.logo.unwrap();
        assert!(logo.size <= expected / 4);
        let c = expected / 2;
        let p = decoded.get_pixel(c, c).0;
        assert!(p[0] > 250 && p[1] < 5 && p[2] < 5 && p[3] == 255, "center: {p:?}");
        // Quiet zone stays white.
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn output_size_ignores_logo_aspect() {
        let bytes = logo_png(900, 40, Rgba([0, 0, 255, 255]));
        let out = generate_from_bytes("abc", &bytes, &GenerateConfig::default()).unwrap();
        assert_eq!(out.width, out.height);
        assert_eq!(out.stats.source_width, 900);
        assert_eq!(out.stats.logo.unwrap().size, 40);
    }

    #[test]
    fn honours_box_size_and_border() {
        let config = GenerateConfig::builder().box_size(3).border(1).build().unwrap();
        let bytes = logo_png(10, 10, Rgba([0, 0, 0, 255]));
        let out = generate_from_bytes("abcdefg", &bytes, &config).unwrap();
        assert_eq!(out.stats.qr_version, 1);
        assert_eq!(out.width, (21 + 2) * 3);
    }

    #[test]
    fn empty_payload_checked_before_decoding() {
        let err = generate_from_bytes("", b"not an image", &GenerateConfig::default())
            .unwrap_err();
        assert!(matches!(err, QrLogoError::MissingContent));
    }

    #[test]
    fn garbage_logo_is_decode_error() {
        let err = generate_from_bytes("hello", b"<html>nope</html>", &GenerateConfig::default())
            .unwrap_err();
        assert!(matches!(err, QrLogoError::DecodeFailed { .. }));
    }

    #[test]
    fn long_payload_is_encoding_error() {
        let bytes = logo_png(8, 8, Rgba([0, 0, 0, 255]));
        let err = generate_from_bytes(&"x".repeat(5000), &bytes, &GenerateConfig::default())
            .unwrap_err();
        assert!(matches!(err, QrLogoError::DataTooLong { .. }));
    }

    #[test]
    fn identical_inputs_give_identical_png() {
        let bytes = logo_png(64, 64, Rgba([10, 200, 30, 255]));
        let a = generate_from_bytes("repeat me", &bytes, &GenerateConfig::default()).unwrap();
        let b = generate_from_bytes("repeat me", &bytes, &GenerateConfig::default()).unwrap();
        assert_eq!(a.png, b.png);
    }

    #[test]
    fn sync_wrapper_propagates_validation() {
        let req = GenerateRequest::new("", "https://example.com/logo.png");
        let err = generate_sync(&req, &GenerateConfig::default()).unwrap_err();
        assert!(matches!(err, QrLogoError::MissingContent));
    }

    #[tokio::test]
    async fn invalid_url_fails_before_network() {
        let req = GenerateRequest::new("hello", "not a url");
        let err = generate(&req, &GenerateConfig::default()).await.unwrap_err();
        assert!(matches!(err, QrLogoError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn write_png_is_atomic_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.png");
        let bytes = logo_png(20, 20, Rgba([1, 2, 3, 255]));
        let image = generate_from_bytes("file", &bytes, &GenerateConfig::default()).unwrap();

        write_png(&image, &path).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), image.png);
        let names: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.png")]);
    }

    #[tokio::test]
    async fn concurrent_writers_to_one_path_both_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.png");
        let bytes = logo_png(8, 8, Rgba([9, 9, 9, 255]));
        let config = GenerateConfig::default();
        let a = generate_from_bytes("first", &bytes, &config).unwrap();
        let b = generate_from_bytes("second", &bytes, &config).unwrap();

        let (ra, rb) = tokio::join!(write_png(&a, &path), write_png(&b, &path));
        ra.unwrap();
        rb.unwrap();

        let written = std::fs::read(&path).unwrap();
        assert!(written == a.png || written == b.png);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way makes the final rename fail.
        let path = dir.path().join("taken.png");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();
        let bytes = logo_png(8, 8, Rgba([0, 0, 0, 255]));
        let image = generate_from_bytes("file", &bytes, &GenerateConfig::default()).unwrap();

        let err = write_png(&image, &path).await.unwrap_err();
        assert!(matches!(err, QrLogoError::OutputWriteFailed { .. }), "got: {err:?}");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn output_side_limit_comes_from_config() {
        let config = GenerateConfig::builder()
            .box_size(10)
            .border(4)
            .max_output_dimension(100)
            .build()
            .unwrap();
        let bytes = logo_png(8, 8, Rgba([0, 0, 0, 255]));
        let err = generate_from_bytes("abc", &bytes, &config).unwrap_err();
        assert!(matches!(err, QrLogoError::DataTooLong { .. }), "got: {err:?}");
    }
}

//! Result types returned by the generation entry points.

use crate::pipeline::encode::{self, MIME_TYPE};
use crate::pipeline::logo::LogoPlacement;
use serde::{Deserialize, Serialize};

/// A finished QR-with-logo image.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// PNG-encoded bytes of the final raster.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stats: GenerationStats,
}

impl GeneratedImage {
    /// Always `image/png`.
    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    /// The PNG as a `data:image/png;base64,…` URI.
    pub fn to_data_uri(&self) -> String {
        encode::to_data_uri(&self.png)
    }
}

/// What happened while building a [`GeneratedImage`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// QR symbol version (1–40).
    pub qr_version: i16,
    /// Modules per side, quiet zone excluded.
    pub qr_modules: u32,
    /// Output side length in pixels.
    pub image_size: u32,
    /// Where the logo was pasted. `None` only in a default-constructed value.
    pub logo: Option<LogoPlacement>,
    /// Width and height of the logo as decoded, before squaring.
    pub source_width: u32,
    pub source_height: u32,
    /// Bytes received from the logo URL (or read from disk).
    pub fetched_bytes: usize,
    pub png_bytes: usize,
    pub fetch_duration_ms: u64,
    pub compose_duration_ms: u64,
    pub total_duration_ms: u64,
}

//! Configuration types for QR-with-logo generation.
//!
//! All tunable behaviour lives in [`GenerateConfig`], built via its
//! [`GenerateConfigBuilder`]. The config is immutable once built and is
//! shared by reference (or `Arc`) between concurrent requests.
//!
//! The error-correction level (always H) and the logo cap (a quarter of the
//! QR side) are not configurable.

use crate::error::QrLogoError;

/// Default pixel side of one QR module.
pub const DEFAULT_BOX_SIZE: u32 = 10;

/// Default quiet-zone width, in modules.
pub const DEFAULT_BORDER: u32 = 4;

/// Configuration for a generation request.
///
/// # Example
/// ```rust
/// use qrlogo::GenerateConfig;
///
/// let config = GenerateConfig::builder()
///     .box_size(8)
///     .download_timeout_secs(10)
///     .build()
///     .unwrap();
/// assert_eq!(config.box_size, 8);
/// ```
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Pixel side of each QR module. Range: 1–100. Default: 10.
    pub box_size: u32,

    /// Quiet zone around the symbol, in modules. Range: 0–50. Default: 4.
    pub border: u32,

    /// Whole-request timeout for the logo download, in seconds. Default: 30.
    pub download_timeout_secs: u64,

    /// Largest logo body accepted, in bytes. Default: 10 MiB.
    ///
    /// Checked against `Content-Length` up front and again while streaming,
    /// so a lying or absent header cannot push past the limit.
    pub max_download_bytes: u64,

    /// Redirects followed before the download is abandoned. Default: 5.
    pub max_redirects: usize,

    /// Largest decoded logo width or height, in pixels. Default: 8192.
    pub max_logo_dimension: u32,

    /// Largest QR raster side, in pixels. Default: 8192.
    ///
    /// A payload whose symbol would rasterise wider than this at the
    /// configured `box_size` and `border` is refused as too long.
    pub max_output_dimension: u32,

    /// `User-Agent` header sent with the download.
    pub user_agent: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            box_size: DEFAULT_BOX_SIZE,
            border: DEFAULT_BORDER,
            download_timeout_secs: 30,
            max_download_bytes: 10 * 1024 * 1024,
            max_redirects: 5,
            max_logo_dimension: 8192,
            max_output_dimension: 8192,
            user_agent: concat!("qrlogo/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GenerateConfig {
    /// Create a new builder for `GenerateConfig`.
    pub fn builder() -> GenerateConfigBuilder {
        GenerateConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerateConfig`].
#[derive(Debug)]
pub struct GenerateConfigBuilder {
    config: GenerateConfig,
}

impl GenerateConfigBuilder {
    pub fn box_size(mut self, px: u32) -> Self {
        self.config.box_size = px.clamp(1, 100);
        self
    }

    pub fn border(mut self, modules: u32) -> Self {
        self.config.border = modules.min(50);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn max_download_bytes(mut self, bytes: u64) -> Self {
        self.config.max_download_bytes = bytes.max(1024);
        self
    }

    pub fn max_redirects(mut self, n: usize) -> Self {
        self.config.max_redirects = n;
        self
    }

    pub fn max_logo_dimension(mut self, px: u32) -> Self {
        self.config.max_logo_dimension = px.max(1);
        self
    }

    pub fn max_output_dimension(mut self, px: u32) -> Self {
        self.config.max_output_dimension = px.max(1);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerateConfig, QrLogoError> {
        let c = &self.config;
        if c.download_timeout_secs == 0 {
            return Err(QrLogoError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        if c.user_agent.trim().is_empty() {
            return Err(QrLogoError::InvalidConfig(
                "User-Agent must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

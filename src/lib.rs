//! # qrlogo
//!
//! Generate QR codes with a logo embedded in the center. The logo is fetched
//! from a URL, squared, capped at a quarter of the QR side, alpha-pasted over
//! the modules, and the result is returned as a PNG.
//!
//! ## Pipeline Overview
//!
//! ```text
//! (payload, logo URL)
//!  │
//!  ├─ 1. Fetch      GET the logo (timeout, redirect cap, size limit)
//!  ├─ 2. Normalize  sniff + decode → RGBA
//!  ├─ 3. QR         encode at level H, 10 px modules, 4-module border
//!  ├─ 4. Logo       square → cap at side/4 → center → alpha-mask paste
//!  ├─ 5. Composite  QR "over" the fetched image stretched to QR size
//!  └─ 6. Encode     PNG bytes
//! ```
//!
//! Level H (≈30 % recoverable) is fixed: the logo occludes the center of
//! the symbol, and lower levels stop scanning reliably once it does.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qrlogo::{generate, GenerateConfig, GenerateRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = GenerateRequest::new(
//!         "https://example.com",
//!         "https://example.com/logo.png",
//!     );
//!     let image = generate(&request, &GenerateConfig::default()).await?;
//!     std::fs::write("qr.png", &image.png)?;
//!     eprintln!("{}x{} px, QR version {}", image.width, image.height, image.stats.qr_version);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | via cli | [`server`] module: axum router for `POST /generate_logo/` |
//! | `cli`    | on      | The `qrlogo` binary (clap + anyhow + tracing-subscriber) |
//!
//! Library-only users can opt out:
//! ```toml
//! qrlogo = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod request;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerateConfig, GenerateConfigBuilder};
pub use error::{ErrorBody, ErrorKind, QrLogoError};
pub use generate::{generate, generate_from_bytes, generate_sync, generate_to_file, write_png};
pub use output::{GeneratedImage, GenerationStats};
pub use pipeline::encode::MIME_TYPE;
pub use pipeline::logo::LogoPlacement;
pub use request::GenerateRequest;

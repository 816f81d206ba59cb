//! Pipeline stages for QR-with-logo generation.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own with synthetic rasters.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ normalize ──▶ qr ──▶ logo ──▶ composite ──▶ encode
//! (bytes)    (RGBA)     (raster) (paste)   (over)       (PNG)
//! ```
//!
//! 1. [`fetch`]: download the logo; the only stage with network I/O
//! 2. [`normalize`]: sniff the format, decode, promote to RGBA
//! 3. [`qr`]: encode the payload at level H and rasterise it
//! 4. [`logo`]: square, cap at a quarter side, center, alpha-paste
//! 5. [`composite`]: stretch the fetched image under the QR raster
//! 6. [`encode`]: PNG-encode the result
//!
//! Stages 2–6 are pure and CPU-bound; [`crate::generate()`] runs them together
//! inside `spawn_blocking`.

pub mod composite;
pub mod encode;
pub mod fetch;
pub mod logo;
pub mod normalize;
pub mod qr;

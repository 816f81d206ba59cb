//! Error types for the qrlogo library.
//!
//! Every failure of the generation pipeline is a [`QrLogoError`]. There is no
//! partial result: a request either yields a complete PNG or exactly one error.
//!
//! Variants are grouped by the stage that raises them. Callers that only need
//! the coarse outcome (to pick an HTTP status, say) use [`QrLogoError::kind`],
//! which collapses the variants into five classes:
//!
//! | Kind         | Raised by                              | Status |
//! |--------------|----------------------------------------|--------|
//! | `Validation` | empty payload, malformed logo URL      | 400    |
//! | `Download`   | non-2xx, timeout, transport, too large | 400    |
//! | `Decode`     | fetched bytes are not an image         | 400    |
//! | `Encoding`   | payload exceeds QR capacity            | 400    |
//! | `Internal`   | anything else                          | 500    |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors returned by the qrlogo library.
#[derive(Debug, Error)]
pub enum QrLogoError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// The QR payload was empty.
    #[error("QR Code Content is required")]
    MissingContent,

    /// The logo URL is not an absolute HTTP/HTTPS URL.
    #[error("Invalid logo URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    // ── Download errors ───────────────────────────────────────────────────
    /// The server answered with a non-success status, or the transport failed.
    #[error("Failed to download the logo image from '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// The download did not finish within the configured timeout.
    #[error("Failed to download the logo image from '{url}': timed out after {secs}s")]
    DownloadTimeout { url: String, secs: u64 },

    /// The response body exceeded `max_download_bytes`.
    #[error("Failed to download the logo image from '{url}': body exceeds {limit} bytes")]
    DownloadTooLarge { url: String, limit: u64 },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The fetched bytes are not a recognisable image.
    #[error("Failed to decode the logo image: {detail}")]
    DecodeFailed { detail: String },

    // ── Encoding errors ───────────────────────────────────────────────────
    /// The payload does not fit in the largest QR version at level H.
    #[error("QR Code Content cannot be encoded: {detail}")]
    DataTooLong { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the output PNG file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (resize, composite, PNG serialisation).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`QrLogoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Download,
    Decode,
    Encoding,
    Internal,
}

impl QrLogoError {
    /// The error class this variant belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QrLogoError::MissingContent | QrLogoError::InvalidUrl { .. } => ErrorKind::Validation,
            QrLogoError::DownloadFailed { .. }
            | QrLogoError::DownloadTimeout { .. }
            | QrLogoError::DownloadTooLarge { .. } => ErrorKind::Download,
            QrLogoError::DecodeFailed { .. } => ErrorKind::Decode,
            QrLogoError::DataTooLong { .. } => ErrorKind::Encoding,
            QrLogoError::InvalidConfig(_)
            | QrLogoError::OutputWriteFailed { .. }
            | QrLogoError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// HTTP-equivalent status code: 400 for caller-side problems, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Internal => 500,
            _ => 400,
        }
    }

    /// `true` when the failure is attributable to the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Wire representation for the outbound error contract.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            detail: self.to_string(),
        }
    }
}

/// JSON body sent to callers on failure: `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

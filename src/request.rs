//! The inbound request: what to encode, and where the logo lives.
//!
//! Field names on the wire are `qr_code_content` and `download_link`; the
//! shorter `qr_payload` / `logo_url` are accepted as aliases.

use crate::error::QrLogoError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// A single generation request. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Text encoded into the QR symbol.
    #[serde(rename = "qr_code_content", alias = "qr_payload")]
    pub qr_payload: String,

    /// Absolute HTTP/HTTPS URL of the logo image.
    #[serde(rename = "download_link", alias = "logo_url")]
    pub logo_url: String,
}

impl GenerateRequest {
    pub fn new(qr_payload: impl Into<String>, logo_url: impl Into<String>) -> Self {
        Self {
            qr_payload: qr_payload.into(),
            logo_url: logo_url.into(),
        }
    }

    /// Check the request before any work is done.
    ///
    /// Only an empty payload is rejected; whitespace is valid QR content.
    pub fn validate(&self) -> Result<Url, QrLogoError> {
        validate_payload(&self.qr_payload)?;
        parse_logo_url(&self.logo_url)
    }
}

/// Reject an empty QR payload.
pub fn validate_payload(payload: &str) -> Result<(), QrLogoError> {
    if payload.is_empty() {
        return Err(QrLogoError::MissingContent);
    }
    Ok(())
}

/// Parse the logo URL, accepting only `http` and `https`.
pub fn parse_logo_url(raw: &str) -> Result<Url, QrLogoError> {
    let url = Url::parse(raw).map_err(|e| QrLogoError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(QrLogoError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_rejected() {
        let req = GenerateRequest::new("", "https://example.com/logo.png");
        let err = req.validate().unwrap_err();
        assert!(matches!(err, QrLogoError::MissingContent));
    }

    #[test]
    fn whitespace_payload_is_content() {
        let req = GenerateRequest::new(" ", "https://example.com/logo.png");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn bad_urls_rejected() {
        for raw in ["", "logo.png", "ftp://example.com/logo.png", "file:///etc/passwd"] {
            let err = parse_logo_url(raw).unwrap_err();
            assert!(
                matches!(err, QrLogoError::InvalidUrl { .. }),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn deserialises_wire_names_and_aliases() {
        let wire: GenerateRequest = serde_json::from_str(
            r#"{"qr_code_content":"hello","download_link":"https://a.test/l.png"}"#,
        )
        .unwrap();
        let alias: GenerateRequest =
            serde_json::from_str(r#"{"qr_payload":"hello","logo_url":"https://a.test/l.png"}"#)
                .unwrap();
        assert_eq!(wire, alias);
        assert_eq!(wire.qr_payload, "hello");
    }

    #[test]
    fn missing_field_fails_to_deserialise() {
        let res: Result<GenerateRequest, _> =
            serde_json::from_str(r#"{"qr_code_content":"hello"}"#);
        assert!(res.is_err());
    }
}

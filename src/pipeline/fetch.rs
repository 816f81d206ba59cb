//! Logo download: fetch raw image bytes from a caller-supplied URL.
//!
//! The body is kept in memory; nothing touches the file system. The download
//! is bounded three ways: a whole-request timeout, a redirect cap, and a byte
//! limit enforced both against `Content-Length` and while streaming the body.
//! Every failure (status, DNS, refused connection, timeout, oversize) surfaces
//! as one of the `Download*` variants of [`QrLogoError`].

use crate::config::GenerateConfig;
use crate::error::QrLogoError;
use futures::StreamExt;
use reqwest::{redirect, Url};
use std::time::Duration;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Download the logo at `url`, returning the raw body bytes.
pub async fn fetch_logo(url: &Url, config: &GenerateConfig) -> Result<Vec<u8>, QrLogoError> {
    info!("Downloading logo from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .redirect(redirect::Policy::limited(config.max_redirects))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| QrLogoError::Internal(format!("Failed to build HTTP client: {e}")))?;

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| transport_error(url, &e, config))?;

    let status = response.status();
    if !status.is_success() {
        return Err(QrLogoError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", status),
        });
    }

    let limit = config.max_download_bytes;
    if let Some(len) = response.content_length() {
        if len > limit {
            return Err(QrLogoError::DownloadTooLarge {
                url: url.to_string(),
                limit,
            });
        }
    }

    let mut body = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| transport_error(url, &e, config))?;
        if (body.len() + chunk.len()) as u64 > limit {
            return Err(QrLogoError::DownloadTooLarge {
                url: url.to_string(),
                limit,
            });
        }
        body.extend_from_slice(&chunk);
    }

    debug!("Logo response: {} ({} bytes)", status, body.len());
    Ok(body)
}

/// Map a reqwest failure onto the download error variants.
fn transport_error(url: &Url, e: &reqwest::Error, config: &GenerateConfig) -> QrLogoError {
    if e.is_timeout() {
        QrLogoError::DownloadTimeout {
            url: url.to_string(),
            secs: config.download_timeout_secs,
        }
    } else {
        QrLogoError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/logo.png"));
        assert!(is_url("http://example.com/logo.png"));
        assert!(!is_url("/tmp/logo.png"));
        assert!(!is_url("logo.png"));
        assert!(!is_url(""));
    }

    #[tokio::test]
    async fn refused_connection_is_download_error() {
        // Port 9 (discard) on loopback is closed on any sane test host.
        let url = Url::parse("http://127.0.0.1:9/logo.png").unwrap();
        let config = GenerateConfig::builder()
            .download_timeout_secs(5)
            .build()
            .unwrap();
        let err = fetch_logo(&url, &config).await.unwrap_err();
        assert!(
            matches!(
                err,
                QrLogoError::DownloadFailed { .. } | QrLogoError::DownloadTimeout { .. }
            ),
            "got: {err:?}"
        );
        assert!(err.is_client_error());
    }

    // Status, size-limit and success paths need a live server; they are
    // covered in tests/e2e.rs against a local fixture.
}

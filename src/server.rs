//! HTTP surface: a single `POST /generate_logo/` endpoint over [`crate::generate`].
//!
//! The router is stateless apart from an immutable `Arc<GenerateConfig>`.
//! Responses:
//!
//! | Outcome                     | Status        | Body                      |
//! |-----------------------------|---------------|---------------------------|
//! | success                     | 200           | PNG, `image/png`          |
//! | [`QrLogoError`] (client)    | 400           | `{"detail": "..."}`       |
//! | [`QrLogoError`] (internal)  | 500           | `{"detail": "..."}`       |
//! | malformed / missing JSON    | axum's status | `{"detail": "..."}`       |
//!
//! CORS is wide open and credential-friendly: the caller's `Origin` is
//! reflected with `Access-Control-Allow-Credentials: true` (a literal `*` is
//! sent only when no `Origin` arrives), and a preflight gets back exactly the
//! method and headers it asked for.

use crate::config::GenerateConfig;
use crate::error::{ErrorBody, QrLogoError};
use crate::generate::generate;
use crate::pipeline::encode::MIME_TYPE;
use crate::request::GenerateRequest;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Build the service router.
pub fn router(config: Arc<GenerateConfig>) -> Router {
    Router::new()
        .route("/generate_logo/", post(generate_logo).options(preflight))
        .route("/generate_logo", post(generate_logo).options(preflight))
        .route("/health", get(health))
        .layer(middleware::from_fn(cors))
        .with_state(config)
}

/// Serve the router on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    config: GenerateConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(Arc::new(config)))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn generate_logo(
    State(config): State<Arc<GenerateConfig>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            let body = ErrorBody {
                detail: rejection.body_text(),
            };
            return (rejection.status(), Json(body)).into_response();
        }
    };

    match generate(&request, &config).await {
        Ok(image) => ([(header::CONTENT_TYPE, MIME_TYPE)], image.png).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn health() -> &'static str {
    "ok"
}

const ALLOWED_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";

async fn cors(request: Request, next: Next) -> Response {
    let asked = request.headers().clone();
    let mut response = next.run(request).await;
    apply_cors(&asked, response.headers_mut());
    response
}

fn apply_cors(asked: &HeaderMap, headers: &mut HeaderMap) {
    let wildcard = HeaderValue::from_static("*");

    match asked.get(header::ORIGIN) {
        Some(origin) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
        None => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, wildcard.clone());
        }
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );

    let methods = asked
        .get(header::ACCESS_CONTROL_REQUEST_METHOD)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, methods);

    let allowed_headers = asked
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or(wildcard);
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers);
}

impl IntoResponse for QrLogoError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("Generation failed: {}", self);
        } else {
            warn!("Generation rejected: {}", self);
        }
        (status, Json(self.to_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_origin_gets_wildcard() {
        let mut out = HeaderMap::new();
        apply_cors(&HeaderMap::new(), &mut out);
        assert_eq!(out[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(out[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(out[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(out[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");
        assert!(out.get(header::VARY).is_none());
    }

    #[test]
    fn origin_and_requested_headers_are_reflected() {
        let mut asked = HeaderMap::new();
        asked.insert(header::ORIGIN, HeaderValue::from_static("https://app.test"));
        asked.insert(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        );
        asked.insert(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type, x-trace"),
        );
        let mut out = HeaderMap::new();
        apply_cors(&asked, &mut out);

        assert_eq!(out[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.test");
        assert_eq!(out[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(out[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
        assert_eq!(out[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type, x-trace");
        assert_eq!(out[header::VARY], "Origin");
    }
}

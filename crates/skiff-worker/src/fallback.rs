//! Offline fallback responses.

use http::{header, HeaderValue, StatusCode};
use regex::Regex;
use skiff_cache::CacheStore;
use skiff_core::{Request, Response};
use tracing::{debug, warn};

use crate::config::{compile, ConfigError, WorkerConfig};

/// Document synthesized when even the installed fallback is missing.
const UNAVAILABLE_DOC: &str = "<!doctype html>\
<html><head><meta charset=\"utf-8\"><title>Offline</title></head>\
<body><h1>Offline</h1><p>This page is not available right now.</p></body></html>";

/// Serves last-resort responses when both network and cache fail.
pub struct FallbackProvider {
    image_pattern: Regex,
    offline_document: String,
    placeholder_image: String,
}

impl FallbackProvider {
    /// Build the provider from configuration.
    pub fn from_config(config: &WorkerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            image_pattern: compile(&config.image_pattern)?,
            offline_document: config.offline_document.clone(),
            placeholder_image: config.placeholder_image.clone(),
        })
    }

    /// Whether the request looks like an image, judged by URL extension.
    pub fn is_image_request(&self, request: &Request) -> bool {
        self.image_pattern.is_match(request.url())
    }

    /// Produce the fallback response for a request.
    ///
    /// Image-looking URLs get the installed placeholder image, everything
    /// else the installed offline document. If the chosen resource is
    /// missing from the cache a minimal unavailable document is
    /// synthesized instead; this path never fails.
    pub async fn fallback<S: CacheStore>(&self, store: &S, request: &Request) -> Response {
        debug!(
            method = %request.method(),
            url = %request.url(),
            "serving offline fallback"
        );

        let url = if self.is_image_request(request) {
            &self.placeholder_image
        } else {
            &self.offline_document
        };

        match store.lookup_any(&Request::get(url.as_str())).await {
            Ok(Some(response)) => response,
            Ok(None) => {
                warn!(url = %url, "fallback resource missing from cache");
                unavailable()
            }
            Err(e) => {
                warn!(url = %url, error = %e, "fallback lookup failed");
                unavailable()
            }
        }
    }
}

/// Terminal response when no fallback can be served.
fn unavailable() -> Response {
    Response::new(StatusCode::SERVICE_UNAVAILABLE)
        .with_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        )
        .with_body(UNAVAILABLE_DOC)
}

//! Network access seam.

use async_trait::async_trait;
use thiserror::Error;

use crate::{Request, Response};

/// Errors surfaced by the host's network primitive.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    Unreachable(String),
    #[error("request timed out")]
    Timeout,
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("fetch failed: {0}")]
    Other(String),
}

/// The host's network primitive.
///
/// Implementations forward the request to the origin and resolve with
/// whatever came back. A resolved error response (404, 500) is a
/// successful fetch; `FetchError` covers only failures to obtain a
/// response at all.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    struct EchoFetch;

    #[async_trait]
    impl Fetch for EchoFetch {
        async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
            Ok(Response::new(StatusCode::OK).with_body(request.url().to_string()))
        }
    }

    #[tokio::test]
    async fn test_fetch_through_trait_object() {
        let fetcher: &dyn Fetch = &EchoFetch;
        let response = fetcher.fetch(&Request::get("/page")).await.unwrap();
        assert!(response.ok());
        assert_eq!(response.into_body().as_ref(), b"/page");
    }
}

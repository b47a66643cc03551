//! HTTP client for the market-research backend.
//!
//! A thin credentialed wrapper over one configured base origin. Session
//! credentials ride along on every request (cookie store, plus an optional
//! pre-provisioned session cookie from config). The client does not retry,
//! does not cache, and does not deduplicate in-flight requests — callers
//! handle failures individually.

mod apps;
mod bookmarks;
mod developers;
mod jobs;
mod session;

use futures::StreamExt;
use reqwest::header;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Per-request timeout. Applied on top of reqwest's own client timeout so a
/// stalled body read cannot hang the event loop's spawned task forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Error Types
// ============================================================================

/// Failures a single API call can produce.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL could not be parsed or extended.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body was not the expected JSON shape
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// `{ "data": ... }` envelope several endpoints wrap their payloads in.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

// ============================================================================
// Client
// ============================================================================

/// Credentialed HTTP client bound to one backend origin.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `https://dash.example.com/api`).
    ///
    /// The cookie store keeps the backend's session cookie across requests;
    /// `session_cookie` optionally seeds one from config for headless use
    /// (the OAuth redirect cannot complete inside a terminal).
    pub fn new(base_url: &str, session_cookie: Option<&SecretString>) -> Result<Self, ApiError> {
        let mut base =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        // Trailing slash so Url::join treats the last segment as a directory
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let mut headers = header::HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let mut value = header::HeaderValue::from_str(cookie.expose_secret())
                .map_err(|_| ApiError::InvalidBaseUrl("session cookie is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(header::COOKIE, value);
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { http, base })
    }

    /// Resolve a relative endpoint path against the base origin.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))
    }

    /// Resolve an endpoint and push one percent-encoded trailing segment
    /// (folder names and developer ids may contain reserved characters).
    pub(crate) fn endpoint_with_segment(
        &self,
        path: &str,
        segment: &str,
    ) -> Result<Url, ApiError> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl("base URL cannot carry segments".into()))?
            .push(segment);
        Ok(url)
    }

    /// URL of the backend's image proxy for a third-party screenshot/icon host.
    pub fn proxy_image_url(&self, raw: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint("proxy-image")?;
        url.query_pairs_mut().append_pair("url", raw);
        Ok(url)
    }

    /// Fetch the first bytes of a proxied image to confirm it loads.
    ///
    /// Used by the screenshot tracker: a card's placeholder is retired once
    /// the proxy answers with a 2xx and a non-empty body chunk.
    pub async fn probe_image(&self, raw: &str) -> Result<(), ApiError> {
        let url = self.proxy_image_url(raw)?;
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.http.get(url).send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }
        // One chunk is enough; the terminal never renders the pixels.
        let mut stream = response.bytes_stream();
        if let Some(chunk) = stream.next().await {
            chunk.map_err(ApiError::Network)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.http.get(url).send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;
        Self::decode(response).await
    }

    pub(crate) async fn post_json<B: serde::Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.http.post(url).json(body).send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;
        Self::expect_success(response)
    }

    pub(crate) async fn post_json_response<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.http.post(url).json(body).send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;
        Self::decode(response).await
    }

    pub(crate) async fn post_empty(&self, url: Url) -> Result<(), ApiError> {
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.http.post(url).send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;
        Self::expect_success(response)
    }

    pub(crate) async fn patch_json<B: serde::Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<(), ApiError> {
        let response =
            tokio::time::timeout(REQUEST_TIMEOUT, self.http.patch(url).json(body).send())
                .await
                .map_err(|_| ApiError::Timeout)?
                .map_err(ApiError::Network)?;
        Self::expect_success(response)
    }

    pub(crate) async fn patch_empty(&self, url: Url) -> Result<(), ApiError> {
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.http.patch(url).send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;
        Self::expect_success(response)
    }

    pub(crate) async fn delete_json<B: serde::Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<(), ApiError> {
        let response =
            tokio::time::timeout(REQUEST_TIMEOUT, self.http.delete(url).json(body).send())
                .await
                .map_err(|_| ApiError::Timeout)?
                .map_err(ApiError::Network)?;
        Self::expect_success(response)
    }

    pub(crate) async fn delete_empty(&self, url: Url) -> Result<(), ApiError> {
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.http.delete(url).send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;
        Self::expect_success(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn expect_success(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let client = ApiClient::new("http://localhost:4000/api", None).unwrap();
        let url = client.endpoint("apps/date-range").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/apps/date-range");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            ApiClient::new("not a url", None),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_path_segment_is_percent_encoded() {
        let client = ApiClient::new("http://localhost:4000/api", None).unwrap();
        let url = client
            .endpoint_with_segment("users/me/bookmark-folders", "My Folder/1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4000/api/users/me/bookmark-folders/My%20Folder%2F1"
        );
    }

    #[test]
    fn test_proxy_image_url_encodes_target() {
        let client = ApiClient::new("http://localhost:4000/api", None).unwrap();
        let url = client
            .proxy_image_url("https://cdn.example.com/shot.png?size=big")
            .unwrap();
        assert!(url.as_str().starts_with("http://localhost:4000/api/proxy-image?url="));
        assert!(url.query().unwrap().contains("shot.png"));
    }
}

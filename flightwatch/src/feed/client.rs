//! Feed client trait and HTTP implementation.
//!
//! The [`FeedClient`] trait abstracts over where a snapshot comes from, so the
//! engine can be driven by a real upstream, a proxy, or a scripted mock in
//! tests. The [`HttpFeedClient`] implementation fetches the configured URL via
//! `reqwest` and decodes it into an [`UpstreamPayload`].

use std::future::Future;

use super::config::{FeedConfig, FeedFormat};
use super::error::FeedError;
use super::upstream::UpstreamPayload;

/// Trait for fetching one complete telemetry snapshot.
pub trait FeedClient: Send + Sync {
    /// Fetch and decode the current snapshot.
    fn fetch_snapshot(&self) -> impl Future<Output = Result<UpstreamPayload, FeedError>> + Send;
}

/// HTTP client for an upstream telemetry API or a trusted proxy in front of it.
///
/// Uses a reusable `reqwest::Client` with connection pooling and timeouts.
/// The proxy contract is simply "same response shape as upstream".
pub struct HttpFeedClient {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,

    /// Upstream or proxy URL.
    url: String,

    /// Expected payload format.
    format: FeedFormat,

    /// Optional credential.
    api_key: Option<String>,
}

impl HttpFeedClient {
    /// Create a new client from feed configuration.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("flightwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            url: config.url.clone(),
            format: config.format,
            api_key: config.api_key.clone(),
        })
    }

    /// URL this client polls.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn request(&self) -> reqwest::RequestBuilder {
        let request = self.http.get(&self.url);
        match (&self.api_key, self.format) {
            (Some(key), FeedFormat::AviationStack) => request.query(&[("access_key", key)]),
            (Some(key), _) => request.bearer_auth(key),
            (None, _) => request,
        }
    }
}

impl FeedClient for HttpFeedClient {
    async fn fetch_snapshot(&self) -> Result<UpstreamPayload, FeedError> {
        let response = self.request().send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let payload = UpstreamPayload::decode(&bytes, self.format)?;

        tracing::debug!(
            url = %self.url,
            format = %payload.format(),
            records = payload.record_count(),
            bytes = bytes.len(),
            "Snapshot fetched"
        );

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpFeedClient::new(&FeedConfig::default()).unwrap();
        assert_eq!(client.url(), super::super::config::DEFAULT_FEED_URL);
        assert_eq!(client.format, FeedFormat::Auto);
    }

    #[test]
    fn test_aviationstack_key_goes_in_query() {
        let config = FeedConfig {
            url: "http://localhost:9/v1/flights".to_string(),
            format: FeedFormat::AviationStack,
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        let client = HttpFeedClient::new(&config).unwrap();
        let request = client.request().build().unwrap();

        assert_eq!(request.url().query(), Some("access_key=secret"));
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_other_formats_use_bearer_token() {
        let config = FeedConfig {
            url: "http://localhost:9/api/states/all".to_string(),
            api_key: Some("token".to_string()),
            ..Default::default()
        };
        let client = HttpFeedClient::new(&config).unwrap();
        let request = client.request().build().unwrap();

        assert_eq!(
            request
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok()),
            Some("Bearer token")
        );
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_http_error() {
        let config = FeedConfig {
            url: "http://127.0.0.1:9/unreachable".to_string(),
            timeout: std::time::Duration::from_secs(2),
            ..Default::default()
        };
        let client = HttpFeedClient::new(&config).unwrap();

        let result = client.fetch_snapshot().await;
        assert!(matches!(result, Err(FeedError::Http(_))));
    }
}

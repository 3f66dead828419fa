//! Main Cloudflare API client implementation.

use crate::api::{Envelope, RecordsApi, ZoneApi};
use crate::config::{DirectLimiter, RateLimitConfig};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use subzone_core::{Result, SubzoneError};
use tracing::{debug, warn};

/// The Cloudflare API v4 base URL
const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloudflare DNS client scoped to one zone
#[derive(Clone)]
pub struct CloudflareClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    api_token: String,
    zone_id: String,
    base_url: String,
    timeout: Duration,
    rate_limiter: DirectLimiter,
}

impl CloudflareClient {
    /// Create a new client for `zone_id` using default settings
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Result<Self> {
        CloudflareClientBuilder::new(api_token, zone_id).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
    ) -> CloudflareClientBuilder {
        CloudflareClientBuilder::new(api_token, zone_id)
    }

    /// Access zone endpoints
    #[must_use]
    pub fn zone(&self) -> ZoneApi<'_> {
        ZoneApi::new(self)
    }

    /// Access DNS record endpoints
    #[must_use]
    pub fn records(&self) -> RecordsApi<'_> {
        RecordsApi::new(self)
    }

    /// The zone this client manages
    #[must_use]
    pub fn zone_id(&self) -> &str {
        &self.inner.zone_id
    }

    /// Perform a GET request with query parameters
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Envelope<T>> {
        self.send::<T, ()>(Method::GET, path, params, None).await
    }

    /// Perform a POST request with JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    /// Perform a PUT request with JSON body
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    /// Perform a DELETE request
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        self.send::<T, ()>(Method::DELETE, path, &[], None).await
    }

    async fn send<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Envelope<T>> {
        self.inner.rate_limiter.until_ready().await;

        let url = self.build_url(path, params)?;
        debug!(method = %method, url = %url, "Cloudflare API request");

        let mut request = self
            .inner
            .http
            .request(method, url)
            .bearer_auth(&self.inner.api_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.map_transport(&e))?;

        self.handle_response(response).await
    }

    /// Build a URL under the zone, with query parameters
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<url::Url> {
        let raw = format!(
            "{}/zones/{}{}",
            self.inner.base_url.trim_end_matches('/'),
            self.inner.zone_id,
            path
        );
        let mut url =
            url::Url::parse(&raw).map_err(|e| SubzoneError::Config(format!("{raw}: {e}")))?;

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    fn map_transport(&self, err: &reqwest::Error) -> SubzoneError {
        if err.is_timeout() {
            SubzoneError::Timeout(self.inner.timeout)
        } else {
            SubzoneError::Http(err.to_string())
        }
    }

    /// Handle an API response carrying the Cloudflare envelope
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Envelope<T>> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(&e))?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(SubzoneError::Json)
        } else {
            Err(Self::handle_error(status.as_u16(), &body))
        }
    }

    /// Convert an error response to a `SubzoneError`
    fn handle_error(status: u16, body: &str) -> SubzoneError {
        // Cloudflare reports failures as {"success":false,"errors":[{code,message}]}
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(body)
            .ok()
            .and_then(|e| e.error_message())
            .unwrap_or_else(|| body.to_string());

        match status {
            401 | 403 => SubzoneError::Unauthorized,
            404 => SubzoneError::NotFound { resource: message },
            429 => {
                warn!("Rate limited by Cloudflare API");
                SubzoneError::RateLimited { retry_after: None }
            }
            _ => SubzoneError::Api {
                code: status,
                message,
            },
        }
    }
}

/// Builder for configuring a [`CloudflareClient`]
pub struct CloudflareClientBuilder {
    api_token: String,
    zone_id: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    rate_limit: RateLimitConfig,
}

impl CloudflareClientBuilder {
    /// Create a new builder with the given API token and zone id
    #[must_use]
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("subzone/{}", env!("CARGO_PKG_VERSION")),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the outbound rate limit
    #[must_use]
    pub const fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<CloudflareClient> {
        if self.api_token.is_empty() {
            return Err(SubzoneError::Config("Cloudflare API token is empty".into()));
        }
        if self.zone_id.is_empty() {
            return Err(SubzoneError::Config("Cloudflare zone id is empty".into()));
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| SubzoneError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(CloudflareClient {
            inner: Arc::new(ClientInner {
                http,
                api_token: self.api_token,
                zone_id: self.zone_id,
                base_url: self.base_url,
                timeout: self.timeout,
                rate_limiter: self.rate_limit.limiter(),
            }),
        })
    }
}

//! Main TailorClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;
use crate::retry::RetryConfig;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the ERP backend's REST API.
///
/// Cheap to clone (uses `Arc` internally) and safe to move into spawned
/// tasks.
///
/// # Example
///
/// ```ignore
/// use tailor_client::{TailorClient, auth::StaticTokenProvider};
///
/// let client = TailorClient::builder()
///     .url("https://erp.example.com/api")
///     .token_provider(StaticTokenProvider::new("my-token"))
///     .build()?;
///
/// let employees = client.employees().list().await?;
/// ```
#[derive(Clone)]
pub struct TailorClient {
    pub(crate) inner: Arc<TailorClientInner>,
}

pub(crate) struct TailorClientInner {
    pub(crate) base_url: Url,
    token_provider: Option<Arc<dyn TokenProvider>>,
    http_client: Client,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for TailorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TailorClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.inner.token_provider.is_some())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

impl TailorClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> TailorClientBuilder<Missing> {
        TailorClientBuilder::new()
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// URL of a collection, or of one record when `id` is given.
    ///
    /// Path segments are percent-encoded, so ids may contain any character.
    pub(crate) fn endpoint(&self, resource: &str, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.inner.base_url.to_string()))?;
            segments.pop_if_empty().push(resource);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Makes an HTTP request, retrying `GET`s per the retry config.
    ///
    /// Non-2xx responses become [`ApiError::Http`].
    pub(crate) async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<reqwest::Response, Error> {
        let retry_config = &self.inner.retry_config;
        let retryable = method == Method::GET;
        let mut attempts = 0;
        let mut delay = retry_config.initial_delay;

        loop {
            log::debug!("{} {}", method, url);
            let result = self
                .send_request_inner(method.clone(), url.clone(), body.clone())
                .await;

            let can_retry = retryable && attempts < retry_config.max_retries;
            match result {
                Ok(response) => {
                    let status = response.status();

                    if status.as_u16() == 429 {
                        if !can_retry || !retry_config.retry_on_429 {
                            let retry_after = parse_retry_after(&response);
                            return Err(Error::RateLimit { retry_after });
                        }
                        let wait = parse_retry_after(&response).unwrap_or(delay);
                        log::warn!("{} {}: rate limited, retrying in {:?}", method, url, wait);
                        tokio::time::sleep(wait).await;
                        attempts += 1;
                        continue;
                    }

                    if status.is_server_error() && can_retry && retry_config.retry_on_5xx {
                        log::warn!("{} {}: HTTP {}, retrying in {:?}", method, url, status, delay);
                        tokio::time::sleep(delay).await;
                        delay = retry_config.next_delay(delay);
                        attempts += 1;
                        continue;
                    }

                    if status.is_success() {
                        return Ok(response);
                    }

                    let status_code = status.as_u16();
                    let body = response.text().await.unwrap_or_default();
                    log::warn!("{} {}: HTTP {}", method, url, status_code);
                    return Err(ApiError::from_body(status_code, &body).into());
                }
                Err(e) => {
                    let is_network = matches!(
                        &e,
                        Error::Api(ApiError::Network(_) | ApiError::Timeout(_))
                    );

                    if is_network && can_retry && retry_config.retry_on_network {
                        log::warn!("{} {}: {}, retrying in {:?}", method, url, e, delay);
                        tokio::time::sleep(delay).await;
                        delay = retry_config.next_delay(delay);
                        attempts += 1;
                        continue;
                    }

                    return Err(e);
                }
            }
        }
    }

    /// Inner request method without retry logic.
    async fn send_request_inner(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<reqwest::Response, Error> {
        let mut request = self
            .inner
            .http_client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .timeout(self.inner.timeout);

        if let Some(provider) = &self.inner.token_provider {
            let token = provider.get_token().await?;
            request = request.bearer_auth(&token.access_token);
        }

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        request
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, Some(self.inner.timeout)).into())
    }
}

/// Parses the Retry-After header value (seconds).
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("Retry-After")?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`TailorClient`].
///
/// The base URL is required and checked at compile time; `build` is only
/// available once it is set.
///
/// # Example
///
/// ```ignore
/// let client = TailorClient::builder()
///     .url("http://localhost:8080/api")
///     .timeout(Duration::from_secs(10))
///     .retry(RetryConfig::standard())
///     .build()?;
/// ```
pub struct TailorClientBuilder<U> {
    url: U,
    token_provider: Option<Arc<dyn TokenProvider>>,
    timeout: Duration,
    connect_timeout: Option<Duration>,
    retry_config: RetryConfig,
    http_client: Option<Client>,
}

impl TailorClientBuilder<Missing> {
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            retry_config: RetryConfig::default(),
            http_client: None,
        }
    }

    /// Sets the API base URL, e.g. `https://erp.example.com/api`.
    pub fn url(self, url: impl Into<String>) -> TailorClientBuilder<Set<String>> {
        TailorClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            retry_config: self.retry_config,
            http_client: self.http_client,
        }
    }
}

impl Default for TailorClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> TailorClientBuilder<U> {
    /// Sends a bearer token from `provider` with every request.
    pub fn token_provider<T: TokenProvider + 'static>(mut self, provider: T) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the per-request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl TailorClientBuilder<Set<String>> {
    /// Builds the [`TailorClient`].
    ///
    /// Fails if the URL does not parse or cannot carry a path.
    pub fn build(self) -> Result<TailorClient, Error> {
        let raw = self.url.0;
        let base_url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(raw).into());
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::Network)?
            }
        };

        log::debug!("client for {} (timeout {:?})", base_url, self.timeout);
        Ok(TailorClient {
            inner: Arc::new(TailorClientInner {
                base_url,
                token_provider: self.token_provider,
                http_client,
                timeout: self.timeout,
                retry_config: self.retry_config,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> TailorClient {
        TailorClient::builder().url(url).build().unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let c = client("http://localhost:8080/api");
        assert_eq!(
            c.endpoint("employees", None).unwrap().as_str(),
            "http://localhost:8080/api/employees"
        );
        assert_eq!(
            c.endpoint("employees", Some("EMP001")).unwrap().as_str(),
            "http://localhost:8080/api/employees/EMP001"
        );
    }

    #[test]
    fn test_endpoint_trailing_slash_and_encoding() {
        let c = client("http://localhost:8080/api/");
        assert_eq!(
            c.endpoint("opening-balances", Some("a/b c")).unwrap().as_str(),
            "http://localhost:8080/api/opening-balances/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = TailorClient::builder().url("not a url").build().unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::InvalidUrl(_))));

        let err = TailorClient::builder().url("mailto:hr@example.com").build().unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::InvalidUrl(_))));
    }
}

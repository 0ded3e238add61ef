//! Client layer: configuration, request pipeline (build → execute → interpret) and retries.

pub mod error;
pub mod http;
pub mod response;
pub mod retry;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::domain::{ApiKey, SenderId, WorkspaceListParams};
use crate::services::{Campaigns, Messages, Workspaces};

use self::error::BriqError;
use self::http::{HttpMethod, HttpTransport, OutgoingRequest, QueryParams, ReqwestTransport};
use self::response::ApiResponse;
use self::retry::{Backoff, RetryObserver, RetryPolicy, run_with_retry};

pub const DEFAULT_BASE_URL: &str = "https://karibu.briq.tz";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_USER_AGENT: &str = concat!("briq-rs/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
/// Resolved, immutable client configuration.
///
/// The API key is kept private; its `Debug` output is redacted.
pub struct ClientConfig {
    api_key: ApiKey,
    base_url: Url,
    version: String,
    timeout: Duration,
    max_attempts: u32,
    user_agent: String,
    default_sender_id: Option<SenderId>,
}

impl ClientConfig {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Default per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn default_sender_id(&self) -> Option<&SenderId> {
        self.default_sender_id.as_ref()
    }

    /// `<base_url>/<version>/<path>`; one leading `/` on `path` is ignored.
    fn endpoint(&self, path: &str) -> Result<Url, BriqError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.strip_prefix('/').unwrap_or(path);
        let raw = format!("{base}/{}/{path}", self.version);
        Url::parse(&raw).map_err(|err| BriqError::validation(format!("Invalid request URL '{raw}': {err}")))
    }

    fn default_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-Type".to_owned(), "application/json".to_owned()),
            ("X-API-Key".to_owned(), self.api_key.as_str().to_owned()),
            ("User-Agent".to_owned(), self.user_agent.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default)]
/// Per-call overrides.
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: QueryParams,
    /// Per-attempt timeout; falls back to [`ClientConfig::timeout`].
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header. Overrides a default header of the same name (case-insensitive).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
/// A logical API request, relative to `<base_url>/<version>/`.
pub struct Request {
    method: HttpMethod,
    path: String,
    body: Option<Value>,
    options: RequestOptions,
}

impl Request {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    /// Attach a JSON body. Ignored for `GET`.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON body.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, BriqError> {
        let body = serde_json::to_value(body)
            .map_err(|err| BriqError::validation(format!("Invalid request body: {err}")))?;
        Ok(self.body(body))
    }

    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Clone)]
/// Builder for [`BriqClient`].
///
/// Nothing is validated until [`BriqClientBuilder::build`].
pub struct BriqClientBuilder {
    api_key: String,
    base_url: String,
    version: String,
    timeout: Duration,
    max_attempts: u32,
    backoff: Backoff,
    user_agent: Option<String>,
    default_sender_id: Option<String>,
    observer: Option<RetryObserver>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl BriqClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            version: DEFAULT_API_VERSION.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            max_attempts: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::default(),
            user_agent: None,
            default_sender_id: None,
            observer: None,
            transport: None,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// API version path segment, `v1` by default.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Default timeout applied to each attempt (not to the whole retry sequence).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts per request, including the first one.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sender id used by [`Messages::send_instant`] when the request does not set one.
    pub fn default_sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.default_sender_id = Some(sender_id.into());
        self
    }

    pub fn observer(mut self, observer: RetryObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replace the default `reqwest` transport.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<BriqClient, BriqError> {
        let api_key = ApiKey::new(self.api_key)
            .map_err(|err| BriqError::configuration(format!("Invalid API key: {err}")))?;

        let base_url = Url::parse(self.base_url.trim())
            .map_err(|err| BriqError::configuration(format!("Invalid base URL: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(BriqError::configuration(format!(
                "Invalid base URL: unsupported scheme '{}'",
                base_url.scheme()
            )));
        }

        let version = self.version.trim().trim_matches('/').to_owned();
        if version.is_empty() {
            return Err(BriqError::configuration("API version must not be empty"));
        }
        if self.timeout.is_zero() {
            return Err(BriqError::configuration("timeout must be greater than zero"));
        }
        let retry = RetryPolicy::new(self.max_attempts, self.backoff)?;

        let default_sender_id = self
            .default_sender_id
            .map(SenderId::new)
            .transpose()
            .map_err(|err| BriqError::configuration(format!("Invalid default sender id: {err}")))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let client = reqwest::Client::builder().build().map_err(|err| {
                    BriqError::configuration(format!("Failed to build HTTP client: {err}"))
                })?;
                Arc::new(ReqwestTransport::new(client))
            }
        };

        let config = ClientConfig {
            api_key,
            base_url,
            version,
            timeout: self.timeout,
            max_attempts: retry.max_attempts(),
            user_agent: self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            default_sender_id,
        };

        Ok(BriqClient {
            config: Arc::new(config),
            retry,
            observer: self.observer,
            http: transport,
        })
    }
}

impl fmt::Debug for BriqClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BriqClientBuilder")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .field("user_agent", &self.user_agent)
            .field("default_sender_id", &self.default_sender_id)
            .field("observer", &self.observer.is_some())
            .field("transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
/// High-level Briq client.
///
/// Every request goes through the same pipeline: the URL, headers and body are built once,
/// then each attempt sends that request under the per-attempt timeout and interprets the
/// response. Failed attempts are retried according to the [`RetryPolicy`].
///
/// Cloning is cheap; clones share configuration and transport.
pub struct BriqClient {
    config: Arc<ClientConfig>,
    retry: RetryPolicy,
    observer: Option<RetryObserver>,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for BriqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BriqClient")
            .field("config", &self.config)
            .field("retry", &self.retry)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl BriqClient {
    /// Client with default settings for `api_key`.
    pub fn new(api_key: impl Into<String>) -> Result<Self, BriqError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> BriqClientBuilder {
        BriqClientBuilder::new(api_key)
    }

    /// Client configured from `BRIQ_*` environment variables.
    ///
    /// See [`EnvConfig`](crate::config::EnvConfig) for the recognized variables.
    pub fn from_env() -> Result<Self, BriqError> {
        crate::config::EnvConfig::from_env()?.into_builder().build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn workspaces(&self) -> Workspaces<'_> {
        Workspaces::new(self)
    }

    pub fn campaigns(&self) -> Campaigns<'_> {
        Campaigns::new(self)
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    /// `true` if the API accepts the configured key (listing workspaces succeeds).
    pub async fn test_connection(&self) -> bool {
        match self.workspaces().list(&WorkspaceListParams::default()).await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(code = err.code(), error = %err, "connection test failed");
                false
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, BriqError> {
        self.send(Request::new(HttpMethod::Get, path).options(options))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, BriqError> {
        self.send(Request::new(HttpMethod::Post, path).json(body)?.options(options))
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, BriqError> {
        self.send(Request::new(HttpMethod::Put, path).json(body)?.options(options))
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, BriqError> {
        self.send(Request::new(HttpMethod::Patch, path).json(body)?.options(options))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, BriqError> {
        self.send(Request::new(HttpMethod::Delete, path).options(options))
            .await
    }

    /// Send `request` with retries and return the interpreted envelope.
    ///
    /// Errors:
    /// - [`BriqError::Validation`] if the request URL or body cannot be built,
    /// - [`BriqError::Network`] / [`BriqError::Timeout`] when no response arrives,
    /// - the status-mapped variant for non-2xx responses,
    /// - [`BriqError::Server`] for bodies that are not JSON or do not match `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<ApiResponse<T>, BriqError> {
        let timeout = request.options.timeout.unwrap_or(self.config.timeout);
        let outgoing = self.prepare(request)?;
        let label = format!("{} {}", outgoing.method, outgoing.url.path());
        let transport = self.http.as_ref();

        run_with_retry(&self.retry, self.observer.as_ref(), &label, |attempt| {
            let outgoing = outgoing.clone();
            async move {
                tracing::debug!(
                    attempt,
                    method = %outgoing.method,
                    url = %outgoing.url,
                    "sending request"
                );
                let raw = http::execute(transport, outgoing, timeout).await?;
                response::interpret(raw)
            }
        })
        .await
    }

    fn prepare(&self, request: Request) -> Result<OutgoingRequest, BriqError> {
        let Request {
            method,
            path,
            body,
            options,
        } = request;

        let mut url = self.config.endpoint(&path)?;
        options.query.append_to(&mut url);

        let body = match body {
            Some(body) if method.allows_body() => Some(
                serde_json::to_string(&body)
                    .map_err(|err| BriqError::validation(format!("Invalid request body: {err}")))?,
            ),
            _ => None,
        };

        Ok(OutgoingRequest {
            method,
            url,
            headers: merge_headers(self.config.default_headers(), options.headers),
            body,
        })
    }
}

fn merge_headers(
    mut headers: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
) -> Vec<(String, String)> {
    for (name, value) in overrides {
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        headers.push((name, value));
    }
    headers
}

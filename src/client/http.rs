//! HTTP seam: one request in, one response (or transport failure) out.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use super::error::BriqError;

pub type BoxError = Box<dyn StdError + Send + Sync>;
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// GET requests never carry a body.
    pub fn allows_body(self) -> bool {
        self != Self::Get
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Ordered query parameters with scalar values.
///
/// `null` values (including `None` passed to [`QueryParams::push_opt`]) are kept in the
/// list but skipped when the query string is rendered, so one missing value never drops
/// the others.
pub struct QueryParams(Vec<(String, Value)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn push_opt<V: Into<Value>>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        let value = value.map_or(Value::Null, Into::into);
        self.0.push((key.into(), value));
        self
    }

    /// Builder-style [`QueryParams::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    /// Rendered `(key, value)` pairs, nulls removed.
    pub fn pairs(&self) -> Vec<(&str, String)> {
        self.0
            .iter()
            .filter_map(|(key, value)| render_scalar(value).map(|value| (key.as_str(), value)))
            .collect()
    }

    /// `true` when no parameter would be rendered.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, value)| value.is_null())
    }

    /// Append the rendered parameters to `url`. Leaves `url` untouched when nothing renders.
    pub fn append_to(&self, url: &mut Url) {
        let pairs = self.pairs();
        if pairs.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (key, value) in pairs {
            query.append_pair(key, &value);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(value) => Some(value.clone()),
        Value::Bool(value) => Some(value.to_string()),
        Value::Number(value) => Some(value.to_string()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A fully resolved request: absolute URL with query, merged headers, serialized body.
pub struct OutgoingRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl OutgoingRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Capability to perform exactly one HTTP round-trip.
///
/// Implementations must not retry and must not apply their own interpretation of the
/// status code; both are handled by [`BriqClient`](crate::BriqClient).
pub trait HttpTransport: Send + Sync {
    fn send<'a>(&'a self, request: OutgoingRequest) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
/// Default transport backed by [`reqwest::Client`].
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(&'a self, request: OutgoingRequest) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let mut builder = self.client.request(request.method.into(), request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_owned(), value.to_owned()))
                })
                .collect();
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}

/// Perform one attempt bounded by `timeout`.
///
/// When the timeout fires first, the in-flight transport future is dropped, which
/// cancels the attempt and releases its timer.
pub(crate) async fn execute(
    transport: &dyn HttpTransport,
    request: OutgoingRequest,
    timeout: Duration,
) -> Result<HttpResponse, BriqError> {
    let method = request.method;
    let url = request.url.clone();

    match tokio::time::timeout(timeout, transport.send(request)).await {
        Ok(Ok(response)) => {
            tracing::debug!(%method, %url, status = response.status, "received response");
            Ok(response)
        }
        Ok(Err(err)) => {
            tracing::debug!(%method, %url, error = %err, "transport failure");
            Err(BriqError::network("Network request failed", &err))
        }
        Err(_) => {
            tracing::error!(
                %method,
                %url,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "request timeout"
            );
            Err(BriqError::Timeout { timeout })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use serde_json::json;

    use super::*;
    use crate::client::error::ErrorKind;

    struct PendingTransport {
        dropped: Arc<AtomicBool>,
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    impl HttpTransport for PendingTransport {
        fn send<'a>(&'a self, _request: OutgoingRequest) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
            let flag = DropFlag(Arc::clone(&self.dropped));
            Box::pin(async move {
                let _flag = flag;
                std::future::pending::<()>().await;
                Ok(HttpResponse::new(200, "{}"))
            })
        }
    }

    struct FailingTransport;

    impl HttpTransport for FailingTransport {
        fn send<'a>(&'a self, _request: OutgoingRequest) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
            Box::pin(async {
                Err(Box::new(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
                    as BoxError)
            })
        }
    }

    fn request() -> OutgoingRequest {
        OutgoingRequest {
            method: HttpMethod::Get,
            url: Url::parse("https://example.invalid/v1/workspace/all/").unwrap(),
            headers: vec![("X-API-Key".to_owned(), "key".to_owned())],
            body: None,
        }
    }

    #[test]
    fn query_drops_null_entries_individually() {
        let mut query = QueryParams::new();
        query
            .push("a", 1)
            .push_opt("b", None::<i64>)
            .push("c", Value::Null)
            .push("d", "x");

        let mut url = Url::parse("https://example.invalid/v1/message/logs").unwrap();
        query.append_to(&mut url);
        assert_eq!(url.query(), Some("a=1&d=x"));
        assert!(!query.is_empty());
    }

    #[test]
    fn query_with_only_nulls_leaves_url_untouched() {
        let query: QueryParams = [("a", Value::Null), ("b", json!(null))].into_iter().collect();
        assert!(query.is_empty());

        let mut url = Url::parse("https://example.invalid/v1/workspace/all/").unwrap();
        query.append_to(&mut url);
        assert_eq!(url.as_str(), "https://example.invalid/v1/workspace/all/");
    }

    #[test]
    fn query_renders_scalars_and_encodes_values() {
        let query = QueryParams::new()
            .with("flag", true)
            .with("ratio", 0.5)
            .with("search", "a b&c");
        let mut url = Url::parse("https://example.invalid/").unwrap();
        query.append_to(&mut url);
        assert_eq!(url.query(), Some("flag=true&ratio=0.5&search=a+b%26c"));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(429, "").with_header("retry-after", "30");
        assert_eq!(response.header("Retry-After"), Some("30"));
        assert_eq!(request().header("x-api-key"), Some("key"));
        assert_eq!(response.header("missing"), None);
    }

    #[test]
    fn only_get_forbids_a_body() {
        assert!(!HttpMethod::Get.allows_body());
        for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch, HttpMethod::Delete] {
            assert!(method.allows_body(), "{method}");
        }
        assert_eq!(reqwest::Method::from(HttpMethod::Patch), reqwest::Method::PATCH);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_cancels_the_attempt() {
        let dropped = Arc::new(AtomicBool::new(false));
        let transport = PendingTransport {
            dropped: Arc::clone(&dropped),
        };

        let err = execute(&transport, request(), Duration::from_millis(5000))
            .await
            .unwrap_err();

        match err {
            BriqError::Timeout { timeout } => assert_eq!(timeout, Duration::from_millis(5000)),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn transport_failure_becomes_network_error() {
        let err = execute(&FailingTransport, request(), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.to_string(), "Network request failed");
        assert_eq!(
            err.details().unwrap()["originalError"],
            "connection refused"
        );
    }
}

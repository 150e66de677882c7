//! Transport abstraction behind the provider adapters.
//!
//! Adapters talk to [`HttpClient`] rather than a concrete client so the
//! request/response layer can be swapped in tests and in mock mode. Only GET
//! is modeled; the consumed provider endpoints are all read-only.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

const DEFAULT_TIMEOUT_MS: u64 = 3_000;
const USER_AGENT: &str = "tickwatch/0.1.0";

/// A single GET request with optional headers and a per-request timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Raw response body plus status, decoded lazily by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON after checking the status.
    ///
    /// # Errors
    ///
    /// Non-2xx statuses and undecodable bodies both map to [`HttpError`];
    /// only the former is marked retryable (and only for 429/5xx).
    pub fn ok_json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        if !self.is_success() {
            return Err(HttpError {
                message: format!("unexpected http status {}", self.status),
                status: Some(self.status),
                retryable: self.status == 429 || self.status >= 500,
            });
        }

        serde_json::from_str(&self.body).map_err(|error| HttpError {
            message: format!("failed to decode response body: {error}"),
            status: Some(self.status),
            retryable: false,
        })
    }
}

/// Transport-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub message: String,
    pub status: Option<u16>,
    pub retryable: bool,
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Minimal async HTTP client seam.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

    /// True when the implementation never touches the network. Adapters use
    /// this to switch into deterministic offline behavior.
    fn is_mock(&self) -> bool {
        false
    }
}

/// Client that refuses every request; paired with adapter mock mode so no
/// request ever escapes an offline run.
#[derive(Debug, Default, Clone)]
pub struct NoopHttpClient;

impl HttpClient for NoopHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            Err(HttpError {
                message: format!("network disabled, refusing request to {}", request.url),
                status: None,
                retryable: false,
            })
        })
    }

    fn is_mock(&self) -> bool {
        true
    }
}

/// Production client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    inner: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    /// # Errors
    ///
    /// Fails only if the underlying client cannot be constructed.
    pub fn new() -> Result<Self, HttpError> {
        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| HttpError {
                message: format!("failed to build http client: {error}"),
                status: None,
                retryable: false,
            })?;
        Ok(Self {
            inner: Arc::new(inner),
        })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let client = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut builder = client
                .get(&request.url)
                .timeout(Duration::from_millis(request.timeout_ms));
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let response = builder.send().await.map_err(|error| HttpError {
                message: format!("request to {} failed: {error}", request.url),
                status: None,
                retryable: error.is_timeout() || error.is_connect(),
            })?;

            let status = response.status().as_u16();
            let body = response.text().await.map_err(|error| HttpError {
                message: format!("failed to read response body: {error}"),
                status: Some(status),
                retryable: false,
            })?;

            Ok(HttpResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn get_builder_applies_headers_and_timeout() {
        let request = HttpRequest::get("https://example.test/chart")
            .with_header("accept", "application/json")
            .with_timeout_ms(500);

        assert_eq!(request.timeout_ms, 500);
        assert_eq!(
            request.headers.get("accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn ok_json_decodes_success_body() {
        let response = HttpResponse {
            status: 200,
            body: r#"{"value":7}"#.to_owned(),
        };
        let payload: Payload = response.ok_json().expect("decodes");
        assert_eq!(payload.value, 7);
    }

    #[test]
    fn ok_json_flags_throttling_as_retryable() {
        let response = HttpResponse {
            status: 429,
            body: String::new(),
        };
        let error = response.ok_json::<Payload>().expect_err("must fail");
        assert_eq!(error.status, Some(429));
        assert!(error.retryable);
    }

    #[test]
    fn ok_json_rejects_undecodable_body() {
        let response = HttpResponse {
            status: 200,
            body: "not json".to_owned(),
        };
        let error = response.ok_json::<Payload>().expect_err("must fail");
        assert!(!error.retryable);
    }

    #[tokio::test]
    async fn noop_client_refuses_requests() {
        let client = NoopHttpClient;
        let error = client
            .execute(HttpRequest::get("https://example.test"))
            .await
            .expect_err("noop must refuse");
        assert!(error.message.contains("network disabled"));
        assert!(client.is_mock());
    }
}

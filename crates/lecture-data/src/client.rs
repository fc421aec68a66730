//! HTTP client with interceptors and a pluggable transport.

use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::{BearerAuth, RequestInterceptor, StaticToken};
use crate::config::ApiConfig;
use crate::transport::{HttpTransport, Transport};
use crate::{FetchError, RequestBuilder, Response};

/// HTTP client for the listing API.
///
/// Relative paths are resolved against the base URL. Default headers are
/// applied first, then each interceptor in registration order.
#[derive(Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    transport: Arc<dyn Transport>,
}

impl FetchClient {
    /// Create a client over the given transport.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            base_url: None,
            default_headers: HashMap::new(),
            interceptors: Vec::new(),
            transport: Arc::new(transport),
        }
    }

    /// Build a reqwest-backed client from configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(config.timeout())?;
        let token = match &config.bearer_token {
            Some(token) => StaticToken::new(token.clone()),
            None => StaticToken::none(),
        };

        Ok(Self::new(transport)
            .with_base_url(config.base_url.clone())
            .with_default_header("Accept", "application/json")
            .with_interceptor(BearerAuth::new(token)))
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Register an interceptor run on every request.
    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };

        let mut builder = RequestBuilder::get(full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }

    async fn execute(&self, mut request: RequestBuilder) -> Result<Response, FetchError> {
        for interceptor in &self.interceptors {
            request = interceptor.intercept(request);
        }
        self.transport.send(request).await
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    builder: RequestBuilder,
}

impl ClientRequestBuilder<'_> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append query parameters.
    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.query_pairs(pairs);
        self
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        self.client.execute(self.builder).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<RequestBuilder>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
            self.seen.lock().unwrap().push(request);
            Ok(Response::new(204, HashMap::new(), Vec::new()))
        }
    }

    struct Tag(&'static str);

    impl RequestInterceptor for Tag {
        fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
            let prev = request.headers().get("X-Tags").cloned().unwrap_or_default();
            request.header("X-Tags", format!("{}{}", prev, self.0))
        }
    }

    #[tokio::test]
    async fn test_base_url_and_default_headers() {
        let recorder = Arc::new(Recorder::default());
        let client = FetchClient::new(recorder.clone())
            .with_base_url("http://api.test/")
            .with_default_header("Accept", "application/json");

        client
            .get("/lectures")
            .query_pairs([("page", "1")])
            .send()
            .await
            .unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[0].full_url(), "http://api.test/lectures?page=1");
        assert_eq!(seen[0].headers().get("Accept").unwrap(), "application/json");
    }

    #[tokio::test]
    async fn test_absolute_url_ignores_base() {
        let recorder = Arc::new(Recorder::default());
        let client = FetchClient::new(recorder.clone()).with_base_url("http://api.test");

        client.get("https://other.test/x").send().await.unwrap();
        assert_eq!(recorder.seen.lock().unwrap()[0].url(), "https://other.test/x");
    }

    #[tokio::test]
    async fn test_interceptors_run_in_order() {
        let recorder = Arc::new(Recorder::default());
        let client = FetchClient::new(recorder.clone())
            .with_interceptor(Tag("a"))
            .with_interceptor(Tag("b"));

        client.get("/x").send().await.unwrap();
        assert_eq!(
            recorder.seen.lock().unwrap()[0].headers().get("X-Tags").unwrap(),
            "ab"
        );
    }

    #[tokio::test]
    async fn test_bearer_interceptor_from_token() {
        let recorder = Arc::new(Recorder::default());
        let client =
            FetchClient::new(recorder.clone()).with_interceptor(BearerAuth::new(StaticToken::new("t0k")));

        client.get("/lectures").send().await.unwrap();
        assert_eq!(
            recorder.seen.lock().unwrap()[0]
                .headers()
                .get("Authorization")
                .unwrap(),
            "Bearer t0k"
        );
    }

    #[test]
    fn test_from_config_builds() {
        let config = ApiConfig {
            bearer_token: Some("abc".into()),
            timeout_ms: Some(1000),
            ..ApiConfig::default()
        };
        assert!(FetchClient::from_config(&config).is_ok());
    }
}

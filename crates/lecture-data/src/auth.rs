//! Request interceptors and bearer-token injection.

use crate::RequestBuilder;

/// Supplies the current access token, if the user has one.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// A fixed token, typically read from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// Provider that never yields a token.
    pub fn none() -> Self {
        Self(None)
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone().filter(|t| !t.is_empty())
    }
}

/// Rewrites a request before it is sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Adds `Authorization: Bearer <token>` when the provider has a token.
///
/// Requests that already carry an `Authorization` header are left alone.
pub struct BearerAuth<P> {
    provider: P,
}

impl<P: TokenProvider> BearerAuth<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: TokenProvider> RequestInterceptor for BearerAuth<P> {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        if request.has_header("Authorization") {
            return request;
        }
        match self.provider.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

use std::error::Error;
use std::fmt::Debug;
use std::sync::Arc;

pub type TokenError = Box<dyn Error + Send + Sync>;

pub trait TokenSource: Send + Sync + Debug {
    /// token returns the value of the `Authorization` header, e.g. `Bearer ya29...`.
    /// An empty string means the request is sent without an `Authorization` header.
    fn token(&self) -> Result<String, TokenError>;
}

pub trait TokenSourceProvider: Send + Sync + Debug {
    /// token returns the token source implementation
    fn token_source(&self) -> Arc<dyn TokenSource>;
}

/// A token source that always returns the same header value.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    value: String,
}

impl StaticTokenSource {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// Builds a `Bearer` token source from a raw access token.
    pub fn bearer(access_token: &str) -> Self {
        Self::new(format!("Bearer {access_token}"))
    }
}

impl TokenSource for StaticTokenSource {
    fn token(&self) -> Result<String, TokenError> {
        Ok(self.value.clone())
    }
}

#[derive(Debug, Clone)]
pub struct StaticTokenSourceProvider {
    source: Arc<StaticTokenSource>,
}

impl StaticTokenSourceProvider {
    pub fn new(source: StaticTokenSource) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

impl TokenSourceProvider for StaticTokenSourceProvider {
    fn token_source(&self) -> Arc<dyn TokenSource> {
        self.source.clone()
    }
}

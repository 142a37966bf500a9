use std::sync::Arc;

use google_cloud_token::{TokenError, TokenSource, TokenSourceProvider};

/// Sends requests without an `Authorization` header.
#[derive(Debug, Clone)]
pub struct AnonymousTokenSource {}

impl TokenSource for AnonymousTokenSource {
    fn token(&self) -> Result<String, TokenError> {
        Ok("".to_string())
    }
}

#[derive(Debug)]
pub struct AnonymousTokenSourceProvider {}

impl TokenSourceProvider for AnonymousTokenSourceProvider {
    fn token_source(&self) -> Arc<dyn TokenSource> {
        Arc::new(AnonymousTokenSource {})
    }
}

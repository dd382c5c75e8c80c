//! Auth bridge boundary.
//!
//! The identity provider's login/redirect flow lives outside this crate;
//! the store only consumes an opaque async capability that yields bearer
//! tokens, and derives from it the request configuration every
//! authenticated call carries.

use std::future::Future;
use std::pin::Pin;

use crate::error::CoreError;

/// Capability for acquiring bearer tokens from the identity provider.
///
/// Implementations wrap whatever login machinery the embedding application
/// uses. Returning `CoreError::Auth` signals that acquisition failed.
pub trait TokenProvider: Send + Sync {
    /// Acquires a bearer token for the signed-in user.
    fn get_token(&self) -> Pin<Box<dyn Future<Output = Result<String, CoreError>> + Send + '_>>;
}

/// Request configuration derived from an acquired token.
///
/// Memoized by the store for the session and re-derived after an auth
/// failure.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    token: String,
}

impl RequestConfig {
    /// Derives a config from a bearer token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The raw bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The full `Authorization` header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Provider returning a fixed token.
///
/// Useful for tests and for embedders that already hold a token.
pub struct FixedTokenProvider {
    token: String,
}

impl FixedTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for FixedTokenProvider {
    fn get_token(&self) -> Pin<Box<dyn Future<Output = Result<String, CoreError>> + Send + '_>> {
        let token = self.token.clone();
        Box::pin(async move { Ok(token) })
    }
}

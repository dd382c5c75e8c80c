//! Write-through synchronization layer.
//!
//! Local state is mutated first, then the same change is sent to the
//! server. The store owns the request lifecycle: auth-config memoization,
//! the loading flag, and the single-entry shared-link cache.

pub mod api_client;
pub mod auth;
pub mod store;

#[cfg(test)]
mod api_client_tests;

pub use api_client::ApiClient;
pub use auth::{FixedTokenProvider, RequestConfig, TokenProvider};
pub use store::{SharedCacheEntry, StoreState, SyncStore};

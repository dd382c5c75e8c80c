//! # AdventRunner Core Library
//!
//! Client-side state and synchronization layer for the AdventRunner advent
//! calendar tracker. Users own one or more yearly calendars, each with
//! numbered doors carrying a target distance and a progress state; this
//! crate holds the in-memory data model, the mutation rules that keep local
//! state consistent, and the write-through protocol to the remote API,
//! including shared (publicly readable) calendars.
//!
//! The view layer, routing, and the identity provider's login flow live in
//! the embedding application; token acquisition is consumed here as an
//! opaque async capability ([`TokenProvider`]).
//!
//! ## Key components
//!
//! - [`SyncStore`]: session-scoped state container and synchronized
//!   operations
//! - [`ApiClient`]: thin wrapper over the backend's HTTP surface
//! - [`UserData`] / [`Calendar`]: the wire data model
//! - [`TaggedOption`]: codec for the backend's tagged-union encoding

pub mod calendar;
pub mod config;
pub mod error;
pub mod sync;

pub use calendar::{
    Calendar, DisplayType, Door, DoorState, Owner, Settings, SharedLinkResponse, TaggedOption,
    UserData, SENTINEL_PERIOD,
};
pub use config::Config;
pub use error::{ConfigError, CoreError};
pub use sync::{
    ApiClient, FixedTokenProvider, RequestConfig, SharedCacheEntry, StoreState, SyncStore,
    TokenProvider,
};

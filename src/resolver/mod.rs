//! Identity resolution.
//!
//! Maps transport-level user handles to canonical usernames. The router
//! resolves the sender before any handler runs; the transfer handler
//! resolves its target the same way. The display text of a [`ResolveError`]
//! is what the end user sees when resolution fails.

pub mod roster;

pub use roster::RosterResolver;

use async_trait::async_trait;
use thiserror::Error;

/// Identity resolution errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown handle: {0}")]
    UnknownHandle(String),

    #[error("identity lookup failed: {0}")]
    Backend(String),
}

/// Maps a transport-level handle to a canonical username.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve `handle` to a canonical username.
    async fn resolve(&self, handle: &str) -> Result<String, ResolveError>;
}

//! Config-backed identity resolver.

use super::{IdentityResolver, ResolveError};
use async_trait::async_trait;
use std::collections::HashMap;

/// Resolver backed by the static roster from the config file.
///
/// The roster maps transport handles to canonical usernames. A canonical
/// username also resolves to itself, so mention targets that already use
/// the canonical name (e.g. `@alice`) do not need a roster entry of their
/// own.
pub struct RosterResolver {
    roster: HashMap<String, String>,
}

impl RosterResolver {
    /// Create a resolver over a handle -> username map.
    pub fn new(roster: HashMap<String, String>) -> Self {
        Self { roster }
    }
}

#[async_trait]
impl IdentityResolver for RosterResolver {
    async fn resolve(&self, handle: &str) -> Result<String, ResolveError> {
        if let Some(username) = self.roster.get(handle) {
            return Ok(username.clone());
        }
        if self.roster.values().any(|u| u == handle) {
            return Ok(handle.to_string());
        }
        Err(ResolveError::UnknownHandle(handle.to_string()))
    }
}

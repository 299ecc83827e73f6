use std::collections::HashMap;
use std::sync::RwLock;

use crate::client_version::ClientVersion;

/// Resolved metadata keyed by channel name exactly as the caller gave it.
///
/// Entries live as long as the cache; there is no expiry or eviction.
#[derive(Debug, Default)]
pub struct VersionCache {
    entries: RwLock<HashMap<String, ClientVersion>>,
}

impl VersionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, channel: &str) -> Option<ClientVersion> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(channel)
            .cloned()
    }

    /// Store `value` under `channel`, replacing any previous entry.
    pub fn put(&self, channel: &str, value: ClientVersion) {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(channel.to_string(), value);
    }
}

use log::{info, warn};
use tokio::sync::OnceCell;

use crate::error::DeployError;
use crate::transport::HttpTransport;

/// Deployment origins serving identical artifacts, in probe order.
pub const DEFAULT_MIRRORS: [&str; 3] = [
    "https://setup.rbxcdn.com",
    "https://setup-ak.rbxcdn.com",
    "https://s3.amazonaws.com/setup.roblox.com",
];

/// Resource requested from each origin to test reachability.
pub const PROBE_RESOURCE: &str = "/version";

/// Picks the first reachable origin and keeps it for the process lifetime.
///
/// Concurrent first callers share a single probe sequence. Once an origin is
/// pinned it is never probed again. If every origin fails nothing is pinned
/// and the next call probes from the start.
#[derive(Debug)]
pub struct MirrorSelector {
    origins: Vec<String>,
    pinned: OnceCell<String>,
}

impl MirrorSelector {
    #[must_use]
    pub fn new(origins: Vec<String>) -> Self {
        Self {
            origins: origins
                .into_iter()
                .map(|origin| origin.trim_end_matches('/').to_string())
                .collect(),
            pinned: OnceCell::new(),
        }
    }

    /// The pinned origin, without probing.
    #[must_use]
    pub fn pinned(&self) -> Option<&str> {
        self.pinned.get().map(String::as_str)
    }

    /// Return the pinned origin, probing the configured list on first use.
    ///
    /// # Errors
    /// Returns [`DeployError::NoReachableOrigin`] when every origin fails the
    /// probe with a transport error.
    pub async fn resolve_base_origin(
        &self,
        transport: &dyn HttpTransport,
    ) -> Result<&str, DeployError> {
        self.pinned
            .get_or_try_init(|| self.probe(transport))
            .await
            .map(String::as_str)
    }

    async fn probe(&self, transport: &dyn HttpTransport) -> Result<String, DeployError> {
        for origin in &self.origins {
            info!("Testing connection to '{origin}'...");

            match transport.get(&format!("{origin}{PROBE_RESOURCE}")).await {
                Ok(response) => {
                    info!(
                        "Connection to '{origin}' successful (HTTP {})",
                        response.status
                    );
                    return Ok(origin.clone());
                }
                Err(error) => {
                    warn!("Connection to '{origin}' failed: {error}");
                }
            }
        }

        Err(DeployError::NoReachableOrigin {
            attempted: self.origins.clone(),
        })
    }
}

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use log::{debug, info, warn};
use reqwest::Url;
use reqwest::header::LAST_MODIFIED;

use crate::cache::VersionCache;
use crate::client_version::ClientVersion;
use crate::compare::is_behind;
use crate::error::DeployError;
use crate::location::{DEFAULT_CHANNEL, build_location, is_default_channel};
use crate::mirror::{DEFAULT_MIRRORS, MirrorSelector};
use crate::transport::{HttpResponse, HttpTransport, TransportError};

/// Version metadata hosts. Later entries are only tried when earlier ones
/// cannot be reached at all.
pub const DEFAULT_METADATA_ENDPOINTS: [&str; 2] = [
    "https://clientsettingscdn.roblox.com",
    "https://clientsettings.roblox.com",
];

const METADATA_SEGMENTS: [&str; 4] = ["v2", "client-version", "WindowsPlayer", "channel"];

type InfoFuture<'a> = Pin<Box<dyn Future<Output = Result<ClientVersion, DeployError>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Channel used by [`DeploymentResolver::location`] when none is given.
    pub fallback_channel: String,
    pub mirrors: Vec<String>,
    pub metadata_endpoints: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_channel: DEFAULT_CHANNEL.to_string(),
            mirrors: DEFAULT_MIRRORS.iter().map(ToString::to_string).collect(),
            metadata_endpoints: DEFAULT_METADATA_ENDPOINTS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn with_fallback_channel(mut self, channel: impl Into<String>) -> Self {
        self.fallback_channel = channel.into();
        self
    }

    #[must_use]
    pub fn with_mirrors(mut self, mirrors: Vec<String>) -> Self {
        self.mirrors = mirrors;
        self
    }

    #[must_use]
    pub fn with_metadata_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.metadata_endpoints = endpoints;
        self
    }
}

/// Resolves channel deployment metadata, owning the pinned mirror and the
/// channel cache. Build one per process and share it.
pub struct DeploymentResolver {
    transport: Arc<dyn HttpTransport>,
    mirrors: MirrorSelector,
    metadata_endpoints: Vec<String>,
    fallback_channel: String,
    cache: VersionCache,
}

impl DeploymentResolver {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, config: ResolverConfig) -> Self {
        Self {
            transport,
            mirrors: MirrorSelector::new(config.mirrors),
            metadata_endpoints: config
                .metadata_endpoints
                .into_iter()
                .map(|endpoint| endpoint.trim_end_matches('/').to_string())
                .collect(),
            fallback_channel: config.fallback_channel,
            cache: VersionCache::new(),
        }
    }

    #[must_use]
    pub fn fallback_channel(&self) -> &str {
        &self.fallback_channel
    }

    #[must_use]
    pub fn cached(&self, channel: &str) -> Option<ClientVersion> {
        self.cache.get(channel)
    }

    /// The pinned deployment origin, probing mirrors on first use.
    ///
    /// # Errors
    /// Returns [`DeployError::NoReachableOrigin`] when no mirror responds.
    pub async fn base_origin(&self) -> Result<&str, DeployError> {
        self.mirrors
            .resolve_base_origin(self.transport.as_ref())
            .await
    }

    /// Full URL of `resource` on the pinned origin for `channel`.
    ///
    /// An absent or empty channel means the configured fallback channel.
    ///
    /// # Errors
    /// Returns [`DeployError::NoReachableOrigin`] when no origin is pinned yet
    /// and no mirror responds.
    pub async fn location(
        &self,
        resource: &str,
        channel: Option<&str>,
    ) -> Result<String, DeployError> {
        let channel = channel
            .filter(|channel| !channel.is_empty())
            .unwrap_or(self.fallback_channel.as_str());
        let origin = self.base_origin().await?;
        Ok(build_location(origin, resource, channel))
    }

    /// Deployment metadata for `channel`.
    ///
    /// Cached entries are reused, but staleness against the default channel is
    /// recomputed and a missing timestamp is fetched when `want_extra_info`
    /// is set. Timestamp lookup failures leave the timestamp empty.
    ///
    /// # Errors
    /// Returns an error when no metadata endpoint is reachable, when the
    /// endpoint rejects the channel, when its response cannot be parsed, or
    /// when a timestamp is wanted and no mirror is reachable.
    pub fn get_info<'a>(&'a self, channel: &'a str, want_extra_info: bool) -> InfoFuture<'a> {
        Box::pin(async move {
            info!("Getting deploy info for channel {channel} (want_extra_info={want_extra_info})");

            let mut client_version = if let Some(cached) = self.cache.get(channel) {
                debug!("Deploy info for channel {channel} is cached");
                cached
            } else {
                self.fetch_client_version(channel).await?
            };

            if is_default_channel(channel) {
                client_version.is_behind_default_channel = false;
            } else {
                let default_version = self.get_info(DEFAULT_CHANNEL, false).await?;
                client_version.is_behind_default_channel =
                    is_behind(&client_version.version, &default_version.version);
            }

            if want_extra_info && client_version.timestamp.is_none() {
                client_version.timestamp =
                    self.fetch_release_timestamp(channel, &client_version).await?;
            }

            self.cache.put(channel, client_version.clone());

            Ok(client_version)
        })
    }

    async fn fetch_client_version(&self, channel: &str) -> Result<ClientVersion, DeployError> {
        let response = self.fetch_metadata(channel).await?;

        if !response.status.is_success() {
            warn!(
                "Failed to fetch deploy info for channel {channel}: HTTP {}, response: {}",
                response.status, response.body
            );
            return Err(DeployError::RemoteFetch {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|source| DeployError::Parse { source })
    }

    async fn fetch_metadata(&self, channel: &str) -> Result<HttpResponse, DeployError> {
        let mut last_error = None;

        for endpoint in &self.metadata_endpoints {
            let response = match metadata_url(endpoint, channel) {
                Ok(url) => self.transport.get(&url).await,
                Err(error) => Err(error),
            };
            match response {
                Ok(response) => return Ok(response),
                Err(error) => {
                    warn!("Failed to contact {endpoint}, trying next endpoint: {error}");
                    last_error = Some(error);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| TransportError::new(channel, "no metadata endpoints configured"))
            .into())
    }

    async fn fetch_release_timestamp(
        &self,
        channel: &str,
        client_version: &ClientVersion,
    ) -> Result<Option<DateTime<Local>>, DeployError> {
        debug!("Getting extra information for channel {channel}");

        let manifest_url = self
            .location(&client_version.manifest_resource(), Some(channel))
            .await?;

        let response = match self.transport.get(&manifest_url).await {
            Ok(response) => response,
            Err(error) => {
                warn!("Failed to fetch package manifest: {error}");
                return Ok(None);
            }
        };

        let Some(last_modified) = response.header(LAST_MODIFIED.as_str()) else {
            debug!("{manifest_url} has no Last-Modified header");
            return Ok(None);
        };

        debug!("{manifest_url} - Last-Modified: {last_modified}");

        let timestamp = parse_last_modified(last_modified);
        if timestamp.is_none() {
            warn!("Cannot parse Last-Modified value '{last_modified}'");
        }
        Ok(timestamp)
    }
}

/// Metadata URL for `channel` under `endpoint`, with the channel encoded as
/// a single path segment.
fn metadata_url(endpoint: &str, channel: &str) -> Result<String, TransportError> {
    let mut url = Url::parse(endpoint).map_err(|e| TransportError::from_error(endpoint, e))?;
    url.path_segments_mut()
        .map_err(|()| TransportError::new(endpoint, "endpoint cannot be a base URL"))?
        .pop_if_empty()
        .extend(METADATA_SEGMENTS)
        .push(channel);
    Ok(url.into())
}

/// Parse an HTTP date (RFC 1123, RFC 850 or asctime) into local time. The
/// weekday is not checked.
fn parse_last_modified(value: &str) -> Option<DateTime<Local>> {
    let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
    let after_weekday = value
        .split_once(',')
        .map_or(value.as_str(), |(_, rest)| rest.trim_start());

    DateTime::parse_from_rfc2822(after_weekday)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(after_weekday, "%d-%b-%y %H:%M:%S GMT")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            let (_, asctime) = value.split_once(' ')?;
            NaiveDateTime::parse_from_str(asctime, "%b %d %H:%M:%S %Y")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .map(|timestamp| timestamp.with_timezone(&Local))
}

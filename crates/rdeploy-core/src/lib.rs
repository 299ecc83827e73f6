//! Deployment metadata lookup for release channels.
//!
//! This crate resolves what build a release channel currently publishes:
//! - Mirror selection across interchangeable deployment origins.
//! - Version metadata lookup with a primary and a fallback endpoint.
//! - A per-process cache of resolved channels.
//! - Staleness against the default channel and release timestamp enrichment.

mod cache;
mod client_version;
mod compare;
mod error;
mod location;
mod mirror;
mod resolver;
mod transport;

#[cfg(test)]
mod testing;

/// Per-channel store of resolved metadata.
pub use cache::VersionCache;
/// Resolved deployment metadata model.
pub use client_version::ClientVersion;
/// Version ordering helpers.
pub use compare::{compare_versions, is_behind};
/// Lookup error taxonomy.
pub use error::DeployError;
/// Resource URL composition and channel helpers.
pub use location::{DEFAULT_CHANNEL, build_location, is_default_channel};
/// Origin probing and pinning.
pub use mirror::{DEFAULT_MIRRORS, MirrorSelector, PROBE_RESOURCE};
/// Lookup orchestration.
pub use resolver::{DEFAULT_METADATA_ENDPOINTS, DeploymentResolver, ResolverConfig};
/// HTTP seam and its reqwest implementation.
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};

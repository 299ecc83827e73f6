use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use rdeploy_core::{DEFAULT_CHANNEL, ResolverConfig};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::paths::AppPaths;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Channel looked up when none is given on the command line.
    #[serde(default = "default_channel")]
    pub channel: String,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,

    #[serde(default)]
    pub mirrors: Option<Vec<String>>,

    #[serde(default)]
    pub metadata_endpoints: Option<Vec<String>>,
}

fn default_channel() -> String {
    DEFAULT_CHANNEL.to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            http_timeout_secs: default_http_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
            mirrors: None,
            metadata_endpoints: None,
        }
    }
}

impl AppSettings {
    /// Read the settings file. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error when the config directory is unknown, or the file
    /// exists but cannot be read or parsed.
    pub fn load() -> Result<Self, SettingsError> {
        let paths = AppPaths::new()?;
        Self::load_from_path(&paths.settings_file())
    }

    fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| SettingsError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Resolver configuration, with overrides applied on top of the built-in
    /// mirrors and endpoints.
    #[must_use]
    pub fn resolver_config(&self) -> ResolverConfig {
        let mut config = ResolverConfig::default().with_fallback_channel(self.channel.clone());

        if let Some(mirrors) = self.mirrors.clone().filter(|list| !list.is_empty()) {
            config = config.with_mirrors(mirrors);
        }
        if let Some(endpoints) = self
            .metadata_endpoints
            .clone()
            .filter(|list| !list.is_empty())
        {
            config = config.with_metadata_endpoints(endpoints);
        }

        config
    }
}

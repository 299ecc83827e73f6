use std::path::PathBuf;

use thiserror::Error;

use crate::paths::AppPathsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("deploy lookup for channel {channel} failed: {source}")]
    Lookup {
        channel: String,
        #[source]
        source: rdeploy_core::DeployError,
    },

    #[error("failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Paths(#[from] AppPathsError),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl AppError {
    pub fn lookup(channel: impl Into<String>, source: rdeploy_core::DeployError) -> Self {
        Self::Lookup {
            channel: channel.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use rdeploy_core::{DeployError, TransportError};

    use super::AppError;

    #[test]
    fn lookup_error_names_channel() {
        let error = AppError::lookup(
            "zbeta",
            DeployError::from(TransportError::new("https://a.test", "timed out")),
        );

        assert_eq!(
            error.to_string(),
            "deploy lookup for channel zbeta failed: request to https://a.test failed: timed out"
        );
    }
}

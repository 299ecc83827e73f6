use reqwest::StatusCode;
use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("unable to find an accessible deployment mirror (tried {})", .attempted.join(", "))]
    NoReachableOrigin { attempted: Vec<String> },

    #[error("failed to fetch deploy info: HTTP {status}{}", body_snippet(.body))]
    RemoteFetch { status: StatusCode, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to parse deploy info: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}

impl DeployError {
    /// Upstream HTTP status for metadata rejections.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RemoteFetch { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

fn body_snippet(body: &str) -> String {
    let snippet: String = body.chars().take(160).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}

#[cfg(test)]
mod tests {
    use super::{DeployError, StatusCode, TransportError};

    #[test]
    fn remote_fetch_display_includes_status_and_body() {
        let error = DeployError::RemoteFetch {
            status: StatusCode::NOT_FOUND,
            body: "Could not find version details for binaryType.".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "failed to fetch deploy info: HTTP 404 Not Found: Could not find version details for binaryType."
        );
        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn remote_fetch_display_omits_empty_body() {
        let error = DeployError::RemoteFetch {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };

        assert_eq!(
            error.to_string(),
            "failed to fetch deploy info: HTTP 500 Internal Server Error"
        );
    }

    #[test]
    fn transport_conversion_keeps_details() {
        let error = DeployError::from(TransportError::new("https://a.test", "timed out"));

        assert!(error.is_transport());
        assert!(error.status().is_none());
        assert!(error.to_string().contains("timed out"));
    }

    #[test]
    fn no_reachable_origin_lists_attempts() {
        let error = DeployError::NoReachableOrigin {
            attempted: vec!["https://a.test".to_string(), "https://b.test".to_string()],
        };

        assert_eq!(
            error.to_string(),
            "unable to find an accessible deployment mirror (tried https://a.test, https://b.test)"
        );
    }
}

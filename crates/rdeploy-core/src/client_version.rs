use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Deployment metadata for one channel at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientVersion {
    pub version: String,
    #[serde(rename = "clientVersionUpload", alias = "versionGuid")]
    pub version_guid: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Local>>,
    /// Computed locally; never taken from the metadata response.
    #[serde(skip_deserializing)]
    pub is_behind_default_channel: bool,
}

impl ClientVersion {
    #[must_use]
    pub fn new(version: impl Into<String>, version_guid: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            version_guid: version_guid.into(),
            timestamp: None,
            is_behind_default_channel: false,
        }
    }

    /// Resource path of this build's package manifest.
    #[must_use]
    pub fn manifest_resource(&self) -> String {
        format!("/{}-rbxPkgManifest.txt", self.version_guid)
    }
}

#[cfg(test)]
mod tests {
    use super::ClientVersion;

    #[test]
    fn deserializes_metadata_response() {
        let parsed: ClientVersion = serde_json::from_str(
            r#"{
                "version": "0.600.1.6000635",
                "clientVersionUpload": "version-0123456789abcdef",
                "bootstrapperVersion": "1, 6000, 0, 6000635"
            }"#,
        )
        .expect("metadata response should deserialize");

        assert_eq!(parsed.version, "0.600.1.6000635");
        assert_eq!(parsed.version_guid, "version-0123456789abcdef");
        assert!(parsed.timestamp.is_none());
        assert!(!parsed.is_behind_default_channel);
    }

    #[test]
    fn accepts_version_guid_alias_and_prepopulated_timestamp() {
        let parsed: ClientVersion = serde_json::from_str(
            r#"{
                "version": "1.2.3",
                "versionGuid": "version-abc",
                "timestamp": "2024-01-01T00:00:00Z"
            }"#,
        )
        .expect("aliased response should deserialize");

        assert_eq!(parsed.version_guid, "version-abc");
        assert!(parsed.timestamp.is_some());
    }

    #[test]
    fn ignores_upstream_staleness_flag() {
        let parsed: ClientVersion = serde_json::from_str(
            r#"{"version":"1.2.3","clientVersionUpload":"version-abc","isBehindDefaultChannel":true}"#,
        )
        .expect("response with staleness flag should deserialize");

        assert!(!parsed.is_behind_default_channel);
    }

    #[test]
    fn manifest_resource_uses_guid() {
        let version = ClientVersion::new("1.2.3", "version-abc");
        assert_eq!(version.manifest_resource(), "/version-abc-rbxPkgManifest.txt");
    }
}

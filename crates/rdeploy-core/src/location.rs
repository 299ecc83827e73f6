/// Channel that publishes the production build.
pub const DEFAULT_CHANNEL: &str = "LIVE";

/// Whether `channel` names the default channel, ignoring ASCII case.
#[must_use]
pub fn is_default_channel(channel: &str) -> bool {
    channel.eq_ignore_ascii_case(DEFAULT_CHANNEL)
}

/// Compose a resource URL under `origin` for `channel`.
///
/// The default channel lives at the origin root; any other channel is served
/// from `/channel/<name>` with the name lower-cased.
#[must_use]
pub fn build_location(origin: &str, resource: &str, channel: &str) -> String {
    let mut location = origin.trim_end_matches('/').to_string();

    if !is_default_channel(channel) {
        location.push_str("/channel/");
        location.push_str(&channel.to_lowercase());
    }

    location.push_str(resource);
    location
}

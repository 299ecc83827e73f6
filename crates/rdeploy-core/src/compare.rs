use std::cmp::Ordering;

use log::warn;
use semver::Version;

/// Three-way comparison of two published version strings.
///
/// Dotted numeric versions of any length (`0.600.1.6000635`) compare
/// component-wise, missing components counting as zero. Anything else goes
/// through semver. Input that neither form accepts compares as equal.
#[must_use]
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    if let (Some(left), Some(right)) = (parse_numeric(left), parse_numeric(right)) {
        return compare_numeric(&left, &right);
    }

    match (parse_semver(left), parse_semver(right)) {
        (Some(left), Some(right)) => left.cmp(&right),
        _ => {
            warn!("Cannot compare versions '{left}' and '{right}', treating them as equal");
            Ordering::Equal
        }
    }
}

/// Whether `version` orders strictly before `default_version`.
#[must_use]
pub fn is_behind(version: &str, default_version: &str) -> bool {
    compare_versions(version, default_version) == Ordering::Less
}

fn parse_numeric(version: &str) -> Option<Vec<u64>> {
    let version = version.trim().trim_start_matches('v');
    if version.is_empty() {
        return None;
    }
    version
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

fn compare_numeric(left: &[u64], right: &[u64]) -> Ordering {
    let len = left.len().max(right.len());
    (0..len)
        .map(|i| {
            let l = left.get(i).copied().unwrap_or(0);
            let r = right.get(i).copied().unwrap_or(0);
            l.cmp(&r)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn parse_semver(version: &str) -> Option<Version> {
    let version = version.trim().trim_start_matches('v');
    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }

    let suffix_idx = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(suffix_idx);
    let mut parts = core.split('.');
    let major = parts.next()?.parse::<u64>().ok()?;
    let minor = parts.next().and_then(|part| part.parse::<u64>().ok());
    let patch = parts.next().and_then(|part| part.parse::<u64>().ok());

    if parts.next().is_some() {
        return None;
    }

    let normalized = match (minor, patch) {
        (None, None) => format!("{major}.0.0{suffix}"),
        (Some(minor), None) => format!("{major}.{minor}.0{suffix}"),
        (Some(minor), Some(patch)) => format!("{major}.{minor}.{patch}{suffix}"),
        (None, Some(_)) => return None,
    };

    Version::parse(&normalized).ok()
}

use std::cmp::Ordering;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{LoaderKind, LoaderMap, LoaderVersionEntry};
use crate::core::version::{compare_segments, numeric_segments};

/// Entry of Modrinth `/v2/project/fabric-api/version`, newest first.
#[derive(Debug, Deserialize)]
pub struct ModrinthVersion {
    pub version_number: String,
    #[serde(default)]
    pub version_type: String,
    #[serde(default)]
    pub game_versions: Vec<String>,
}

/// A release that can stand in for game versions it does not declare.
struct FallbackCandidate {
    game_version: String,
    segments: Vec<u64>,
    api_version: String,
}

/// Resolve a Fabric API version for every game version Fabric supports.
///
/// Exact declarations win; the first release seen for a game version is kept
/// because Modrinth lists newest first. Game versions Fabric supports without
/// an exact declaration borrow the API version of the nearest game version
/// that is older than or equal to them. A newer game version's API is never
/// borrowed.
pub fn normalize(raw: &[u8], fabric: &LoaderMap) -> LoaderMap {
    let releases: Vec<ModrinthVersion> = match serde_json::from_slice(raw) {
        Ok(releases) => releases,
        Err(e) => {
            warn!("Fabric API version feed is malformed: {}", e);
            return LoaderMap::new();
        }
    };

    let mut map = LoaderMap::new();
    let mut candidates = Vec::new();

    for release in releases.iter().filter(|r| r.version_type == "release") {
        for game_version in &release.game_versions {
            map.entry(game_version.clone()).or_insert_with(|| {
                LoaderVersionEntry::new(LoaderKind::FabricApi, release.version_number.clone())
            });

            // Snapshots and pre-releases have no numeric order, so they
            // cannot safely stand in for anything.
            if let Some(segments) = numeric_segments(game_version) {
                candidates.push(FallbackCandidate {
                    game_version: game_version.clone(),
                    segments,
                    api_version: release.version_number.clone(),
                });
            }
        }
    }

    // Newest game version first; stable sort keeps feed order for ties.
    candidates.sort_by(|a, b| compare_segments(&b.segments, &a.segments));

    for mc_version in fabric.keys() {
        if map.contains_key(mc_version) {
            continue;
        }
        let Some(target) = numeric_segments(mc_version) else {
            continue;
        };

        let fallback = candidates
            .iter()
            .find(|c| compare_segments(&c.segments, &target) != Ordering::Greater);

        if let Some(candidate) = fallback {
            debug!(
                "Using fallback Fabric API version {} from {} for Minecraft {}",
                candidate.api_version, candidate.game_version, mc_version
            );
            map.insert(
                mc_version.clone(),
                LoaderVersionEntry::new(LoaderKind::FabricApi, candidate.api_version.clone()),
            );
        }
    }

    info!("Resolved Fabric API versions for {} game versions", map.len());
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fabric_map(ids: &[&str]) -> LoaderMap {
        ids.iter()
            .map(|id| {
                (
                    id.to_string(),
                    LoaderVersionEntry::new(LoaderKind::Fabric, "0.15.3"),
                )
            })
            .collect()
    }

    const FEED: &str = r#"[
        {"version_number": "0.97.1+1.20.5", "version_type": "beta", "game_versions": ["1.20.5"]},
        {"version_number": "0.96.0+1.20.4", "version_type": "release", "game_versions": ["1.20.4"]},
        {"version_number": "0.95.0+1.20.4", "version_type": "release", "game_versions": ["1.20.4", "1.20.3"]},
        {"version_number": "0.90.0+23w45a", "version_type": "release", "game_versions": ["23w45a", "1.21-pre1"]},
        {"version_number": "0.83.0+1.20", "version_type": "release", "game_versions": ["1.20"]}
    ]"#;

    #[test]
    fn first_release_per_game_version_wins() {
        let map = normalize(FEED.as_bytes(), &LoaderMap::new());

        assert_eq!(map["1.20.4"].version, "0.96.0+1.20.4");
        assert_eq!(map["1.20.3"].version, "0.95.0+1.20.4");
        assert_eq!(map["1.20.4"].kind, LoaderKind::FabricApi);
        assert!(!map.contains_key("1.20.5"), "beta builds are ignored");
    }

    #[test]
    fn missing_version_falls_back_to_nearest_older() {
        let map = normalize(FEED.as_bytes(), &fabric_map(&["1.21", "1.20.4"]));

        assert_eq!(map["1.21"].version, "0.96.0+1.20.4");
    }

    #[test]
    fn fallback_never_borrows_from_a_newer_version() {
        let map = normalize(FEED.as_bytes(), &fabric_map(&["1.19.4", "1.20.1"]));

        assert!(!map.contains_key("1.19.4"));
        assert_eq!(map["1.20.1"].version, "0.83.0+1.20");
    }

    #[test]
    fn prerelease_declarations_are_not_fallback_sources() {
        let feed = r#"[
            {"version_number": "0.99.0+1.21-pre1", "version_type": "release", "game_versions": ["1.21-pre1"]},
            {"version_number": "0.50.0+1.19", "version_type": "release", "game_versions": ["1.19"]}
        ]"#;
        let map = normalize(feed.as_bytes(), &fabric_map(&["1.19.2"]));

        assert_eq!(map["1.19.2"].version, "0.50.0+1.19");
    }

    #[test]
    fn missing_segment_counts_as_zero() {
        let feed = r#"[
            {"version_number": "0.100.0+1.21", "version_type": "release", "game_versions": ["1.21"]}
        ]"#;
        let map = normalize(feed.as_bytes(), &fabric_map(&["1.21.0"]));

        assert_eq!(map["1.21.0"].version, "0.100.0+1.21");
    }

    #[test]
    fn malformed_feed_degrades_to_empty() {
        assert!(normalize(b"{}", &fabric_map(&["1.21"])).is_empty());
    }
}

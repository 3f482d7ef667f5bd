use serde::Deserialize;
use tracing::{info, warn};

use super::{LoaderKind, LoaderMap, LoaderVersionEntry};
use crate::core::version::leading_number;

/// NeoForged Maven API listing (`/api/maven/versions/releases/...`).
#[derive(Debug, Deserialize)]
pub struct NeoForgeVersionList {
    #[serde(default)]
    pub versions: Vec<String>,
}

/// Subset of a Maven `maven-metadata.xml`.
#[derive(Debug, Deserialize)]
struct MavenMetadata {
    versioning: MavenVersioning,
}

#[derive(Debug, Deserialize)]
struct MavenVersioning {
    versions: MavenVersions,
}

#[derive(Debug, Deserialize)]
struct MavenVersions {
    #[serde(rename = "version", default)]
    version: Vec<String>,
}

/// Read the version list from either the JSON API or raw Maven metadata.
fn parse_version_list(raw: &[u8]) -> Option<Vec<String>> {
    let text = std::str::from_utf8(raw).ok()?;
    if text.trim_start().starts_with('<') {
        match quick_xml::de::from_str::<MavenMetadata>(text) {
            Ok(metadata) => Some(metadata.versioning.versions.version),
            Err(e) => {
                warn!("NeoForge maven metadata is malformed: {}", e);
                None
            }
        }
    } else {
        match serde_json::from_str::<NeoForgeVersionList>(text) {
            Ok(list) => Some(list.versions),
            Err(e) => {
                warn!("NeoForge version feed is malformed: {}", e);
                None
            }
        }
    }
}

/// Game version a NeoForge release targets, plus its build segment.
///
/// `20.4.72` targets `1.20.4` with build `72`; a zero minor means a
/// two-segment game version, so `21.0.5` targets `1.21` with build `5`.
pub fn derive_game_version(neoforge_version: &str) -> Option<(String, &str)> {
    let parts: Vec<&str> = neoforge_version.split('.').collect();
    if parts.len() < 3 {
        return None;
    }
    let mc_version = if parts[1] == "0" {
        format!("1.{}", parts[0])
    } else {
        format!("1.{}.{}", parts[0], parts[1])
    };
    let build = parts[parts.len() - 1];
    Some((mc_version, build))
}

/// Keep the highest NeoForge build for every derived game version.
///
/// Builds compare by their leading integer only, so zero-padded or
/// multi-part build tags are not ordered beyond that.
pub fn normalize(raw: &[u8]) -> LoaderMap {
    let Some(versions) = parse_version_list(raw) else {
        return LoaderMap::new();
    };

    let mut map = LoaderMap::new();
    for version in &versions {
        let Some((mc_version, build)) = derive_game_version(version) else {
            continue;
        };

        let replace = match map.get(&mc_version) {
            None => true,
            Some(existing) => matches!(
                (leading_number(build), leading_number(&existing.version)),
                (Some(new), Some(old)) if new > old
            ),
        };

        if replace {
            map.insert(
                mc_version,
                LoaderVersionEntry::with_full_version(LoaderKind::NeoForge, build, version.as_str()),
            );
        }
    }

    info!("NeoForge builds cover {} game versions", map.len());
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_three_segment_game_version() {
        assert_eq!(
            derive_game_version("20.4.72"),
            Some(("1.20.4".to_string(), "72"))
        );
    }

    #[test]
    fn zero_minor_derives_two_segment_game_version() {
        assert_eq!(derive_game_version("21.0.5"), Some(("1.21".to_string(), "5")));
    }

    #[test]
    fn short_versions_are_ignored() {
        assert_eq!(derive_game_version("47.1"), None);
    }

    #[test]
    fn keeps_numerically_greatest_build() {
        let raw = br#"{"isSnapshot": false, "versions": ["20.4.9", "20.4.72", "20.4.10", "21.0.5"]}"#;
        let map = normalize(raw);

        assert_eq!(map["1.20.4"].version, "72");
        assert_eq!(map["1.20.4"].full_version.as_deref(), Some("20.4.72"));
        assert_eq!(map["1.21"].version, "5");
        assert_eq!(map["1.21"].kind, LoaderKind::NeoForge);
    }

    #[test]
    fn beta_suffixed_builds_compare_by_leading_number() {
        let raw = br#"{"versions": ["20.2.3-beta", "20.2.59", "20.2.4-beta"]}"#;
        let map = normalize(raw);

        assert_eq!(map["1.20.2"].version, "59");
    }

    #[test]
    fn accepts_maven_metadata_xml() {
        let raw = br#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>net.neoforged</groupId>
  <artifactId>neoforge</artifactId>
  <versioning>
    <latest>21.0.5</latest>
    <release>21.0.5</release>
    <versions>
      <version>20.4.70</version>
      <version>20.4.72</version>
      <version>21.0.5</version>
    </versions>
    <lastUpdated>20240701000000</lastUpdated>
  </versioning>
</metadata>"#;
        let map = normalize(raw);

        assert_eq!(map["1.20.4"].version, "72");
        assert_eq!(map["1.21"].version, "5");
    }

    #[test]
    fn malformed_payload_degrades_to_empty() {
        assert!(normalize(b"{\"versions\": \"nope\"}").is_empty());
        assert!(normalize(b"<metadata><broken>").is_empty());
        assert!(normalize(&[0xff, 0xfe, 0x00]).is_empty());
    }
}

// ─── Version Manifest ───
// Parses the Mojang version manifest into the canonical release sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Release id that predates every supported toolchain; never offered.
const EXCLUDED_RELEASE_ID: &str = "1.0";

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    #[serde(rename = "releaseTime")]
    pub release_time: String,
}

/// A canonical base-game release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVersion {
    pub id: String,
    #[serde(rename = "releaseTimestamp")]
    pub release_time: DateTime<Utc>,
}

impl GameVersion {
    pub fn new(id: impl Into<String>, release_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            release_time,
        }
    }
}

impl VersionManifest {
    /// List all official stable versions (release only).
    pub fn releases(&self) -> impl Iterator<Item = &VersionEntry> {
        self.versions
            .iter()
            .filter(|v| v.version_type == "release")
    }

    /// Releases minus the excluded id, newest first by release time.
    ///
    /// Entries whose release time cannot be parsed are dropped.
    pub fn into_game_versions(self) -> Vec<GameVersion> {
        let mut versions: Vec<GameVersion> = self
            .releases()
            .filter(|entry| entry.id != EXCLUDED_RELEASE_ID)
            .filter_map(|entry| match DateTime::parse_from_rfc3339(&entry.release_time) {
                Ok(time) => Some(GameVersion::new(entry.id.clone(), time.with_timezone(&Utc))),
                Err(e) => {
                    debug!("Skipping {} with unparsable release time: {}", entry.id, e);
                    None
                }
            })
            .collect();

        versions.sort_by(|a, b| b.release_time.cmp(&a.release_time));
        versions
    }
}

/// Normalize a raw manifest payload. Malformed input yields an empty list.
pub fn normalize_game_versions(raw: &[u8]) -> Vec<GameVersion> {
    match serde_json::from_slice::<VersionManifest>(raw) {
        Ok(manifest) => {
            let versions = manifest.into_game_versions();
            info!("Loaded {} Minecraft releases from manifest", versions.len());
            versions
        }
        Err(e) => {
            warn!("Minecraft version manifest is malformed: {}", e);
            Vec::new()
        }
    }
}

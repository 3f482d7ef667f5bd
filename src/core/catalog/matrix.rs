use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::core::loaders::{LoaderKind, LoaderMap, LoaderVersionEntry};
use crate::core::version::GameVersion;

/// Loader support for one base-game release.
///
/// `loaders` only holds kinds that actually have data for this release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityRecord {
    pub game_version: GameVersion,
    pub loaders: BTreeMap<LoaderKind, LoaderVersionEntry>,
}

impl CompatibilityRecord {
    pub fn new(game_version: GameVersion) -> Self {
        Self {
            game_version,
            loaders: BTreeMap::new(),
        }
    }

    pub fn with_loader(mut self, entry: LoaderVersionEntry) -> Self {
        self.loaders.insert(entry.kind, entry);
        self
    }

    pub fn id(&self) -> &str {
        &self.game_version.id
    }

    pub fn loader(&self, kind: LoaderKind) -> Option<&LoaderVersionEntry> {
        self.loaders.get(&kind)
    }

    pub fn supports(&self, kind: LoaderKind) -> bool {
        self.loaders.contains_key(&kind)
    }

    /// Whether any user-selectable loader has data for this release.
    pub fn has_selectable_loader(&self) -> bool {
        LoaderKind::SELECTABLE.iter().any(|kind| self.supports(*kind))
    }
}

/// One record per game version, in the order given.
///
/// Entries are copied from the canonical maps as-is; no fallback happens
/// here.
pub fn build(
    game_versions: &[GameVersion],
    loader_maps: &BTreeMap<LoaderKind, LoaderMap>,
) -> Vec<CompatibilityRecord> {
    game_versions
        .iter()
        .map(|game_version| {
            let loaders = LoaderKind::ALL
                .iter()
                .filter_map(|kind| {
                    loader_maps
                        .get(kind)
                        .and_then(|map| map.get(&game_version.id))
                        .map(|entry| (*kind, entry.clone()))
                })
                .collect();
            CompatibilityRecord {
                game_version: game_version.clone(),
                loaders,
            }
        })
        .collect()
}

// ── Client view ─────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoaderVersionsView<'a> {
    fabric: Option<&'a str>,
    fabric_api: Option<&'a str>,
    forge: Option<&'a str>,
    neoforge: Option<&'a str>,
    neoforge_full_version: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordView<'a> {
    id: &'a str,
    release_timestamp: &'a DateTime<Utc>,
    loaders: LoaderVersionsView<'a>,
}

impl Serialize for CompatibilityRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let version = |kind| self.loader(kind).map(|e| e.version.as_str());
        let neoforge = self.loader(LoaderKind::NeoForge);

        RecordView {
            id: self.id(),
            release_timestamp: &self.game_version.release_time,
            loaders: LoaderVersionsView {
                fabric: version(LoaderKind::Fabric),
                fabric_api: version(LoaderKind::FabricApi),
                forge: version(LoaderKind::Forge),
                neoforge: neoforge.map(|e| e.version.as_str()),
                neoforge_full_version: neoforge.and_then(|e| e.full_version.as_deref()),
            },
        }
        .serialize(serializer)
    }
}

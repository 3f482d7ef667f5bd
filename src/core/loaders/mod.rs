// ─── Loader Feeds ───
// One normalizer per loader ecosystem. Each turns its raw upstream payload
// into a canonical `game version id -> LoaderVersionEntry` map and never
// fails: a degraded feed simply produces an empty map.

pub mod fabric;
pub mod fabric_api;
pub mod forge;
pub mod neoforge;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::feeds::FeedSource;

/// Supported loader kinds.
///
/// Declaration order is the order loaders are listed in generated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoaderKind {
    #[serde(rename = "fabric")]
    Fabric,
    #[serde(rename = "fabricApi")]
    FabricApi,
    #[serde(rename = "forge")]
    Forge,
    #[serde(rename = "neoforge")]
    NeoForge,
}

impl LoaderKind {
    pub const ALL: [LoaderKind; 4] = [
        LoaderKind::Fabric,
        LoaderKind::FabricApi,
        LoaderKind::Forge,
        LoaderKind::NeoForge,
    ];

    /// Kinds a user can pick; each owns a top-level folder in the template.
    pub const SELECTABLE: [LoaderKind; 3] =
        [LoaderKind::Fabric, LoaderKind::Forge, LoaderKind::NeoForge];

    /// Folder prefix of this loader's sources inside the template.
    pub fn archive_prefix(self) -> Option<&'static str> {
        match self {
            LoaderKind::Fabric => Some("fabric/"),
            LoaderKind::FabricApi => None,
            LoaderKind::Forge => Some("forge/"),
            LoaderKind::NeoForge => Some("neoforge/"),
        }
    }

    pub fn is_selectable(self) -> bool {
        self.archive_prefix().is_some()
    }

    /// Raw payloads this loader's normalizer reads.
    pub fn feeds(self) -> &'static [FeedSource] {
        match self {
            LoaderKind::Fabric => &[
                FeedSource::FabricGameVersions,
                FeedSource::FabricLoaderVersions,
            ],
            LoaderKind::FabricApi => &[FeedSource::FabricApiVersions],
            LoaderKind::Forge => &[FeedSource::ForgePromotions],
            LoaderKind::NeoForge => &[FeedSource::NeoForgeVersions],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoaderKind::Fabric => "fabric",
            LoaderKind::FabricApi => "fabricApi",
            LoaderKind::Forge => "forge",
            LoaderKind::NeoForge => "neoforge",
        }
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The loader build valid for one game version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderVersionEntry {
    pub kind: LoaderKind,
    pub version: String,
    /// Upstream identifier, kept only when it differs from `version`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_version: Option<String>,
}

impl LoaderVersionEntry {
    pub fn new(kind: LoaderKind, version: impl Into<String>) -> Self {
        Self {
            kind,
            version: version.into(),
            full_version: None,
        }
    }

    /// Entry whose upstream tag differs from the short version consumers need.
    pub fn with_full_version(kind: LoaderKind, version: impl Into<String>, full: impl Into<String>) -> Self {
        let version = version.into();
        let full = full.into();
        let full_version = (full != version).then_some(full);
        Self {
            kind,
            version,
            full_version,
        }
    }
}

/// Canonical `game version id -> entry` map for a single loader.
pub type LoaderMap = BTreeMap<String, LoaderVersionEntry>;

/// Raw input of one normalizer. Matching on this is the single dispatch
/// point from loader kind to normalizer.
pub enum LoaderInput<'a> {
    Fabric { game: &'a [u8], loader: &'a [u8] },
    FabricApi { versions: &'a [u8], fabric: &'a LoaderMap },
    Forge { promotions: &'a [u8] },
    NeoForge { versions: &'a [u8] },
}

impl LoaderInput<'_> {
    pub fn kind(&self) -> LoaderKind {
        match self {
            LoaderInput::Fabric { .. } => LoaderKind::Fabric,
            LoaderInput::FabricApi { .. } => LoaderKind::FabricApi,
            LoaderInput::Forge { .. } => LoaderKind::Forge,
            LoaderInput::NeoForge { .. } => LoaderKind::NeoForge,
        }
    }

    pub fn normalize(&self) -> LoaderMap {
        match self {
            LoaderInput::Fabric { game, loader } => fabric::normalize(game, loader),
            LoaderInput::FabricApi { versions, fabric } => fabric_api::normalize(versions, fabric),
            LoaderInput::Forge { promotions } => forge::normalize(promotions),
            LoaderInput::NeoForge { versions } => neoforge::normalize(versions),
        }
    }
}

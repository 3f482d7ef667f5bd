// ─── Upstream Feeds ───
// Identifiers and endpoints of every raw payload the generator consumes.

pub mod client;
#[cfg(test)]
pub mod fixtures;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use client::{FeedFetcher, HttpFeedFetcher};

pub const MINECRAFT_VERSIONS_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";
pub const FABRIC_GAME_VERSIONS_URL: &str = "https://meta.fabricmc.net/v2/versions/game";
pub const FABRIC_LOADER_VERSIONS_URL: &str = "https://meta.fabricmc.net/v2/versions/loader";
pub const FABRIC_API_VERSIONS_URL: &str =
    "https://api.modrinth.com/v2/project/fabric-api/version";
pub const FORGE_VERSIONS_URL: &str =
    "https://files.minecraftforge.net/net/minecraftforge/forge/promotions_slim.json";
pub const NEOFORGE_VERSIONS_URL: &str =
    "https://maven.neoforged.net/api/maven/versions/releases/net/neoforged/neoforge";
pub const TEMPLATE_ZIP_URL: &str =
    "https://github.com/Ran-Mewo/universal-mod-template/archive/refs/heads/master.zip";

/// One raw upstream payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedSource {
    MinecraftVersions,
    FabricGameVersions,
    FabricLoaderVersions,
    FabricApiVersions,
    ForgePromotions,
    NeoForgeVersions,
    Template,
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedSource::MinecraftVersions => "minecraft-versions",
            FeedSource::FabricGameVersions => "fabric-game-versions",
            FeedSource::FabricLoaderVersions => "fabric-loader-versions",
            FeedSource::FabricApiVersions => "fabric-api-versions",
            FeedSource::ForgePromotions => "forge-promotions",
            FeedSource::NeoForgeVersions => "neoforge-versions",
            FeedSource::Template => "template",
        };
        f.write_str(name)
    }
}

/// Endpoint table, overridable from the settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedUrls {
    pub minecraft_versions: String,
    pub fabric_game_versions: String,
    pub fabric_loader_versions: String,
    pub fabric_api_versions: String,
    pub forge_promotions: String,
    pub neoforge_versions: String,
    pub template: String,
}

impl Default for FeedUrls {
    fn default() -> Self {
        Self {
            minecraft_versions: MINECRAFT_VERSIONS_URL.to_string(),
            fabric_game_versions: FABRIC_GAME_VERSIONS_URL.to_string(),
            fabric_loader_versions: FABRIC_LOADER_VERSIONS_URL.to_string(),
            fabric_api_versions: FABRIC_API_VERSIONS_URL.to_string(),
            forge_promotions: FORGE_VERSIONS_URL.to_string(),
            neoforge_versions: NEOFORGE_VERSIONS_URL.to_string(),
            template: TEMPLATE_ZIP_URL.to_string(),
        }
    }
}

impl FeedUrls {
    pub fn url(&self, source: FeedSource) -> &str {
        match source {
            FeedSource::MinecraftVersions => &self.minecraft_versions,
            FeedSource::FabricGameVersions => &self.fabric_game_versions,
            FeedSource::FabricLoaderVersions => &self.fabric_loader_versions,
            FeedSource::FabricApiVersions => &self.fabric_api_versions,
            FeedSource::ForgePromotions => &self.forge_promotions,
            FeedSource::NeoForgeVersions => &self.neoforge_versions,
            FeedSource::Template => &self.template,
        }
    }
}

use serde::Deserialize;
use tracing::{info, warn};

use super::{LoaderKind, LoaderMap, LoaderVersionEntry};

/// Entry of Fabric Meta `/v2/versions/game`.
#[derive(Debug, Deserialize)]
pub struct FabricGameVersion {
    pub version: String,
    #[serde(default)]
    pub stable: bool,
}

/// Entry of Fabric Meta `/v2/versions/loader`, newest first.
#[derive(Debug, Deserialize)]
pub struct FabricLoaderVersion {
    pub version: String,
}

/// Assign the newest loader build to every stable game version.
///
/// Fabric's loader is game-version independent, so a single value is
/// broadcast to all stable releases.
pub fn normalize(game_raw: &[u8], loader_raw: &[u8]) -> LoaderMap {
    let games: Vec<FabricGameVersion> = match serde_json::from_slice(game_raw) {
        Ok(games) => games,
        Err(e) => {
            warn!("Fabric game version feed is malformed: {}", e);
            return LoaderMap::new();
        }
    };
    let loaders: Vec<FabricLoaderVersion> = match serde_json::from_slice(loader_raw) {
        Ok(loaders) => loaders,
        Err(e) => {
            warn!("Fabric loader version feed is malformed: {}", e);
            return LoaderMap::new();
        }
    };

    let Some(latest_loader) = loaders.into_iter().next().map(|l| l.version) else {
        warn!("Fabric loader feed lists no loader builds");
        return LoaderMap::new();
    };

    let map: LoaderMap = games
        .into_iter()
        .filter(|game| game.stable)
        .map(|game| {
            let entry = LoaderVersionEntry::new(LoaderKind::Fabric, latest_loader.clone());
            (game.version, entry)
        })
        .collect();

    info!(
        "Fabric loader {} assigned to {} stable versions",
        latest_loader,
        map.len()
    );
    map
}

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{info, warn};

use super::{LoaderKind, LoaderMap, LoaderVersionEntry};

/// Forge `promotions_slim.json`.
#[derive(Debug, Deserialize)]
pub struct ForgePromotions {
    #[serde(default)]
    pub promos: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Promotion {
    Recommended,
    Latest,
}

fn is_version_like(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

/// Split `1.20.4-recommended` into the game version and promotion channel.
fn parse_promo_key(key: &str) -> Option<(&str, Promotion)> {
    let (mc_version, channel) = key.rsplit_once('-')?;
    if !is_version_like(mc_version) {
        return None;
    }
    let promotion = match channel {
        "recommended" => Promotion::Recommended,
        "latest" => Promotion::Latest,
        _ => return None,
    };
    Some((mc_version, promotion))
}

/// Forge build from `1.20.4-49.0.3`; values of any other shape pass through.
fn forge_build(value: &str) -> &str {
    match value.split_once('-') {
        Some((mc, build)) if is_version_like(mc) && is_version_like(build) => build,
        _ => value,
    }
}

/// Map each game version to its promoted Forge build.
///
/// A recommended promotion always replaces whatever is recorded; a latest
/// promotion is only recorded when nothing exists yet for that game version.
pub fn normalize(raw: &[u8]) -> LoaderMap {
    let promotions: ForgePromotions = match serde_json::from_slice(raw) {
        Ok(promotions) => promotions,
        Err(e) => {
            warn!("Forge promotions feed is malformed: {}", e);
            return LoaderMap::new();
        }
    };

    let Some(promos) = promotions.promos else {
        return LoaderMap::new();
    };

    let mut map = LoaderMap::new();
    for (key, value) in &promos {
        let Some((mc_version, promotion)) = parse_promo_key(key) else {
            continue;
        };
        if promotion == Promotion::Recommended || !map.contains_key(mc_version) {
            map.insert(
                mc_version.to_string(),
                LoaderVersionEntry::new(LoaderKind::Forge, forge_build(value)),
            );
        }
    }

    info!("Forge promotions cover {} game versions", map.len());
    map
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::matrix::{self, CompatibilityRecord};
use crate::core::loaders::{LoaderKind, LoaderMap};
use crate::core::version::GameVersion;

/// Everything one refresh cycle produced. Never mutated after construction;
/// refreshes build a successor and swap it in whole.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    generation: u64,
    refreshed_at: Option<DateTime<Utc>>,
    game_versions: Vec<GameVersion>,
    loader_maps: BTreeMap<LoaderKind, LoaderMap>,
    matrix: Vec<CompatibilityRecord>,
}

impl CatalogSnapshot {
    /// Snapshot served before the first refresh completes.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn assemble(
        generation: u64,
        game_versions: Vec<GameVersion>,
        loader_maps: BTreeMap<LoaderKind, LoaderMap>,
    ) -> Self {
        let matrix = matrix::build(&game_versions, &loader_maps);
        Self {
            generation,
            refreshed_at: Some(Utc::now()),
            game_versions,
            loader_maps,
            matrix,
        }
    }

    /// Successor with new game versions and the current loader maps.
    pub fn with_game_versions(&self, game_versions: Vec<GameVersion>) -> Self {
        Self::assemble(self.generation + 1, game_versions, self.loader_maps.clone())
    }

    /// Successor with the given loader maps replaced.
    pub fn with_loader_maps(&self, updates: BTreeMap<LoaderKind, LoaderMap>) -> Self {
        let mut loader_maps = self.loader_maps.clone();
        loader_maps.extend(updates);
        Self::assemble(self.generation + 1, self.game_versions.clone(), loader_maps)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn is_populated(&self) -> bool {
        self.refreshed_at.is_some()
    }

    pub fn game_versions(&self) -> &[GameVersion] {
        &self.game_versions
    }

    pub fn loader_maps(&self) -> &BTreeMap<LoaderKind, LoaderMap> {
        &self.loader_maps
    }

    pub fn loader_map(&self, kind: LoaderKind) -> Option<&LoaderMap> {
        self.loader_maps.get(&kind)
    }

    pub fn matrix(&self) -> &[CompatibilityRecord] {
        &self.matrix
    }

    pub fn record(&self, game_version_id: &str) -> Option<&CompatibilityRecord> {
        self.matrix.iter().find(|r| r.id() == game_version_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loaders::LoaderVersionEntry;
    use chrono::TimeZone;

    fn versions() -> Vec<GameVersion> {
        vec![GameVersion::new(
            "1.20.4",
            Utc.with_ymd_and_hms(2023, 12, 7, 0, 0, 0).unwrap(),
        )]
    }

    fn forge_map(build: &str) -> BTreeMap<LoaderKind, LoaderMap> {
        let mut map = LoaderMap::new();
        map.insert(
            "1.20.4".to_string(),
            LoaderVersionEntry::new(LoaderKind::Forge, build),
        );
        BTreeMap::from([(LoaderKind::Forge, map)])
    }

    #[test]
    fn empty_snapshot_is_not_populated() {
        let snapshot = CatalogSnapshot::empty();
        assert!(!snapshot.is_populated());
        assert!(snapshot.matrix().is_empty());
    }

    #[test]
    fn successor_rebuilds_matrix_without_touching_predecessor() {
        let first = CatalogSnapshot::assemble(1, versions(), forge_map("49.0.3"));
        let second = first.with_loader_maps(forge_map("49.1.0"));

        assert_eq!(second.generation(), 2);
        assert_eq!(
            first.record("1.20.4").unwrap().loader(LoaderKind::Forge).unwrap().version,
            "49.0.3"
        );
        assert_eq!(
            second.record("1.20.4").unwrap().loader(LoaderKind::Forge).unwrap().version,
            "49.1.0"
        );
    }

    #[test]
    fn loader_maps_survive_game_version_refresh() {
        let first = CatalogSnapshot::with_loader_maps(&CatalogSnapshot::empty(), forge_map("49.0.3"));
        assert!(first.matrix().is_empty());

        let second = first.with_game_versions(versions());
        assert!(second.record("1.20.4").unwrap().supports(LoaderKind::Forge));
    }
}

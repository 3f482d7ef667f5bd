use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::coalesce::Coalescer;
use super::snapshot::CatalogSnapshot;
use crate::core::blob::{
    BlobStore, COMPATIBLE_VERSIONS_BLOB, FABRIC_API_VERSIONS_BLOB, FABRIC_VERSIONS_BLOB,
    FORGE_VERSIONS_BLOB, MINECRAFT_VERSIONS_BLOB, NEOFORGE_VERSIONS_BLOB, TEMPLATE_BLOB,
};
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::feeds::{FeedFetcher, FeedSource};
use crate::core::loaders::{LoaderInput, LoaderKind, LoaderMap};
use crate::core::version::{normalize_game_versions, GameVersion};

/// A unit of the catalog that can be refreshed on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSource {
    GameVersions,
    Loader(LoaderKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RefreshKey {
    All,
    Source(CatalogSource),
}

fn loader_blob_name(kind: LoaderKind) -> &'static str {
    match kind {
        LoaderKind::Fabric => FABRIC_VERSIONS_BLOB,
        LoaderKind::FabricApi => FABRIC_API_VERSIONS_BLOB,
        LoaderKind::Forge => FORGE_VERSIONS_BLOB,
        LoaderKind::NeoForge => NEOFORGE_VERSIONS_BLOB,
    }
}

/// Owns the current catalog snapshot and the cached template archive.
///
/// Readers get an `Arc` to a complete snapshot; refreshes assemble a new
/// snapshot and swap it in under the write lock, so no reader ever sees a
/// mix of two cycles. Overlapping refreshes of the same feed share a single
/// fetch.
pub struct CatalogService {
    fetcher: Arc<dyn FeedFetcher>,
    blobs: Option<Arc<dyn BlobStore>>,
    current: RwLock<Arc<CatalogSnapshot>>,
    template: RwLock<Option<Arc<Vec<u8>>>>,
    feeds: Coalescer<FeedSource, Option<Arc<Vec<u8>>>>,
    refreshes: Coalescer<RefreshKey, Arc<CatalogSnapshot>>,
}

impl CatalogService {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, blobs: Option<Arc<dyn BlobStore>>) -> Self {
        Self {
            fetcher,
            blobs,
            current: RwLock::new(Arc::new(CatalogSnapshot::empty())),
            template: RwLock::new(None),
            feeds: Coalescer::new(),
            refreshes: Coalescer::new(),
        }
    }

    /// The snapshot readers should use right now.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Current snapshot, refreshing first if nothing was ever loaded.
    pub async fn ensure_catalog(self: &Arc<Self>) -> GeneratorResult<Arc<CatalogSnapshot>> {
        let snapshot = self.snapshot().await;
        if snapshot.is_populated() {
            return Ok(snapshot);
        }
        self.refresh_all().await
    }

    // ── Refresh ─────────────────────────────────────────

    /// Refetch every feed and replace the whole snapshot.
    pub async fn refresh_all(self: &Arc<Self>) -> GeneratorResult<Arc<CatalogSnapshot>> {
        let this = Arc::clone(self);
        self.refreshes
            .run(RefreshKey::All, move || this.refresh_all_task())
            .await
            .ok_or_else(|| GeneratorError::Other("Catalog refresh aborted".into()))
    }

    /// Refetch one source and rebuild the matrix around the other,
    /// unchanged, maps.
    pub async fn refresh_source(
        self: &Arc<Self>,
        source: CatalogSource,
    ) -> GeneratorResult<Arc<CatalogSnapshot>> {
        let this = Arc::clone(self);
        self.refreshes
            .run(RefreshKey::Source(source), move || this.refresh_source_task(source))
            .await
            .ok_or_else(|| GeneratorError::Other(format!("Refresh of {:?} aborted", source)))
    }

    async fn refresh_all_task(self: Arc<Self>) -> Arc<CatalogSnapshot> {
        info!("Refreshing all catalog sources...");

        // Fabric API resolves fallbacks against the Fabric map, so it runs
        // after Fabric; everything else is independent.
        let fabric_chain = async {
            let fabric = self.load_loader(LoaderKind::Fabric, None).await;
            let fabric_api = self.load_loader(LoaderKind::FabricApi, Some(&fabric)).await;
            (fabric, fabric_api)
        };

        let (game_versions, (fabric, fabric_api), forge, neoforge) = tokio::join!(
            self.load_game_versions(),
            fabric_chain,
            self.load_loader(LoaderKind::Forge, None),
            self.load_loader(LoaderKind::NeoForge, None),
        );

        let loader_maps = BTreeMap::from([
            (LoaderKind::Fabric, fabric),
            (LoaderKind::FabricApi, fabric_api),
            (LoaderKind::Forge, forge),
            (LoaderKind::NeoForge, neoforge),
        ]);

        let snapshot = self
            .commit(|current| {
                CatalogSnapshot::assemble(current.generation() + 1, game_versions, loader_maps)
            })
            .await;

        info!(
            "Compatible versions generated: {} releases (generation {}, at {:?})",
            snapshot.matrix().len(),
            snapshot.generation(),
            snapshot.refreshed_at()
        );
        self.persist_snapshot(&snapshot).await;
        snapshot
    }

    async fn refresh_source_task(self: Arc<Self>, source: CatalogSource) -> Arc<CatalogSnapshot> {
        info!("Refreshing catalog source {:?}", source);

        let snapshot = match source {
            CatalogSource::GameVersions => {
                let versions = self.load_game_versions().await;
                self.commit(|current| current.with_game_versions(versions)).await
            }
            CatalogSource::Loader(LoaderKind::Fabric) => {
                let fabric = self.load_loader(LoaderKind::Fabric, None).await;
                let fabric_api = self.load_loader(LoaderKind::FabricApi, Some(&fabric)).await;
                let updates = BTreeMap::from([
                    (LoaderKind::Fabric, fabric),
                    (LoaderKind::FabricApi, fabric_api),
                ]);
                self.commit(|current| current.with_loader_maps(updates)).await
            }
            CatalogSource::Loader(LoaderKind::FabricApi) => {
                // Aged Fabric map from the previous cycle.
                let fabric = self
                    .snapshot()
                    .await
                    .loader_map(LoaderKind::Fabric)
                    .cloned()
                    .unwrap_or_default();
                let fabric_api = self.load_loader(LoaderKind::FabricApi, Some(&fabric)).await;
                let updates = BTreeMap::from([(LoaderKind::FabricApi, fabric_api)]);
                self.commit(|current| current.with_loader_maps(updates)).await
            }
            CatalogSource::Loader(kind) => {
                let map = self.load_loader(kind, None).await;
                let updates = BTreeMap::from([(kind, map)]);
                self.commit(|current| current.with_loader_maps(updates)).await
            }
        };

        self.persist_snapshot(&snapshot).await;
        snapshot
    }

    /// Build the successor of the current snapshot and swap it in.
    async fn commit<F>(&self, next: F) -> Arc<CatalogSnapshot>
    where
        F: FnOnce(&CatalogSnapshot) -> CatalogSnapshot,
    {
        let mut current = self.current.write().await;
        let snapshot = Arc::new(next(&**current));
        *current = Arc::clone(&snapshot);
        snapshot
    }

    // ── Feeds ───────────────────────────────────────────

    /// Raw payload of `source`, or `None` when the fetch failed.
    async fn fetch_feed(&self, source: FeedSource) -> Option<Arc<Vec<u8>>> {
        let fetcher = Arc::clone(&self.fetcher);
        self.feeds
            .run(source, move || async move {
                match fetcher.fetch(source).await {
                    Ok(bytes) => Some(Arc::new(bytes)),
                    Err(e) => {
                        warn!("Feed {} unavailable, treating as empty: {}", source, e);
                        None
                    }
                }
            })
            .await
            .flatten()
    }

    async fn load_game_versions(&self) -> Vec<GameVersion> {
        match self.fetch_feed(FeedSource::MinecraftVersions).await {
            Some(raw) => normalize_game_versions(&raw),
            None => Vec::new(),
        }
    }

    /// Fetch and normalize one loader. `fabric` is only read for Fabric API.
    async fn load_loader(&self, kind: LoaderKind, fabric: Option<&LoaderMap>) -> LoaderMap {
        let map = match kind {
            LoaderKind::Fabric => {
                let (game, loader) = tokio::join!(
                    self.fetch_feed(FeedSource::FabricGameVersions),
                    self.fetch_feed(FeedSource::FabricLoaderVersions),
                );
                match (game, loader) {
                    (Some(game), Some(loader)) => LoaderInput::Fabric {
                        game: &game,
                        loader: &loader,
                    }
                    .normalize(),
                    _ => LoaderMap::new(),
                }
            }
            LoaderKind::FabricApi => {
                let empty = LoaderMap::new();
                match self.fetch_feed(FeedSource::FabricApiVersions).await {
                    Some(raw) => LoaderInput::FabricApi {
                        versions: &raw,
                        fabric: fabric.unwrap_or(&empty),
                    }
                    .normalize(),
                    None => LoaderMap::new(),
                }
            }
            LoaderKind::Forge => match self.fetch_feed(FeedSource::ForgePromotions).await {
                Some(raw) => LoaderInput::Forge { promotions: &raw }.normalize(),
                None => LoaderMap::new(),
            },
            LoaderKind::NeoForge => match self.fetch_feed(FeedSource::NeoForgeVersions).await {
                Some(raw) => LoaderInput::NeoForge { versions: &raw }.normalize(),
                None => LoaderMap::new(),
            },
        };
        debug!("{} map has {} entries (feeds: {:?})", kind, map.len(), kind.feeds());
        map
    }

    // ── Template ────────────────────────────────────────

    /// Cached template archive, downloading it on first use.
    pub async fn template(&self) -> GeneratorResult<Arc<Vec<u8>>> {
        if let Some(template) = self.template.read().await.as_ref() {
            return Ok(Arc::clone(template));
        }
        self.refresh_template()
            .await
            .ok_or(GeneratorError::TemplateUnavailable)
    }

    /// Download the template again; the previous copy stays cached on failure.
    pub async fn refresh_template(&self) -> Option<Arc<Vec<u8>>> {
        let fresh = self.fetch_feed(FeedSource::Template).await?;
        *self.template.write().await = Some(Arc::clone(&fresh));
        info!("Template fetched successfully ({} bytes)", fresh.len());
        self.store_blob(TEMPLATE_BLOB, fresh.to_vec()).await;
        Some(fresh)
    }

    // ── Blobs ───────────────────────────────────────────

    async fn persist_snapshot(&self, snapshot: &CatalogSnapshot) {
        if self.blobs.is_none() {
            return;
        }

        self.store_json(MINECRAFT_VERSIONS_BLOB, snapshot.game_versions()).await;
        for (kind, map) in snapshot.loader_maps() {
            self.store_json(loader_blob_name(*kind), map).await;
        }
        self.store_json(COMPATIBLE_VERSIONS_BLOB, snapshot.matrix()).await;
    }

    async fn store_json<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.store_blob(key, bytes).await,
            Err(e) => warn!("Could not serialize blob {}: {}", key, e),
        }
    }

    async fn store_blob(&self, key: &str, bytes: Vec<u8>) {
        let Some(blobs) = &self.blobs else {
            return;
        };
        if let Err(e) = blobs.store(key, bytes).await {
            warn!("Error storing blob {}: {}", key, e);
        }
    }
}

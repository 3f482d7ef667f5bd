use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::blob::{BlobStore, FsBlobStore};
use crate::core::catalog::CatalogService;
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::feeds::{FeedFetcher, FeedUrls, HttpFeedFetcher};
use crate::core::template::root::KNOWN_ROOTS;
use crate::core::template::{TemplateCustomizer, ZipCodec};

const APP_DIR_NAME: &str = "universal-mod-template-generator";
const SETTINGS_FILE: &str = "generator_settings.json";
const DATA_DIR_ENV: &str = "MODGEN_DATA_DIR";
const DEFAULT_BLOB_PREFIX: &str = "universal-mod-template-generator/";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorSettings {
    pub feed_urls: FeedUrls,
    pub known_roots: Vec<String>,
    pub blob_prefix: String,
    pub persist_blobs: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            feed_urls: FeedUrls::default(),
            known_roots: KNOWN_ROOTS.iter().map(|s| s.to_string()).collect(),
            blob_prefix: DEFAULT_BLOB_PREFIX.to_string(),
            persist_blobs: true,
        }
    }
}

impl GeneratorSettings {
    /// Settings stored in `data_dir`, or defaults when the file is missing
    /// or unreadable.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => {
                debug!("No settings at {:?}, using defaults", path);
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring malformed settings at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) -> GeneratorResult<()> {
        std::fs::create_dir_all(data_dir).map_err(|source| GeneratorError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        let path = data_dir.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(|source| GeneratorError::Io { path, source })
    }
}

/// Everything a command needs, wired once at startup.
pub struct AppState {
    pub data_dir: PathBuf,
    pub settings: GeneratorSettings,
    pub catalog: Arc<CatalogService>,
    pub customizer: TemplateCustomizer,
    pub codec: ZipCodec,
}

impl AppState {
    /// Production wiring: HTTP feeds and a filesystem blob store under the
    /// data dir.
    pub fn new() -> GeneratorResult<Self> {
        let data_dir = default_data_dir();
        let settings = GeneratorSettings::load(&data_dir);
        info!("Using data dir {:?}", data_dir);

        let fetcher: Arc<dyn FeedFetcher> =
            Arc::new(HttpFeedFetcher::with_default_client(settings.feed_urls.clone())?);

        let blobs: Option<Arc<dyn BlobStore>> = if settings.persist_blobs {
            Some(Arc::new(FsBlobStore::new(
                data_dir.join("blobs"),
                settings.blob_prefix.clone(),
            )))
        } else {
            None
        };

        Ok(Self::with_parts(data_dir, settings, fetcher, blobs))
    }

    pub fn with_parts(
        data_dir: PathBuf,
        settings: GeneratorSettings,
        fetcher: Arc<dyn FeedFetcher>,
        blobs: Option<Arc<dyn BlobStore>>,
    ) -> Self {
        let customizer = TemplateCustomizer::new(settings.known_roots.clone());
        Self {
            data_dir,
            settings,
            catalog: Arc::new(CatalogService::new(fetcher, blobs)),
            customizer,
            codec: ZipCodec,
        }
    }

    pub fn blobs_dir(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }
}

fn default_base_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// `$MODGEN_DATA_DIR`, else the platform data dir joined with the app name.
pub fn default_data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => default_base_dir().join(APP_DIR_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feeds::fixtures::StaticFeedFetcher;

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(GeneratorSettings::load(dir.path()), GeneratorSettings::default());
    }

    #[test]
    fn settings_round_trip_through_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = GeneratorSettings::default();
        settings.persist_blobs = false;
        settings.feed_urls.forge_promotions = "http://localhost:9/promos.json".into();

        settings.save(dir.path()).unwrap();

        assert_eq!(GeneratorSettings::load(dir.path()), settings);
    }

    #[test]
    fn partial_settings_keep_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{"persist_blobs": false}"#).unwrap();

        let settings = GeneratorSettings::load(dir.path());

        assert!(!settings.persist_blobs);
        assert_eq!(settings.blob_prefix, DEFAULT_BLOB_PREFIX);
        assert_eq!(settings.known_roots.len(), KNOWN_ROOTS.len());
    }

    #[test]
    fn malformed_settings_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{not json").unwrap();
        assert_eq!(GeneratorSettings::load(dir.path()), GeneratorSettings::default());
    }

    #[test]
    fn customizer_uses_configured_roots() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = GeneratorSettings::default();
        settings.known_roots = vec!["my-template".into()];

        let state = AppState::with_parts(
            dir.path().to_path_buf(),
            settings,
            Arc::new(StaticFeedFetcher::empty()),
            None,
        );

        assert_eq!(state.customizer.known_roots(), ["my-template".to_string()]);
        assert_eq!(state.blobs_dir(), dir.path().join("blobs"));
    }
}

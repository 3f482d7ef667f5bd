// ─── Blob Storage ───
// Write-only persistence of computed snapshots and the cached template.
// Nothing in the generator reads blobs back.

use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::core::error::{GeneratorError, GeneratorResult};

pub const MINECRAFT_VERSIONS_BLOB: &str = "minecraft-versions.json";
pub const FABRIC_VERSIONS_BLOB: &str = "fabric-versions.json";
pub const FABRIC_API_VERSIONS_BLOB: &str = "fabric-api-versions.json";
pub const FORGE_VERSIONS_BLOB: &str = "forge-versions.json";
pub const NEOFORGE_VERSIONS_BLOB: &str = "neoforge-versions.json";
pub const COMPATIBLE_VERSIONS_BLOB: &str = "compatible-versions.json";
pub const TEMPLATE_BLOB: &str = "template.zip";

/// Blob capability: persist bytes under a key and hand back a locator.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, key: &str, bytes: Vec<u8>) -> GeneratorResult<String>;
}

/// Stores blobs as files below a root directory.
pub struct FsBlobStore {
    root: PathBuf,
    prefix: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}{}", self.prefix, key))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, key: &str, bytes: Vec<u8>) -> GeneratorResult<String> {
        let path = self.path_for(key);
        debug!("Storing blob {} ({} bytes)", key, bytes.len());

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| GeneratorError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let digest = hex::encode(Sha256::digest(&bytes));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| GeneratorError::Io {
                path: path.clone(),
                source,
            })?;

        let locator = format!("file://{}#sha256={}", path.display(), digest);
        info!("Blob stored: {}", locator);
        Ok(locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_under_prefix_and_reports_digest() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "universal-mod-template-generator/");

        let locator = store
            .store(COMPATIBLE_VERSIONS_BLOB, b"[]".to_vec())
            .await
            .unwrap();

        let expected_path = dir
            .path()
            .join("universal-mod-template-generator")
            .join(COMPATIBLE_VERSIONS_BLOB);
        assert_eq!(std::fs::read(&expected_path).unwrap(), b"[]");
        assert!(locator.starts_with("file://"));
        assert!(locator.ends_with(&format!("#sha256={}", hex::encode(Sha256::digest(b"[]")))));
    }

    #[tokio::test]
    async fn overwrites_existing_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "");

        store.store(TEMPLATE_BLOB, vec![1, 2, 3]).await.unwrap();
        store.store(TEMPLATE_BLOB, vec![4]).await.unwrap();

        assert_eq!(std::fs::read(dir.path().join(TEMPLATE_BLOB)).unwrap(), vec![4]);
    }
}

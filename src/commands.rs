use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::catalog::{CatalogSource, CompatibilityRecord};
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::loaders::{LoaderKind, LoaderMap};
use crate::core::state::AppState;
use crate::core::template::{ModIdentity, Selection};
use crate::core::version::GameVersion;

/// Canonical map of every loader, as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderVersionsPayload {
    pub fabric: LoaderMap,
    pub fabric_api: LoaderMap,
    pub forge: LoaderMap,
    pub neoforge: LoaderMap,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub identity: ModIdentity,
    pub loaders: Vec<LoaderKind>,
    /// Game version ids, in the order the user picked them.
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub file_name: String,
    pub size: usize,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

// ── Catalog ─────────────────────────────────────────────

pub async fn get_minecraft_versions(state: &AppState) -> GeneratorResult<Vec<GameVersion>> {
    let snapshot = state.catalog.ensure_catalog().await?;
    Ok(snapshot.game_versions().to_vec())
}

pub async fn get_mod_loader_versions(state: &AppState) -> GeneratorResult<LoaderVersionsPayload> {
    let snapshot = state.catalog.ensure_catalog().await?;
    let map = |kind| snapshot.loader_map(kind).cloned().unwrap_or_default();

    Ok(LoaderVersionsPayload {
        fabric: map(LoaderKind::Fabric),
        fabric_api: map(LoaderKind::FabricApi),
        forge: map(LoaderKind::Forge),
        neoforge: map(LoaderKind::NeoForge),
    })
}

pub async fn get_compatible_versions(
    state: &AppState,
) -> GeneratorResult<Vec<CompatibilityRecord>> {
    let snapshot = state.catalog.ensure_catalog().await?;
    Ok(snapshot.matrix().to_vec())
}

pub async fn get_template(state: &AppState) -> GeneratorResult<Arc<Vec<u8>>> {
    state.catalog.template().await
}

/// Refetch one source, or everything when `source` is `None`.
pub async fn refresh_catalog(
    state: &AppState,
    source: Option<CatalogSource>,
) -> GeneratorResult<Vec<CompatibilityRecord>> {
    let snapshot = match source {
        Some(source) => state.catalog.refresh_source(source).await?,
        None => state.catalog.refresh_all().await?,
    };
    Ok(snapshot.matrix().to_vec())
}

// ── Generation ──────────────────────────────────────────

/// Validate the request, resolve it against the current catalog and build
/// the artifact. `template` overrides the cached upstream archive.
pub async fn generate_template(
    state: &AppState,
    request: GenerateRequest,
    template: Option<Vec<u8>>,
) -> GeneratorResult<GeneratedArtifact> {
    validate_identity(&request.identity)?;
    let loaders = validate_loaders(&request.loaders)?;
    if request.versions.is_empty() {
        return Err(GeneratorError::InvalidSelection(
            "Select at least one Minecraft version".into(),
        ));
    }

    let snapshot = state.catalog.ensure_catalog().await?;
    let mut versions: Vec<CompatibilityRecord> = Vec::with_capacity(request.versions.len());
    for id in &request.versions {
        if versions.iter().any(|v| v.id() == id.as_str()) {
            warn!("Ignoring repeated version {}", id);
            continue;
        }
        let record = snapshot
            .record(id)
            .ok_or_else(|| GeneratorError::UnknownGameVersion(id.clone()))?;
        versions.push(record.clone());
    }

    for kind in &loaders {
        if !versions.iter().any(|v| v.supports(*kind)) {
            return Err(GeneratorError::InvalidSelection(format!(
                "{} has no build for any selected version",
                kind
            )));
        }
    }

    let archive = match template {
        Some(bytes) => Arc::new(bytes),
        None => state.catalog.template().await?,
    };

    let selection = Selection {
        mod_id: request.identity.mod_id,
        mod_name: request.identity.mod_name,
        package_name: request.identity.package_name,
        loaders,
        versions,
    };
    let file_name = format!("{}-template.zip", selection.mod_id);

    let customizer = state.customizer.clone();
    let codec = state.codec;
    let bytes = tokio::task::spawn_blocking(move || {
        customizer.generate(&codec, &archive, &selection)
    })
    .await
    .map_err(|e| GeneratorError::Other(format!("Generation task failed: {}", e)))??;

    info!("Generated {} ({} bytes)", file_name, bytes.len());
    Ok(GeneratedArtifact {
        file_name,
        size: bytes.len(),
        bytes,
    })
}

fn validate_identity(identity: &ModIdentity) -> GeneratorResult<()> {
    if identity.mod_id.trim().is_empty() {
        return Err(GeneratorError::InvalidSelection("Mod ID is required".into()));
    }
    if identity.mod_name.trim().is_empty() {
        return Err(GeneratorError::InvalidSelection("Mod name is required".into()));
    }
    if !is_package_name(&identity.package_name) {
        return Err(GeneratorError::InvalidSelection(format!(
            "Invalid package name: {:?}",
            identity.package_name
        )));
    }
    Ok(())
}

fn is_package_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                }
                _ => false,
            }
        })
}

fn validate_loaders(requested: &[LoaderKind]) -> GeneratorResult<BTreeSet<LoaderKind>> {
    if let Some(kind) = requested.iter().find(|kind| !kind.is_selectable()) {
        return Err(GeneratorError::InvalidSelection(format!(
            "{} cannot be selected on its own",
            kind
        )));
    }
    let loaders: BTreeSet<LoaderKind> = requested.iter().copied().collect();
    if loaders.is_empty() {
        return Err(GeneratorError::InvalidSelection(
            "Select at least one mod loader".into(),
        ));
    }
    Ok(loaders)
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::placeholders::package_path;
use crate::core::catalog::CompatibilityRecord;
use crate::core::loaders::LoaderKind;

/// What the user asked for, with versions already resolved against the
/// catalog.
#[derive(Debug, Clone)]
pub struct Selection {
    pub mod_id: String,
    pub mod_name: String,
    pub package_name: String,
    pub loaders: BTreeSet<LoaderKind>,
    pub versions: Vec<CompatibilityRecord>,
}

impl Selection {
    pub fn package_path(&self) -> String {
        package_path(&self.package_name)
    }

    /// A loader's folder ships only if the loader was picked and at least
    /// one picked version has a build for it.
    pub fn includes_loader(&self, kind: LoaderKind) -> bool {
        self.loaders.contains(&kind) && self.versions.iter().any(|v| v.supports(kind))
    }

    /// Picked, selectable loaders that `record` has a build for, in output order.
    pub fn loaders_for<'a>(&'a self, record: &'a CompatibilityRecord) -> impl Iterator<Item = LoaderKind> + 'a {
        LoaderKind::SELECTABLE
            .into_iter()
            .filter(move |kind| self.loaders.contains(kind) && record.supports(*kind))
    }

    /// First picked version; it replaces the pinned version in template text.
    pub fn primary_version(&self) -> Option<&str> {
        self.versions.first().map(|v| v.id())
    }
}

/// Identifiers as submitted, before catalog resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModIdentity {
    pub mod_id: String,
    pub mod_name: String,
    pub package_name: String,
}

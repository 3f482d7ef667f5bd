use std::collections::HashMap;

use tracing::{debug, info, info_span};
use uuid::Uuid;

use super::archive::{ArchiveCodec, TemplateEntry};
use super::placeholders::{rewrite_package_path, Substitutions};
use super::properties::{self, CONFIG_DIR};
use super::root::{detect_root, relative_to, KNOWN_ROOTS};
use super::selection::Selection;
use crate::core::error::GenerateError;
use crate::core::loaders::LoaderKind;

/// Rewrites the template archive for one selection. Holds no per-request
/// state, so one instance serves concurrent requests.
#[derive(Debug, Clone)]
pub struct TemplateCustomizer {
    known_roots: Vec<String>,
}

impl Default for TemplateCustomizer {
    fn default() -> Self {
        Self::new(KNOWN_ROOTS.iter().map(|s| s.to_string()).collect())
    }
}

/// Output entries keyed by path; a repeated path replaces the earlier entry
/// in place.
#[derive(Default)]
struct ArtifactBuilder {
    entries: Vec<TemplateEntry>,
    index: HashMap<String, usize>,
}

impl ArtifactBuilder {
    fn push(&mut self, entry: TemplateEntry) {
        match self.index.get(&entry.path) {
            Some(&at) => {
                debug!("Duplicate output path {}, keeping the later entry", entry.path);
                self.entries[at] = entry;
            }
            None => {
                self.index.insert(entry.path.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    fn finish(self) -> Vec<TemplateEntry> {
        self.entries
    }
}

impl TemplateCustomizer {
    pub fn new(known_roots: Vec<String>) -> Self {
        Self { known_roots }
    }

    pub fn known_roots(&self) -> &[String] {
        &self.known_roots
    }

    /// Decode, customize and re-encode in one request.
    pub fn generate(
        &self,
        codec: &dyn ArchiveCodec,
        archive: &[u8],
        selection: &Selection,
    ) -> Result<Vec<u8>, GenerateError> {
        let span = info_span!("generate", request_id = %Uuid::new_v4(), mod_id = %selection.mod_id);
        let _enter = span.enter();

        let entries = codec.decode(archive)?;
        let generated = self.customize(&entries, selection)?;
        let bytes = codec.encode(&generated)?;

        info!(
            "Generated template: {} entries, {} bytes, {} version(s)",
            generated.len(),
            bytes.len(),
            selection.versions.len()
        );
        Ok(bytes)
    }

    /// Produce the artifact entries. `entries` is only read.
    pub fn customize(
        &self,
        entries: &[TemplateEntry],
        selection: &Selection,
    ) -> Result<Vec<TemplateEntry>, GenerateError> {
        let root = detect_root(entries, &self.known_roots)?;
        let package_path = selection.package_path();
        let substitutions = Substitutions::for_mod(
            &selection.package_name,
            &selection.mod_id,
            &selection.mod_name,
            selection.primary_version(),
        );

        let excluded_prefixes: Vec<&'static str> = LoaderKind::ALL
            .into_iter()
            .filter(|kind| !selection.includes_loader(*kind))
            .filter_map(LoaderKind::archive_prefix)
            .collect();

        let mut out = ArtifactBuilder::default();

        for entry in entries {
            if entry.is_directory {
                continue;
            }
            let Some(relative) = relative_to(&entry.path, &root) else {
                continue;
            };
            if excluded_prefixes.iter().any(|prefix| relative.starts_with(prefix)) {
                continue;
            }
            if relative.starts_with(CONFIG_DIR) {
                continue;
            }

            match std::str::from_utf8(&entry.bytes) {
                Ok(text) => out.push(TemplateEntry::file(
                    rewrite_package_path(relative, &package_path),
                    substitutions.apply(text),
                )),
                Err(_) => out.push(TemplateEntry::file(relative, entry.bytes.clone())),
            }
        }

        out.push(TemplateEntry::directory(CONFIG_DIR));
        for record in &selection.versions {
            out.push(TemplateEntry::file(
                properties::config_path(record.id()),
                properties::render(record, selection),
            ));
        }

        Ok(out.finish())
    }
}

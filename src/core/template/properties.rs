use super::selection::Selection;
use crate::core::catalog::CompatibilityRecord;
use crate::core::java::required_java_for_minecraft_version;
use crate::core::loaders::LoaderKind;

/// Directory regenerated on every request; template copies are dropped.
pub const CONFIG_DIR: &str = "versionProperties/";

pub fn config_path(game_version_id: &str) -> String {
    format!("{}{}.properties", CONFIG_DIR, game_version_id)
}

/// Build configuration for one selected release.
///
/// A loader section appears only when that loader is picked and this release
/// has a build for it; `builds_for` is always present, possibly empty.
pub fn render(record: &CompatibilityRecord, selection: &Selection) -> String {
    let id = record.id();
    let mut out = format!(
        "# General Properties\n\
         java_version={}\n\
         minecraft_version={}\n\
         compatible_mc_versions=[\"{}\"]\n",
        required_java_for_minecraft_version(id),
        id,
        id,
    );

    let loaders: Vec<LoaderKind> = selection.loaders_for(record).collect();

    for kind in &loaders {
        let Some(entry) = record.loader(*kind) else {
            continue;
        };
        match kind {
            LoaderKind::Fabric => {
                let api = record
                    .loader(LoaderKind::FabricApi)
                    .map(|e| e.version.as_str())
                    .unwrap_or("");
                out.push_str(&format!(
                    "\n# Fabric-specific Properties\n\
                     fabric_loader={}\n\
                     fabric_api_version={}\n",
                    entry.version, api,
                ));
            }
            LoaderKind::Forge => {
                out.push_str(&format!(
                    "\n# Forge-specific Properties\n\
                     forge_loader={}\n",
                    entry.version,
                ));
            }
            LoaderKind::NeoForge => {
                let full = entry.full_version.as_deref().unwrap_or(&entry.version);
                out.push_str(&format!(
                    "\n# NeoForge-specific Properties\n\
                     ## Unimined wants the last version number, for example, {} -> {}\n\
                     neoforge_loader={}\n",
                    full, entry.version, entry.version,
                ));
            }
            LoaderKind::FabricApi => {}
        }
    }

    let builds_for: Vec<&str> = loaders.iter().map(|kind| kind.as_str()).collect();
    out.push_str(&format!(
        "\n# Selected loaders\n\
         builds_for={}\n",
        builds_for.join(","),
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loaders::LoaderVersionEntry;
    use crate::core::version::GameVersion;
    use chrono::{TimeZone, Utc};

    fn record(id: &str) -> CompatibilityRecord {
        CompatibilityRecord::new(GameVersion::new(
            id,
            Utc.with_ymd_and_hms(2024, 4, 29, 12, 0, 0).unwrap(),
        ))
    }

    fn selection(loaders: &[LoaderKind]) -> Selection {
        Selection {
            mod_id: "mymod".into(),
            mod_name: "My Mod".into(),
            package_name: "com.example.mymod".into(),
            loaders: loaders.iter().copied().collect(),
            versions: Vec::new(),
        }
    }

    #[test]
    fn renders_every_section_for_a_fully_supported_release() {
        let r = record("1.20.6")
            .with_loader(LoaderVersionEntry::new(LoaderKind::Fabric, "0.16.0"))
            .with_loader(LoaderVersionEntry::new(LoaderKind::FabricApi, "0.100.0+1.20.6"))
            .with_loader(LoaderVersionEntry::new(LoaderKind::Forge, "50.1.0"))
            .with_loader(LoaderVersionEntry::with_full_version(
                LoaderKind::NeoForge,
                "119",
                "20.6.119",
            ));
        let s = selection(&[LoaderKind::Fabric, LoaderKind::Forge, LoaderKind::NeoForge]);

        assert_eq!(
            render(&r, &s),
            "# General Properties\n\
             java_version=21\n\
             minecraft_version=1.20.6\n\
             compatible_mc_versions=[\"1.20.6\"]\n\
             \n\
             # Fabric-specific Properties\n\
             fabric_loader=0.16.0\n\
             fabric_api_version=0.100.0+1.20.6\n\
             \n\
             # Forge-specific Properties\n\
             forge_loader=50.1.0\n\
             \n\
             # NeoForge-specific Properties\n\
             ## Unimined wants the last version number, for example, 20.6.119 -> 119\n\
             neoforge_loader=119\n\
             \n\
             # Selected loaders\n\
             builds_for=fabric,forge,neoforge\n"
        );
    }

    #[test]
    fn unsupported_or_unselected_loaders_are_omitted() {
        let r = record("1.16.5")
            .with_loader(LoaderVersionEntry::new(LoaderKind::Fabric, "0.16.0"))
            .with_loader(LoaderVersionEntry::new(LoaderKind::Forge, "36.2.34"));
        let s = selection(&[LoaderKind::Forge, LoaderKind::NeoForge]);

        let text = render(&r, &s);
        assert!(text.contains("java_version=8\n"));
        assert!(text.contains("forge_loader=36.2.34\n"));
        assert!(!text.contains("Fabric-specific"));
        assert!(!text.contains("NeoForge-specific"));
        assert!(text.ends_with("builds_for=forge\n"));
    }

    #[test]
    fn builds_for_is_present_even_when_empty() {
        let text = render(&record("1.20.4"), &selection(&[LoaderKind::NeoForge]));
        assert!(text.ends_with("\n# Selected loaders\nbuilds_for=\n"));
    }

    #[test]
    fn fabric_api_left_blank_when_missing() {
        let r = record("1.21").with_loader(LoaderVersionEntry::new(LoaderKind::Fabric, "0.16.0"));
        let text = render(&r, &selection(&[LoaderKind::Fabric]));
        assert!(text.contains("fabric_api_version=\n"));
    }

    #[test]
    fn config_files_live_under_reserved_dir() {
        assert_eq!(config_path("1.20.4"), "versionProperties/1.20.4.properties");
    }
}

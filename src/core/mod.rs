// ─── Universal Mod Template Generator Core ───
// Loader compatibility catalog and template customization.
//
// Architecture:
//   core/
//     feeds/      Upstream endpoints + fetch capability
//     version/    Mojang manifest + numeric version ordering
//     loaders/    Fabric, Fabric API, Forge, NeoForge normalizers
//     catalog/    Compatibility matrix, snapshots, coalesced refresh
//     java/       Toolchain tier per Minecraft version
//     template/   Archive codec, root detection, rewrite, properties
//     blob/       Write-only persistence of computed results
//     state/      Settings + application wiring

pub mod blob;
pub mod catalog;
pub mod error;
pub mod feeds;
pub mod http;
pub mod java;
pub mod loaders;
pub mod state;
pub mod template;
pub mod version;

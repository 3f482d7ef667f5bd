pub mod manifest;
pub mod ordering;

pub use manifest::{normalize_game_versions, GameVersion, VersionManifest};
pub use ordering::{compare_segments, leading_number, numeric_segments};

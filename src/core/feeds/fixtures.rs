//! Canned upstream payloads and an in-memory fetcher for tests.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::{FeedFetcher, FeedSource};
use crate::core::error::{GeneratorError, GeneratorResult};

pub const MANIFEST: &str = r#"{
    "latest": {"release": "1.21", "snapshot": "24w33a"},
    "versions": [
        {"id": "24w33a", "type": "snapshot", "url": "u", "releaseTime": "2024-08-14T12:00:00+00:00"},
        {"id": "1.21", "type": "release", "url": "u", "releaseTime": "2024-06-13T08:00:00+00:00"},
        {"id": "1.20.6", "type": "release", "url": "u", "releaseTime": "2024-04-29T12:00:00+00:00"},
        {"id": "1.20.4", "type": "release", "url": "u", "releaseTime": "2023-12-07T12:00:00+00:00"},
        {"id": "1.16.5", "type": "release", "url": "u", "releaseTime": "2021-01-15T14:00:00+00:00"},
        {"id": "1.0", "type": "release", "url": "u", "releaseTime": "2011-11-17T22:00:00+00:00"}
    ]
}"#;

pub const FABRIC_GAMES: &str = r#"[
    {"version": "24w33a", "stable": false},
    {"version": "1.21", "stable": true},
    {"version": "1.20.6", "stable": true},
    {"version": "1.20.4", "stable": true},
    {"version": "1.16.5", "stable": true}
]"#;

pub const FABRIC_LOADERS: &str = r#"[
    {"separator": ".", "build": 1, "maven": "net.fabricmc:fabric-loader:0.16.0", "version": "0.16.0", "stable": true},
    {"separator": ".", "build": 0, "maven": "net.fabricmc:fabric-loader:0.15.11", "version": "0.15.11", "stable": true}
]"#;

pub const FABRIC_API: &str = r#"[
    {"version_number": "0.100.0+1.20.6", "version_type": "release", "game_versions": ["1.20.6"]},
    {"version_number": "0.97.0+1.20.4", "version_type": "release", "game_versions": ["1.20.4"]},
    {"version_number": "0.42.0+1.16", "version_type": "release", "game_versions": ["1.16.5", "1.16.4"]}
]"#;

pub const FORGE: &str = r#"{
    "homepage": "https://files.minecraftforge.net/net/minecraftforge/forge/",
    "promos": {
        "1.16.5-recommended": "1.16.5-36.2.34",
        "1.16.5-latest": "1.16.5-36.2.42",
        "1.20.4-recommended": "1.20.4-49.0.3",
        "1.20.4-latest": "1.20.4-49.1.0",
        "1.20.6-latest": "1.20.6-50.1.0"
    }
}"#;

pub const NEOFORGE: &str = r#"{
    "isSnapshot": false,
    "versions": ["20.4.70", "20.4.72", "20.6.119", "21.0.3", "21.0.5"]
}"#;

/// Serves fixed payloads; sources without a payload fail like a 404.
pub struct StaticFeedFetcher {
    payloads: HashMap<FeedSource, Vec<u8>>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<FeedSource, usize>>,
    total_calls: AtomicUsize,
}

impl StaticFeedFetcher {
    pub fn empty() -> Self {
        Self {
            payloads: HashMap::new(),
            delay: None,
            calls: Mutex::new(HashMap::new()),
            total_calls: AtomicUsize::new(0),
        }
    }

    /// Every catalog feed populated with the canned payloads above.
    pub fn standard() -> Self {
        Self::empty()
            .with(FeedSource::MinecraftVersions, MANIFEST)
            .with(FeedSource::FabricGameVersions, FABRIC_GAMES)
            .with(FeedSource::FabricLoaderVersions, FABRIC_LOADERS)
            .with(FeedSource::FabricApiVersions, FABRIC_API)
            .with(FeedSource::ForgePromotions, FORGE)
            .with(FeedSource::NeoForgeVersions, NEOFORGE)
    }

    pub fn with(mut self, source: FeedSource, payload: impl AsRef<[u8]>) -> Self {
        self.payloads.insert(source, payload.as_ref().to_vec());
        self
    }

    pub fn without(mut self, source: FeedSource) -> Self {
        self.payloads.remove(&source);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self, source: FeedSource) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(&source).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedFetcher for StaticFeedFetcher {
    async fn fetch(&self, source: FeedSource) -> GeneratorResult<Vec<u8>> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(source).or_insert(0) += 1;
        }
        self.total_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.payloads
            .get(&source)
            .cloned()
            .ok_or(GeneratorError::FeedUnavailable {
                feed: source,
                url: format!("memory://{}", source),
                status: 404,
            })
    }
}

/// Build a zip in memory. Paths ending in `/` become directory entries.
pub fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (path, bytes) in entries {
        if path.ends_with('/') {
            writer.add_directory(*path, options).unwrap();
        } else {
            writer.start_file(*path, options).unwrap();
            writer.write_all(bytes).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::{FeedSource, FeedUrls};
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::http::build_http_client;

/// Fetch capability: turns a source identifier into its raw payload.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, source: FeedSource) -> GeneratorResult<Vec<u8>>;
}

/// Plain HTTP GET against the configured endpoint table.
pub struct HttpFeedFetcher {
    client: Client,
    urls: FeedUrls,
}

impl HttpFeedFetcher {
    pub fn new(client: Client, urls: FeedUrls) -> Self {
        Self { client, urls }
    }

    pub fn with_default_client(urls: FeedUrls) -> GeneratorResult<Self> {
        Ok(Self::new(build_http_client()?, urls))
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, source: FeedSource) -> GeneratorResult<Vec<u8>> {
        let url = self.urls.url(source);
        info!("Fetching {}...", source);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::FeedUnavailable {
                feed: source,
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!("Fetched {} ({} bytes)", source, bytes.len());
        Ok(bytes.to_vec())
    }
}

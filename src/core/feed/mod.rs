pub mod fetcher;
pub mod parser;
pub mod types;

use async_trait::async_trait;

use fetcher::{fetch_feed, FetchError};
use parser::{parse_feed_bytes, FeedParseError};
use types::FeedItem;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] FeedParseError),
}

/// Anything that can turn a feed URL into its raw items.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_items(&self, url: &str) -> Result<Vec<FeedItem>, FeedError>;
}

#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_items(&self, url: &str) -> Result<Vec<FeedItem>, FeedError> {
        let fetched = fetch_feed(&self.client, url).await?;
        tracing::debug!(
            bytes = fetched.body.len(),
            content_type = fetched.content_type.as_deref().unwrap_or("unknown"),
            "feed downloaded"
        );
        let parsed = parse_feed_bytes(&fetched.body)?;
        tracing::debug!(
            title = %parsed.title,
            format = ?parsed.format,
            items = parsed.items.len(),
            "feed parsed"
        );
        Ok(parsed.items)
    }
}

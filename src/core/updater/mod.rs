use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::core::article::{normalize_items, Article};
use crate::core::feed::FeedSource;
use crate::core::storage::persist_articles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSettings {
    pub feed_url: String,
    pub output_path: PathBuf,
    pub max_articles: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { articles: usize },
    /// Fetch failed; the artifact was not touched.
    Skipped,
    PersistFailed,
}

/// Runs fetch, normalize and persist once. Failures are logged, never raised.
pub async fn run_update(
    source: &dyn FeedSource,
    settings: &UpdateSettings,
    now: DateTime<Utc>,
) -> UpdateOutcome {
    tracing::info!(url = %settings.feed_url, "fetching feed");
    let items = match source.fetch_items(&settings.feed_url).await {
        Ok(items) => {
            tracing::info!(items = items.len(), "feed fetched");
            items
        }
        Err(error) => {
            tracing::error!(url = %settings.feed_url, "feed fetch failed: {error}");
            tracing::warn!(path = %settings.output_path.display(), "no update performed this run");
            return UpdateOutcome::Skipped;
        }
    };

    let articles = normalize_items(&items, settings.max_articles, now);
    tracing::info!(
        articles = articles.len(),
        max = settings.max_articles,
        "items normalized"
    );

    persist(&articles, &settings.output_path)
}

fn persist(articles: &[Article], path: &Path) -> UpdateOutcome {
    tracing::info!(path = %path.display(), "writing articles");
    match persist_articles(articles, path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), articles = articles.len(), "articles saved");
            UpdateOutcome::Updated {
                articles: articles.len(),
            }
        }
        Err(error) => {
            tracing::error!(path = %path.display(), "failed to save articles: {error}");
            UpdateOutcome::PersistFailed
        }
    }
}

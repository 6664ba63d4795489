use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::core::updater::UpdateSettings;

pub const DEFAULT_FEED_URL: &str = "https://www.espn.com/espn/rss/tennis/news";
pub const DEFAULT_OUTPUT_PATH: &str = "static/tennis_news.json";
pub const DEFAULT_MAX_ARTICLES: usize = 10;
pub const DEFAULT_JSON_PATH: &str = "/static/tennis_news.json";
pub const DEFAULT_CONTAINER_ID: &str = "news-list";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub feed_url: String,
    pub output_path: PathBuf,
    pub max_articles: usize,
    /// Path the renderer requests the artifact from.
    pub json_path: String,
    pub container_id: String,
    /// Web server the renderer resolves `json_path` against.
    pub server_url: String,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            max_articles: DEFAULT_MAX_ARTICLES,
            json_path: DEFAULT_JSON_PATH.to_string(),
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Built-in defaults, overridden by `TENNIS_NEWS_*` variables (a `.env` file is honored).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let text = |key: &'static str, fallback: String| -> Result<String, ConfigError> {
            match lookup(key) {
                None => Ok(fallback),
                Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { key }),
                Some(value) => Ok(value.trim().to_string()),
            }
        };
        Ok(Self {
            feed_url: text("TENNIS_NEWS_FEED_URL", defaults.feed_url)?,
            output_path: PathBuf::from(text(
                "TENNIS_NEWS_OUTPUT_PATH",
                DEFAULT_OUTPUT_PATH.to_string(),
            )?),
            max_articles: number(&lookup, "TENNIS_NEWS_MAX_ARTICLES", DEFAULT_MAX_ARTICLES)?,
            json_path: text("TENNIS_NEWS_JSON_PATH", defaults.json_path)?,
            container_id: text("TENNIS_NEWS_CONTAINER_ID", defaults.container_id)?,
            server_url: text("TENNIS_NEWS_SERVER_URL", defaults.server_url)?,
            http_timeout: Duration::from_secs(number(
                &lookup,
                "TENNIS_NEWS_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        })
    }

    pub fn update_settings(&self) -> UpdateSettings {
        UpdateSettings {
            feed_url: self.feed_url.clone(),
            output_path: self.output_path.clone(),
            max_articles: self.max_articles,
        }
    }

    /// Absolute URL of the artifact: `json_path` joined onto `server_url`.
    pub fn json_url(&self) -> String {
        if self.json_path.starts_with("http://") || self.json_path.starts_with("https://") {
            return self.json_path.clone();
        }
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            self.json_path.trim_start_matches('/')
        )
    }

    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().timeout(self.http_timeout).build()
    }
}

fn number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    fallback: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(fallback),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}

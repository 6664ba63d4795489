//! Tennis news snapshot.
//!
//! Two independent entry points share one JSON artifact: the updater fetches
//! a feed and overwrites the artifact, the renderer fetches the artifact over
//! HTTP and renders it as HTML.

pub mod config;
pub mod core;

use std::io::Write;
use std::process::ExitCode;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::core::feed::HttpFeedSource;
use crate::core::render::{HtmlContainer, NewsRenderer};
use crate::core::updater::{run_update, UpdateOutcome};

const DEFAULT_LOG_FILTER: &str = "info,tennis_news_lib=debug";

fn init_tracing<W>(writer: W)
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();
}

fn load_config() -> Option<Config> {
    match Config::from_env() {
        Ok(config) => Some(config),
        Err(error) => {
            tracing::error!("invalid configuration: {error}");
            None
        }
    }
}

/// One Feed Updater run: fetch, normalize, persist.
pub async fn run_updater() -> ExitCode {
    init_tracing(std::io::stdout);
    tracing::info!("feed update started");

    let Some(config) = load_config() else {
        return ExitCode::FAILURE;
    };
    let client = match config.http_client() {
        Ok(client) => client,
        Err(error) => {
            tracing::error!("failed to build http client: {error}");
            return ExitCode::FAILURE;
        }
    };

    let source = HttpFeedSource::new(client);
    match run_update(&source, &config.update_settings(), Utc::now()).await {
        UpdateOutcome::Updated { articles } => {
            tracing::info!(articles, "feed update finished")
        }
        UpdateOutcome::Skipped => tracing::warn!("feed update finished without changes"),
        UpdateOutcome::PersistFailed => tracing::warn!("feed update finished, artifact not saved"),
    }
    ExitCode::SUCCESS
}

/// One News Renderer pass. The HTML document goes to stdout, logs to stderr.
pub async fn run_renderer() -> ExitCode {
    init_tracing(std::io::stderr);

    let Some(config) = load_config() else {
        return ExitCode::FAILURE;
    };
    let client = match config.http_client() {
        Ok(client) => client,
        Err(error) => {
            tracing::error!("failed to build http client: {error}");
            return ExitCode::FAILURE;
        }
    };

    let renderer = NewsRenderer::new(client, config.json_url());
    let mut container = HtmlContainer::new(config.container_id.as_str());
    tracing::info!(url = renderer.json_url(), container = container.id(), "loading news");
    // The failure text already sits in the container.
    let _ = renderer.load_and_render(&mut container).await;

    let document = match container.to_document() {
        Ok(document) => document,
        Err(error) => {
            tracing::error!("failed to build document: {error}");
            return ExitCode::FAILURE;
        }
    };
    let mut stdout = std::io::stdout().lock();
    if let Err(error) = stdout.write_all(document.as_bytes()) {
        tracing::error!("failed to write document: {error}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

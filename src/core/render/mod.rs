//! HTML rendering of the persisted article artifact.
//!
//! The page region that receives the markup is abstracted as a [`Container`]
//! so the fetch and markup logic can run outside a browser. All markup comes
//! from askama templates under `templates/`, which escape every field.

use askama::Template;

use crate::core::article::{Article, DEFAULT_LINK};

pub const MISCONFIGURATION_HINT: &str =
    "Check that the web server is running, the JSON file exists, and the static directory is served.";

const FAILURE_FALLBACK: &str = "<p>Failed to load news.</p>";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP error! status: {status}. {hint}", hint = MISCONFIGURATION_HINT)]
    HttpStatus { status: u16 },
    #[error("invalid news payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

#[derive(Template)]
#[template(path = "loading.html")]
struct LoadingTemplate;

#[derive(Template)]
#[template(path = "failure.html")]
struct FailureTemplate {
    message: String,
}

#[derive(Template)]
#[template(path = "news_list.html")]
struct NewsListTemplate<'a> {
    blocks: Vec<NewsBlock<'a>>,
}

struct NewsBlock<'a> {
    title: &'a str,
    link: &'a str,
    description: &'a str,
    published: &'a str,
}

impl<'a> From<&'a Article> for NewsBlock<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            title: &article.title,
            link: safe_link(&article.link),
            description: &article.description,
            published: &article.pub_date_formatted,
        }
    }
}

#[derive(Template)]
#[template(path = "document.html")]
struct DocumentTemplate<'a> {
    container_id: &'a str,
    content: &'a str,
}

/// Page region whose content is replaced wholesale on every render.
pub trait Container {
    fn set_content(&mut self, html: String);
}

/// In-memory container identified by its element id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlContainer {
    id: String,
    content: String,
}

impl HtmlContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Minimal standalone page holding the container element.
    pub fn to_document(&self) -> Result<String, RenderError> {
        let document = DocumentTemplate {
            container_id: &self.id,
            content: &self.content,
        };
        Ok(document.render()?)
    }
}

impl Container for HtmlContainer {
    fn set_content(&mut self, html: String) {
        self.content = html;
    }
}

/// Fetches the artifact over HTTP and renders it into a container.
#[derive(Debug, Clone)]
pub struct NewsRenderer {
    client: reqwest::Client,
    json_url: String,
}

impl NewsRenderer {
    pub fn new(client: reqwest::Client, json_url: impl Into<String>) -> Self {
        Self {
            client,
            json_url: json_url.into(),
        }
    }

    pub fn json_url(&self) -> &str {
        &self.json_url
    }

    /// Refreshes `container` from the artifact. Any failure replaces the
    /// content with a failure message and is also returned to the caller.
    pub async fn load_and_render<C: Container>(
        &self,
        container: &mut C,
    ) -> Result<usize, RenderError> {
        container.set_content(render_loading());

        let rendered = match self.fetch_articles().await {
            Ok(articles) => render_articles(&articles).map(|html| (articles.len(), html)),
            Err(error) => Err(error),
        };
        match rendered {
            Ok((count, html)) => {
                container.set_content(html);
                tracing::info!(count, url = %self.json_url, "news rendered");
                Ok(count)
            }
            Err(error) => {
                tracing::error!(url = %self.json_url, "failed to load news: {error}");
                container.set_content(render_failure(&error));
                Err(error)
            }
        }
    }

    async fn fetch_articles(&self) -> Result<Vec<Article>, RenderError> {
        let response = self.client.get(&self.json_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::HttpStatus {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Markup for the container: one block per article, or the empty placeholder.
pub fn render_articles(articles: &[Article]) -> Result<String, RenderError> {
    let list = NewsListTemplate {
        blocks: articles.iter().map(NewsBlock::from).collect(),
    };
    Ok(list.render()?)
}

pub fn render_loading() -> String {
    LoadingTemplate.render().unwrap_or_default()
}

pub fn render_failure(error: &RenderError) -> String {
    let failure = FailureTemplate {
        message: error.to_string(),
    };
    failure
        .render()
        .unwrap_or_else(|_| FAILURE_FALLBACK.to_string())
}

/// Only http(s) targets survive; anything else points at the placeholder anchor.
fn safe_link(link: &str) -> &str {
    match reqwest::Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => link,
        _ => DEFAULT_LINK,
    }
}

use feed_rs::model::Entry;
use serde::Deserialize;

use super::types::{FeedFormat, FeedItem, ParsedFeed};

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("feed payload is empty")]
    EmptyPayload,
    #[error("xml feed parse error: {0}")]
    Xml(#[from] feed_rs::parser::ParseFeedError),
    #[error("json feed parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct JsonFeed {
    title: Option<String>,
    #[serde(default)]
    items: Vec<JsonFeedItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct JsonFeedItem {
    title: Option<String>,
    url: Option<String>,
    summary: Option<String>,
    content_text: Option<String>,
    date_published: Option<String>,
    date_modified: Option<String>,
}

pub fn parse_feed_bytes(raw: &[u8]) -> Result<ParsedFeed, FeedParseError> {
    let trimmed = raw.trim_ascii_start();
    if trimmed.is_empty() {
        return Err(FeedParseError::EmptyPayload);
    }
    if trimmed[0] == b'{' {
        return parse_json_feed(trimmed);
    }
    parse_xml_feed(trimmed)
}

fn parse_xml_feed(raw: &[u8]) -> Result<ParsedFeed, FeedParseError> {
    let feed = feed_rs::parser::parse(raw)?;
    let title = feed
        .title
        .as_ref()
        .map(|text| text.content.clone())
        .unwrap_or_else(|| "Untitled Feed".to_string());
    let items = feed.entries.iter().map(item_from_entry).collect();

    Ok(ParsedFeed {
        format: FeedFormat::XmlFeed,
        title,
        items,
    })
}

fn parse_json_feed(raw: &[u8]) -> Result<ParsedFeed, FeedParseError> {
    let feed: JsonFeed = serde_json::from_slice(raw)?;
    let title = feed.title.unwrap_or_else(|| "Untitled Feed".to_string());
    let items = feed
        .items
        .into_iter()
        .map(|item| FeedItem {
            title: item.title,
            link: item.url,
            description: item.summary.or(item.content_text),
            published: item.date_published.or(item.date_modified),
        })
        .collect();

    Ok(ParsedFeed {
        format: FeedFormat::JsonFeed,
        title,
        items,
    })
}

// feed-rs normalizes dates, so the source text is re-rendered as RFC 2822.
fn item_from_entry(entry: &Entry) -> FeedItem {
    let title = entry.title.as_ref().map(|text| text.content.clone());
    let link = entry.links.first().map(|link| link.href.clone());
    let description = entry.summary.as_ref().map(|text| text.content.clone());
    let published = entry
        .published
        .or(entry.updated)
        .map(|timestamp| timestamp.to_rfc2822());

    FeedItem {
        title,
        link,
        description,
        published,
    }
}

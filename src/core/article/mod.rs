use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::feed::types::FeedItem;

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_LINK: &str = "#";
pub const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// Display-ready record persisted in the artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: String,
    #[serde(rename = "pubDate_formatted")]
    pub pub_date_formatted: String,
}

/// Keeps the first `max` items in feed order and fills every missing field.
///
/// `now` stands in for absent or unparseable publish dates.
pub fn normalize_items(items: &[FeedItem], max: usize, now: DateTime<Utc>) -> Vec<Article> {
    items
        .iter()
        .take(max)
        .map(|item| article_from_item(item, now))
        .collect()
}

fn article_from_item(item: &FeedItem, now: DateTime<Utc>) -> Article {
    let published = non_blank(item.published.as_deref())
        .map(ToString::to_string)
        .unwrap_or_else(|| now.to_rfc2822());
    let timestamp = parse_timestamp(&published).unwrap_or(now);

    Article {
        title: non_blank(item.title.as_deref())
            .unwrap_or(DEFAULT_TITLE)
            .to_string(),
        link: non_blank(item.link.as_deref())
            .unwrap_or(DEFAULT_LINK)
            .to_string(),
        description: non_blank(item.description.as_deref())
            .unwrap_or_default()
            .to_string(),
        published,
        pub_date_formatted: format_display_date(timestamp),
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
}

pub fn format_display_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format(DISPLAY_DATE_FORMAT).to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 21, 45, 0)
            .single()
            .expect("fixed time must be valid")
    }

    fn dated_item(index: usize) -> FeedItem {
        FeedItem {
            title: Some(format!("Headline {index}")),
            link: Some(format!("https://news.example.com/{index}")),
            description: Some(format!("Summary {index}")),
            published: Some("Mon, 01 Jan 2024 15:05:00 +0000".to_string()),
        }
    }

    #[test]
    fn keeps_all_items_below_limit_in_order() {
        let items: Vec<FeedItem> = (0..3).map(dated_item).collect();
        let articles = normalize_items(&items, 10, fixed_now());

        assert_eq!(articles.len(), 3);
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Headline 0", "Headline 1", "Headline 2"]);
    }

    #[test]
    fn truncates_to_first_max_items() {
        let items: Vec<FeedItem> = (0..15).map(dated_item).collect();
        let articles = normalize_items(&items, 10, fixed_now());

        assert_eq!(articles.len(), 10);
        assert_eq!(articles[0].title, "Headline 0");
        assert_eq!(articles[9].title, "Headline 9");
    }

    #[test]
    fn length_is_min_of_items_and_max() {
        for count in 0..6 {
            for max in 0..6 {
                let items: Vec<FeedItem> = (0..count).map(dated_item).collect();
                let articles = normalize_items(&items, max, fixed_now());
                assert_eq!(articles.len(), count.min(max));
            }
        }
    }

    #[test]
    fn empty_feed_yields_empty_collection() {
        assert!(normalize_items(&[], 10, fixed_now()).is_empty());
    }

    #[test]
    fn formats_feed_supplied_date() {
        let articles = normalize_items(&[dated_item(1)], 10, fixed_now());

        assert_eq!(articles[0].published, "Mon, 01 Jan 2024 15:05:00 +0000");
        assert_eq!(articles[0].pub_date_formatted, "Jan 1, 2024, 3:05 PM");
    }

    #[test]
    fn missing_fields_use_fallbacks() {
        let articles = normalize_items(&[FeedItem::default()], 10, fixed_now());
        let article = &articles[0];

        assert_eq!(article.title, DEFAULT_TITLE);
        assert_eq!(article.link, DEFAULT_LINK);
        assert_eq!(article.description, "");
        assert_eq!(article.published, fixed_now().to_rfc2822());
        assert_eq!(article.pub_date_formatted, "Mar 9, 2024, 9:45 PM");
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let item = FeedItem {
            title: Some("   ".to_string()),
            link: Some(String::new()),
            description: Some("\n".to_string()),
            published: Some(" ".to_string()),
        };
        let article = &normalize_items(&[item], 10, fixed_now())[0];

        assert_eq!(article.title, DEFAULT_TITLE);
        assert_eq!(article.link, DEFAULT_LINK);
        assert_eq!(article.description, "");
        assert_eq!(article.pub_date_formatted, "Mar 9, 2024, 9:45 PM");
    }

    #[test]
    fn unparseable_date_is_kept_but_formatted_from_now() {
        let item = FeedItem {
            published: Some("sometime last week".to_string()),
            ..dated_item(0)
        };
        let article = &normalize_items(&[item], 10, fixed_now())[0];

        assert_eq!(article.published, "sometime last week");
        assert_eq!(article.pub_date_formatted, "Mar 9, 2024, 9:45 PM");
    }

    #[test]
    fn parses_rfc3339_dates_in_utc() {
        let timestamp = parse_timestamp("2024-07-14T16:30:00+02:00").expect("rfc3339 parses");
        assert_eq!(format_display_date(timestamp), "Jul 14, 2024, 2:30 PM");
    }

    #[test]
    fn serializes_formatted_date_under_feed_style_key() {
        let article = &normalize_items(&[dated_item(0)], 10, fixed_now())[0];
        let value = serde_json::to_value(article).expect("article serializes");

        assert_eq!(value["pubDate_formatted"], "Jan 1, 2024, 3:05 PM");
        assert_eq!(value.as_object().map(|object| object.len()), Some(5));
    }
}

//! Normalization of raw articles into display-ready [`Story`] values.
//!
//! # Default table
//!
//! | Field | Taken from | Default |
//! |-------|------------|---------|
//! | `id` | `url`, then the RSS `source-index` tag | `"<source>-<position>"` |
//! | `title` | `title` | `"Untitled"` |
//! | `summary` | `description`, then `content` | `"No description available."` |
//! | `source` | `source.name` | `"Internet"` |
//! | `publishedAt` | `publishedAt` | current time, ISO-8601 |
//! | `url` | `url` | absent |
//! | `imageUrl` | `image`, then `urlToImage` | absent |
//! | `lang` | selected language | |
//!
//! Blank strings count as absent. Ids are unique within one call: a candidate
//! already taken by an earlier story is replaced by the positional default.

use crate::models::{Language, RawArticle, Story};
use crate::utils::now_iso;
use itertools::Itertools;
use std::collections::HashSet;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_SUMMARY: &str = "No description available.";
pub const DEFAULT_SOURCE: &str = "Internet";

/// Separator between headlines in the ticker.
pub const TICKER_SEPARATOR: &str = "  •  ";

/// Headlines shown in the ticker.
pub const TICKER_LEN: usize = 5;

/// Normalize a batch of raw articles, preserving order.
pub fn normalize_articles(articles: Vec<RawArticle>, lang: Language) -> Vec<Story> {
    let now = now_iso();
    let mut seen = HashSet::new();

    articles
        .into_iter()
        .enumerate()
        .map(|(position, raw)| {
            let mut story = normalize_article(raw, lang, &now, position);
            if !seen.insert(story.id.clone()) {
                story.id = format!("{}-{}", story.source, position);
                seen.insert(story.id.clone());
            }
            story
        })
        .collect()
}

/// Normalize one article at `position` in its batch, using `now` for a missing
/// publication time.
pub fn normalize_article(raw: RawArticle, lang: Language, now: &str, position: usize) -> Story {
    let source = present(raw.source.and_then(|s| s.name))
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    let url = present(raw.url);
    let id = url
        .clone()
        .or_else(|| present(raw.id))
        .unwrap_or_else(|| format!("{source}-{position}"));

    Story {
        id,
        title: present(raw.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        summary: present(raw.description)
            .or_else(|| present(raw.content))
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        source,
        published_at: present(raw.published_at).unwrap_or_else(|| now.to_string()),
        url,
        image_url: present(raw.image).or_else(|| present(raw.url_to_image)),
        lang,
    }
}

/// Titles of the first [`TICKER_LEN`] stories joined by [`TICKER_SEPARATOR`].
pub fn ticker(stories: &[Story]) -> String {
    stories
        .iter()
        .take(TICKER_LEN)
        .map(|s| s.title.as_str())
        .join(TICKER_SEPARATOR)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawSource;

    const NOW: &str = "2025-06-01T08:00:00.000Z";

    fn titled(title: &str) -> RawArticle {
        RawArticle {
            title: Some(title.to_string()),
            ..RawArticle::default()
        }
    }

    fn story(title: &str) -> Story {
        normalize_article(titled(title), Language::En, NOW, 0)
    }

    #[test]
    fn test_empty_article_gets_every_default() {
        let s = normalize_article(RawArticle::default(), Language::Hi, NOW, 3);

        assert_eq!(s.id, "Internet-3");
        assert_eq!(s.title, DEFAULT_TITLE);
        assert_eq!(s.summary, DEFAULT_SUMMARY);
        assert_eq!(s.source, DEFAULT_SOURCE);
        assert_eq!(s.published_at, NOW);
        assert_eq!(s.url, None);
        assert_eq!(s.image_url, None);
        assert_eq!(s.lang, Language::Hi);
    }

    #[test]
    fn test_blank_strings_count_as_absent() {
        let raw = RawArticle {
            title: Some("".to_string()),
            description: Some("  ".to_string()),
            content: Some("Body".to_string()),
            published_at: Some("".to_string()),
            ..RawArticle::default()
        };
        let s = normalize_article(raw, Language::En, NOW, 0);

        assert_eq!(s.title, DEFAULT_TITLE);
        assert_eq!(s.summary, "Body");
        assert_eq!(s.published_at, NOW);
    }

    #[test]
    fn test_url_wins_over_rss_tag() {
        let raw = RawArticle {
            id: Some("BBC News-0".to_string()),
            url: Some("https://bbc.co.uk/1".to_string()),
            source: Some(RawSource {
                name: Some("BBC News".to_string()),
            }),
            ..RawArticle::default()
        };
        let s = normalize_article(raw, Language::En, NOW, 7);
        assert_eq!(s.id, "https://bbc.co.uk/1");
        assert_eq!(s.url.as_deref(), Some("https://bbc.co.uk/1"));
        assert_eq!(s.source, "BBC News");
    }

    #[test]
    fn test_rss_tag_used_without_url() {
        let raw = RawArticle {
            id: Some("X-1".to_string()),
            ..titled("B")
        };
        assert_eq!(normalize_article(raw, Language::En, NOW, 9).id, "X-1");
    }

    #[test]
    fn test_image_precedence() {
        let raw = RawArticle {
            image: Some("a.jpg".to_string()),
            url_to_image: Some("b.jpg".to_string()),
            ..RawArticle::default()
        };
        assert_eq!(
            normalize_article(raw, Language::En, NOW, 0).image_url.as_deref(),
            Some("a.jpg")
        );

        let raw = RawArticle {
            url_to_image: Some("b.jpg".to_string()),
            ..RawArticle::default()
        };
        assert_eq!(
            normalize_article(raw, Language::En, NOW, 0).image_url.as_deref(),
            Some("b.jpg")
        );
    }

    #[test]
    fn test_duplicate_urls_get_unique_ids() {
        let dup = |source: &str| RawArticle {
            url: Some("https://e.com/same".to_string()),
            source: Some(RawSource {
                name: Some(source.to_string()),
            }),
            ..RawArticle::default()
        };
        let stories = normalize_articles(vec![dup("A"), dup("B")], Language::En);

        assert_eq!(stories[0].id, "https://e.com/same");
        assert_eq!(stories[1].id, "B-1");
        assert_eq!(stories[1].url.as_deref(), Some("https://e.com/same"));
    }

    #[test]
    fn test_normalize_preserves_order_and_stamps_lang() {
        let stories = normalize_articles(vec![titled("A"), titled("B")], Language::Ta);
        let titles: Vec<_> = stories.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
        assert!(stories.iter().all(|s| s.lang == Language::Ta));
    }

    #[test]
    fn test_ticker_empty() {
        assert_eq!(ticker(&[]), "");
    }

    #[test]
    fn test_ticker_three_stories() {
        let stories = [story("A"), story("B"), story("C")];
        let t = ticker(&stories);
        assert_eq!(t, "A  •  B  •  C");
        assert_eq!(t.matches(TICKER_SEPARATOR).count(), 2);
    }

    #[test]
    fn test_ticker_takes_first_five() {
        let stories: Vec<_> = (1..=8).map(|i| story(&format!("S{i}"))).collect();
        assert_eq!(ticker(&stories), "S1  •  S2  •  S3  •  S4  •  S5");
    }
}

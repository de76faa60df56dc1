//! Data models for headlines, feed items and videos.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Language`]: The selectable language tag and its speech locale
//! - [`RawArticle`]: An article exactly as an upstream source described it
//! - [`Story`]: A normalized news item ready for display
//! - [`Video`]: A normalized playlist entry ready for display
//!
//! Serialized field names are camelCase because that is the shape both the
//! headlines API speaks and the dashboard snapshot exposes.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language selection for headlines and speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[value(name = "en")]
    En,
    #[value(name = "ta")]
    Ta,
    #[value(name = "hi")]
    Hi,
}

impl Language {
    /// The two-letter tag sent to upstream sources.
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ta => "ta",
            Language::Hi => "hi",
        }
    }

    /// Locale handed to the speech backend. Anything that is neither
    /// English nor Hindi is read as Tamil.
    pub fn speech_locale(self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Hi => "hi-IN",
            Language::Ta => "ta-IN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ta" => Ok(Language::Ta),
            "hi" => Ok(Language::Hi),
            other => Err(format!("unsupported language tag: {other}")),
        }
    }
}

/// Origin of a [`RawArticle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawSource {
    pub name: Option<String>,
}

/// An article before normalization.
///
/// Headlines API responses deserialize straight into this type; RSS items are
/// mapped into it by the feed fetcher. Every field is optional because neither
/// upstream guarantees any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    /// Synthetic `source-index` tag, only set for RSS items.
    #[serde(skip)]
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<RawSource>,
}

/// A normalized news item ready for display.
///
/// `title`, `summary`, `source` and `published_at` are never empty; see
/// [`crate::normalize::normalize_articles`] for the default table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub published_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub lang: Language,
}

impl Story {
    /// Text read aloud for this story: the summary, or the title when the
    /// summary is blank.
    pub fn spoken_text(&self) -> &str {
        if self.summary.trim().is_empty() {
            &self.title
        } else {
            &self.summary
        }
    }
}

/// A normalized video playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Provider video identifier, or the entry's position when it has none.
    pub id: String,
    pub title: Option<String>,
    pub link: Option<String>,
    pub published_at: Option<String>,
    /// Only present when the provider identifier is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tags_and_locales() {
        assert_eq!(Language::En.tag(), "en");
        assert_eq!(Language::En.speech_locale(), "en-US");
        assert_eq!(Language::Hi.speech_locale(), "hi-IN");
        assert_eq!(Language::Ta.speech_locale(), "ta-IN");
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!(" HI ".parse::<Language>(), Ok(Language::Hi));
        assert_eq!("ta".parse::<Language>(), Ok(Language::Ta));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_raw_article_from_headlines_json() {
        let json = r#"{
            "title": "Monsoon arrives early",
            "description": "Rain across the south",
            "url": "https://example.com/monsoon",
            "image": "https://example.com/monsoon.jpg",
            "publishedAt": "2025-06-01T08:00:00Z",
            "source": { "name": "Example Daily", "url": "https://example.com" }
        }"#;

        let article: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.title.as_deref(), Some("Monsoon arrives early"));
        assert_eq!(article.published_at.as_deref(), Some("2025-06-01T08:00:00Z"));
        assert_eq!(
            article.source.and_then(|s| s.name).as_deref(),
            Some("Example Daily")
        );
        assert_eq!(article.id, None);
    }

    #[test]
    fn test_raw_article_url_to_image() {
        let json = r#"{ "urlToImage": "https://example.com/a.png" }"#;
        let article: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(article.image, None);
    }

    #[test]
    fn test_story_serializes_camel_case() {
        let story = Story {
            id: "X-0".to_string(),
            title: "A".to_string(),
            summary: "No description available.".to_string(),
            source: "X".to_string(),
            published_at: "2025-06-01T08:00:00.000Z".to_string(),
            url: None,
            image_url: None,
            lang: Language::Ta,
        };

        let json = serde_json::to_string(&story).unwrap();
        assert!(json.contains("\"publishedAt\""));
        assert!(json.contains("\"lang\":\"ta\""));
        assert!(!json.contains("imageUrl"));
    }

    #[test]
    fn test_spoken_text_falls_back_to_title() {
        let story = Story {
            id: "1".to_string(),
            title: "Headline".to_string(),
            summary: "  ".to_string(),
            source: "Internet".to_string(),
            published_at: "now".to_string(),
            url: None,
            image_url: None,
            lang: Language::En,
        };
        assert_eq!(story.spoken_text(), "Headline");
    }
}

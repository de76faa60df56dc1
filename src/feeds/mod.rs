//! Upstream news and video sources.
//!
//! Every source is fetched through the relay (see [`crate::relay`]). Each
//! submodule pairs a network entry point with a pure parser so the parsing
//! can be tested without HTTP.
//!
//! # Supported Sources
//!
//! | Source | Module | Format | Role |
//! |--------|--------|--------|------|
//! | GNews top headlines | [`headlines`] | JSON | Primary path |
//! | BBC News | [`rss`] | RSS 2.0 | Fallback |
//! | Google News | [`rss`] | RSS 2.0 | Fallback, localized by language tag |
//! | Times of India | [`rss`] | RSS 2.0 | Fallback |
//! | The Hindu | [`rss`] | RSS 2.0 | Fallback |
//! | YouTube playlist | [`youtube`] | Atom | Video sidebar |
//!
//! Fetchers for individual sources never fail outward: transport and parse
//! errors are logged and become empty results.

pub mod headlines;
pub mod rss;
pub mod youtube;

use crate::models::Language;

/// A named RSS feed used on the fallback path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub name: &'static str,
    pub url: String,
}

/// The fallback feeds, in the order their items are concatenated.
pub fn fallback_sources(lang: Language) -> Vec<FeedSource> {
    vec![
        FeedSource {
            name: "BBC News",
            url: "https://feeds.bbci.co.uk/news/rss.xml".to_string(),
        },
        FeedSource {
            name: "Google News",
            url: format!("https://news.google.com/rss?hl={}", lang.tag()),
        },
        FeedSource {
            name: "Times of India",
            url: "https://timesofindia.indiatimes.com/rssfeeds/-2128936835.cms".to_string(),
        },
        FeedSource {
            name: "The Hindu",
            url: "https://www.thehindu.com/feeder/default.rss".to_string(),
        },
    ]
}

/// Parse an upstream XML document. Feeds that still ship a DOCTYPE are
/// accepted.
pub(crate) fn parse_document(xml: &str) -> Result<roxmltree::Document<'_>, roxmltree::Error> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(xml, options)
}

/// Concatenated text of an element, like a DOM `textContent`, trimmed.
/// Blank text counts as absent.
pub(crate) fn text_content(node: roxmltree::Node<'_, '_>) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(|d| d.is_text())
        .filter_map(|d| d.text())
        .collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_sources_order() {
        let names: Vec<_> = fallback_sources(Language::En)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["BBC News", "Google News", "Times of India", "The Hindu"]);
    }

    #[test]
    fn test_google_news_is_localized() {
        let sources = fallback_sources(Language::Hi);
        assert_eq!(sources[1].url, "https://news.google.com/rss?hl=hi");
    }

    #[test]
    fn test_text_content_joins_cdata_and_trims() {
        let doc = roxmltree::Document::parse(
            "<title>\n  Breaking: <![CDATA[Q&A]]> &amp; more \n</title>",
        )
        .unwrap();
        assert_eq!(
            text_content(doc.root_element()).as_deref(),
            Some("Breaking: Q&A & more")
        );
    }

    #[test]
    fn test_text_content_blank_is_none() {
        let doc = roxmltree::Document::parse("<link>   </link>").unwrap();
        assert_eq!(text_content(doc.root_element()), None);
    }
}

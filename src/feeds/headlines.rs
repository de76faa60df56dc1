//! GNews top-headlines client, the primary news path.
//!
//! The relay wraps the API's JSON response as a string inside its own
//! envelope, so the document is decoded twice: once by the relay, once here.

use crate::error::FeedError;
use crate::models::{Language, RawArticle};
use crate::relay::FetchContents;
use crate::utils::truncate_for_log;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// API key used when none is configured.
pub const DEFAULT_API_KEY: &str = "demo";

const ENDPOINT: &str = "https://gnews.io/api/v4/top-headlines";
const COUNTRY: &str = "in";
const MAX_HEADLINES: usize = 10;

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    articles: Option<Vec<RawArticle>>,
}

/// Top-headlines request URL for `lang`.
pub fn headlines_url(lang: Language, api_key: &str) -> String {
    format!(
        "{ENDPOINT}?lang={}&country={COUNTRY}&max={MAX_HEADLINES}&apikey={}",
        lang.tag(),
        urlencoding::encode(api_key)
    )
}

/// Fetch top headlines for `lang`.
///
/// Any failure is logged and reported as "no articles" so the caller falls
/// through to the RSS feeds.
#[instrument(level = "info", skip_all, fields(lang = %lang))]
pub async fn fetch_headlines<R: FetchContents>(
    relay: &R,
    lang: Language,
    api_key: &str,
) -> Vec<RawArticle> {
    let result = match relay.fetch_contents(&headlines_url(lang, api_key)).await {
        Ok(contents) => parse_headlines(&contents).inspect_err(|_| {
            debug!(preview = %truncate_for_log(&contents, 300), "Unparseable headlines payload");
        }),
        Err(e) => Err(e),
    };

    match result {
        Ok(articles) => {
            info!(count = articles.len(), "Fetched headlines");
            articles
        }
        Err(e) => {
            warn!(error = %e, "Headlines API failed; trying RSS feeds");
            Vec::new()
        }
    }
}

/// Decode the API response. A missing or `null` `articles` array is empty.
pub fn parse_headlines(contents: &str) -> Result<Vec<RawArticle>, FeedError> {
    let response: HeadlinesResponse = serde_json::from_str(contents).map_err(FeedError::Json)?;
    Ok(response.articles.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::testing::FakeRelay;

    #[test]
    fn test_headlines_url() {
        assert_eq!(
            headlines_url(Language::Ta, "demo"),
            "https://gnews.io/api/v4/top-headlines?lang=ta&country=in&max=10&apikey=demo"
        );
    }

    #[test]
    fn test_parse_headlines_articles() {
        let contents = r#"{
            "totalArticles": 2,
            "articles": [
                { "title": "One", "url": "https://e.com/1", "source": { "name": "E" } },
                { "title": "Two", "content": "Body" }
            ]
        }"#;
        let articles = parse_headlines(contents).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1].content.as_deref(), Some("Body"));
    }

    #[test]
    fn test_parse_headlines_missing_articles() {
        let contents = r#"{ "errors": ["You did not provide an API key."] }"#;
        assert!(parse_headlines(contents).unwrap().is_empty());
        assert!(parse_headlines(r#"{"articles":null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_headlines_not_json() {
        assert!(matches!(
            parse_headlines("<html>Forbidden</html>"),
            Err(FeedError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_headlines_failure_is_empty() {
        let url = headlines_url(Language::En, DEFAULT_API_KEY);
        let relay = FakeRelay::new().failing(&url);
        assert!(fetch_headlines(&relay, Language::En, DEFAULT_API_KEY).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_headlines_garbage_is_empty() {
        let url = headlines_url(Language::En, DEFAULT_API_KEY);
        let relay = FakeRelay::new().with(&url, "not json");
        assert!(fetch_headlines(&relay, Language::En, DEFAULT_API_KEY).await.is_empty());
    }
}

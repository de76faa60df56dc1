//! News aggregation: headlines API first, RSS feeds as the fallback.
//!
//! # Pipeline
//!
//! 1. **Primary**: GNews top headlines for the selected language
//! 2. **Fallback**: when the primary path yields nothing, every feed from
//!    [`fallback_sources`] is fetched concurrently and the results are
//!    concatenated in source order
//! 3. **Normalize**: raw articles become [`Story`] values
//! 4. **Ticker**: the first headlines joined into one line
//!
//! When both paths come back empty the outcome carries a single synthetic
//! story and a user-facing error message instead.

use crate::error::AggregateError;
use crate::feeds::headlines::fetch_headlines;
use crate::feeds::rss::fetch_feed;
use crate::feeds::fallback_sources;
use crate::models::{Language, RawArticle, Story};
use crate::normalize::{normalize_articles, ticker};
use crate::relay::FetchContents;
use crate::utils::now_iso;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

pub const FALLBACK_STORY_ID: &str = "demo-1";
pub const FALLBACK_TITLE: &str = "AI News Portal Fallback Active";
pub const FALLBACK_SUMMARY: &str = "Could not load live sources. Showing demo news.";
pub const FALLBACK_SOURCE: &str = "System";

/// Result of one news refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsOutcome {
    pub stories: Vec<Story>,
    /// Completion time of a successful refresh; `None` after a failure so the
    /// previous "last updated" time stays visible.
    pub updated_at: Option<String>,
    pub ticker: String,
    pub error: Option<String>,
}

/// Fetches and normalizes headlines for one language at a time.
#[derive(Debug)]
pub struct NewsAggregator<R> {
    relay: Arc<R>,
    api_key: String,
}

impl<R> Clone for NewsAggregator<R> {
    fn clone(&self) -> Self {
        Self {
            relay: Arc::clone(&self.relay),
            api_key: self.api_key.clone(),
        }
    }
}

impl<R: FetchContents> NewsAggregator<R> {
    pub fn new(relay: Arc<R>, api_key: impl Into<String>) -> Self {
        Self {
            relay,
            api_key: api_key.into(),
        }
    }

    /// The relay shared with other fetchers.
    pub fn relay(&self) -> &Arc<R> {
        &self.relay
    }

    /// Run one refresh for `lang`. Never fails: total failure becomes the
    /// fallback outcome.
    #[instrument(level = "info", skip_all, fields(lang = %lang))]
    pub async fn run(&self, lang: Language) -> NewsOutcome {
        let t0 = Instant::now();
        match self.collect(lang).await {
            Ok(articles) => {
                let stories = normalize_articles(articles, lang);
                let ticker = ticker(&stories);
                info!(
                    count = stories.len(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "News refresh complete"
                );
                NewsOutcome {
                    stories,
                    updated_at: Some(now_iso()),
                    ticker,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "News refresh failed; showing fallback story");
                fallback_outcome(lang, &e)
            }
        }
    }

    async fn collect(&self, lang: Language) -> Result<Vec<RawArticle>, AggregateError> {
        let mut articles = fetch_headlines(self.relay.as_ref(), lang, &self.api_key).await;
        if articles.is_empty() {
            articles = self.fetch_fallback_feeds(lang).await;
        }
        if articles.is_empty() {
            return Err(AggregateError::NoData);
        }
        Ok(articles)
    }

    /// Fetch every fallback feed concurrently and concatenate the items in
    /// source order, whatever order the fetches complete in.
    #[instrument(level = "info", skip_all)]
    pub async fn fetch_fallback_feeds(&self, lang: Language) -> Vec<RawArticle> {
        let sources = fallback_sources(lang);
        let batches = join_all(
            sources
                .iter()
                .map(|source| fetch_feed(self.relay.as_ref(), &source.url, source.name)),
        )
        .await;

        let articles: Vec<RawArticle> = batches.into_iter().flatten().collect();
        info!(sources = sources.len(), count = articles.len(), "Fallback feeds fetched");
        articles
    }
}

/// The outcome shown when no source produced anything.
pub fn fallback_outcome(lang: Language, err: &AggregateError) -> NewsOutcome {
    let story = Story {
        id: FALLBACK_STORY_ID.to_string(),
        title: FALLBACK_TITLE.to_string(),
        summary: FALLBACK_SUMMARY.to_string(),
        source: FALLBACK_SOURCE.to_string(),
        published_at: now_iso(),
        url: None,
        image_url: None,
        lang,
    };
    let stories = vec![story];
    NewsOutcome {
        ticker: ticker(&stories),
        stories,
        updated_at: None,
        error: Some(format!("{err}. Showing demo data.")),
    }
}

//! Access to upstream documents through a CORS relay.
//!
//! Every upstream (headlines API, RSS feeds, the video playlist) is fetched as
//! `GET <relay>?url=<percent-encoded target>`. The relay answers with a JSON
//! envelope `{ "contents": "<document text>" }`.
//!
//! # Architecture
//!
//! - [`FetchContents`]: Core trait, "give me the document behind this URL"
//! - [`Relay`]: The HTTP implementation backed by `reqwest`
//!
//! Fetchers are generic over [`FetchContents`] so tests can substitute an
//! in-memory implementation.

use crate::error::FeedError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument};

/// Relay used when none is configured.
pub const DEFAULT_RELAY_URL: &str = "https://api.allorigins.win/get";

const USER_AGENT: &str = concat!("news_portal/", env!("CARGO_PKG_VERSION"));

/// Retrieves the text of an upstream document.
pub trait FetchContents: Send + Sync {
    /// Fetch `target` and return the unwrapped document text.
    fn fetch_contents(
        &self,
        target: &str,
    ) -> impl Future<Output = Result<String, FeedError>> + Send;
}

/// The relay's response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    contents: Option<String>,
}

/// HTTP client for the CORS relay.
#[derive(Debug, Clone)]
pub struct Relay {
    client: Client,
    base_url: String,
}

impl Relay {
    /// Create a relay client. Timeouts are the only deadline applied to any
    /// upstream request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// The relay URL that wraps `target`.
    pub fn proxied_url(&self, target: &str) -> String {
        proxied_url(&self.base_url, target)
    }
}

impl FetchContents for Relay {
    #[instrument(level = "debug", skip_all, fields(%target))]
    async fn fetch_contents(&self, target: &str) -> Result<String, FeedError> {
        let response = self.client.get(self.proxied_url(target)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), preview = %truncate_for_log(&body, 200), "Relay responded");
        decode_envelope(&body)
    }
}

/// Build `<relay>?url=<percent-encoded target>`.
pub fn proxied_url(base_url: &str, target: &str) -> String {
    format!("{}?url={}", base_url, urlencoding::encode(target))
}

/// Extract the document text from a relay envelope.
///
/// A missing, `null` or blank `contents` field is [`FeedError::EmptyPayload`].
pub fn decode_envelope(body: &str) -> Result<String, FeedError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(FeedError::Envelope)?;
    match envelope.contents {
        Some(contents) if !contents.trim().is_empty() => Ok(contents),
        _ => Err(FeedError::EmptyPayload),
    }
}

//! RSS feed fetcher.
//!
//! Turns one RSS document into at most [`MAX_FEED_ITEMS`] raw articles. Items
//! are found at any depth; their fields are direct children in no namespace
//! (RSS 2.0) or in the RSS 1.0 namespace, so `atom:link`, `media:title` and
//! similar extension elements are never mistaken for the item's own fields.

use crate::error::FeedError;
use crate::feeds::{parse_document, text_content};
use crate::models::{RawArticle, RawSource};
use crate::relay::FetchContents;
use roxmltree::Node;
use tracing::{debug, info, instrument, warn};

/// Items kept per feed.
pub const MAX_FEED_ITEMS: usize = 10;

const RSS1_NS: &str = "http://purl.org/rss/1.0/";

/// Fetch one feed through the relay.
///
/// Never fails: network errors, relay errors and malformed XML are logged and
/// produce an empty list.
#[instrument(level = "info", skip_all, fields(source = %source_label))]
pub async fn fetch_feed<R: FetchContents>(
    relay: &R,
    feed_url: &str,
    source_label: &str,
) -> Vec<RawArticle> {
    let result = match relay.fetch_contents(feed_url).await {
        Ok(xml) => parse_rss(&xml, source_label),
        Err(e) => Err(e),
    };

    match result {
        Ok(items) => {
            info!(count = items.len(), "Fetched feed items");
            items
        }
        Err(e) => {
            warn!(error = %e, %feed_url, "Feed fetch failed; using no items from this source");
            Vec::new()
        }
    }
}

/// Parse an RSS document into raw articles in document order.
///
/// Each article gets the id `"<source_label>-<index>"` and `source_label` as
/// its source name. Missing child elements leave the field empty.
pub fn parse_rss(xml: &str, source_label: &str) -> Result<Vec<RawArticle>, FeedError> {
    let doc = parse_document(xml)?;

    let items: Vec<RawArticle> = doc
        .descendants()
        .filter(|n| is_rss_element(*n, "item"))
        .take(MAX_FEED_ITEMS)
        .enumerate()
        .map(|(index, item)| RawArticle {
            id: Some(format!("{source_label}-{index}")),
            title: field(item, "title"),
            description: field(item, "description"),
            url: field(item, "link"),
            published_at: field(item, "pubDate"),
            source: Some(RawSource {
                name: Some(source_label.to_string()),
            }),
            ..RawArticle::default()
        })
        .collect();

    debug!(count = items.len(), source = %source_label, "Parsed RSS items");
    Ok(items)
}

fn is_rss_element(node: Node<'_, '_>, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && matches!(node.tag_name().namespace(), None | Some(RSS1_NS))
}

fn field(item: Node<'_, '_>, local: &str) -> Option<String> {
    item.children()
        .find(|c| is_rss_element(*c, local))
        .and_then(text_content)
}

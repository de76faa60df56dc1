//! YouTube playlist fetcher for the video sidebar.

use crate::error::FeedError;
use crate::feeds::{parse_document, text_content};
use crate::models::Video;
use crate::relay::FetchContents;
use roxmltree::Node;
use tracing::{info, instrument};

/// The playlist shown in the sidebar.
pub const PLAYLIST_FEED_URL: &str =
    "https://www.youtube.com/feeds/videos.xml?playlist_id=PLS3XGZxi7cBXNn3OZP8QIZK00ZzF6PMkY";

/// Entries kept from the playlist.
pub const MAX_VIDEOS: usize = 6;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const YT_NS: &str = "http://www.youtube.com/xml/schemas/2015";

/// Fetch the playlist through the relay.
///
/// Unlike the news fetchers this surfaces its error: the caller keeps the
/// previous videos when the playlist can't be loaded.
#[instrument(level = "info", skip_all)]
pub async fn fetch_videos<R: FetchContents>(relay: &R) -> Result<Vec<Video>, FeedError> {
    let xml = relay.fetch_contents(PLAYLIST_FEED_URL).await?;
    let videos = parse_playlist(&xml)?;
    info!(count = videos.len(), "Fetched playlist videos");
    Ok(videos)
}

/// Parse a YouTube Atom feed into at most [`MAX_VIDEOS`] videos.
pub fn parse_playlist(xml: &str) -> Result<Vec<Video>, FeedError> {
    let doc = parse_document(xml)?;

    let videos = doc
        .descendants()
        .filter(|n| is_atom_element(*n, "entry"))
        .take(MAX_VIDEOS)
        .enumerate()
        .map(|(index, entry)| video_from_entry(entry, index))
        .collect();
    Ok(videos)
}

/// Still image for a video id.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/0.jpg")
}

fn video_from_entry(entry: Node<'_, '_>, index: usize) -> Video {
    let video_id = entry
        .children()
        .find(|c| c.is_element() && c.has_tag_name((YT_NS, "videoId")))
        .and_then(text_content);
    let link = entry
        .children()
        .find(|c| is_atom_element(*c, "link"))
        .and_then(|l| l.attribute("href"))
        .map(str::to_string);

    Video {
        thumbnail: video_id.as_deref().map(thumbnail_url),
        id: video_id.unwrap_or_else(|| index.to_string()),
        title: atom_field(entry, "title"),
        link,
        published_at: atom_field(entry, "published"),
    }
}

// Atom elements are normally namespaced; a bare element is accepted too.
fn is_atom_element(node: Node<'_, '_>, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && matches!(node.tag_name().namespace(), None | Some(ATOM_NS))
}

fn atom_field(entry: Node<'_, '_>, local: &str) -> Option<String> {
    entry
        .children()
        .find(|c| is_atom_element(*c, local))
        .and_then(text_content)
}

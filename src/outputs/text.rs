//! Plain-text rendering of the dashboard for the terminal host.

use crate::dashboard::DashboardState;
use chrono::{DateTime, Utc};
use std::fmt;

/// Shown in place of an empty ticker.
pub const EMPTY_TICKER: &str = "No breaking items";

/// Displays a [`DashboardState`] as a numbered story list with the ticker,
/// the videos and the last refresh time.
pub struct DashboardView<'a>(pub &'a DashboardState);

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;

        if let Some(error) = &state.error {
            writeln!(f, "! {error}")?;
        }
        let ticker = if state.ticker.is_empty() {
            EMPTY_TICKER
        } else {
            state.ticker.as_str()
        };
        writeln!(f, "BREAKING [{}] {ticker}", state.lang)?;
        if state.loading {
            writeln!(f, "(loading...)")?;
        }
        writeln!(f)?;

        for (n, story) in state.stories.iter().enumerate() {
            writeln!(f, "{:>2}. {}", n + 1, story.title)?;
            writeln!(f, "    {} · {}", story.source, display_time(&story.published_at))?;
            writeln!(f, "    {}", story.summary)?;
            if let Some(url) = &story.url {
                writeln!(f, "    Read more: {url}")?;
            }
        }

        if !state.videos.is_empty() {
            writeln!(f)?;
            writeln!(f, "Live video updates")?;
            for video in &state.videos {
                let title = video.title.as_deref().unwrap_or("(untitled)");
                match &video.link {
                    Some(link) => writeln!(f, "  - {title} <{link}>")?,
                    None => writeln!(f, "  - {title}")?,
                }
            }
        }

        writeln!(f)?;
        let updated = state.updated_at.as_deref().map(display_time);
        write!(f, "Last updated: {}", updated.as_deref().unwrap_or("—"))
    }
}

/// Render an upstream timestamp (RFC 3339 or RFC 2822) in UTC; anything else
/// is shown as given.
pub fn display_time(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

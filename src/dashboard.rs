//! Application state shared by the refresh tasks and the view.
//!
//! [`Dashboard`] is the only owner of [`DashboardState`]. Refresh tasks
//! write through [`Dashboard::apply_news`] and [`Dashboard::apply_videos`],
//! and views read through a `tokio::sync::watch` receiver.
//!
//! Every request takes a [`RequestToken`] before it starts. Tokens increase
//! monotonically, and a result is applied only if its token is newer than the
//! last applied result of the same kind. A slow response for a language the
//! user has already switched away from therefore can't overwrite newer data.

use crate::aggregator::NewsOutcome;
use crate::models::{Language, Story, Video};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Identifies one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Sequence {
    news_applied: u64,
    videos_applied: u64,
    news_pending: usize,
}

/// Everything the view layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub lang: Language,
    pub stories: Vec<Story>,
    pub videos: Vec<Video>,
    /// ISO-8601 time of the last successful news refresh.
    pub updated_at: Option<String>,
    pub error: Option<String>,
    pub ticker: String,
    /// True while any news request is outstanding.
    pub loading: bool,
    #[serde(skip)]
    sequence: Sequence,
}

impl DashboardState {
    fn new(lang: Language) -> Self {
        Self {
            lang,
            ..Self::default()
        }
    }
}

/// Owner of the dashboard state.
#[derive(Debug)]
pub struct Dashboard {
    state: watch::Sender<DashboardState>,
    next_token: AtomicU64,
}

impl Dashboard {
    pub fn new(lang: Language) -> Self {
        let (state, _) = watch::channel(DashboardState::new(lang));
        Self {
            state,
            next_token: AtomicU64::new(0),
        }
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn language(&self) -> Language {
        self.state.borrow().lang
    }

    /// Select a language. Returns whether it changed.
    pub fn set_language(&self, lang: Language) -> bool {
        self.state.send_if_modified(|s| {
            let changed = s.lang != lang;
            s.lang = lang;
            changed
        })
    }

    /// Register a news request and mark the dashboard as loading.
    pub fn begin_news(&self) -> RequestToken {
        let token = self.issue();
        self.state.send_modify(|s| {
            s.sequence.news_pending += 1;
            s.loading = true;
        });
        token
    }

    /// Register a video request.
    pub fn begin_videos(&self) -> RequestToken {
        self.issue()
    }

    /// Apply a finished news refresh. Returns `false` when the outcome was
    /// discarded as stale.
    pub fn apply_news(&self, token: RequestToken, outcome: NewsOutcome) -> bool {
        let mut applied = false;
        self.state.send_if_modified(|s| {
            s.sequence.news_pending = s.sequence.news_pending.saturating_sub(1);
            let was_loading = s.loading;
            s.loading = s.sequence.news_pending > 0;

            if token.0 <= s.sequence.news_applied {
                debug!(token = token.0, applied = s.sequence.news_applied, "Discarding stale news result");
                return was_loading != s.loading;
            }

            s.sequence.news_applied = token.0;
            s.stories = outcome.stories;
            s.ticker = outcome.ticker;
            s.error = outcome.error;
            if let Some(updated_at) = outcome.updated_at {
                s.updated_at = Some(updated_at);
            }
            applied = true;
            true
        });
        applied
    }

    /// Replace the videos. Returns `false` when the result was discarded as
    /// stale.
    pub fn apply_videos(&self, token: RequestToken, videos: Vec<Video>) -> bool {
        self.state.send_if_modified(|s| {
            if token.0 <= s.sequence.videos_applied {
                debug!(token = token.0, applied = s.sequence.videos_applied, "Discarding stale videos");
                return false;
            }
            s.sequence.videos_applied = token.0;
            s.videos = videos;
            true
        })
    }

    fn issue(&self) -> RequestToken {
        RequestToken(self.next_token.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

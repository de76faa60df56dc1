//! Periodic refresh of news and videos.
//!
//! [`RefreshScheduler`] owns at most one timer task. Activating it or
//! switching language cancels the running timer first, refreshes right away
//! and starts a new timer that fires once per period. Each refresh runs as its
//! own task, so cancelling a timer never cancels a fetch that is already
//! running. Stale results are dropped by the [`Dashboard`] token guard instead.

use crate::aggregator::NewsAggregator;
use crate::dashboard::{Dashboard, RequestToken};
use crate::feeds::youtube::fetch_videos;
use crate::models::Language;
use crate::relay::FetchContents;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// Time between automatic refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// One news-plus-videos refresh, cloneable into spawned tasks.
struct RefreshJob<R> {
    aggregator: NewsAggregator<R>,
    dashboard: Arc<Dashboard>,
}

impl<R> Clone for RefreshJob<R> {
    fn clone(&self) -> Self {
        Self {
            aggregator: self.aggregator.clone(),
            dashboard: Arc::clone(&self.dashboard),
        }
    }
}

impl<R: FetchContents + 'static> RefreshJob<R> {
    /// Start a news and video refresh. The news token is taken before the
    /// task is spawned, so request order is the order of the calls.
    fn spawn_refresh_all(&self, lang: Language) -> JoinHandle<()> {
        let token = self.dashboard.begin_news();
        tokio::spawn(self.clone().refresh_all(lang, token))
    }

    async fn refresh_all(self, lang: Language, token: RequestToken) {
        tokio::join!(self.refresh_news(lang, token), self.refresh_videos());
    }

    async fn refresh_news(&self, lang: Language, token: RequestToken) {
        let outcome = self.aggregator.run(lang).await;
        if !self.dashboard.apply_news(token, outcome) {
            debug!(%lang, "News result superseded by a newer request");
        }
    }

    async fn refresh_videos(&self) {
        let token = self.dashboard.begin_videos();
        match fetch_videos(self.aggregator.relay().as_ref()).await {
            Ok(videos) => {
                self.dashboard.apply_videos(token, videos);
            }
            Err(e) => warn!(error = %e, "Video fetch failed; keeping previous videos"),
        }
    }
}

/// Drives refreshes on activation, on language change and on a fixed period.
pub struct RefreshScheduler<R> {
    job: RefreshJob<R>,
    period: Duration,
    timer: Option<JoinHandle<()>>,
}

impl<R: FetchContents + 'static> RefreshScheduler<R> {
    pub fn new(aggregator: NewsAggregator<R>, dashboard: Arc<Dashboard>, period: Duration) -> Self {
        Self {
            job: RefreshJob {
                aggregator,
                dashboard,
            },
            period,
            timer: None,
        }
    }

    /// Refresh now for the dashboard's language and start the periodic timer.
    /// Any running timer is cancelled first.
    pub fn activate(&mut self) {
        self.deactivate();
        let lang = self.job.dashboard.language();
        let job = self.job.clone();
        let period = self.period;

        info!(%lang, period_secs = period.as_secs(), "Starting refresh timer");
        drop(job.spawn_refresh_all(lang));
        self.timer = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                drop(job.spawn_refresh_all(lang));
            }
        }));
    }

    /// Switch language, refresh immediately and restart the timer.
    /// Selecting the language already shown does nothing.
    #[instrument(level = "info", skip(self))]
    pub fn set_language(&mut self, lang: Language) {
        if self.job.dashboard.set_language(lang) {
            self.activate();
        } else {
            debug!("Language unchanged; keeping current schedule");
        }
    }

    /// Cancel the timer. Safe to call any number of times.
    pub fn deactivate(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("Refresh timer cancelled");
        }
    }

    /// Refresh news outside the timer cycle. The timer schedule is untouched.
    pub fn refresh_now(&self) -> JoinHandle<()> {
        let lang = self.job.dashboard.language();
        let job = self.job.clone();
        let token = job.dashboard.begin_news();
        info!(%lang, "Manual refresh");
        tokio::spawn(async move { job.refresh_news(lang, token).await })
    }

    /// Refresh news and videos once and wait for both, without starting a
    /// timer.
    pub async fn refresh_once(&self) {
        let lang = self.job.dashboard.language();
        let token = self.job.dashboard.begin_news();
        self.job.clone().refresh_all(lang, token).await;
    }

    /// Number of live timers: zero or one.
    #[cfg(test)]
    pub fn active_timers(&self) -> usize {
        self.timer.iter().filter(|t| !t.is_finished()).count()
    }
}

impl<R> Drop for RefreshScheduler<R> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

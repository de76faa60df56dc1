//! Command-line interface definitions for the news portal.
//!
//! All options can be provided via command-line flags or environment
//! variables. [`Cli::settings`] turns the parsed arguments into the
//! [`Settings`] the rest of the application runs with.

use crate::feeds::headlines::DEFAULT_API_KEY;
use crate::models::Language;
use crate::relay::DEFAULT_RELAY_URL;
use crate::scheduler::DEFAULT_REFRESH_INTERVAL;
use crate::speech::DEFAULT_TTS_COMMAND;
use clap::Parser;
use std::time::Duration;
use url::Url;

/// Command-line arguments for the news portal.
///
/// # Examples
///
/// ```sh
/// # Interactive dashboard in English, refreshed hourly
/// news_portal
///
/// # One refresh in Hindi, snapshot written to ./out
/// news_portal --lang hi --once -j ./out
///
/// # Self-hosted relay and a real API key
/// NEWS_RELAY_URL=http://localhost:8080/get GNEWS_API_KEY=... news_portal
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Language for headlines and speech
    #[arg(short, long, value_enum, env = "NEWS_LANG", default_value_t = Language::En)]
    pub lang: Language,

    /// CORS relay endpoint; targets are passed as `?url=<encoded>`
    #[arg(long, env = "NEWS_RELAY_URL", default_value = DEFAULT_RELAY_URL, value_parser = parse_relay_url)]
    pub relay_url: String,

    /// GNews API key
    #[arg(long, env = "GNEWS_API_KEY", default_value = DEFAULT_API_KEY, hide_env_values = true)]
    pub api_key: String,

    /// Minutes between automatic refreshes
    #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs() / 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_mins: u64,

    /// HTTP timeout for each upstream request, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Optional directory for the JSON dashboard snapshot
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Run a single refresh, print the dashboard and exit
    #[arg(long)]
    pub once: bool,

    /// Text-to-speech program; empty disables speech
    #[arg(long, env = "NEWS_TTS_COMMAND", default_value = DEFAULT_TTS_COMMAND)]
    pub tts_command: String,
}

/// Runtime configuration derived from [`Cli`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub lang: Language,
    pub relay_url: String,
    pub api_key: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub json_output_dir: Option<String>,
    pub once: bool,
    pub tts_command: String,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            lang: self.lang,
            relay_url: self.relay_url.clone(),
            api_key: self.api_key.clone(),
            refresh_interval: Duration::from_secs(self.refresh_mins * 60),
            request_timeout: Duration::from_secs(self.timeout_secs),
            json_output_dir: self.json_output_dir.clone(),
            once: self.once,
            tts_command: self.tts_command.clone(),
        }
    }
}

fn parse_relay_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid relay URL: {e}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("relay URL must be http or https, got {other}")),
    }
    if url.query().is_some() {
        return Err("relay URL must not carry a query string".to_string());
    }
    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["news_portal"]);
        let settings = cli.settings();

        assert_eq!(settings.lang, Language::En);
        assert_eq!(settings.relay_url, DEFAULT_RELAY_URL);
        assert_eq!(settings.refresh_interval, Duration::from_secs(3600));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.json_output_dir, None);
        assert!(!settings.once);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["news_portal", "-l", "ta", "-j", "/tmp/json", "--once"]);

        assert_eq!(cli.lang, Language::Ta);
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
        assert!(cli.once);
    }

    #[test]
    fn test_cli_rejects_unknown_language() {
        assert!(Cli::try_parse_from(["news_portal", "--lang", "fr"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_relay() {
        assert!(Cli::try_parse_from(["news_portal", "--relay-url", "not a url"]).is_err());
        assert!(Cli::try_parse_from(["news_portal", "--relay-url", "ftp://relay/get"]).is_err());
        assert!(
            Cli::try_parse_from(["news_portal", "--relay-url", "https://relay/get?x=1"]).is_err()
        );
    }

    #[test]
    fn test_cli_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["news_portal", "--refresh-mins", "0"]).is_err());
    }

    #[test]
    fn test_custom_interval() {
        let cli = Cli::parse_from(["news_portal", "--refresh-mins", "5"]);
        assert_eq!(cli.settings().refresh_interval, Duration::from_secs(300));
    }
}

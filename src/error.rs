//! Error types for feed retrieval, aggregation and speech playback.
//!
//! Only [`AggregateError`] and [`SpeechError`] ever reach the user. Feed
//! errors are absorbed by the fetchers and logged.

use thiserror::Error;

/// Failure while retrieving or decoding a single upstream document.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with a non-success status code.
    #[error("relay returned HTTP {0}")]
    Status(u16),

    /// The relay body was not the expected `{ "contents": ... }` envelope.
    #[error("malformed relay envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The envelope had no `contents` or they were blank.
    #[error("relay payload is empty")]
    EmptyPayload,

    /// The wrapped document was not well-formed XML.
    #[error("xml parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The wrapped document was not valid JSON.
    #[error("json parse error: {0}")]
    Json(#[source] serde_json::Error),
}

/// Total failure of a news refresh cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("No news data fetched")]
    NoData,
}

/// Failure to read text aloud.
#[derive(Error, Debug)]
pub enum SpeechError {
    /// No speech backend is available on this system.
    #[error("TTS not supported on this system.")]
    Unsupported,

    #[error("speech backend failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_display() {
        assert_eq!(AggregateError::NoData.to_string(), "No news data fetched");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FeedError::Status(502).to_string(), "relay returned HTTP 502");
    }

    #[test]
    fn test_unsupported_speech_notice() {
        assert_eq!(
            SpeechError::Unsupported.to_string(),
            "TTS not supported on this system."
        );
    }

    #[test]
    fn test_xml_error_conversion() {
        let err: FeedError = roxmltree::Document::parse("<rss><channel>")
            .map(|_| ())
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("xml parse error"));
    }
}

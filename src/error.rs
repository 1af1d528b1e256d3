use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no catalog item parameter in URL: {url}")]
    LocatorNotFound { url: String },

    #[error("invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed listing container: {reason}")]
    MalformedItem { reason: String },

    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

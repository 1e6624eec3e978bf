//! Error taxonomy shared across the engine.
//!
//! None of these are fatal to a running session: config errors fall back to
//! built-in rules, filter errors fail closed, counter errors fall back to the
//! local counter, and validation / rate-limit errors abort a single click.

use std::time::Duration;

/// Loading the rule configuration failed (network, IO or parse).
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: curl::Error,
    },
    #[error("fetch {url}: HTTP {status}")]
    Http { url: String, status: u32 },
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse rule config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fetch task failed: {0}")]
    Join(String),
}

/// Internal failure while evaluating a URL. Always turned into a blocking
/// decision tagged `filtering_error`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("no domain could be extracted from {0:?}")]
    NoDomain(String),
}

/// Failure talking to the remote click counter.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("counter request failed: {0}")]
    Curl(#[from] curl::Error),
    #[error("counter service returned HTTP {0}")]
    Http(u32),
    #[error("counter service returned a non-numeric body: {0:?}")]
    NonNumeric(String),
    #[error("counter service returned an empty counter id")]
    EmptyId,
    #[error("counter task failed: {0}")]
    Join(String),
}

/// A URL was refused before navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("URL could not be parsed")]
    Malformed,
    #[error("protocol {0:?} is not allowed")]
    DisallowedProtocol(String),
    #[error("URL contains a forbidden scheme marker ({0})")]
    ForbiddenMarker(&'static str),
    #[error("URL contains non-ASCII characters")]
    NonAscii,
    #[error("URL contains percent-encoding")]
    PercentEncoded,
    #[error("URL has no host")]
    MissingHost,
    #[error("host {0} is local or on a private network")]
    PrivateNetwork(String),
}

/// The click was refused by the client-side rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitExceeded {
    #[error("please wait {0:?} before clicking again")]
    TooSoon(Duration),
    #[error("too many clicks in the last minute (limit {0})")]
    TooMany(usize),
}

/// Invalid input to blacklist management.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("invalid domain format: {0:?}")]
    InvalidFormat(String),
    #[error("category name must not be empty")]
    EmptyCategory,
}

/// A content report was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("reported URL is not a valid http(s) URL")]
    InvalidUrl,
    #[error("description exceeds {0} characters")]
    DescriptionTooLong(usize),
    #[error("email address {0:?} is not valid")]
    InvalidEmail(String),
    #[error("report was cancelled")]
    Cancelled,
}

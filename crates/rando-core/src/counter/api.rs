//! Wire client for the remote click counter service.
//!
//! `POST {base}` creates a counter and returns its id as text,
//! `GET {base}/{id}` returns the count and `POST {base}/{id}` increments it.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::CounterError;
use crate::http::{self, HttpResponse, Method};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait CounterApi: Send + Sync {
    /// Create a new counter and return its opaque id.
    async fn create(&self) -> Result<String, CounterError>;
    async fn read(&self, id: &str) -> Result<u64, CounterError>;
    async fn increment(&self, id: &str) -> Result<u64, CounterError>;
}

/// `CounterApi` over libcurl.
#[derive(Debug, Clone)]
pub struct CurlCounterApi {
    base_url: String,
}

impl CurlCounterApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call(&self, method: Method, url: String) -> Result<String, CounterError> {
        let response: HttpResponse =
            tokio::task::spawn_blocking(move || http::send(method, &url, REQUEST_TIMEOUT))
                .await
                .map_err(|e| CounterError::Join(e.to_string()))??;
        if !response.is_success() {
            return Err(CounterError::Http(response.status));
        }
        Ok(response.body)
    }
}

/// Parse a count the way the service returns it: a decimal integer,
/// optionally surrounded by whitespace.
pub fn parse_count(body: &str) -> Result<u64, CounterError> {
    let trimmed = body.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| CounterError::NonNumeric(trimmed.to_string()))
}

#[async_trait]
impl CounterApi for CurlCounterApi {
    async fn create(&self) -> Result<String, CounterError> {
        let body = self.call(Method::Post, self.base_url.clone()).await?;
        let id = body.trim();
        if id.is_empty() {
            return Err(CounterError::EmptyId);
        }
        Ok(id.to_string())
    }

    async fn read(&self, id: &str) -> Result<u64, CounterError> {
        let body = self.call(Method::Get, format!("{}/{id}", self.base_url)).await?;
        parse_count(&body)
    }

    async fn increment(&self, id: &str) -> Result<u64, CounterError> {
        let body = self.call(Method::Post, format!("{}/{id}", self.base_url)).await?;
        parse_count(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_counts() {
        assert_eq!(parse_count("42\n").unwrap(), 42);
        assert!(matches!(parse_count("forty"), Err(CounterError::NonNumeric(_))));
        assert!(matches!(parse_count(""), Err(CounterError::NonNumeric(_))));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(CurlCounterApi::new("https://tick.rs/c/").base_url(), "https://tick.rs/c");
    }
}

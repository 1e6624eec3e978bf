//! User content reports, kept in a bounded log in the state store.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::SystemTime;

use crate::analyzer::extract_domain;
use crate::error::ReportError;
use crate::store::{unix_secs, StateStore};
use crate::validator::is_http_url;

pub const MAX_DESCRIPTION_CHARS: usize = 1000;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportReason {
    Inappropriate,
    Malware,
    Phishing,
    Spam,
    Broken,
    Other,
}

impl ReportReason {
    pub const ALL: [ReportReason; 6] = [
        ReportReason::Inappropriate,
        ReportReason::Malware,
        ReportReason::Phishing,
        ReportReason::Spam,
        ReportReason::Broken,
        ReportReason::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportReason::Inappropriate => "inappropriate",
            ReportReason::Malware => "malware",
            ReportReason::Phishing => "phishing",
            ReportReason::Spam => "spam",
            ReportReason::Broken => "broken",
            ReportReason::Other => "other",
        }
    }
}

impl FromStr for ReportReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ReportReason::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown report reason {s:?}"))
    }
}

/// What the user typed into the report form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportInput {
    pub url: String,
    pub reason: ReportReason,
    pub description: String,
    pub email: Option<String>,
}

/// A validated, stored report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReport {
    pub url: String,
    pub domain: String,
    pub reason: ReportReason,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Seconds since the Unix epoch.
    pub submitted_at: u64,
}

pub fn validate_report(input: ReportInput, now: SystemTime) -> Result<ContentReport, ReportError> {
    let url = input.url.trim().to_string();
    if !is_http_url(&url) {
        return Err(ReportError::InvalidUrl);
    }
    let description = input.description.trim().to_string();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(ReportError::DescriptionTooLong(MAX_DESCRIPTION_CHARS));
    }
    let email = match input.email.map(|e| e.trim().to_string()) {
        Some(e) if e.is_empty() => None,
        Some(e) if !EMAIL.is_match(&e) => return Err(ReportError::InvalidEmail(e)),
        other => other,
    };
    Ok(ContentReport {
        domain: extract_domain(&url),
        url,
        reason: input.reason,
        description,
        email,
        submitted_at: unix_secs(now),
    })
}

/// Validate and append a report to the store's bounded report log.
pub fn submit_report(
    input: ReportInput,
    store: &mut StateStore,
    now: SystemTime,
) -> Result<ContentReport, ReportError> {
    let report = validate_report(input, now)?;
    tracing::info!(url = %report.url, reason = report.reason.as_str(), "content report stored");
    store.push_report(report.clone());
    Ok(report)
}

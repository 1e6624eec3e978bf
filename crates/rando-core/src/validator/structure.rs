//! Structural URL checks: scheme, encoding, and local/private hosts.

use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

use crate::error::ValidationError;

const FORBIDDEN_MARKERS: [&str; 3] = ["javascript:", "data:", "file:"];

/// True if `url` parses as an absolute http or https URL with a host.
pub fn is_http_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false)
}

fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_private_ipv6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
        || ip.to_ipv4_mapped().is_some_and(is_private_ipv4)
}

/// Loopback, RFC 1918, link-local, unspecified, or a `localhost` name.
pub fn is_private_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => {
            let name = name.trim_end_matches('.').to_lowercase();
            name == "localhost" || name.ends_with(".localhost") || name == "localhost.localdomain"
        }
        Host::Ipv4(ip) => is_private_ipv4(*ip),
        Host::Ipv6(ip) => is_private_ipv6(*ip),
    }
}

/// Reject anything that is not a plain http(s) URL to a public host.
/// Checks the raw string first (scheme markers, non-ASCII, percent-encoding)
/// so nothing is hidden by URL normalisation.
pub fn validate_url_structure(url: &str) -> Result<Url, ValidationError> {
    let lower = url.to_ascii_lowercase();
    if let Some(marker) = FORBIDDEN_MARKERS.iter().find(|m| lower.contains(*m)) {
        return Err(ValidationError::ForbiddenMarker(*marker));
    }
    if !url.is_ascii() {
        return Err(ValidationError::NonAscii);
    }
    if url.contains('%') {
        return Err(ValidationError::PercentEncoded);
    }

    let parsed = Url::parse(url).map_err(|_| ValidationError::Malformed)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::DisallowedProtocol(parsed.scheme().to_string()));
    }
    let host = parsed.host().ok_or(ValidationError::MissingHost)?;
    if is_private_host(&host) {
        return Err(ValidationError::PrivateNetwork(host.to_string()));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_public_https() {
        assert!(validate_url_structure("https://example.com").is_ok());
        assert!(validate_url_structure("http://example.com:8080/path?q=1").is_ok());
    }

    #[test]
    fn rejects_script_and_data_schemes() {
        assert_eq!(
            validate_url_structure("javascript:alert(1)").unwrap_err(),
            ValidationError::ForbiddenMarker("javascript:")
        );
        assert!(validate_url_structure("data:text/html,hi").is_err());
        assert!(validate_url_structure("FILE:///etc/passwd").is_err());
        assert!(validate_url_structure("https://example.com/?next=javascript:x").is_err());
    }

    #[test]
    fn rejects_other_protocols() {
        assert_eq!(
            validate_url_structure("ftp://example.com").unwrap_err(),
            ValidationError::DisallowedProtocol("ftp".to_string())
        );
        assert_eq!(
            validate_url_structure("not a url").unwrap_err(),
            ValidationError::Malformed
        );
    }

    #[test]
    fn rejects_private_networks() {
        for url in [
            "http://127.0.0.1",
            "http://localhost:3000",
            "http://10.0.0.8",
            "http://172.16.4.1",
            "http://172.31.255.255",
            "http://192.168.1.1/admin",
            "http://169.254.169.254/latest",
            "http://0.0.0.0",
            "http://[::1]/",
            "http://[fd00::1]/",
            "http://[fe80::1]/",
        ] {
            assert!(
                matches!(validate_url_structure(url), Err(ValidationError::PrivateNetwork(_))),
                "{url}"
            );
        }
        assert!(validate_url_structure("http://172.32.0.1").is_ok());
    }

    #[test]
    fn rejects_non_ascii_and_percent_encoding() {
        assert_eq!(
            validate_url_structure("https://exämple.com").unwrap_err(),
            ValidationError::NonAscii
        );
        assert_eq!(
            validate_url_structure("https://example.com/%2e%2e/").unwrap_err(),
            ValidationError::PercentEncoded
        );
    }

    #[test]
    fn is_http_url_requires_host() {
        assert!(is_http_url("https://www.wikipedia.org"));
        assert!(!is_http_url("mailto:someone@example.com"));
        assert!(!is_http_url("www.example.com"));
    }
}

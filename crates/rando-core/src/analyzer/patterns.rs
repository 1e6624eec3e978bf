//! String heuristics over domain names.

use regex::Regex;
use std::sync::LazyLock;

static IPV4_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("valid regex"));
static LONG_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4,}").expect("valid regex"));
static LONG_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]{20,}").expect("valid regex"));
static HEX_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{8,}$").expect("valid regex"));
static BAIT_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"free|download|crack|keygen|serial|hack").expect("valid regex")
});
static ADULT_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"adult|sex|porn|xxx|casino|gambling|drugs").expect("valid regex")
});

/// (TLD, pattern on the rest of the domain) pairs commonly seen in spam.
static TLD_COMBOS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("tk", r"free|win|prize|login"),
        ("ml", r"free|win|prize|login"),
        ("ga", r"free|win|prize|login"),
        ("cf", r"free|win|prize|login"),
        ("gq", r"free|win|prize|login"),
        ("xyz", r"free|crack|win|prize|bank|login"),
        ("top", r"free|crack|win|prize|bank|login"),
        ("click", r"win|prize|free|bonus"),
        ("download", r"free|crack|keygen"),
        ("zip", r"download|update|invoice"),
    ]
    .into_iter()
    .map(|(tld, pattern)| (tld, Regex::new(pattern).expect("valid regex")))
    .collect()
});

const URL_SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "t.co",
    "goo.gl",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "adf.ly",
    "bit.do",
    "cutt.ly",
    "rebrand.ly",
    "shorturl.at",
    "tiny.cc",
    "rb.gy",
    "t.ly",
];

/// Longest run of one repeated character.
fn longest_run(s: &str) -> usize {
    let mut best = 0;
    let mut run = 0;
    let mut prev = None;
    for c in s.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            run = 1;
            prev = Some(c);
        }
        best = best.max(run);
    }
    best
}

/// True if the domain looks machine-generated or bait-like: IPv4-looking
/// prefix, 4+ digits in a row, 20+ letters in a row, a character repeated
/// 5+ times, a label made only of 8+ hex digits, or a bait / adult keyword.
pub fn has_suspicious_pattern(domain: &str) -> bool {
    let domain = domain.to_lowercase();
    IPV4_PREFIX.is_match(&domain)
        || LONG_DIGITS.is_match(&domain)
        || LONG_LETTERS.is_match(&domain)
        || longest_run(&domain) >= 5
        || domain.split('.').any(|label| HEX_LABEL.is_match(label))
        || BAIT_WORDS.is_match(&domain)
        || ADULT_WORDS.is_match(&domain)
}

/// True if the domain's TLD and the rest of its name form a known spam combination.
pub fn tld_reputation_risk(domain: &str) -> bool {
    let domain = domain.to_lowercase();
    let Some((rest, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    TLD_COMBOS
        .iter()
        .any(|(t, pattern)| *t == tld && pattern.is_match(rest))
}

pub fn is_url_shortener(domain: &str) -> bool {
    let domain = domain.to_lowercase();
    URL_SHORTENERS
        .iter()
        .any(|s| crate::rules::domain_matches_suffix(&domain, s))
}

/// Non-Latin characters mixed into the name, or a punycode (`xn--`) label,
/// which is how parsed URLs carry internationalised hosts.
pub fn has_homograph(domain: &str) -> bool {
    let has_ascii_letter = domain.chars().any(|c| c.is_ascii_alphabetic());
    let has_foreign_letter = domain.chars().any(|c| c.is_alphabetic() && !c.is_ascii());
    (has_ascii_letter && has_foreign_letter)
        || domain.split('.').any(|label| label.starts_with("xn--"))
}

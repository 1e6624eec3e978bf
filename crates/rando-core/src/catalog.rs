//! Curated catalog of destination URLs, grouped by category.
//!
//! Loaded once at startup and never mutated. Categories are kept in a
//! `BTreeMap` so iteration order (and therefore seeded selection) is stable.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

const EDUCATIONAL: &[&str] = &[
    "https://www.khanacademy.org",
    "https://www.coursera.org",
    "https://www.ted.com",
    "https://www.wikipedia.org",
    "https://www.duolingo.com",
    "https://www.codecademy.com",
    "https://www.nationalgeographic.com",
    "https://www.smithsonianmag.com",
    "https://www.scientificamerican.com",
    "https://www.howstuffworks.com",
];

const ENTERTAINMENT: &[&str] = &[
    "https://www.reddit.com",
    "https://www.boredpanda.com",
    "https://www.buzzfeed.com",
    "https://www.theoatmeal.com",
    "https://xkcd.com",
    "https://www.mentalfloss.com",
    "https://www.cracked.com",
    "https://www.collegehumor.com",
    "https://www.failblog.org",
    "https://www.awkwardfamilyphotos.com",
];

const CREATIVE: &[&str] = &[
    "https://www.behance.net",
    "https://dribbble.com",
    "https://www.deviantart.com",
    "https://unsplash.com",
    "https://www.pinterest.com",
    "https://www.artstation.com",
    "https://www.flickr.com",
    "https://vimeo.com",
    "https://www.creativebloq.com",
    "https://www.designboom.com",
];

const TECHNOLOGY: &[&str] = &[
    "https://github.com",
    "https://stackoverflow.com",
    "https://www.producthunt.com",
    "https://news.ycombinator.com",
    "https://www.theverge.com",
    "https://techcrunch.com",
    "https://arstechnica.com",
    "https://www.wired.com",
    "https://www.engadget.com",
    "https://slashdot.org",
];

const UNIQUE: &[&str] = &[
    "https://www.atlasobscura.com",
    "https://www.sporcle.com",
    "https://www.geoguessr.com",
    "https://www.radio.garden",
    "https://www.zombo.com",
    "https://www.theuselessweb.com",
    "https://www.randomwebsite.com",
    "https://www.stumbleupon.com",
    "https://www.mix.com",
    "https://www.openculture.com",
];

/// Immutable mapping of category name to its candidate URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// Build a catalog, dropping categories that have no entries.
    ///
    /// Fails if nothing is left, since the selector needs at least one candidate.
    pub fn new(categories: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let categories: BTreeMap<String, Vec<String>> = categories
            .into_iter()
            .filter(|(name, urls)| {
                if urls.is_empty() {
                    tracing::warn!(category = %name, "dropping empty catalog category");
                }
                !urls.is_empty()
            })
            .collect();
        if categories.is_empty() {
            anyhow::bail!("catalog has no non-empty categories");
        }
        Ok(Self { categories })
    }

    /// The built-in curated catalog.
    pub fn builtin() -> Self {
        let table: [(&str, &[&str]); 5] = [
            ("educational", EDUCATIONAL),
            ("entertainment", ENTERTAINMENT),
            ("creative", CREATIVE),
            ("technology", TECHNOLOGY),
            ("unique", UNIQUE),
        ];
        let categories = table
            .iter()
            .map(|(name, urls)| {
                (
                    name.to_string(),
                    urls.iter().map(|u| u.to_string()).collect(),
                )
            })
            .collect();
        Self { categories }
    }

    /// Parse a catalog from JSON of shape `{"category": ["url", ...]}`.
    pub fn from_json(data: &str) -> Result<Self> {
        let categories: BTreeMap<String, Vec<String>> =
            serde_json::from_str(data).context("parse catalog JSON")?;
        Self::new(categories)
    }

    /// Load a catalog JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read catalog: {}", path.display()))?;
        Self::from_json(&data)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn entries(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len_categories(&self) -> usize {
        self.categories.len()
    }

    /// Reverse lookup: the first category (in name order) containing `url`.
    pub fn category_of(&self, url: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, urls)| urls.iter().any(|u| u == url))
            .map(|(name, _)| name.as_str())
    }

    pub fn all_urls(&self) -> impl Iterator<Item = &str> {
        self.categories.values().flatten().map(String::as_str)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

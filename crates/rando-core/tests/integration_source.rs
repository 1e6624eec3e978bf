//! Integration test: an HTTP website source is asked before the catalog and
//! its answers still go through the filter.

mod common;

use common::counter_server::{self, ServerOptions};
use rando_core::catalog::Catalog;
use rando_core::filter::FilterEngine;
use rando_core::history::VisitHistory;
use rando_core::selector::{HttpWebsiteSource, Selector};

fn catalog() -> Catalog {
    Catalog::from_json(r#"{"science": ["https://www.nasa.gov", "https://www.esa.int"]}"#).unwrap()
}

#[tokio::test]
async fn remote_website_is_used_when_it_passes_the_filter() {
    let server = counter_server::start(ServerOptions {
        random_url: Some("https://www.gutenberg.org".to_string()),
        ..ServerOptions::default()
    });
    let mut selector = Selector::with_seed(catalog(), 11)
        .with_external_source(Box::new(HttpWebsiteSource::new(server.random_url())));
    let mut engine = FilterEngine::default();
    let selection = selector
        .generate_random_website(&VisitHistory::new(), &mut engine)
        .await;
    assert_eq!(selection.url, "https://www.gutenberg.org");
    assert_eq!(selection.attempts, 1);
}

#[tokio::test]
async fn blocked_remote_website_falls_back_to_catalog() {
    let server = counter_server::start(ServerOptions {
        random_url: Some("https://casino.example.tk".to_string()),
        ..ServerOptions::default()
    });
    let mut selector = Selector::with_seed(catalog(), 11)
        .with_external_source(Box::new(HttpWebsiteSource::new(server.random_url())));
    let mut engine = FilterEngine::default();
    let selection = selector
        .generate_random_website(&VisitHistory::new(), &mut engine)
        .await;
    assert!(catalog().category_of(&selection.url).is_some(), "{}", selection.url);
    assert_eq!(selection.attempts, 2);
    assert!(!selection.fallback);
}

#[tokio::test]
async fn missing_remote_endpoint_is_ignored() {
    let server = counter_server::start(ServerOptions::default());
    let mut selector = Selector::with_seed(catalog(), 11)
        .with_external_source(Box::new(HttpWebsiteSource::new(server.random_url())));
    let mut engine = FilterEngine::default();
    let selection = selector
        .generate_random_website(&VisitHistory::new(), &mut engine)
        .await;
    assert!(catalog().category_of(&selection.url).is_some());
    assert_eq!(selection.attempts, 1);
}

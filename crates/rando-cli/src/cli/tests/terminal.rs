//! Tests for the terminal browser launcher.

use crate::cli::terminal::launch;

#[tokio::test]
async fn launched_child_is_reaped() {
    let handle = launch("true", "https://example.org").unwrap();
    let status = handle.await.unwrap().expect("child was waited on");
    assert!(status.success());
}

#[tokio::test]
async fn failing_child_status_is_collected() {
    let handle = launch("false", "https://example.org").unwrap();
    let status = handle.await.unwrap().expect("child was waited on");
    assert!(!status.success());
}

#[tokio::test]
async fn missing_launcher_is_an_error() {
    assert!(launch("rando-no-such-launcher", "https://example.org").is_err());
}

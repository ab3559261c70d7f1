//! Integration tests for page-verify
//!
//! These tests require Chrome to be installed and available.
//! Run with: cargo test --test integration -- --ignored

use page_verify::{Runner, VerifyConfig};
use std::path::PathBuf;

/// Check if Chrome is available
fn chrome_available() -> bool {
    eoka::stealth::patcher::find_chrome().is_ok()
}

/// A self-contained page matching the map-view DOM contract: the router
/// container, the map div, and one loaded tile.
const MAP_PAGE: &str = "data:text/html,<div id=\"routerView\"><div id=\"map\" \
    style=\"width:300px;height:200px\"><div class=\"leaflet-tile-loaded\" \
    style=\"width:256px;height:200px;background:gray\"></div></div></div>";

/// The router container rendered, but the map view never injected.
const EMPTY_ROUTER_PAGE: &str = "data:text/html,<div id=\"routerView\"></div>";

/// Map container present but no tile ever finishes loading.
const TILELESS_MAP_PAGE: &str = "data:text/html,<div id=\"routerView\"><div id=\"map\" \
    style=\"width:300px;height:200px\"></div></div>";

fn temp_artifact(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("page-verify-tests");
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir.join(name)
}

fn map_config(page_url: &str, artifact: &PathBuf, timeout_ms: u64) -> VerifyConfig {
    let yaml = format!(
        r#"
name: "Map view renders"
browser:
  headless: true
target:
  url: '{page_url}'
checks:
  - wait_for_visible:
      selector: '#routerView #map'
      timeout_ms: {timeout_ms}
  - wait_for_visible:
      selector: '.leaflet-tile-loaded'
      timeout_ms: {timeout_ms}
artifact:
  path: '{artifact}'
"#,
        artifact = artifact.display(),
    );
    VerifyConfig::parse(&yaml).expect("parse config")
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_success_writes_artifact() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let artifact = temp_artifact("success.png");
    let _ = std::fs::remove_file(&artifact);

    let config = map_config(MAP_PAGE, &artifact, 5000);
    let mut runner = Runner::new(&config.browser).await.expect("launch");
    let result = runner.run(&config).await.expect("run");
    runner.close().await.expect("close");

    assert!(result.success, "expected success: {:?}", result.error);
    assert_eq!(result.checks_passed, 2);
    assert_eq!(result.artifact.as_deref(), Some(artifact.as_path()));

    let meta = std::fs::metadata(&artifact).expect("artifact file exists");
    assert!(meta.len() > 0, "artifact is empty");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_rerun_overwrites_artifact() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let artifact = temp_artifact("rerun.png");
    let _ = std::fs::remove_file(&artifact);

    let config = map_config(MAP_PAGE, &artifact, 5000);
    let mut runner = Runner::new(&config.browser).await.expect("launch");

    let first = runner.run(&config).await.expect("first run");
    assert!(first.success);
    let first_mtime = std::fs::metadata(&artifact).unwrap().modified().unwrap();

    let second = runner.run(&config).await.expect("second run");
    assert!(second.success);
    let second_mtime = std::fs::metadata(&artifact).unwrap().modified().unwrap();

    runner.close().await.expect("close");
    assert!(second_mtime >= first_mtime);
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_missing_container_times_out_without_artifact() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let artifact = temp_artifact("no-container.png");
    let _ = std::fs::remove_file(&artifact);

    let config = map_config(EMPTY_ROUTER_PAGE, &artifact, 1500);
    let mut runner = Runner::new(&config.browser).await.expect("launch");
    let result = runner.run(&config).await.expect("run");
    runner.close().await.expect("close");

    assert!(!result.success);
    assert_eq!(result.checks_passed, 0);
    assert!(result.artifact.is_none());
    assert!(
        result.error.as_deref().unwrap_or("").contains("timeout"),
        "expected timeout error, got {:?}",
        result.error
    );
    assert!(!artifact.exists(), "artifact must not be written on failure");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_missing_tiles_times_out_after_container() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let artifact = temp_artifact("no-tiles.png");
    let _ = std::fs::remove_file(&artifact);

    let config = map_config(TILELESS_MAP_PAGE, &artifact, 1500);
    let mut runner = Runner::new(&config.browser).await.expect("launch");
    let result = runner.run(&config).await.expect("run");
    runner.close().await.expect("close");

    assert!(!result.success);
    assert_eq!(result.checks_passed, 1, "container check should have passed");
    assert!(!artifact.exists());
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_failure_preserves_stale_artifact() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let artifact = temp_artifact("stale.png");
    std::fs::write(&artifact, b"stale artifact").expect("seed stale artifact");

    let config = map_config(EMPTY_ROUTER_PAGE, &artifact, 1500);
    let mut runner = Runner::new(&config.browser).await.expect("launch");
    let result = runner.run(&config).await.expect("run");
    runner.close().await.expect("close");

    assert!(!result.success);
    let content = std::fs::read(&artifact).expect("stale artifact still there");
    assert_eq!(content, b"stale artifact");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_expect_text_condition() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let yaml = r#"
name: "Expect text"
browser:
  headless: true
target:
  url: 'data:text/html,<h1>Map ready</h1>'
expect:
  all:
    - text_contains: "Map ready"
"#;
    let config = VerifyConfig::parse(yaml).expect("parse config");
    let mut runner = Runner::new(&config.browser).await.expect("launch");
    let result = runner.run(&config).await.expect("run");
    runner.close().await.expect("close");

    assert!(result.success, "expected success: {:?}", result.error);
    assert!(result.artifact.is_none());
}

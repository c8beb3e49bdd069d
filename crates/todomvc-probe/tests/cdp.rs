//! Suite against a live TodoMVC deployment in headless Chromium.
//!
//! Needs a chromium binary and network access to the app, so the tests are
//! ignored by default:
//!
//! ```bash
//! cargo test -p todomvc-probe --features browser --test cdp -- --ignored
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used)]

use todomvc_probe::prelude::*;

fn config() -> ProbeConfig {
    ProbeConfig::default()
        .with_backend(Backend::Cdp)
        .with_env_overrides()
        .unwrap()
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn full_suite_passes_in_chromium() {
    let config = config();
    let session = CdpSession::launch(&config).await.unwrap();
    let fixture = TodoFixture::load_or_embedded(config.fixture_path.as_deref()).unwrap();

    let results = SuiteRunner::new().run(&session, &fixture, &mut ()).await;
    session.close().await.unwrap();

    assert!(results.all_passed(), "{:?}", results.failures());
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn page_object_drives_chromium() {
    let config = config();
    let session = CdpSession::launch(&config).await.unwrap();
    let mut page = session.new_page().await.unwrap();

    page.clear_storage().await.unwrap();
    page.visit().await.unwrap();
    page.add_todo("Walk the dog").await.unwrap();
    page.get_todo("Walk the dog").should_be_visible().await.unwrap();
    page.toggle_todo("Walk the dog").await.unwrap();
    page.get_todo("Walk the dog")
        .should_have_class(selectors::COMPLETED_CLASS)
        .await
        .unwrap();
    page.filter_todos_by(Filter::Active).await.unwrap();
    page.get_visible_todos().should_have_count(0).await.unwrap();

    page.close().await.unwrap();
    session.close().await.unwrap();
}

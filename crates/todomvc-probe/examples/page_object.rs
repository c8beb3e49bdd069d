//! Example: TodoMVC page object
//!
//! Demonstrates: driving the app through `TodoPage`, retrying assertions,
//! and running the scenario suite.
//!
//! Run with: `cargo run --example page_object`
//!
//! Uses the in-process backend, so no browser is needed.

use todomvc_probe::prelude::*;

#[tokio::main]
async fn main() -> ProbeResult<()> {
    println!("=== TodoMVC Page Object Example ===\n");

    let config = ProbeConfig::default().with_backend(Backend::Memory);
    let fixture = TodoFixture::embedded()?;

    // 1. Drive the page object by hand
    println!("1. Adding the fixture todos...");
    let mut page = MemoryTodoPage::new(&config);
    page.visit().await?;
    for label in fixture.iter() {
        page.add_todo(label).await?;
        println!("   + {label}");
    }
    page.get_visible_todos()
        .should_have_texts(&fixture.labels())
        .await?;

    // 2. Complete one and look at the counter
    println!("\n2. Completing \"{}\"...", &fixture[1]);
    page.toggle_todo(&fixture[1]).await?;
    page.get_todo(&fixture[1])
        .should_have_class(selectors::COMPLETED_CLASS)
        .await?;
    let counter = page.get_items_count_container().texts().await?;
    println!("   Counter: {}", counter.join(""));

    // 3. Filters
    println!("\n3. Filtering...");
    for filter in Filter::ALL {
        page.filter_todos_by(filter).await?;
        let visible = page.get_visible_todos().texts().await?;
        println!("   {:<10} {:?}", filter.href(), visible);
    }

    // 4. Persistence
    println!("\n4. Local storage...");
    let stored = page.local_storage(page.storage_key()).await?;
    println!("   {}", stored.unwrap_or_default());
    page.close().await?;

    // 5. The whole suite
    println!("\n5. Running the scenario suite...");
    let results = SuiteRunner::new()
        .run(&MemoryPages::new(config), &fixture, &mut ())
        .await;
    for result in &results.results {
        let mark = if result.passed { "✓" } else { "✗" };
        println!("   {mark} {}", result.name);
    }
    println!(
        "\n   {} passed, {} failed",
        results.passed_count(),
        results.failed_count()
    );

    println!("\n=== Page Object Example Complete ===");
    Ok(())
}

//! Full suite against the in-process backend.
//!
//! Every scenario must pass on a correct app, and every injected defect must
//! be caught by the scenarios that cover it and by nothing else.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use todomvc_probe::prelude::*;

fn pages() -> MemoryPages {
    MemoryPages::new(ProbeConfig::default().with_backend(Backend::Memory))
}

fn fixture() -> TodoFixture {
    TodoFixture::embedded().unwrap()
}

fn failing_names(results: &SuiteResults) -> Vec<&'static str> {
    let mut names: Vec<_> = results.failures().iter().map(|r| r.name).collect();
    names.sort_unstable();
    names
}

async fn failures_with(defect: AppDefect) -> Vec<&'static str> {
    let results = SuiteRunner::new()
        .run(&pages().with_defect(defect), &fixture(), &mut ())
        .await;
    assert_eq!(results.total(), Scenario::ALL.len());
    failing_names(&results)
}

fn sorted(mut names: Vec<&'static str>) -> Vec<&'static str> {
    names.sort_unstable();
    names
}

// ============================================================================
// Correct app
// ============================================================================

#[tokio::test]
async fn full_suite_passes_on_correct_app() {
    let results = SuiteRunner::new().run(&pages(), &fixture(), &mut ()).await;
    assert!(
        results.all_passed(),
        "unexpected failures: {:?}",
        results.failures()
    );
    assert_eq!(results.passed_count(), 20);
    assert_eq!(results.backend, Backend::Memory);
}

#[tokio::test]
async fn each_scenario_passes_in_isolation() {
    for scenario in Scenario::all() {
        let results = SuiteRunner::new()
            .with_scenarios([*scenario])
            .run(&pages(), &fixture(), &mut ())
            .await;
        assert_eq!(results.total(), 1);
        assert!(results.all_passed(), "{scenario} failed: {:?}", results.failures());
    }
}

#[tokio::test]
async fn custom_fixture_labels_are_used() {
    let fixture = TodoFixture::new(["Water plants", "File taxes", "Call mom"]).unwrap();
    let results = SuiteRunner::new().run(&pages(), &fixture, &mut ()).await;
    assert!(results.all_passed(), "{:?}", results.failures());
}

// ============================================================================
// Injected defects
// ============================================================================

#[tokio::test]
async fn blank_todos_are_caught() {
    assert_eq!(
        failures_with(AppDefect::AcceptsBlankTodos).await,
        sorted(vec![
            "blank_todo_is_not_listed",
            "blank_todo_leaves_item_count_at_zero"
        ])
    );
}

#[tokio::test]
async fn plural_counter_is_caught() {
    assert_eq!(
        failures_with(AppDefect::AlwaysPluralCounter).await,
        vec!["counter_pluralizes"]
    );
}

#[tokio::test]
async fn wrong_counter_value_is_caught() {
    assert_eq!(
        failures_with(AppDefect::CounterOffByOne).await,
        sorted(vec![
            "blank_todo_leaves_item_count_at_zero",
            "counter_pluralizes"
        ])
    );
}

#[tokio::test]
async fn enter_not_committing_is_caught() {
    assert_eq!(
        failures_with(AppDefect::EnterDiscardsEdit).await,
        vec!["edit_commits_on_enter"]
    );
}

#[tokio::test]
async fn ignored_delete_is_caught() {
    assert_eq!(
        failures_with(AppDefect::DeleteIgnored).await,
        sorted(vec!["delete_removes_todo", "delete_several_todos"])
    );
}

#[tokio::test]
async fn toggle_all_flipping_each_is_caught() {
    assert_eq!(
        failures_with(AppDefect::ToggleAllFlipsEach).await,
        vec!["toggle_all_completes_remaining"]
    );
}

#[tokio::test]
async fn escape_committing_is_caught() {
    assert_eq!(
        failures_with(AppDefect::EscapeCommitsEdit).await,
        vec!["edit_reverts_on_escape"]
    );
}

#[tokio::test]
async fn blank_edit_kept_is_caught() {
    assert_eq!(
        failures_with(AppDefect::KeepsBlankEdits).await,
        vec!["editing_to_blank_removes_todo"]
    );
}

#[tokio::test]
async fn missing_persistence_is_caught() {
    assert_eq!(
        failures_with(AppDefect::SkipsPersistence).await,
        sorted(vec!["persists_across_tabs", "persists_in_local_storage"])
    );
}

#[tokio::test]
async fn ignored_filter_is_caught() {
    assert_eq!(
        failures_with(AppDefect::FilterIgnored).await,
        sorted(vec!["filter_active", "filter_all", "filter_completed"])
    );
}

#[tokio::test]
async fn toggle_all_never_clearing_is_caught() {
    assert_eq!(
        failures_with(AppDefect::ToggleAllNeverClears).await,
        vec!["toggle_all_completes_then_reactivates"]
    );
}

#[tokio::test]
async fn lost_focus_is_caught() {
    assert_eq!(
        failures_with(AppDefect::DropsInputFocus).await,
        vec!["new_todo_input_keeps_focus"]
    );
}

#[tokio::test]
async fn defect_failures_are_assertions() {
    let results = SuiteRunner::new()
        .run(
            &pages().with_defect(AppDefect::AlwaysPluralCounter),
            &fixture(),
            &mut (),
        )
        .await;
    let failure = results.get(Scenario::CounterPluralizes).unwrap();
    let error = failure.error.as_ref().unwrap();
    assert_eq!(error.kind, FailureKind::Assertion);
    assert!(error.message.contains("items count"));
}

// ============================================================================
// Filtering and observers
// ============================================================================

#[derive(Default)]
struct Recorder {
    started: Vec<Scenario>,
    finished: Vec<(&'static str, bool)>,
}

impl SuiteObserver for Recorder {
    fn scenario_started(&mut self, scenario: Scenario) {
        self.started.push(scenario);
    }

    fn scenario_finished(&mut self, result: &ScenarioResult) {
        self.finished.push((result.name, result.passed));
    }
}

#[tokio::test]
async fn filter_selects_matching_scenarios() {
    let mut recorder = Recorder::default();
    let results = SuiteRunner::new()
        .with_filter("filter_")
        .run(&pages(), &fixture(), &mut recorder)
        .await;
    assert_eq!(results.total(), 3);
    assert_eq!(
        recorder.started,
        vec![Scenario::FilterActive, Scenario::FilterCompleted, Scenario::FilterAll]
    );
    assert!(recorder.finished.iter().all(|(_, passed)| *passed));
}

#[tokio::test]
async fn fail_fast_stops_at_first_failure() {
    let mut recorder = Recorder::default();
    let results = SuiteRunner::new()
        .with_fail_fast(true)
        .run(
            &pages().with_defect(AppDefect::AcceptsBlankTodos),
            &fixture(),
            &mut recorder,
        )
        .await;
    assert_eq!(results.failed_count(), 1);
    assert_eq!(
        recorder.finished.last(),
        Some(&("blank_todo_is_not_listed", false))
    );
    assert_eq!(results.total(), 3);
}

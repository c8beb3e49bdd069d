//! Suite runner.
//!
//! Runs scenarios one at a time, each on a freshly opened page whose origin
//! storage has been cleared, and collects a [`ScenarioResult`] per scenario.

use crate::config::Backend;
use crate::fixture::TodoFixture;
use crate::page::TodoPage;
use crate::result::{ProbeError, ProbeResult};
use crate::scenario::{Scenario, ScenarioGroup};
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};

/// Source of fresh pages, one per scenario
#[async_trait]
pub trait PageFactory: Send + Sync {
    /// Page type produced
    type Page: TodoPage;

    /// Backend the pages run on
    fn backend(&self) -> Backend;

    /// Open a new page
    async fn open(&self) -> ProbeResult<Self::Page>;
}

/// Progress callbacks
pub trait SuiteObserver {
    /// Called before a scenario runs
    fn scenario_started(&mut self, _scenario: Scenario) {}

    /// Called with each finished scenario
    fn scenario_finished(&mut self, _result: &ScenarioResult) {}
}

impl SuiteObserver for () {}

/// Why a scenario failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// An expectation was not met in time
    Assertion,
    /// The browser, driver or app could not be driven
    Infrastructure,
}

/// Failure details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioError {
    /// Failure category
    pub kind: FailureKind,
    /// Error message
    pub message: String,
}

impl From<&ProbeError> for ScenarioError {
    fn from(err: &ProbeError) -> Self {
        Self {
            kind: if err.is_assertion() {
                FailureKind::Assertion
            } else {
                FailureKind::Infrastructure
            },
            message: err.to_string(),
        }
    }
}

fn serialize_ms<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: &'static str,
    /// Feature area
    pub group: ScenarioGroup,
    /// Whether it passed
    pub passed: bool,
    /// Failure, if any
    pub error: Option<ScenarioError>,
    /// Wall-clock time
    #[serde(rename = "duration_ms", serialize_with = "serialize_ms")]
    pub duration: Duration,
}

impl ScenarioResult {
    /// Passing result
    #[must_use]
    pub const fn pass(scenario: Scenario, duration: Duration) -> Self {
        Self {
            name: scenario.name(),
            group: scenario.group(),
            passed: true,
            error: None,
            duration,
        }
    }

    /// Failing result
    #[must_use]
    pub fn fail(scenario: Scenario, error: &ProbeError, duration: Duration) -> Self {
        Self {
            name: scenario.name(),
            group: scenario.group(),
            passed: false,
            error: Some(error.into()),
            duration,
        }
    }
}

/// Results from running the suite on one backend
#[derive(Debug, Clone, Serialize)]
pub struct SuiteResults {
    /// Backend the suite ran on
    pub backend: Backend,
    /// Individual results, in run order
    pub results: Vec<ScenarioResult>,
    /// Total duration
    #[serde(rename = "duration_ms", serialize_with = "serialize_ms")]
    pub duration: Duration,
}

impl SuiteResults {
    /// Check if all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Total scenarios run
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    /// Result for a scenario, if it ran
    #[must_use]
    pub fn get(&self, scenario: Scenario) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.name == scenario.name())
    }
}

/// Runs scenarios sequentially
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    /// Stop after the first failure
    pub fail_fast: bool,
    /// Only run scenarios whose name or description contains this
    pub filter: Option<String>,
    scenarios: Vec<Scenario>,
}

impl Default for SuiteRunner {
    fn default() -> Self {
        Self {
            fail_fast: false,
            filter: None,
            scenarios: Scenario::all().to_vec(),
        }
    }
}

impl SuiteRunner {
    /// Runner for the whole suite
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Restrict to scenarios matching `pattern`
    #[must_use]
    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    /// Replace the scenario list
    #[must_use]
    pub fn with_scenarios(mut self, scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        self.scenarios = scenarios.into_iter().collect();
        self
    }

    /// Scenarios that will run, after filtering
    #[must_use]
    pub fn selected(&self) -> Vec<Scenario> {
        self.scenarios
            .iter()
            .copied()
            .filter(|s| self.filter.as_deref().map_or(true, |p| s.matches(p)))
            .collect()
    }

    /// Run every selected scenario
    pub async fn run<F: PageFactory>(
        &self,
        factory: &F,
        fixture: &TodoFixture,
        observer: &mut dyn SuiteObserver,
    ) -> SuiteResults {
        let start = Instant::now();
        let mut results = Vec::new();
        let backend = factory.backend();

        tracing::info!(%backend, count = self.selected().len(), "running suite");

        for scenario in self.selected() {
            observer.scenario_started(scenario);
            let result = run_one(factory, scenario, fixture).await;
            observer.scenario_finished(&result);
            let failed = !result.passed;
            results.push(result);
            if failed && self.fail_fast {
                tracing::info!("fail-fast: stopping after first failure");
                break;
            }
        }

        SuiteResults {
            backend,
            results,
            duration: start.elapsed(),
        }
    }
}

async fn run_one<F: PageFactory>(
    factory: &F,
    scenario: Scenario,
    fixture: &TodoFixture,
) -> ScenarioResult {
    let start = Instant::now();
    tracing::info!(scenario = scenario.name(), group = %scenario.group(), "scenario started");

    let outcome = match factory.open().await {
        Ok(mut page) => {
            let outcome = match page.clear_storage().await {
                Ok(()) => scenario.run(&mut page, fixture).await,
                Err(e) => Err(e),
            };
            if let Err(e) = page.close().await {
                tracing::warn!(scenario = scenario.name(), error = %e, "failed to close page");
            }
            outcome
        }
        Err(e) => Err(e),
    };

    let duration = start.elapsed();
    match outcome {
        Ok(()) => {
            tracing::info!(
                scenario = scenario.name(),
                duration_ms = duration.as_millis(),
                "scenario passed"
            );
            ScenarioResult::pass(scenario, duration)
        }
        Err(e) => {
            tracing::warn!(scenario = scenario.name(), error = %e, "scenario failed");
            ScenarioResult::fail(scenario, &e, duration)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::memory::{AppDefect, MemoryPages};

    #[derive(Default)]
    struct Recorder {
        started: Vec<Scenario>,
        finished: Vec<bool>,
    }

    impl SuiteObserver for Recorder {
        fn scenario_started(&mut self, scenario: Scenario) {
            self.started.push(scenario);
        }

        fn scenario_finished(&mut self, result: &ScenarioResult) {
            self.finished.push(result.passed);
        }
    }

    fn fixture() -> TodoFixture {
        TodoFixture::embedded().unwrap()
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_default_selects_everything() {
            assert_eq!(SuiteRunner::new().selected().len(), Scenario::ALL.len());
        }

        #[test]
        fn test_filter() {
            let selected = SuiteRunner::new().with_filter("filter_").selected();
            assert_eq!(
                selected,
                vec![Scenario::FilterActive, Scenario::FilterCompleted, Scenario::FilterAll]
            );
        }

        #[test]
        fn test_explicit_scenarios() {
            let runner = SuiteRunner::new().with_scenarios([Scenario::CounterPluralizes]);
            assert_eq!(runner.selected(), vec![Scenario::CounterPluralizes]);
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_full_suite_passes_on_memory() {
            let factory = MemoryPages::new(ProbeConfig::default());
            let mut recorder = Recorder::default();
            let results = SuiteRunner::new()
                .run(&factory, &fixture(), &mut recorder)
                .await;
            assert!(results.all_passed(), "{:?}", results.failures());
            assert_eq!(results.total(), Scenario::ALL.len());
            assert_eq!(results.backend, Backend::Memory);
            assert_eq!(recorder.started.len(), Scenario::ALL.len());
            assert!(recorder.finished.iter().all(|passed| *passed));
        }

        #[tokio::test]
        async fn test_failure_is_recorded_as_assertion() {
            let factory = MemoryPages::new(ProbeConfig::default())
                .with_defect(AppDefect::AlwaysPluralCounter);
            let results = SuiteRunner::new()
                .with_scenarios([Scenario::CounterPluralizes, Scenario::AddsNewTodo])
                .run(&factory, &fixture(), &mut ())
                .await;
            assert_eq!(results.failed_count(), 1);
            assert_eq!(results.passed_count(), 1);
            let failure = results.get(Scenario::CounterPluralizes).unwrap();
            let error = failure.error.as_ref().unwrap();
            assert_eq!(error.kind, FailureKind::Assertion);
            assert!(error.message.contains("items left"));
        }

        #[tokio::test]
        async fn test_fail_fast_stops() {
            let factory = MemoryPages::new(ProbeConfig::default())
                .with_defect(AppDefect::AcceptsBlankTodos);
            let mut recorder = Recorder::default();
            let results = SuiteRunner::new()
                .with_fail_fast(true)
                .with_scenarios([
                    Scenario::BlankTodoIsNotListed,
                    Scenario::AddsNewTodo,
                ])
                .run(&factory, &fixture(), &mut recorder)
                .await;
            assert_eq!(results.total(), 1);
            assert_eq!(recorder.started, vec![Scenario::BlankTodoIsNotListed]);
        }

        #[tokio::test]
        async fn test_results_serialize_with_millis() {
            let factory = MemoryPages::new(ProbeConfig::default());
            let results = SuiteRunner::new()
                .with_scenarios([Scenario::AddsNewTodo])
                .run(&factory, &fixture(), &mut ())
                .await;
            let json = serde_json::to_value(&results).unwrap();
            assert_eq!(json["backend"], "memory");
            assert_eq!(json["results"][0]["name"], "adds_new_todo");
            assert_eq!(json["results"][0]["group"], "new_todo");
            assert!(json["results"][0]["duration_ms"].is_u64());
            assert!(json["results"][0]["error"].is_null());
        }
    }

    #[test]
    fn test_error_classification() {
        let assertion: ScenarioError = (&ProbeError::assertion("x")).into();
        assert_eq!(assertion.kind, FailureKind::Assertion);
        let infra: ScenarioError = (&ProbeError::BrowserLaunch {
            message: "no chromium".into(),
        })
            .into();
        assert_eq!(infra.kind, FailureKind::Infrastructure);
    }
}

//! Suite runner: picks the backend and drives the library's `SuiteRunner`

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use todomvc_probe::{Backend, MemoryPages, ProbeConfig, SuiteResults, SuiteRunner, TodoFixture};

/// Runs the scenario suite for one resolved configuration
#[derive(Debug)]
pub struct TestRunner {
    config: CliConfig,
    probe: ProbeConfig,
}

impl TestRunner {
    /// Create a runner
    #[must_use]
    pub const fn new(config: CliConfig, probe: ProbeConfig) -> Self {
        Self { config, probe }
    }

    /// Probe configuration in use
    #[must_use]
    pub const fn probe(&self) -> &ProbeConfig {
        &self.probe
    }

    fn suite(&self) -> SuiteRunner {
        let suite = SuiteRunner::new().with_fail_fast(self.config.fail_fast);
        match &self.config.filter {
            Some(pattern) => suite.with_filter(pattern.clone()),
            None => suite,
        }
    }

    /// Run the suite, blocking until every selected scenario finished
    pub fn run(&self, reporter: &mut ProgressReporter) -> CliResult<SuiteResults> {
        let fixture = TodoFixture::load_or_embedded(self.probe.fixture_path.as_deref())?;
        let suite = self.suite();

        let selected = suite.selected().len();
        if selected == 0 {
            return Err(CliError::invalid_argument(format!(
                "no scenario matches '{}'",
                self.config.filter.as_deref().unwrap_or_default()
            )));
        }

        tracing::info!(
            backend = %self.probe.backend,
            base_url = %self.probe.base_url,
            scenarios = selected,
            "starting suite"
        );

        reporter.header(&format!(
            "TodoMVC suite on {} ({})",
            self.probe.backend, self.probe.base_url
        ));
        reporter.start_progress(u64::try_from(selected).unwrap_or(u64::MAX), "starting");

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| CliError::test_execution(format!("Failed to create runtime: {e}")))?;
        let results = rt.block_on(self.dispatch(&suite, &fixture, reporter));

        reporter.finish();
        results
    }

    async fn dispatch(
        &self,
        suite: &SuiteRunner,
        fixture: &TodoFixture,
        reporter: &mut ProgressReporter,
    ) -> CliResult<SuiteResults> {
        match self.probe.backend {
            Backend::Memory => {
                let pages = MemoryPages::new(self.probe.clone());
                Ok(suite.run(&pages, fixture, reporter).await)
            }
            #[cfg(feature = "browser")]
            Backend::Cdp => {
                let session = todomvc_probe::CdpSession::launch(&self.probe).await?;
                let results = suite.run(&session, fixture, reporter).await;
                session.close().await?;
                Ok(results)
            }
            #[cfg(not(feature = "browser"))]
            Backend::Cdp => Err(CliError::config(
                "cdp backend not enabled. Rebuild with --features browser",
            )),
            #[cfg(feature = "webdriver")]
            Backend::WebDriver => {
                let pages = todomvc_probe::WebDriverPages::new(self.probe.clone());
                Ok(suite.run(&pages, fixture, reporter).await)
            }
            #[cfg(not(feature = "webdriver"))]
            Backend::WebDriver => Err(CliError::config(
                "webdriver backend not enabled. Rebuild with --features webdriver",
            )),
        }
    }
}

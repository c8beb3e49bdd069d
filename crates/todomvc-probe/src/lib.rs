//! todomvc-probe: end-to-end scenarios for TodoMVC front ends
//!
//! A [`TodoPage`] is the page object: it knows how to drive the app (add,
//! toggle, edit, delete, filter, clear) and how to observe it. The scenarios
//! in [`Scenario`] are written once against that trait and run unchanged on
//! every backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   todomvc-probe Architecture                    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────────┐    │
//! │   │ Scenario   │    │ TodoPage   │    │ cdp (chromium)     │    │
//! │   │ + Query    │───►│ (page      │───►│ webdriver (W3C)    │    │
//! │   │ assertions │    │  object)   │    │ memory (in-proc)   │    │
//! │   └────────────┘    └────────────┘    └────────────────────┘    │
//! │          ▲                                                      │
//! │   ┌──────┴─────┐                                                │
//! │   │ SuiteRunner│  one fresh page per scenario                   │
//! │   └────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use todomvc_probe::prelude::*;
//!
//! # async fn demo() -> ProbeResult<()> {
//! let config = ProbeConfig::default().with_backend(Backend::Memory);
//! let pages = MemoryPages::new(config);
//! let fixture = TodoFixture::embedded()?;
//! let results = SuiteRunner::new()
//!     .run(&pages, &fixture, &mut ())
//!     .await;
//! assert!(results.all_passed());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod result;

/// Selectors and observed element state
#[allow(clippy::must_use_candidate, clippy::doc_markdown)]
pub mod locator;

/// Polling waits with a timeout
#[allow(clippy::missing_errors_doc)]
pub mod wait;

mod config;
mod filter;
mod fixture;

/// The page object contract
#[allow(clippy::missing_errors_doc)]
pub mod page;

/// Retrying assertions over page observations
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod query;

/// In-process TodoMVC model with injectable defects
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod memory;

/// The TodoMVC behaviour scenarios
#[allow(clippy::missing_errors_doc, clippy::too_many_lines)]
pub mod scenario;

/// Suite runner and results
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod harness;

/// Chromium over the DevTools protocol
#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc)]
pub mod cdp;

/// Any W3C WebDriver server
#[cfg(feature = "webdriver")]
#[allow(clippy::missing_errors_doc)]
pub mod webdriver;

pub use config::{
    env, Backend, ProbeConfig, DEFAULT_BASE_URL, DEFAULT_STORAGE_KEY, DEFAULT_WEBDRIVER_URL,
};
pub use filter::Filter;
pub use fixture::{TodoFixture, FIXTURE_LEN};
pub use harness::{
    FailureKind, PageFactory, ScenarioError, ScenarioResult, SuiteObserver, SuiteResults,
    SuiteRunner,
};
pub use locator::{selectors, ElementState, Selector, Target};
pub use memory::{AppDefect, MemoryPages, MemoryTodoPage, TodoAppModel, TodoItem};
pub use page::TodoPage;
pub use query::{Expectation, Query};
pub use result::{ProbeError, ProbeResult};
pub use scenario::{Scenario, ScenarioGroup};
pub use wait::{WaitOptions, Waited};

#[cfg(feature = "browser")]
pub use cdp::{CdpSession, CdpTodoPage};
#[cfg(feature = "webdriver")]
pub use webdriver::{WebDriverPages, WebDriverTodoPage};

/// Everything a scenario author needs
pub mod prelude {
    pub use super::config::*;
    pub use super::filter::*;
    pub use super::fixture::*;
    pub use super::harness::*;
    pub use super::locator::*;
    pub use super::memory::*;
    pub use super::page::*;
    pub use super::query::*;
    pub use super::result::*;
    pub use super::scenario::*;
    pub use super::wait::*;

    #[cfg(feature = "browser")]
    pub use super::cdp::*;
    #[cfg(feature = "webdriver")]
    pub use super::webdriver::*;
}

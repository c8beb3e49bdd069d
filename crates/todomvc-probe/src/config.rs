//! Probe configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! environment variables. Command-line flags are applied last by the caller
//! through the builder methods.

use crate::result::{ProbeError, ProbeResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Public deployment of the TodoMVC vanilla JS app
pub const DEFAULT_BASE_URL: &str = "https://todomvc-vanillajs.test-targets.dev/";

/// Local storage key the app persists its items under
pub const DEFAULT_STORAGE_KEY: &str = "todos-vanillajs";

/// Default WebDriver endpoint (chromedriver / selenium standalone)
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Environment variables read by [`ProbeConfig::with_env_overrides`]
pub mod env {
    /// Base URL of the app under test
    pub const BASE_URL: &str = "TODOMVC_BASE_URL";
    /// Automation backend
    pub const BACKEND: &str = "TODOMVC_BACKEND";
    /// Headless browser toggle
    pub const HEADLESS: &str = "TODOMVC_HEADLESS";
    /// Chromium executable
    pub const CHROMIUM_PATH: &str = "CHROMIUM_PATH";
    /// WebDriver endpoint
    pub const WEBDRIVER_URL: &str = "TODOMVC_WEBDRIVER_URL";
    /// Wait timeout in milliseconds
    pub const TIMEOUT_MS: &str = "TODOMVC_TIMEOUT_MS";
    /// Fixture file
    pub const FIXTURE: &str = "TODOMVC_FIXTURE";
}

/// Browser automation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Chrome DevTools Protocol via chromiumoxide
    #[default]
    Cdp,
    /// W3C WebDriver via fantoccini
    WebDriver,
    /// In-process model of the app, no browser
    Memory,
}

impl Backend {
    /// Lower-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cdp => "cdp",
            Self::WebDriver => "webdriver",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cdp" | "chromium" | "chrome" => Ok(Self::Cdp),
            "webdriver" => Ok(Self::WebDriver),
            "memory" => Ok(Self::Memory),
            other => Err(ProbeError::Config {
                message: format!("unknown backend '{other}' (expected cdp, webdriver or memory)"),
            }),
        }
    }
}

/// Configuration shared by every backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// URL the page object navigates to on `visit`
    pub base_url: String,
    /// Automation backend
    pub backend: Backend,
    /// Run the browser without a window
    pub headless: bool,
    /// Chromium executable (auto-detected when unset)
    pub chromium_path: Option<PathBuf>,
    /// WebDriver server endpoint
    pub webdriver_url: String,
    /// Wait window for actions and expectations
    pub timeout_ms: u64,
    /// Delay between polls
    pub poll_interval_ms: u64,
    /// Fixture file (embedded fixture when unset)
    pub fixture_path: Option<PathBuf>,
    /// Local storage key holding the persisted items
    pub storage_key: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            backend: Backend::default(),
            headless: true,
            chromium_path: None,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            fixture_path: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl ProbeConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from YAML; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> ProbeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let config = Self::read_yaml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file as one layer, without validating
    ///
    /// Later layers (environment, flags) may still fix values the file gets
    /// wrong; call [`ProbeConfig::validate`] once every layer is applied.
    pub fn read_yaml_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| ProbeError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Ok(serde_yaml_ng::from_str(&yaml)?)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> ProbeResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> ProbeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::BASE_URL) {
            self.base_url = url;
        }
        if let Some(backend) = lookup(env::BACKEND) {
            self.backend = backend.parse()?;
        }
        if let Some(headless) = lookup(env::HEADLESS) {
            self.headless = parse_bool(env::HEADLESS, &headless)?;
        }
        if let Some(path) = lookup(env::CHROMIUM_PATH) {
            self.chromium_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup(env::WEBDRIVER_URL) {
            self.webdriver_url = url;
        }
        if let Some(ms) = lookup(env::TIMEOUT_MS) {
            self.timeout_ms = ms.trim().parse().map_err(|_| ProbeError::Config {
                message: format!("{} must be a number of milliseconds, got '{ms}'", env::TIMEOUT_MS),
            })?;
        }
        if let Some(path) = lookup(env::FIXTURE) {
            self.fixture_path = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set backend
    #[must_use]
    pub const fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set Chromium executable
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set WebDriver endpoint
    #[must_use]
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    /// Set wait timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set poll interval
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set fixture file
    #[must_use]
    pub fn with_fixture_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixture_path = Some(path.into());
        self
    }

    /// Wait options derived from the timeout and poll interval
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> ProbeResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(config_error("base_url must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(config_error("timeout_ms must be greater than zero"));
        }
        if self.poll_interval_ms > self.timeout_ms {
            return Err(config_error(format!(
                "poll_interval_ms ({}) exceeds timeout_ms ({})",
                self.poll_interval_ms, self.timeout_ms
            )));
        }
        if self.storage_key.is_empty() {
            return Err(config_error("storage_key must not be empty"));
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> ProbeError {
    ProbeError::Config {
        message: message.into(),
    }
}

fn parse_bool(key: &str, value: &str) -> ProbeResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(config_error(format!("{key} must be a boolean, got '{value}'"))),
    }
}

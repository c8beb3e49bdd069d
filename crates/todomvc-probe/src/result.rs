//! Result and error types for the probe.

use thiserror::Error;

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving or asserting on the app
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Connection to the automation endpoint failed
    #[error("Failed to connect to {endpoint}: {message}")]
    Connection {
        /// Endpoint that refused the session
        endpoint: String,
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No element matched within the wait window
    #[error("No element matching {selector} after {waited_ms}ms")]
    ElementNotFound {
        /// Selector that was searched
        selector: String,
        /// Time spent waiting
        waited_ms: u64,
    },

    /// A user action could not be performed
    #[error("Action '{action}' failed: {message}")]
    Action {
        /// Name of the page-object action
        action: String,
        /// Error message
        message: String,
    },

    /// Script evaluation error
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Expectation not satisfied within the wait window
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Fixture data is missing or malformed
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create an action failure
    #[must_use]
    pub fn action(action: impl Into<String>, message: impl ToString) -> Self {
        Self::Action {
            action: action.into(),
            message: message.to_string(),
        }
    }

    /// Create a script evaluation failure
    #[must_use]
    pub fn script(message: impl ToString) -> Self {
        Self::Script {
            message: message.to_string(),
        }
    }

    /// Whether this error is a failed expectation rather than infrastructure trouble
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(
            self,
            Self::AssertionFailed { .. } | Self::ElementNotFound { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_message() {
        let err = ProbeError::assertion("expected 3 items, saw 2");
        assert_eq!(err.to_string(), "Assertion failed: expected 3 items, saw 2");
        assert!(err.is_assertion());
    }

    #[test]
    fn test_element_not_found_is_assertion() {
        let err = ProbeError::ElementNotFound {
            selector: ".toggle-all".to_string(),
            waited_ms: 4000,
        };
        assert!(err.is_assertion());
        assert!(err.to_string().contains(".toggle-all"));
        assert!(err.to_string().contains("4000ms"));
    }

    #[test]
    fn test_infrastructure_errors_are_not_assertions() {
        let err = ProbeError::BrowserLaunch {
            message: "chromium not found".to_string(),
        };
        assert!(!err.is_assertion());

        let err = ProbeError::action("add_todo", "input detached");
        assert!(!err.is_assertion());
        assert_eq!(err.to_string(), "Action 'add_todo' failed: input detached");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err: ProbeError = json_err.into();
        assert!(matches!(err, ProbeError::Json(_)));
    }
}

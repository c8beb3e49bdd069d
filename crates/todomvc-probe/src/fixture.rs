//! Fixture data: the three todo labels scenarios seed the app with.
//!
//! Labels are looked up on the page by substring, so a valid fixture holds
//! exactly three distinct, non-empty labels none of which contains another.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of labels every fixture carries
pub const FIXTURE_LEN: usize = 3;

const EMBEDDED: &str = include_str!("../fixtures/todos.json");

/// Ordered, read-only set of todo labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoFixture {
    todos: Vec<String>,
}

impl TodoFixture {
    /// Build from labels, validating them
    pub fn new<I, S>(labels: I) -> ProbeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fixture = Self {
            todos: labels.into_iter().map(Into::into).collect(),
        };
        fixture.validate()?;
        Ok(fixture)
    }

    /// Parse `{ "todos": [a, b, c] }`
    pub fn from_json(json: &str) -> ProbeResult<Self> {
        let fixture: Self = serde_json::from_str(json)?;
        fixture.validate()?;
        Ok(fixture)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ProbeError::Fixture {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json(&json)
    }

    /// Fixture shipped with the crate
    pub fn embedded() -> ProbeResult<Self> {
        Self::from_json(EMBEDDED)
    }

    /// Load `path` when given, otherwise the embedded fixture
    pub fn load_or_embedded(path: Option<&Path>) -> ProbeResult<Self> {
        path.map_or_else(Self::embedded, Self::load)
    }

    /// Label at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.todos.get(index).map(String::as_str)
    }

    /// All labels in order
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.todos.iter().map(String::as_str).collect()
    }

    /// Iterate labels in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.todos.iter().map(String::as_str)
    }

    fn validate(&self) -> ProbeResult<()> {
        if self.todos.len() != FIXTURE_LEN {
            return Err(fixture_error(format!(
                "expected {FIXTURE_LEN} todos, found {}",
                self.todos.len()
            )));
        }
        for (i, label) in self.todos.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(fixture_error(format!("todo {i} is blank")));
            }
            if label.trim() != label {
                return Err(fixture_error(format!(
                    "todo {i} has surrounding whitespace, the app would trim it"
                )));
            }
            for (j, other) in self.todos.iter().enumerate() {
                if i != j && other.contains(label.as_str()) {
                    return Err(fixture_error(format!(
                        "todo {i} ({label:?}) also matches todo {j} ({other:?})"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for TodoFixture {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.todos[index]
    }
}

fn fixture_error(message: String) -> ProbeError {
    ProbeError::Fixture { message }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod loading_tests {
        use super::*;
        use std::io::Write;

        #[test]
        fn test_embedded() {
            let fixture = TodoFixture::embedded().unwrap();
            assert_eq!(
                fixture.labels(),
                vec!["Pay electric bill", "Walk the dog", "Buy groceries"]
            );
            assert_eq!(&fixture[1], "Walk the dog");
            assert_eq!(fixture.get(3), None);
        }

        #[test]
        fn test_load_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, r#"{{"todos": ["alpha", "beta", "gamma"]}}"#).unwrap();
            let fixture = TodoFixture::load(file.path()).unwrap();
            assert_eq!(fixture.iter().collect::<Vec<_>>(), vec!["alpha", "beta", "gamma"]);
        }

        #[test]
        fn test_load_or_embedded() {
            let fixture = TodoFixture::load_or_embedded(None).unwrap();
            assert_eq!(fixture, TodoFixture::embedded().unwrap());
        }

        #[test]
        fn test_missing_file() {
            let err = TodoFixture::load("/nonexistent/todos.json").unwrap_err();
            assert!(matches!(err, ProbeError::Fixture { .. }));
        }

        #[test]
        fn test_malformed_json() {
            let err = TodoFixture::from_json(r#"{"todos": "#).unwrap_err();
            assert!(matches!(err, ProbeError::Json(_)));
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_wrong_length() {
            assert!(TodoFixture::new(["a", "b"]).is_err());
            assert!(TodoFixture::new(["a", "b", "c", "d"]).is_err());
        }

        #[test]
        fn test_blank_label() {
            assert!(TodoFixture::new(["a", " ", "c"]).is_err());
        }

        #[test]
        fn test_untrimmed_label() {
            assert!(TodoFixture::new(["a ", "b", "c"]).is_err());
        }

        #[test]
        fn test_duplicate_label() {
            assert!(TodoFixture::new(["milk", "milk", "eggs"]).is_err());
        }

        #[test]
        fn test_overlapping_labels() {
            let err = TodoFixture::new(["Walk", "Walk the dog", "Buy groceries"]).unwrap_err();
            assert!(err.to_string().contains("also matches"));
        }

        #[test]
        fn test_valid() {
            assert!(TodoFixture::new(["milk", "eggs", "bread"]).is_ok());
        }
    }
}

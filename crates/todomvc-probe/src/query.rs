//! Deferred query handles and retrying expectations.
//!
//! A [`Query`] records *what* to look at; the page is only read when an
//! expectation is awaited, and re-read on every poll until the expectation
//! holds or the wait window closes.

use crate::locator::{selectors, ElementState, Target};
use crate::page::TodoPage;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{wait_for, WaitOptions};

/// Condition checked against the elements a query resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// At least one element
    Exists,
    /// No element
    NotExists,
    /// At least one element, all of them visible
    Visible,
    /// Exactly this many elements
    Count(usize),
    /// Element texts, in order, exactly equal to these
    Texts(Vec<String>),
    /// Combined text contains this
    ContainsText(String),
    /// At least one element and the combined text does not contain this
    NotContainsText(String),
    /// At least one element, all of them carrying this class
    HasClass(String),
}

impl Expectation {
    /// Whether `states` satisfies the expectation
    #[must_use]
    pub fn check(&self, states: &[ElementState]) -> bool {
        match self {
            Self::Exists => !states.is_empty(),
            Self::NotExists => states.is_empty(),
            Self::Visible => !states.is_empty() && states.iter().all(|s| s.visible),
            Self::Count(n) => states.len() == *n,
            Self::Texts(expected) => {
                states.len() == expected.len()
                    && states.iter().zip(expected).all(|(s, e)| s.text == *e)
            }
            Self::ContainsText(needle) => combined_text(states).contains(needle.as_str()),
            Self::NotContainsText(needle) => {
                !states.is_empty() && !combined_text(states).contains(needle.as_str())
            }
            Self::HasClass(class) => !states.is_empty() && states.iter().all(|s| s.has_class(class)),
        }
    }
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exists => write!(f, "exist"),
            Self::NotExists => write!(f, "not exist"),
            Self::Visible => write!(f, "be visible"),
            Self::Count(n) => write!(f, "have length {n}"),
            Self::Texts(texts) => write!(f, "have texts {texts:?}"),
            Self::ContainsText(t) => write!(f, "contain text {t:?}"),
            Self::NotContainsText(t) => write!(f, "not contain text {t:?}"),
            Self::HasClass(c) => write!(f, "have class {c:?}"),
        }
    }
}

fn combined_text(states: &[ElementState]) -> String {
    states
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe_states(states: &[ElementState]) -> String {
    if states.is_empty() {
        return "no elements".to_string();
    }
    let items: Vec<String> = states
        .iter()
        .map(|s| {
            let mut item = format!("{:?}", s.text);
            if !s.classes.is_empty() {
                item.push_str(&format!(" .{}", s.classes.join(".")));
            }
            if !s.visible {
                item.push_str(" (hidden)");
            }
            item
        })
        .collect();
    format!("[{}]", items.join(", "))
}

/// Deferred handle to elements on a [`TodoPage`]
#[derive(Debug)]
pub struct Query<'a, P: ?Sized> {
    page: &'a P,
    target: Target,
    class_filter: Option<String>,
    wait: WaitOptions,
}

impl<'a, P: TodoPage + ?Sized> Query<'a, P> {
    /// Create a handle for `target`, using the page's wait window
    #[must_use]
    pub fn new(page: &'a P, target: Target) -> Self {
        Self {
            page,
            target,
            class_filter: None,
            wait: page.wait_options(),
        }
    }

    /// Narrow to elements carrying `class`
    #[must_use]
    pub fn filter_class(mut self, class: impl Into<String>) -> Self {
        self.class_filter = Some(class.into());
        self
    }

    /// Narrow to completed items
    #[must_use]
    pub fn completed(self) -> Self {
        self.filter_class(selectors::COMPLETED_CLASS)
    }

    /// Override the wait window
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.wait.timeout_ms = timeout_ms;
        self
    }

    /// Target this handle resolves
    #[must_use]
    pub const fn target(&self) -> &Target {
        &self.target
    }

    /// Read the page once
    pub async fn snapshot(&self) -> ProbeResult<Vec<ElementState>> {
        let mut states = self.page.observe(&self.target).await?;
        if let Some(class) = &self.class_filter {
            states.retain(|s| s.has_class(class));
        }
        Ok(states)
    }

    /// Number of matching elements right now
    pub async fn count(&self) -> ProbeResult<usize> {
        Ok(self.snapshot().await?.len())
    }

    /// Texts of the matching elements right now
    pub async fn texts(&self) -> ProbeResult<Vec<String>> {
        Ok(self.snapshot().await?.into_iter().map(|s| s.text).collect())
    }

    /// Poll until `expectation` holds
    pub async fn expect(&self, expectation: Expectation) -> ProbeResult<&Self> {
        let waited = wait_for(&self.wait, || self.snapshot(), |states| {
            expectation.check(states)
        })
        .await?;

        if waited.satisfied {
            return Ok(self);
        }

        tracing::warn!(
            backend = %self.page.backend(),
            target = %self.describe(),
            expectation = %expectation,
            "expectation not met"
        );
        Err(ProbeError::assertion(format!(
            "expected {} to {} within {}ms, found {}",
            self.describe(),
            expectation,
            self.wait.timeout_ms,
            describe_states(&waited.value)
        )))
    }

    /// At least one element matches
    pub async fn should_exist(&self) -> ProbeResult<&Self> {
        self.expect(Expectation::Exists).await
    }

    /// No element matches
    pub async fn should_not_exist(&self) -> ProbeResult<&Self> {
        self.expect(Expectation::NotExists).await
    }

    /// At least one element matches and every match is visible
    pub async fn should_be_visible(&self) -> ProbeResult<&Self> {
        self.expect(Expectation::Visible).await
    }

    /// Exactly `count` elements match
    pub async fn should_have_count(&self, count: usize) -> ProbeResult<&Self> {
        self.expect(Expectation::Count(count)).await
    }

    /// Matching element texts equal `texts`, in order
    pub async fn should_have_texts(&self, texts: &[&str]) -> ProbeResult<&Self> {
        self.expect(Expectation::Texts(
            texts.iter().map(|t| (*t).to_string()).collect(),
        ))
        .await
    }

    /// Combined text of the matches contains `text`
    pub async fn should_contain_text(&self, text: &str) -> ProbeResult<&Self> {
        self.expect(Expectation::ContainsText(text.to_string())).await
    }

    /// Something matches and its combined text does not contain `text`
    pub async fn should_not_contain_text(&self, text: &str) -> ProbeResult<&Self> {
        self.expect(Expectation::NotContainsText(text.to_string()))
            .await
    }

    /// Every match carries `class`
    pub async fn should_have_class(&self, class: &str) -> ProbeResult<&Self> {
        self.expect(Expectation::HasClass(class.to_string())).await
    }

    fn describe(&self) -> String {
        match &self.class_filter {
            Some(class) => format!("{} filtered by .{class}", self.target),
            None => self.target.to_string(),
        }
    }
}

/// Poll until `window.location.hash` equals `expected`
pub async fn expect_location_hash<P: TodoPage + ?Sized>(
    page: &P,
    expected: &str,
) -> ProbeResult<()> {
    let waited = wait_for(&page.wait_options(), || page.location_hash(), |hash| {
        hash == expected
    })
    .await?;
    if waited.satisfied {
        Ok(())
    } else {
        Err(ProbeError::assertion(format!(
            "expected location hash {expected:?}, found {:?}",
            waited.value
        )))
    }
}

/// Poll until the stored value under `key` contains every label
pub async fn expect_local_storage_contains<P: TodoPage + ?Sized>(
    page: &P,
    key: &str,
    labels: &[&str],
) -> ProbeResult<()> {
    let waited = wait_for(&page.wait_options(), || page.local_storage(key), |value| {
        value
            .as_deref()
            .is_some_and(|v| labels.iter().all(|label| v.contains(label)))
    })
    .await?;
    if waited.satisfied {
        return Ok(());
    }
    match waited.value {
        None => Err(ProbeError::assertion(format!(
            "expected local storage key {key:?} to be set"
        ))),
        Some(value) => {
            let missing: Vec<&str> = labels
                .iter()
                .copied()
                .filter(|label| !value.contains(label))
                .collect();
            Err(ProbeError::assertion(format!(
                "local storage key {key:?} is missing {missing:?}"
            )))
        }
    }
}

/// Poll until the new-todo input has focus
pub async fn expect_new_todo_input_focused<P: TodoPage + ?Sized>(page: &P) -> ProbeResult<()> {
    let waited = wait_for(
        &page.wait_options(),
        || page.new_todo_input_has_focus(),
        |focused| *focused,
    )
    .await?;
    if waited.satisfied {
        Ok(())
    } else {
        Err(ProbeError::assertion("expected the new todo input to keep focus"))
    }
}

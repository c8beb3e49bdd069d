//! Selectors and query targets for the TodoMVC DOM.
//!
//! A [`Target`] names something a test wants to observe ("the todo labelled
//! X", "every rendered todo", "the counter"). Each target resolves to a
//! [`Selector`], which backends either hand to their native element lookup
//! or turn into a JavaScript expression via [`Selector::to_state_query`].

use serde::{Deserialize, Serialize};

/// CSS selectors for the TodoMVC vanilla JS markup
pub mod selectors {
    /// The new-todo input, matched by its placeholder text
    pub const NEW_TODO: &str = r#"input[placeholder*="What needs to be done?"]"#;
    /// Placeholder text the new-todo input carries
    pub const NEW_TODO_PLACEHOLDER: &str = "What needs to be done?";
    /// Rendered todo items
    pub const TODO_ITEMS: &str = ".todo-list li";
    /// Label inside an item
    pub const ITEM_LABEL: &str = "label";
    /// Completion checkbox inside an item
    pub const ITEM_TOGGLE: &str = "input.toggle";
    /// Delete button inside an item (only visible on hover)
    pub const ITEM_DESTROY: &str = "button.destroy";
    /// Inline editor, once a double-click has focused it
    pub const FOCUSED_EDIT: &str = ".todo-list input.edit:focus";
    /// Complete-all control
    pub const TOGGLE_ALL: &str = ".toggle-all";
    /// Remaining-items counter
    pub const TODO_COUNT: &str = ".todo-count";
    /// Clear-completed button
    pub const CLEAR_COMPLETED: &str = ".clear-completed";
    /// Class the app puts on completed items
    pub const COMPLETED_CLASS: &str = "completed";
}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., ".todo-list li")
    Css(String),
    /// CSS selector narrowed to elements whose text contains `text`
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a CSS selector with a text filter
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// JavaScript expression evaluating to an array of every matching element
    #[must_use]
    pub fn to_elements_query(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({s:?}))"),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?}))"
            ),
        }
    }

    /// JavaScript expression mapping every match to an [`ElementState`]
    ///
    /// Visibility follows the usual layout test: an element is visible when
    /// it occupies space or has client rects.
    #[must_use]
    pub fn to_state_query(&self) -> String {
        format!(
            "{}.map(el => ({{ \
             text: (el.textContent || '').trim(), \
             classes: Array.from(el.classList), \
             visible: !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length) }}))",
            self.to_elements_query()
        )
    }

    /// Human-readable description used in error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Css(s) => s.clone(),
            Self::CssWithText { css, text } => format!("{css} containing {text:?}"),
        }
    }
}

/// Something a scenario can observe on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Rendered todo items whose text contains the given label
    Todo(String),
    /// Every rendered todo item under the active filter
    VisibleTodos,
    /// The remaining-items counter
    ItemsCount,
    /// The clear-completed button
    ClearCompleted,
}

impl Target {
    /// Selector resolving this target
    #[must_use]
    pub fn selector(&self) -> Selector {
        match self {
            Self::Todo(text) => Selector::css_with_text(selectors::TODO_ITEMS, text.clone()),
            Self::VisibleTodos => Selector::css(selectors::TODO_ITEMS),
            Self::ItemsCount => Selector::css(selectors::TODO_COUNT),
            Self::ClearCompleted => Selector::css(selectors::CLEAR_COMPLETED),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Todo(text) => write!(f, "todo {text:?}"),
            Self::VisibleTodos => write!(f, "visible todos"),
            Self::ItemsCount => write!(f, "items count"),
            Self::ClearCompleted => write!(f, "clear completed button"),
        }
    }
}

/// Snapshot of one rendered element, as observed by a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Trimmed text content
    pub text: String,
    /// Class list
    #[serde(default)]
    pub classes: Vec<String>,
    /// Whether the element is rendered visibly
    pub visible: bool,
}

impl ElementState {
    /// Create a visible element with no classes
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            classes: Vec::new(),
            visible: true,
        }
    }

    /// Add a class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Check for a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

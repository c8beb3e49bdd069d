//! The TodoMVC page object.
//!
//! [`TodoPage`] is the single action/query contract every scenario is written
//! against. Each automation backend supplies one implementation; scenarios
//! never see selectors or protocol details.

use crate::config::Backend;
use crate::filter::Filter;
use crate::locator::{ElementState, Target};
use crate::query::Query;
use crate::result::ProbeResult;
use crate::wait::WaitOptions;
use async_trait::async_trait;

/// Semantic actions and observations on a TodoMVC page
///
/// Actions wait (bounded by [`TodoPage::wait_options`]) for the elements they
/// need, then act. Observations are never cached: every call reads the live
/// page.
#[async_trait]
pub trait TodoPage: Send + Sync {
    /// Backend driving this page
    fn backend(&self) -> Backend;

    /// Wait window for actions and expectations
    fn wait_options(&self) -> WaitOptions;

    /// Local storage key the app persists its items under
    fn storage_key(&self) -> &str;

    /// Navigate to the configured base URL
    async fn visit(&mut self) -> ProbeResult<()>;

    /// Type `text` into the new-todo input and press Enter
    async fn add_todo(&self, text: &str) -> ProbeResult<()>;

    /// Click the completion checkbox of the first item matching `text`
    async fn toggle_todo(&self, text: &str) -> ProbeResult<()>;

    /// Click the complete-all control
    async fn toggle_all_todos(&self) -> ProbeResult<()>;

    /// Double-click the item matching `original`, replace its text with
    /// `update`, then press Escape (`escape == true`) or Enter
    async fn edit_todo(&self, original: &str, update: &str, escape: bool) -> ProbeResult<()>;

    /// Force-click the delete control of the item matching `text`
    async fn delete_todo(&self, text: &str) -> ProbeResult<()>;

    /// Click the footer link for `filter`
    async fn filter_todos_by(&self, filter: Filter) -> ProbeResult<()>;

    /// Click the clear-completed button
    async fn clear_completed(&self) -> ProbeResult<()>;

    /// Current state of every element matching `target`
    async fn observe(&self, target: &Target) -> ProbeResult<Vec<ElementState>>;

    /// `window.location.hash`
    async fn location_hash(&self) -> ProbeResult<String>;

    /// Raw local storage value for `key` at the app origin
    async fn local_storage(&self, key: &str) -> ProbeResult<Option<String>>;

    /// Whether the new-todo input is the focused element
    async fn new_todo_input_has_focus(&self) -> ProbeResult<bool>;

    /// Open a new tab in the same browser context and switch to it
    ///
    /// The new tab starts blank; call [`TodoPage::visit`] to load the app.
    async fn open_new_tab(&mut self) -> ProbeResult<()>;

    /// Navigate to the app and wipe its origin storage
    async fn clear_storage(&mut self) -> ProbeResult<()>;

    /// Release the page and any tabs it opened
    async fn close(&mut self) -> ProbeResult<()>;

    /// Deferred handle to the item(s) whose text contains `text`
    fn get_todo(&self, text: &str) -> Query<'_, Self> {
        Query::new(self, Target::Todo(text.to_string()))
    }

    /// Deferred handle to the items rendered under the active filter
    fn get_visible_todos(&self) -> Query<'_, Self> {
        Query::new(self, Target::VisibleTodos)
    }

    /// Deferred handle to the remaining-items counter
    fn get_items_count_container(&self) -> Query<'_, Self> {
        Query::new(self, Target::ItemsCount)
    }

    /// Deferred handle to the clear-completed button
    fn get_clear_completed_button(&self) -> Query<'_, Self> {
        Query::new(self, Target::ClearCompleted)
    }
}

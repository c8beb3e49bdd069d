//! In-process TodoMVC.
//!
//! [`TodoAppModel`] reproduces the observable behaviour of the vanilla JS
//! app: what gets rendered, the counter wording, hash routing, focus and what
//! lands in local storage. [`MemoryTodoPage`] drives it through the
//! [`TodoPage`] contract so the scenario suite can run without a browser.
//!
//! [`AppDefect`]s switch individual behaviours off, which lets the crate's
//! own tests prove that each scenario actually catches the bug it targets.

use crate::config::{Backend, ProbeConfig};
use crate::filter::Filter;
use crate::harness::PageFactory;
use crate::locator::{selectors, ElementState, Target};
use crate::page::TodoPage;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::WaitOptions;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Wait window for the in-process backend; its state never changes between polls
pub const MEMORY_TIMEOUT_MS: u64 = 200;

/// Poll interval for the in-process backend
pub const MEMORY_POLL_INTERVAL_MS: u64 = 10;

/// Origin storage shared by every tab of one simulated browser
pub type SharedStorage = Arc<Mutex<HashMap<String, String>>>;

/// Deliberate misbehaviour injected into [`TodoAppModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppDefect {
    /// Blank input creates an item
    AcceptsBlankTodos,
    /// Counter always says "items", even for one
    AlwaysPluralCounter,
    /// Counter reports one more item than is left
    CounterOffByOne,
    /// Escape commits the edit instead of discarding it
    EscapeCommitsEdit,
    /// Enter leaves a non-blank edit uncommitted
    EnterDiscardsEdit,
    /// Editing to blank keeps an empty item
    KeepsBlankEdits,
    /// Nothing is written to local storage
    SkipsPersistence,
    /// Route changes but the list is not filtered
    FilterIgnored,
    /// Complete-all never un-completes
    ToggleAllNeverClears,
    /// Complete-all flips each item instead of completing them all
    ToggleAllFlipsEach,
    /// The delete control does nothing
    DeleteIgnored,
    /// Adding a todo blurs the input
    DropsInputFocus,
}

/// One todo as the app persists it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Stable identifier
    pub id: u64,
    /// Label
    pub title: String,
    /// Completion state
    pub completed: bool,
}

/// State of one loaded TodoMVC document
#[derive(Debug, Clone, Default)]
pub struct TodoAppModel {
    items: Vec<TodoItem>,
    next_id: u64,
    route: Filter,
    input_focused: bool,
    defects: HashSet<AppDefect>,
}

impl TodoAppModel {
    /// Fresh document with no items
    #[must_use]
    pub fn new(defects: impl IntoIterator<Item = AppDefect>) -> Self {
        Self {
            input_focused: true,
            defects: defects.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Document booted from a stored value; unreadable storage starts empty
    #[must_use]
    pub fn load(stored: Option<&str>, defects: impl IntoIterator<Item = AppDefect>) -> Self {
        let mut model = Self::new(defects);
        if let Some(json) = stored {
            match serde_json::from_str::<Vec<TodoItem>>(json) {
                Ok(items) => {
                    model.next_id = items.iter().map(|i| i.id + 1).max().unwrap_or(0);
                    model.items = items;
                }
                Err(e) => tracing::warn!(error = %e, "ignoring unreadable stored todos"),
            }
        }
        model
    }

    fn has(&self, defect: AppDefect) -> bool {
        self.defects.contains(&defect)
    }

    /// Every item, regardless of route
    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Active route
    #[must_use]
    pub const fn route(&self) -> Filter {
        self.route
    }

    /// Items rendered under the active route
    #[must_use]
    pub fn visible_items(&self) -> Vec<&TodoItem> {
        let route = if self.has(AppDefect::FilterIgnored) {
            Filter::All
        } else {
            self.route
        };
        self.items
            .iter()
            .filter(|item| route.matches(item.completed))
            .collect()
    }

    /// Number of incomplete items
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }

    /// Counter text, e.g. "1 item left"
    #[must_use]
    pub fn counter_text(&self) -> String {
        let mut count = self.active_count();
        if self.has(AppDefect::CounterOffByOne) {
            count += 1;
        }
        let noun = if count == 1 && !self.has(AppDefect::AlwaysPluralCounter) {
            "item"
        } else {
            "items"
        };
        format!("{count} {noun} left")
    }

    /// Whether the new-todo input has focus
    #[must_use]
    pub const fn input_focused(&self) -> bool {
        self.input_focused
    }

    /// Submit the new-todo input; returns whether an item was created
    pub fn add(&mut self, text: &str) -> bool {
        let title = text.trim();
        self.input_focused = !self.has(AppDefect::DropsInputFocus);
        if title.is_empty() && !self.has(AppDefect::AcceptsBlankTodos) {
            return false;
        }
        self.items.push(TodoItem {
            id: self.next_id,
            title: title.to_string(),
            completed: false,
        });
        self.next_id += 1;
        true
    }

    fn find_visible(&self, text: &str) -> Option<u64> {
        self.visible_items()
            .into_iter()
            .find(|item| item.title.contains(text))
            .map(|item| item.id)
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Click the checkbox of the first rendered item containing `text`
    pub fn toggle(&mut self, text: &str) -> bool {
        self.input_focused = false;
        let Some(index) = self.find_visible(text).and_then(|id| self.position(id)) else {
            return false;
        };
        self.items[index].completed = !self.items[index].completed;
        true
    }

    /// Click complete-all; returns false when there is nothing to toggle
    pub fn toggle_all(&mut self) -> bool {
        self.input_focused = false;
        if self.items.is_empty() {
            return false;
        }
        if self.has(AppDefect::ToggleAllFlipsEach) {
            for item in &mut self.items {
                item.completed = !item.completed;
            }
            return true;
        }
        let complete = self.has(AppDefect::ToggleAllNeverClears)
            || self.items.iter().any(|item| !item.completed);
        for item in &mut self.items {
            item.completed = complete;
        }
        true
    }

    /// Double-click, retype and commit (Enter) or discard (Escape)
    pub fn edit(&mut self, original: &str, update: &str, escape: bool) -> bool {
        self.input_focused = false;
        let Some(index) = self.find_visible(original).and_then(|id| self.position(id)) else {
            return false;
        };
        if escape && !self.has(AppDefect::EscapeCommitsEdit) {
            return true;
        }
        let title = update.trim();
        if title.is_empty() && !self.has(AppDefect::KeepsBlankEdits) {
            self.items.remove(index);
        } else if !escape && self.has(AppDefect::EnterDiscardsEdit) {
            return true;
        } else {
            self.items[index].title = title.to_string();
        }
        true
    }

    /// Click the delete control of the first rendered item containing `text`
    pub fn destroy(&mut self, text: &str) -> bool {
        self.input_focused = false;
        let Some(index) = self.find_visible(text).and_then(|id| self.position(id)) else {
            return false;
        };
        if !self.has(AppDefect::DeleteIgnored) {
            self.items.remove(index);
        }
        true
    }

    /// Click clear-completed; returns false when the button is hidden
    pub fn clear_completed(&mut self) -> bool {
        self.input_focused = false;
        if !self.items.iter().any(|item| item.completed) {
            return false;
        }
        self.items.retain(|item| !item.completed);
        true
    }

    /// Follow a footer link
    pub fn set_route(&mut self, filter: Filter) {
        self.input_focused = false;
        self.route = filter;
    }

    /// Elements the real DOM would show for `target`
    #[must_use]
    pub fn render(&self, target: &Target) -> Vec<ElementState> {
        let item_state = |item: &TodoItem| {
            let state = ElementState::new(item.title.clone());
            if item.completed {
                state.with_class(selectors::COMPLETED_CLASS)
            } else {
                state
            }
        };
        match target {
            Target::Todo(text) => self
                .visible_items()
                .into_iter()
                .filter(|item| item.title.contains(text.as_str()))
                .map(item_state)
                .collect(),
            Target::VisibleTodos => self.visible_items().into_iter().map(item_state).collect(),
            Target::ItemsCount => {
                vec![ElementState::new(self.counter_text()).with_visible(!self.items.is_empty())]
            }
            Target::ClearCompleted => {
                let any_completed = self.items.iter().any(|item| item.completed);
                vec![ElementState::new("Clear completed").with_visible(any_completed)]
            }
        }
    }

    /// Serialized value the app writes to local storage, unless persistence is broken
    pub fn to_storage(&self) -> ProbeResult<Option<String>> {
        if self.has(AppDefect::SkipsPersistence) {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string(&self.items)?))
    }
}

/// [`TodoPage`] backed by [`TodoAppModel`]
#[derive(Debug)]
pub struct MemoryTodoPage {
    base_url: String,
    storage_key: String,
    wait: WaitOptions,
    storage: SharedStorage,
    app: Mutex<Option<TodoAppModel>>,
    defects: Vec<AppDefect>,
    tabs_opened: usize,
}

impl MemoryTodoPage {
    /// Blank tab with its own empty storage
    #[must_use]
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            storage_key: config.storage_key.clone(),
            wait: WaitOptions::new()
                .with_timeout(MEMORY_TIMEOUT_MS)
                .with_poll_interval(MEMORY_POLL_INTERVAL_MS),
            storage: SharedStorage::default(),
            app: Mutex::new(None),
            defects: Vec::new(),
            tabs_opened: 1,
        }
    }

    /// Inject a defect into every document this page loads
    #[must_use]
    pub fn with_defect(mut self, defect: AppDefect) -> Self {
        self.defects.push(defect);
        self
    }

    /// Share origin storage with other pages
    #[must_use]
    pub fn with_storage(mut self, storage: SharedStorage) -> Self {
        self.storage = storage;
        self
    }

    /// Handle to this page's origin storage
    #[must_use]
    pub fn storage(&self) -> SharedStorage {
        Arc::clone(&self.storage)
    }

    /// Number of tabs opened so far, including the first
    #[must_use]
    pub const fn tabs_opened(&self) -> usize {
        self.tabs_opened
    }

    async fn with_app<R>(
        &self,
        action: &str,
        f: impl FnOnce(&mut TodoAppModel) -> ProbeResult<R> + Send,
    ) -> ProbeResult<R> {
        let mut guard = self.app.lock().await;
        let app = guard
            .as_mut()
            .ok_or_else(|| ProbeError::action(action, "page has not been visited"))?;
        let result = f(app)?;
        if let Some(json) = app.to_storage()? {
            self.storage
                .lock()
                .await
                .insert(self.storage_key.clone(), json);
        }
        Ok(result)
    }
}

/// Hands out [`MemoryTodoPage`]s, each with its own empty storage
#[derive(Debug, Clone)]
pub struct MemoryPages {
    config: ProbeConfig,
    defects: Vec<AppDefect>,
}

impl MemoryPages {
    /// Factory for defect-free pages
    #[must_use]
    pub const fn new(config: ProbeConfig) -> Self {
        Self {
            config,
            defects: Vec::new(),
        }
    }

    /// Inject a defect into every page
    #[must_use]
    pub fn with_defect(mut self, defect: AppDefect) -> Self {
        self.defects.push(defect);
        self
    }
}

#[async_trait]
impl PageFactory for MemoryPages {
    type Page = MemoryTodoPage;

    fn backend(&self) -> Backend {
        Backend::Memory
    }

    async fn open(&self) -> ProbeResult<MemoryTodoPage> {
        Ok(self
            .defects
            .iter()
            .fold(MemoryTodoPage::new(&self.config), |page, defect| {
                page.with_defect(*defect)
            }))
    }
}

fn not_found(selector: impl Into<String>) -> ProbeError {
    ProbeError::ElementNotFound {
        selector: selector.into(),
        waited_ms: 0,
    }
}

fn item_selector(text: &str) -> String {
    Target::Todo(text.to_string()).selector().describe()
}

#[async_trait]
impl TodoPage for MemoryTodoPage {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    fn wait_options(&self) -> WaitOptions {
        self.wait
    }

    fn storage_key(&self) -> &str {
        &self.storage_key
    }

    async fn visit(&mut self) -> ProbeResult<()> {
        tracing::debug!(backend = "memory", url = %self.base_url, "visit");
        let stored = self.storage.lock().await.get(&self.storage_key).cloned();
        let model = TodoAppModel::load(stored.as_deref(), self.defects.iter().copied());
        *self.app.lock().await = Some(model);
        Ok(())
    }

    async fn add_todo(&self, text: &str) -> ProbeResult<()> {
        tracing::debug!(backend = "memory", text, "add_todo");
        self.with_app("add_todo", |app| {
            app.add(text);
            Ok(())
        })
        .await
    }

    async fn toggle_todo(&self, text: &str) -> ProbeResult<()> {
        tracing::debug!(backend = "memory", text, "toggle_todo");
        self.with_app("toggle_todo", |app| {
            app.toggle(text)
                .then_some(())
                .ok_or_else(|| not_found(item_selector(text)))
        })
        .await
    }

    async fn toggle_all_todos(&self) -> ProbeResult<()> {
        tracing::debug!(backend = "memory", "toggle_all_todos");
        self.with_app("toggle_all_todos", |app| {
            app.toggle_all()
                .then_some(())
                .ok_or_else(|| not_found(selectors::TOGGLE_ALL))
        })
        .await
    }

    async fn edit_todo(&self, original: &str, update: &str, escape: bool) -> ProbeResult<()> {
        tracing::debug!(backend = "memory", original, update, escape, "edit_todo");
        self.with_app("edit_todo", |app| {
            app.edit(original, update, escape)
                .then_some(())
                .ok_or_else(|| not_found(item_selector(original)))
        })
        .await
    }

    async fn delete_todo(&self, text: &str) -> ProbeResult<()> {
        tracing::debug!(backend = "memory", text, "delete_todo");
        self.with_app("delete_todo", |app| {
            app.destroy(text)
                .then_some(())
                .ok_or_else(|| not_found(item_selector(text)))
        })
        .await
    }

    async fn filter_todos_by(&self, filter: Filter) -> ProbeResult<()> {
        tracing::debug!(backend = "memory", %filter, "filter_todos_by");
        self.with_app("filter_todos_by", |app| {
            app.set_route(filter);
            Ok(())
        })
        .await
    }

    async fn clear_completed(&self) -> ProbeResult<()> {
        tracing::debug!(backend = "memory", "clear_completed");
        self.with_app("clear_completed", |app| {
            if app.clear_completed() {
                Ok(())
            } else {
                Err(ProbeError::action(
                    "clear_completed",
                    "clear completed button is not visible",
                ))
            }
        })
        .await
    }

    async fn observe(&self, target: &Target) -> ProbeResult<Vec<ElementState>> {
        Ok(self
            .app
            .lock()
            .await
            .as_ref()
            .map(|app| app.render(target))
            .unwrap_or_default())
    }

    async fn location_hash(&self) -> ProbeResult<String> {
        Ok(self
            .app
            .lock()
            .await
            .as_ref()
            .map(|app| app.route().hash().to_string())
            .unwrap_or_default())
    }

    async fn local_storage(&self, key: &str) -> ProbeResult<Option<String>> {
        Ok(self.storage.lock().await.get(key).cloned())
    }

    async fn new_todo_input_has_focus(&self) -> ProbeResult<bool> {
        Ok(self
            .app
            .lock()
            .await
            .as_ref()
            .is_some_and(TodoAppModel::input_focused))
    }

    async fn open_new_tab(&mut self) -> ProbeResult<()> {
        tracing::debug!(backend = "memory", "open_new_tab");
        self.tabs_opened += 1;
        *self.app.lock().await = None;
        Ok(())
    }

    async fn clear_storage(&mut self) -> ProbeResult<()> {
        self.visit().await?;
        self.storage.lock().await.clear();
        self.visit().await
    }

    async fn close(&mut self) -> ProbeResult<()> {
        *self.app.lock().await = None;
        Ok(())
    }
}

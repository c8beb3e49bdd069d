//! Chrome DevTools Protocol backend (feature `browser`).
//!
//! A [`CdpSession`] owns one Chromium process. Every [`CdpTodoPage`] it hands
//! out is a separate tab in that browser, so pages opened from the same
//! session share origin storage the way real tabs do.

use crate::config::{Backend, ProbeConfig};
use crate::filter::Filter;
use crate::harness::PageFactory;
use crate::locator::{selectors, ElementState, Target};
use crate::page::TodoPage;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{wait_for_element, WaitOptions};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;

const CLICK_JS: &str = "function() { this.click(); }";
const DBLCLICK_JS: &str =
    "function() { this.dispatchEvent(new MouseEvent('dblclick', { bubbles: true, cancelable: true })); }";
const CLEAR_VALUE_JS: &str = "function() { this.value = ''; }";

/// Running Chromium instance
#[derive(Debug)]
pub struct CdpSession {
    config: ProbeConfig,
    inner: Arc<Mutex<CdpBrowser>>,
    handle: tokio::task::JoinHandle<()>,
}

impl CdpSession {
    /// Launch Chromium according to `config`
    pub async fn launch(config: &ProbeConfig) -> ProbeResult<Self> {
        let mut builder = CdpConfig::builder();

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .no_sandbox()
            .build()
            .map_err(|message| ProbeError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::info!(headless = config.headless, "chromium launched");

        Ok(Self {
            config: config.clone(),
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Open a blank tab wrapped in the page object
    pub async fn new_page(&self) -> ProbeResult<CdpTodoPage> {
        let page = open_tab(&self.inner).await?;
        Ok(CdpTodoPage {
            browser: Arc::clone(&self.inner),
            page,
            background_tabs: Vec::new(),
            base_url: self.config.base_url.clone(),
            storage_key: self.config.storage_key.clone(),
            wait: self.config.wait_options(),
        })
    }

    /// Shut the browser down
    pub async fn close(self) -> ProbeResult<()> {
        {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            let _ = browser.wait().await;
        }
        self.handle.abort();
        Ok(())
    }
}

#[async_trait]
impl PageFactory for CdpSession {
    type Page = CdpTodoPage;

    fn backend(&self) -> Backend {
        Backend::Cdp
    }

    async fn open(&self) -> ProbeResult<CdpTodoPage> {
        self.new_page().await
    }
}

async fn open_tab(browser: &Mutex<CdpBrowser>) -> ProbeResult<CdpPage> {
    browser
        .lock()
        .await
        .new_page("about:blank")
        .await
        .map_err(|e| ProbeError::Navigation {
            url: "about:blank".to_string(),
            message: e.to_string(),
        })
}

/// [`TodoPage`] driving one Chromium tab
#[derive(Debug)]
pub struct CdpTodoPage {
    browser: Arc<Mutex<CdpBrowser>>,
    page: CdpPage,
    background_tabs: Vec<CdpPage>,
    base_url: String,
    storage_key: String,
    wait: WaitOptions,
}

impl CdpTodoPage {
    async fn eval<T: DeserializeOwned>(&self, expression: &str) -> ProbeResult<T> {
        self.page
            .evaluate(expression)
            .await
            .map_err(ProbeError::script)?
            .into_value()
            .map_err(ProbeError::script)
    }

    async fn first(&self, selector: &str) -> ProbeResult<Option<Element>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(ProbeError::script)?;
        Ok(elements.into_iter().next())
    }

    async fn item_matching(&self, text: &str) -> ProbeResult<Option<Element>> {
        let items = self
            .page
            .find_elements(selectors::TODO_ITEMS)
            .await
            .map_err(ProbeError::script)?;
        for item in items {
            let content = item
                .inner_text()
                .await
                .map_err(ProbeError::script)?
                .unwrap_or_default();
            if content.contains(text) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    async fn wait_first(&self, selector: &str) -> ProbeResult<Element> {
        wait_for_element(&self.wait, selector, || self.first(selector)).await
    }

    async fn wait_item(&self, text: &str) -> ProbeResult<Element> {
        let description = Target::Todo(text.to_string()).selector().describe();
        wait_for_element(&self.wait, &description, || self.item_matching(text)).await
    }

    async fn call(element: &Element, action: &str, function: &str) -> ProbeResult<()> {
        element
            .call_js_fn(function, false)
            .await
            .map_err(|e| ProbeError::action(action, e))?;
        Ok(())
    }
}

#[async_trait]
impl TodoPage for CdpTodoPage {
    fn backend(&self) -> Backend {
        Backend::Cdp
    }

    fn wait_options(&self) -> WaitOptions {
        self.wait
    }

    fn storage_key(&self) -> &str {
        &self.storage_key
    }

    async fn visit(&mut self) -> ProbeResult<()> {
        tracing::debug!(backend = "cdp", url = %self.base_url, "visit");
        self.page
            .goto(self.base_url.as_str())
            .await
            .map_err(|e| ProbeError::Navigation {
                url: self.base_url.clone(),
                message: e.to_string(),
            })?;
        self.wait_first(selectors::NEW_TODO).await?;
        Ok(())
    }

    async fn add_todo(&self, text: &str) -> ProbeResult<()> {
        tracing::debug!(backend = "cdp", text, "add_todo");
        let input = self.wait_first(selectors::NEW_TODO).await?;
        input
            .focus()
            .await
            .map_err(|e| ProbeError::action("add_todo", e))?;
        if !text.is_empty() {
            input
                .type_str(text)
                .await
                .map_err(|e| ProbeError::action("add_todo", e))?;
        }
        input
            .press_key("Enter")
            .await
            .map_err(|e| ProbeError::action("add_todo", e))?;
        Ok(())
    }

    async fn toggle_todo(&self, text: &str) -> ProbeResult<()> {
        tracing::debug!(backend = "cdp", text, "toggle_todo");
        let item = self.wait_item(text).await?;
        let toggle = item
            .find_element(selectors::ITEM_TOGGLE)
            .await
            .map_err(|e| ProbeError::action("toggle_todo", e))?;
        toggle
            .click()
            .await
            .map_err(|e| ProbeError::action("toggle_todo", e))?;
        Ok(())
    }

    async fn toggle_all_todos(&self) -> ProbeResult<()> {
        tracing::debug!(backend = "cdp", "toggle_all_todos");
        // The checkbox is visually hidden behind its label.
        let toggle_all = self.wait_first(selectors::TOGGLE_ALL).await?;
        Self::call(&toggle_all, "toggle_all_todos", CLICK_JS).await
    }

    async fn edit_todo(&self, original: &str, update: &str, escape: bool) -> ProbeResult<()> {
        tracing::debug!(backend = "cdp", original, update, escape, "edit_todo");
        let item = self.wait_item(original).await?;
        let label = item
            .find_element(selectors::ITEM_LABEL)
            .await
            .map_err(|e| ProbeError::action("edit_todo", e))?;
        Self::call(&label, "edit_todo", DBLCLICK_JS).await?;

        let editor = self.wait_first(selectors::FOCUSED_EDIT).await?;
        Self::call(&editor, "edit_todo", CLEAR_VALUE_JS).await?;
        if !update.is_empty() {
            editor
                .type_str(update)
                .await
                .map_err(|e| ProbeError::action("edit_todo", e))?;
        }
        editor
            .press_key(if escape { "Escape" } else { "Enter" })
            .await
            .map_err(|e| ProbeError::action("edit_todo", e))?;
        Ok(())
    }

    async fn delete_todo(&self, text: &str) -> ProbeResult<()> {
        tracing::debug!(backend = "cdp", text, "delete_todo");
        let item = self.wait_item(text).await?;
        let destroy = item
            .find_element(selectors::ITEM_DESTROY)
            .await
            .map_err(|e| ProbeError::action("delete_todo", e))?;
        // Only displayed on hover.
        Self::call(&destroy, "delete_todo", CLICK_JS).await
    }

    async fn filter_todos_by(&self, filter: Filter) -> ProbeResult<()> {
        tracing::debug!(backend = "cdp", %filter, "filter_todos_by");
        let link = self.wait_first(&filter.link_selector()).await?;
        link.click()
            .await
            .map_err(|e| ProbeError::action("filter_todos_by", e))?;
        Ok(())
    }

    async fn clear_completed(&self) -> ProbeResult<()> {
        tracing::debug!(backend = "cdp", "clear_completed");
        let button = self.wait_first(selectors::CLEAR_COMPLETED).await?;
        button
            .click()
            .await
            .map_err(|e| ProbeError::action("clear_completed", e))?;
        Ok(())
    }

    async fn observe(&self, target: &Target) -> ProbeResult<Vec<ElementState>> {
        self.eval(&target.selector().to_state_query()).await
    }

    async fn location_hash(&self) -> ProbeResult<String> {
        self.eval("window.location.hash").await
    }

    async fn local_storage(&self, key: &str) -> ProbeResult<Option<String>> {
        // null does not survive returnByValue, so serialize on the page side
        let raw: String = self
            .eval(&format!(
                "JSON.stringify(window.localStorage.getItem({key:?}))"
            ))
            .await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn new_todo_input_has_focus(&self) -> ProbeResult<bool> {
        self.eval(&format!(
            "document.activeElement === document.querySelector({:?})",
            selectors::NEW_TODO
        ))
        .await
    }

    async fn open_new_tab(&mut self) -> ProbeResult<()> {
        tracing::debug!(backend = "cdp", "open_new_tab");
        let tab = open_tab(&self.browser).await?;
        let previous = std::mem::replace(&mut self.page, tab);
        self.background_tabs.push(previous);
        Ok(())
    }

    async fn clear_storage(&mut self) -> ProbeResult<()> {
        self.visit().await?;
        self.page
            .evaluate("window.localStorage.clear()")
            .await
            .map_err(ProbeError::script)?;
        Ok(())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        for tab in self.background_tabs.drain(..) {
            tab.close().await.map_err(ProbeError::script)?;
        }
        self.page.clone().close().await.map_err(ProbeError::script)?;
        Ok(())
    }
}

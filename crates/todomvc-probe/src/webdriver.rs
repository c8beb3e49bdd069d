//! W3C WebDriver backend (feature `webdriver`).
//!
//! Each [`WebDriverTodoPage`] is one WebDriver session against the server at
//! [`ProbeConfig::webdriver_url`] (chromedriver, geckodriver or a Selenium
//! grid).

use crate::config::{Backend, ProbeConfig};
use crate::filter::Filter;
use crate::harness::PageFactory;
use crate::locator::{selectors, ElementState, Target};
use crate::page::TodoPage;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{wait_for_element, WaitOptions};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::key::Key;
use fantoccini::{Client, ClientBuilder, Locator};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

const CLICK_JS: &str = "arguments[0].click();";
const DBLCLICK_JS: &str =
    "arguments[0].dispatchEvent(new MouseEvent('dblclick', { bubbles: true, cancelable: true }));";

/// [`TodoPage`] driving one WebDriver session
#[derive(Debug)]
pub struct WebDriverTodoPage {
    client: Client,
    base_url: String,
    storage_key: String,
    wait: WaitOptions,
    closed: bool,
}

impl WebDriverTodoPage {
    /// Start a session on the configured WebDriver server
    pub async fn connect(config: &ProbeConfig) -> ProbeResult<Self> {
        let client = ClientBuilder::native()
            .capabilities(capabilities(config))
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| ProbeError::Connection {
                endpoint: config.webdriver_url.clone(),
                message: e.to_string(),
            })?;

        tracing::info!(endpoint = %config.webdriver_url, "webdriver session started");

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            storage_key: config.storage_key.clone(),
            wait: config.wait_options(),
            closed: false,
        })
    }

    async fn execute<T: DeserializeOwned>(&self, script: &str, args: Vec<Value>) -> ProbeResult<T> {
        let value = self
            .client
            .execute(script, args)
            .await
            .map_err(ProbeError::script)?;
        Ok(serde_json::from_value(value)?)
    }

    async fn execute_on(&self, element: &Element, action: &str, script: &str) -> ProbeResult<()> {
        let arg = serde_json::to_value(element)?;
        self.client
            .execute(script, vec![arg])
            .await
            .map_err(|e| ProbeError::action(action, e))?;
        Ok(())
    }

    async fn first(&self, selector: &str) -> ProbeResult<Option<Element>> {
        let elements = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .map_err(ProbeError::script)?;
        Ok(elements.into_iter().next())
    }

    async fn item_matching(&self, text: &str) -> ProbeResult<Option<Element>> {
        let items = self
            .client
            .find_all(Locator::Css(selectors::TODO_ITEMS))
            .await
            .map_err(ProbeError::script)?;
        for item in items {
            let content = item.text().await.map_err(ProbeError::script)?;
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
}

/// Opens a new WebDriver session per page
#[derive(Debug, Clone)]
pub struct WebDriverPages {
    config: ProbeConfig,
}

impl WebDriverPages {
    /// Factory for sessions on `config.webdriver_url`
    #[must_use]
    pub const fn new(config: ProbeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PageFactory for WebDriverPages {
    type Page = WebDriverTodoPage;

    fn backend(&self) -> Backend {
        Backend::WebDriver
    }

    async fn open(&self) -> ProbeResult<WebDriverTodoPage> {
        WebDriverTodoPage::connect(&self.config).await
    }
}

fn capabilities(config: &ProbeConfig) -> serde_json::Map<String, Value> {
    let mut args = vec!["--no-sandbox", "--disable-dev-shm-usage"];
    if config.headless {
        args.push("--headless=new");
    }
    let mut caps = serde_json::Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

#[async_trait]
impl TodoPage for WebDriverTodoPage {
    fn backend(&self) -> Backend {
        Backend::WebDriver
    }

    fn wait_options(&self) -> WaitOptions {
        self.wait
    }

    fn storage_key(&self) -> &str {
        &self.storage_key
    }

    async fn visit(&mut self) -> ProbeResult<()> {
        tracing::debug!(backend = "webdriver", url = %self.base_url, "visit");
        self.client
            .goto(&self.base_url)
            .await
            .map_err(|e| ProbeError::Navigation {
                url: self.base_url.clone(),
                message: e.to_string(),
            })?;
        self.wait_first(selectors::NEW_TODO).await?;
        Ok(())
    }

    async fn add_todo(&self, text: &str) -> ProbeResult<()> {
        tracing::debug!(backend = "webdriver", text, "add_todo");
        let input = self.wait_first(selectors::NEW_TODO).await?;
        input
            .send_keys(&format!("{text}{}", char::from(Key::Enter)))
            .await
            .map_err(|e| ProbeError::action("add_todo", e))?;
        Ok(())
    }

    async fn toggle_todo(&self, text: &str) -> ProbeResult<()> {
        tracing::debug!(backend = "webdriver", text, "toggle_todo");
        let item = self.wait_item(text).await?;
        let toggle = item
            .find(Locator::Css(selectors::ITEM_TOGGLE))
            .await
            .map_err(|e| ProbeError::action("toggle_todo", e))?;
        toggle
            .click()
            .await
            .map_err(|e| ProbeError::action("toggle_todo", e))?;
        Ok(())
    }

    async fn toggle_all_todos(&self) -> ProbeResult<()> {
        tracing::debug!(backend = "webdriver", "toggle_all_todos");
        // The checkbox is visually hidden behind its label.
        let toggle_all = self.wait_first(selectors::TOGGLE_ALL).await?;
        self.execute_on(&toggle_all, "toggle_all_todos", CLICK_JS)
            .await
    }

    async fn edit_todo(&self, original: &str, update: &str, escape: bool) -> ProbeResult<()> {
        tracing::debug!(backend = "webdriver", original, update, escape, "edit_todo");
        let item = self.wait_item(original).await?;
        let label = item
            .find(Locator::Css(selectors::ITEM_LABEL))
            .await
            .map_err(|e| ProbeError::action("edit_todo", e))?;
        self.execute_on(&label, "edit_todo", DBLCLICK_JS).await?;

        let editor = self.wait_first(selectors::FOCUSED_EDIT).await?;
        editor
            .clear()
            .await
            .map_err(|e| ProbeError::action("edit_todo", e))?;
        let key = if escape { Key::Escape } else { Key::Enter };
        editor
            .send_keys(&format!("{update}{}", char::from(key)))
            .await
            .map_err(|e| ProbeError::action("edit_todo", e))?;
        Ok(())
    }

    async fn delete_todo(&self, text: &str) -> ProbeResult<()> {
        tracing::debug!(backend = "webdriver", text, "delete_todo");
        let item = self.wait_item(text).await?;
        let destroy = item
            .find(Locator::Css(selectors::ITEM_DESTROY))
            .await
            .map_err(|e| ProbeError::action("delete_todo", e))?;
        // Only displayed on hover.
        self.execute_on(&destroy, "delete_todo", CLICK_JS).await
    }

    async fn filter_todos_by(&self, filter: Filter) -> ProbeResult<()> {
        tracing::debug!(backend = "webdriver", %filter, "filter_todos_by");
        let link = self.wait_first(&filter.link_selector()).await?;
        link.click()
            .await
            .map_err(|e| ProbeError::action("filter_todos_by", e))?;
        Ok(())
    }

    async fn clear_completed(&self) -> ProbeResult<()> {
        tracing::debug!(backend = "webdriver", "clear_completed");
        let button = self.wait_first(selectors::CLEAR_COMPLETED).await?;
        button
            .click()
            .await
            .map_err(|e| ProbeError::action("clear_completed", e))?;
        Ok(())
    }

    async fn observe(&self, target: &Target) -> ProbeResult<Vec<ElementState>> {
        let script = format!("return {};", target.selector().to_state_query());
        self.execute(&script, Vec::new()).await
    }

    async fn location_hash(&self) -> ProbeResult<String> {
        self.execute("return window.location.hash;", Vec::new())
            .await
    }

    async fn local_storage(&self, key: &str) -> ProbeResult<Option<String>> {
        self.execute(
            "return window.localStorage.getItem(arguments[0]);",
            vec![json!(key)],
        )
        .await
    }

    async fn new_todo_input_has_focus(&self) -> ProbeResult<bool> {
        self.execute(
            "return document.activeElement === document.querySelector(arguments[0]);",
            vec![json!(selectors::NEW_TODO)],
        )
        .await
    }

    async fn open_new_tab(&mut self) -> ProbeResult<()> {
        tracing::debug!(backend = "webdriver", "open_new_tab");
        let window = self
            .client
            .new_window(true)
            .await
            .map_err(|e| ProbeError::action("open_new_tab", e))?;
        self.client
            .switch_to_window(window.handle)
            .await
            .map_err(|e| ProbeError::action("open_new_tab", e))?;
        Ok(())
    }

    async fn clear_storage(&mut self) -> ProbeResult<()> {
        self.visit().await?;
        self.client
            .execute("window.localStorage.clear();", Vec::new())
            .await
            .map_err(ProbeError::script)?;
        Ok(())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.client
            .clone()
            .close()
            .await
            .map_err(ProbeError::script)?;
        Ok(())
    }
}

//! Real browser session over the Chrome `DevTools` Protocol.
//!
//! With the `browser` feature, [`CdpDriver`] launches Chromium through
//! chromiumoxide and implements [`crate::UiDriver`] against one tab.
//! Element handles are ids into a registry of remote element references.
//! A node found again keeps its handle. Entries unseen for a few document
//! lookups are evicted; navigation drops them all.

use crate::config::BrowserOptions;
use crate::driver::ElementHandle;
use std::collections::HashMap;
use std::hash::Hash;
use uuid::Uuid;

/// Document lookups an unseen element survives before eviction
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
const RETAINED_LOOKUPS: u64 = 8;

/// Browser launch configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Window width
    pub viewport_width: u32,
    /// Window height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 900,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

impl From<&BrowserOptions> for BrowserConfig {
    fn from(options: &BrowserOptions) -> Self {
        let mut config = Self::default().with_headless(options.headless);
        if let Some(path) = &options.chromium_path {
            config = config.with_chromium_path(path.to_string_lossy());
        }
        if options.no_sandbox {
            config = config.with_no_sandbox();
        }
        config
    }
}

// ============================================================================
// Element registry
// ============================================================================

#[derive(Debug)]
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
struct Entry<K, E> {
    node: K,
    element: E,
    seen: u64,
}

/// Handle ids for remote elements, deduplicated by DOM node.
///
/// Every document-level lookup opens a new epoch. An element found again
/// keeps its handle id and is refreshed to the current epoch; elements not
/// seen for `RETAINED_LOOKUPS` epochs are dropped, which releases their
/// remote object references.
#[derive(Debug)]
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
pub(crate) struct ElementRegistry<K, E> {
    epoch: u64,
    entries: HashMap<String, Entry<K, E>>,
    by_node: HashMap<K, String>,
}

impl<K, E> Default for ElementRegistry<K, E> {
    fn default() -> Self {
        Self {
            epoch: 0,
            entries: HashMap::new(),
            by_node: HashMap::new(),
        }
    }
}

#[cfg_attr(not(feature = "browser"), allow(dead_code))]
impl<K: Copy + Eq + Hash, E> ElementRegistry<K, E> {
    /// Start a document-level lookup and evict entries that aged out
    pub(crate) fn begin_lookup(&mut self) {
        self.epoch += 1;
        let oldest = self.epoch.saturating_sub(RETAINED_LOOKUPS);
        self.entries.retain(|_, entry| entry.seen >= oldest);
        let entries = &self.entries;
        self.by_node.retain(|_, id| entries.contains_key(id));
    }

    /// Register an element, reusing the handle already issued for its node
    pub(crate) fn insert(&mut self, node: K, element: E) -> ElementHandle {
        let epoch = self.epoch;
        if let Some(id) = self.by_node.get(&node) {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.element = element;
                entry.seen = epoch;
                return ElementHandle::new(id.clone());
            }
        }
        let id = Uuid::new_v4().to_string();
        self.by_node.insert(node, id.clone());
        self.entries.insert(
            id.clone(),
            Entry {
                node,
                element,
                seen: epoch,
            },
        );
        ElementHandle::new(id)
    }

    /// Element behind a handle
    pub(crate) fn get(&self, handle: &ElementHandle) -> Option<&E> {
        self.entries.get(&handle.id).map(|entry| &entry.element)
    }

    /// Forget a handle whose node is gone
    pub(crate) fn remove(&mut self, handle: &ElementHandle) {
        if let Some(entry) = self.entries.remove(&handle.id) {
            self.by_node.remove(&entry.node);
        }
    }

    /// Forget everything
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.by_node.clear();
    }

    /// Number of live entries
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::missing_errors_doc)]
mod cdp {
    use super::{BrowserConfig, ElementRegistry};
    use crate::driver::{ElementHandle, Key, UiDriver};
    use crate::locator::Selector;
    use crate::result::{ProbeError, ProbeResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::dom::BackendNodeId;
    use chromiumoxide::element::Element;
    use chromiumoxide::error::CdpError;
    use chromiumoxide::page::{Page as CdpPage, ScreenshotParams};
    use futures::StreamExt;
    use std::path::Path;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tracing::{debug, info};

    const IS_CLICKABLE_JS: &str = "function() {
        const rect = this.getBoundingClientRect();
        const style = window.getComputedStyle(this);
        return rect.width > 0 && rect.height > 0
            && style.visibility !== 'hidden' && style.display !== 'none'
            && !this.disabled;
    }";

    const SELECT_ALL_JS: &str = "function() {
        this.focus();
        if (typeof this.select === 'function') { this.select(); }
    }";

    fn driver_error(e: &CdpError) -> ProbeError {
        ProbeError::driver(e.to_string())
    }

    // Remote object ids die with the DOM node they point at.
    fn element_error(handle: &ElementHandle, e: &CdpError) -> ProbeError {
        let message = e.to_string();
        let lower = message.to_lowercase();
        if lower.contains("no node") || lower.contains("could not find node") || lower.contains("detached")
        {
            ProbeError::StaleElement {
                id: handle.id.clone(),
            }
        } else {
            ProbeError::driver(message)
        }
    }

    /// One Chromium tab driven over CDP
    #[derive(Debug)]
    pub struct CdpDriver {
        config: BrowserConfig,
        browser: Arc<Mutex<CdpBrowser>>,
        page: Arc<Mutex<CdpPage>>,
        elements: Mutex<ElementRegistry<BackendNodeId, Element>>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl CdpDriver {
        /// Launch Chromium and open a blank tab
        pub async fn launch(config: BrowserConfig) -> ProbeResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| ProbeError::BrowserLaunch { message })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                ProbeError::BrowserLaunch {
                    message: e.to_string(),
                }
            })?;

            // Spawn handler task
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            info!(headless = config.headless, "browser launched");

            Ok(Self {
                config,
                browser: Arc::new(Mutex::new(browser)),
                page: Arc::new(Mutex::new(page)),
                elements: Mutex::new(ElementRegistry::default()),
                handle,
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> ProbeResult<()> {
            let mut browser = self.browser.lock().await;
            browser.close().await.map_err(|e| driver_error(&e))?;
            let _ = browser.wait().await;
            self.handle.abort();
            info!("browser closed");
            Ok(())
        }

        async fn register(&self, found: Vec<Element>) -> Vec<ElementHandle> {
            let mut elements = self.elements.lock().await;
            found
                .into_iter()
                .map(|element| elements.insert(element.backend_node_id, element))
                .collect()
        }

        async fn with_element<T>(
            &self,
            handle: &ElementHandle,
            action: impl for<'e> FnOnce(&'e Element) -> futures::future::BoxFuture<'e, Result<T, CdpError>>,
        ) -> ProbeResult<T> {
            let mut elements = self.elements.lock().await;
            let element = elements.get(handle).ok_or_else(|| ProbeError::StaleElement {
                id: handle.id.clone(),
            })?;
            let result = action(element).await.map_err(|e| element_error(handle, &e));
            if matches!(result, Err(ProbeError::StaleElement { .. })) {
                elements.remove(handle);
            }
            result
        }
    }

    #[async_trait]
    impl UiDriver for CdpDriver {
        async fn navigate(&self, url: &str) -> ProbeResult<()> {
            self.elements.lock().await.clear();
            let page = self.page.lock().await;
            page.goto(url)
                .await
                .map_err(|e| ProbeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            debug!(%url, "navigated");
            Ok(())
        }

        async fn current_title(&self) -> ProbeResult<String> {
            let page = self.page.lock().await;
            let title = page.get_title().await.map_err(|e| driver_error(&e))?;
            Ok(title.unwrap_or_default())
        }

        async fn find_one(&self, selector: &Selector) -> ProbeResult<Option<ElementHandle>> {
            Ok(self.find_all(selector).await?.into_iter().next())
        }

        async fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>> {
            self.elements.lock().await.begin_lookup();
            let found = {
                let page = self.page.lock().await;
                match selector {
                    Selector::Css(css) => page.find_elements(css.as_str()).await,
                    Selector::XPath(xpath) => page.find_xpaths(xpath.as_str()).await,
                }
            };
            // An empty match set is reported as an error by some CDP versions.
            let found = match found {
                Ok(found) => found,
                Err(CdpError::NotFound) => Vec::new(),
                Err(e) => return Err(driver_error(&e)),
            };
            Ok(self.register(found).await)
        }

        async fn find_all_within(
            &self,
            parent: &ElementHandle,
            selector: &Selector,
        ) -> ProbeResult<Vec<ElementHandle>> {
            let Selector::Css(css) = selector else {
                return Err(ProbeError::UnsupportedSelector {
                    selector: selector.to_string(),
                    message: "scoped lookups need CSS".to_string(),
                });
            };
            let css = css.clone();
            let found = self
                .with_element(parent, move |el| Box::pin(el.find_elements(css)))
                .await;
            let found = match found {
                Ok(found) => found,
                Err(ProbeError::Driver { message }) if message.contains("not found") => Vec::new(),
                Err(e) => return Err(e),
            };
            Ok(self.register(found).await)
        }

        async fn is_clickable(&self, handle: &ElementHandle) -> ProbeResult<bool> {
            let returns = self
                .with_element(handle, |el| Box::pin(el.call_js_fn(IS_CLICKABLE_JS, false)))
                .await?;
            Ok(returns
                .result
                .value
                .and_then(|v| v.as_bool())
                .unwrap_or(false))
        }

        async fn click(&self, handle: &ElementHandle) -> ProbeResult<()> {
            self.with_element(handle, |el| Box::pin(async move { el.click().await.map(|_| ()) }))
                .await
        }

        async fn send_keys(&self, handle: &ElementHandle, text: &str) -> ProbeResult<()> {
            let text = text.to_string();
            self.with_element(handle, move |el| {
                Box::pin(async move {
                    el.focus().await?;
                    el.type_str(text).await.map(|_| ())
                })
            })
            .await
        }

        async fn send_special_key(&self, handle: &ElementHandle, key: Key) -> ProbeResult<()> {
            self.with_element(handle, move |el| {
                Box::pin(async move {
                    match key {
                        Key::SelectAll => el.call_js_fn(SELECT_ALL_JS, false).await.map(|_| ()),
                        Key::Enter | Key::Backspace => el.press_key(key.as_str()).await.map(|_| ()),
                    }
                })
            })
            .await
        }

        async fn read_attribute(
            &self,
            handle: &ElementHandle,
            name: &str,
        ) -> ProbeResult<Option<String>> {
            let name = name.to_string();
            self.with_element(handle, move |el| Box::pin(el.attribute(name)))
                .await
        }

        async fn read_text(&self, handle: &ElementHandle) -> ProbeResult<String> {
            let text = self
                .with_element(handle, |el| Box::pin(el.inner_text()))
                .await?;
            Ok(text.unwrap_or_default().trim().to_string())
        }

        async fn capture_screenshot(&self, path: &Path) -> ProbeResult<()> {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let page = self.page.lock().await;
            page.save_screenshot(ScreenshotParams::builder().full_page(true).build(), path)
                .await
                .map_err(|e| ProbeError::Screenshot {
                    message: e.to_string(),
                })?;
            debug!(path = %path.display(), "screenshot saved");
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::CdpDriver;

//! UiDriver - abstract browser automation seam
//!
//! Everything the page objects need from a browser goes through [`UiDriver`].
//! Two implementations ship with the crate:
//!
//! - `CdpDriver` (feature `browser`): real Chromium over the DevTools protocol
//! - [`MockMailUi`](crate::MockMailUi): an in-process simulation of the
//!   folders/labels screen used by unit tests and the CLI demo
//!
//! Handles are snapshots. Any action that makes the page re-render may leave
//! previously obtained handles stale, so callers re-query instead of caching.

use crate::locator::Selector;
use crate::result::ProbeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opaque reference to one rendered element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned identifier
    pub id: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.id)
    }
}

/// Non-text keys the page objects send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Submit / confirm
    Enter,
    /// Delete the selection, or the last character
    Backspace,
    /// Select the whole content of an input (Ctrl+A)
    SelectAll,
}

impl Key {
    /// DOM key name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enter => "Enter",
            Self::Backspace => "Backspace",
            Self::SelectAll => "Control+A",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract driver trait for browser automation
///
/// "Not found" is never an error here: lookups return `None` or an empty
/// vector. Errors are reserved for driver and transport failures.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Navigate the tab to `url`
    async fn navigate(&self, url: &str) -> ProbeResult<()>;

    /// Title of the current document
    async fn current_title(&self) -> ProbeResult<String>;

    /// First element matching the selector, if any
    async fn find_one(&self, selector: &Selector) -> ProbeResult<Option<ElementHandle>>;

    /// All elements matching the selector, in document order
    async fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>>;

    /// All descendants of `parent` matching the selector
    async fn find_all_within(
        &self,
        parent: &ElementHandle,
        selector: &Selector,
    ) -> ProbeResult<Vec<ElementHandle>>;

    /// Whether the element is visible and accepts input
    async fn is_clickable(&self, handle: &ElementHandle) -> ProbeResult<bool>;

    /// Click the element
    async fn click(&self, handle: &ElementHandle) -> ProbeResult<()>;

    /// Type text into the element
    async fn send_keys(&self, handle: &ElementHandle, text: &str) -> ProbeResult<()>;

    /// Send a special key to the element
    async fn send_special_key(&self, handle: &ElementHandle, key: Key) -> ProbeResult<()>;

    /// Read an attribute; `None` when the attribute is absent
    async fn read_attribute(&self, handle: &ElementHandle, name: &str)
        -> ProbeResult<Option<String>>;

    /// Rendered text of the element
    async fn read_text(&self, handle: &ElementHandle) -> ProbeResult<String>;

    /// Save a PNG screenshot of the tab to `path`
    async fn capture_screenshot(&self, path: &Path) -> ProbeResult<()>;

    /// First descendant of `parent` matching the selector, if any
    async fn find_one_within(
        &self,
        parent: &ElementHandle,
        selector: &Selector,
    ) -> ProbeResult<Option<ElementHandle>> {
        Ok(self
            .find_all_within(parent, selector)
            .await?
            .into_iter()
            .next())
    }
}

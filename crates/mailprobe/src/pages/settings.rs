//! Folders/labels settings screen.
//!
//! The list re-renders after every mutation and re-indexes its rows, so
//! every operation reads a fresh [`ListItem`] snapshot instead of holding
//! on to one. "Not there" outcomes are values (`false`, `None`, a failed
//! [`OperationResult`]); only driver failures and precondition timeouts
//! surface as errors.

use crate::config::RunConfig;
use crate::driver::{ElementHandle, Key, UiDriver};
use crate::locator::{MailLocators, Selector};
use crate::page_object::{short_name, PageObject};
use crate::palette::PaletteColor;
use crate::resolver::{self, ListItem};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::Waiter;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Snapshot reads retried when a row re-renders mid-read
const SNAPSHOT_ATTEMPTS: usize = 3;

// =============================================================================
// ITEM KIND
// =============================================================================

/// Kind of classification item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Folder (messages move into it)
    Folder,
    /// Label (messages are tagged with it)
    Label,
}

impl ItemKind {
    /// Both kinds, folders first
    pub const ALL: [Self; 2] = [Self::Folder, Self::Label];

    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Label => "label",
        }
    }

    /// Descriptor of the button that opens the create dialog for this kind
    #[must_use]
    pub const fn add_trigger<'l>(&self, locators: &'l MailLocators) -> &'l Selector {
        match self {
            Self::Folder => &locators.add_folder,
            Self::Label => &locators.add_label,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "folder" => Ok(Self::Folder),
            "label" => Ok(Self::Label),
            _ => Err(ProbeError::InvalidKind {
                kind: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// VALUES
// =============================================================================

/// Name and colour an item should be created or edited with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDescriptor {
    /// Display name
    pub name: String,
    /// Palette colour
    pub color: &'static PaletteColor,
}

impl ItemDescriptor {
    /// Create a descriptor
    #[must_use]
    pub fn new(name: impl Into<String>, color: &'static PaletteColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Outcome of a page operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Whether the operation went through
    pub succeeded: bool,
    /// Why it did not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl OperationResult {
    /// Successful outcome
    #[must_use]
    pub const fn success() -> Self {
        Self {
            succeeded: true,
            reason: None,
        }
    }

    /// Failed outcome with a reason
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            reason: Some(reason.into()),
        }
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            None => f.write_str("ok"),
            Some(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// What the page object believes the tab shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageState {
    /// Not navigated yet, or the settings title never showed
    Unloaded,
    /// Settings list shown, no dialog
    Loaded,
    /// A create/edit/delete dialog is open
    DialogOpen,
}

// =============================================================================
// PAGE OBJECT
// =============================================================================

/// Page object for the folders/labels settings list
#[derive(Debug)]
pub struct SettingsListPage<'a, D: UiDriver + ?Sized> {
    driver: &'a D,
    config: &'a RunConfig,
    locators: MailLocators,
    state: PageState,
}

impl<'a, D: UiDriver + ?Sized> SettingsListPage<'a, D> {
    /// Create the page object over an authenticated session
    #[must_use]
    pub fn new(driver: &'a D, config: &'a RunConfig) -> Self {
        Self {
            driver,
            config,
            locators: MailLocators::default(),
            state: PageState::Unloaded,
        }
    }

    /// Current page state
    #[must_use]
    pub const fn state(&self) -> PageState {
        self.state
    }

    /// Descriptor table in use
    #[must_use]
    pub const fn locators(&self) -> &MailLocators {
        &self.locators
    }

    /// Session driver
    #[must_use]
    pub const fn driver(&self) -> &'a D {
        self.driver
    }

    /// Run configuration
    #[must_use]
    pub const fn config(&self) -> &'a RunConfig {
        self.config
    }

    fn waiter(&self) -> Waiter<'a, D> {
        Waiter::new(self.driver).with_poll_interval(self.config.timeouts.poll_ms)
    }

    fn element_timeout(&self) -> Duration {
        self.config.timeouts.element()
    }

    /// Navigate to the settings screen and wait for its title
    pub async fn go_to(&mut self) -> ProbeResult<bool> {
        let url = self.config.settings_url.as_str();
        info!(%url, "opening folders/labels settings");
        self.driver.navigate(url).await?;

        let title = &self.config.settings_title;
        let loaded = self
            .waiter()
            .title_is(title, self.element_timeout())
            .await?
            .is_ready();
        if loaded {
            self.state = PageState::Loaded;
        } else {
            warn!(%title, "settings page title never showed");
            self.state = PageState::Unloaded;
        }
        Ok(loaded)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Fresh snapshot of every rendered row.
    ///
    /// An empty list renders no table at all, so a table wait that times out
    /// is read as "no items".
    pub async fn list_items(&self) -> ProbeResult<Vec<ListItem>> {
        let table = self
            .waiter()
            .present(&self.locators.items_table, self.element_timeout())
            .await?;
        if !table.is_ready() {
            debug!("items table not rendered, list is empty");
            return Ok(Vec::new());
        }

        let mut attempt = 1;
        loop {
            match self.read_rows().await {
                Err(ProbeError::StaleElement { id }) if attempt < SNAPSHOT_ATTEMPTS => {
                    debug!(%id, attempt, "row re-rendered during read, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn read_rows(&self) -> ProbeResult<Vec<ListItem>> {
        let rows = self.driver.find_all(&self.locators.item_row).await?;
        let mut items = Vec::with_capacity(rows.len());
        for (position, row) in rows.into_iter().enumerate() {
            let Some(name) = self
                .driver
                .find_one_within(&row, &self.locators.item_name)
                .await?
            else {
                debug!(position, "row without a name element");
                continue;
            };
            let display_name = self.driver.read_text(&name).await?;
            let color_style = match self
                .driver
                .find_one_within(&row, &self.locators.item_color)
                .await?
            {
                Some(icon) => self.driver.read_attribute(&icon, "style").await?,
                None => None,
            };
            items.push(ListItem::new(position, display_name, color_style, row));
        }
        Ok(items)
    }

    /// Number of rendered items
    pub async fn items_count(&self) -> ProbeResult<usize> {
        Ok(self.list_items().await?.len())
    }

    /// Whether an item with exactly this name is rendered
    pub async fn item_is_displayed(&self, name: &str) -> ProbeResult<bool> {
        let items = self.list_items().await?;
        Ok(resolver::find_by_name(&items, name).is_some())
    }

    /// Rendered row position of the first item with this name.
    ///
    /// Counts every row, including rows whose name could not be read, so it
    /// lines up with per-row controls.
    pub async fn item_index(&self, name: &str) -> ProbeResult<Option<usize>> {
        let items = self.list_items().await?;
        Ok(resolver::row_of(&items, name))
    }

    /// Inline colour style of the named item
    pub async fn item_color(&self, name: &str) -> ProbeResult<Option<String>> {
        let items = self.list_items().await?;
        Ok(resolver::find_by_name(&items, name).and_then(|item| item.color_style.clone()))
    }

    /// Whether the named item's colour style is exactly `expected_style`
    pub async fn item_color_matches(&self, name: &str, expected_style: &str) -> ProbeResult<bool> {
        let actual = self.item_color(name).await?;
        info!(
            %name,
            actual = actual.as_deref().unwrap_or("<none>"),
            expected = %expected_style,
            "checking item colour"
        );
        Ok(actual.as_deref() == Some(expected_style))
    }

    /// Wait for a success toast whose text is exactly `text`
    pub async fn wait_for_success_notification(
        &self,
        text: &str,
        timeout: Duration,
    ) -> ProbeResult<bool> {
        let shown = self
            .waiter()
            .text_equals(&self.locators.notification_success, text, timeout)
            .await?
            .is_ready();
        if shown {
            info!(%text, "success notification shown");
        } else {
            warn!(%text, "success notification not shown");
        }
        Ok(shown)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    async fn click_when_ready(&self, selector: &Selector) -> ProbeResult<bool> {
        let Some(handle) = self
            .waiter()
            .clickable(selector, self.element_timeout())
            .await?
            .into_option()
        else {
            return Ok(false);
        };
        self.driver.click(&handle).await?;
        debug!(%selector, "clicked");
        Ok(true)
    }

    async fn name_field(&self) -> ProbeResult<Option<ElementHandle>> {
        Ok(self
            .waiter()
            .clickable(&self.locators.dialog_name, self.element_timeout())
            .await?
            .into_option())
    }

    /// Pick the colour swatch and submit the open dialog
    async fn finish_dialog(&mut self, color: &PaletteColor) -> ProbeResult<OperationResult> {
        if !self.click_when_ready(&color.swatch_selector()).await? {
            return Ok(OperationResult::failed(format!("colour swatch {color} not clickable")));
        }
        if !self.click_when_ready(&self.locators.dialog_submit).await? {
            return Ok(OperationResult::failed("dialog submit not clickable"));
        }
        self.state = PageState::Loaded;
        Ok(OperationResult::success())
    }

    /// Create a folder or label through the create dialog
    pub async fn add_item(
        &mut self,
        kind: ItemKind,
        name: &str,
        color: &PaletteColor,
    ) -> ProbeResult<OperationResult> {
        info!(%kind, %name, %color, "adding item");
        let trigger = kind.add_trigger(&self.locators).clone();
        if !self.click_when_ready(&trigger).await? {
            return Ok(OperationResult::failed(format!("add {kind} button not clickable")));
        }
        self.state = PageState::DialogOpen;

        let Some(field) = self.name_field().await? else {
            return Ok(OperationResult::failed("name field not shown"));
        };
        self.driver.send_keys(&field, name).await?;
        debug!(field = %self.locators.dialog_name, %name, "typed name");

        self.finish_dialog(color).await
    }

    /// Create a folder
    pub async fn add_folder(&mut self, name: &str, color: &PaletteColor) -> ProbeResult<OperationResult> {
        self.add_item(ItemKind::Folder, name, color).await
    }

    /// Create a label
    pub async fn add_label(&mut self, name: &str, color: &PaletteColor) -> ProbeResult<OperationResult> {
        self.add_item(ItemKind::Label, name, color).await
    }

    /// Rename and recolour an existing item
    pub async fn edit_item(
        &mut self,
        current: &str,
        new_name: &str,
        color: &PaletteColor,
    ) -> ProbeResult<OperationResult> {
        info!(%current, %new_name, %color, "editing item");
        let items = self.list_items().await?;
        let Some(item) = resolver::find_by_name(&items, current) else {
            warn!(%current, "no item to edit");
            return Ok(OperationResult::failed(format!("no item named {current:?}")));
        };
        let Some(edit) = self
            .driver
            .find_one_within(&item.handle, &self.locators.item_edit)
            .await?
        else {
            return Ok(OperationResult::failed(format!("{current:?} has no edit button")));
        };
        self.driver.click(&edit).await?;
        self.state = PageState::DialogOpen;
        debug!(button = %self.locators.item_edit, "opened edit dialog");

        let Some(field) = self.name_field().await? else {
            return Ok(OperationResult::failed("name field not shown"));
        };
        self.driver.send_special_key(&field, Key::SelectAll).await?;
        self.driver.send_special_key(&field, Key::Backspace).await?;
        self.driver.send_keys(&field, new_name).await?;
        debug!(field = %self.locators.dialog_name, %new_name, "replaced name");

        self.finish_dialog(color).await
    }

    /// Delete an item through its options menu and the confirmation dialog.
    ///
    /// Delete entries are located by position, so the index is resolved from
    /// a snapshot taken after the menu opened. The confirmation button is a
    /// precondition: if it never becomes clickable the timeout is an error.
    pub async fn delete_item(&mut self, name: &str) -> ProbeResult<OperationResult> {
        info!(%name, "deleting item");
        let items = self.list_items().await?;
        let Some(item) = resolver::find_by_name(&items, name) else {
            warn!(%name, "no item to delete");
            return Ok(OperationResult::failed(format!("no item named {name:?}")));
        };
        if let Some(dropdown) = self
            .driver
            .find_one_within(&item.handle, &self.locators.item_dropdown)
            .await?
        {
            self.driver.click(&dropdown).await?;
            debug!(button = %self.locators.item_dropdown, "opened options menu");
        }

        let Some(index) = self.item_index(name).await? else {
            warn!(%name, "cannot get item index");
            return Ok(OperationResult::failed(format!("cannot resolve index of {name:?}")));
        };
        let delete_buttons = self
            .waiter()
            .present_all(&self.locators.item_delete, self.element_timeout())
            .await?
            .into_option()
            .unwrap_or_default();
        let Some(delete) = delete_buttons.get(index) else {
            warn!(index, found = delete_buttons.len(), "cannot get delete button");
            return Ok(OperationResult::failed(format!(
                "no delete button at index {index} ({} found)",
                delete_buttons.len()
            )));
        };
        self.driver.click(delete).await?;
        self.state = PageState::DialogOpen;
        debug!(index, "clicked delete entry");

        let submit = self
            .waiter()
            .clickable(&self.locators.dialog_submit, self.element_timeout())
            .await?
            .or_timeout()?;
        self.driver.click(&submit).await?;
        self.state = PageState::Loaded;
        debug!(button = %self.locators.dialog_submit, "confirmed delete");
        Ok(OperationResult::success())
    }

    /// Cancel whatever dialog is open. Returns whether one was closed.
    pub async fn close_open_dialog(&mut self) -> ProbeResult<bool> {
        if self
            .driver
            .find_one(&self.locators.dialog_header)
            .await?
            .is_none()
        {
            if self.state == PageState::DialogOpen {
                self.state = PageState::Loaded;
            }
            return Ok(false);
        }
        let Some(cancel) = self.driver.find_one(&self.locators.dialog_cancel).await? else {
            warn!("dialog open without a cancel control");
            return Ok(false);
        };
        self.driver.click(&cancel).await?;
        self.state = PageState::Loaded;
        warn!("closed a dialog left open");
        Ok(true)
    }
}

#[async_trait]
impl<D: UiDriver + ?Sized> PageObject for SettingsListPage<'_, D> {
    fn url(&self) -> &str {
        &self.config.settings_url
    }

    fn load_timeout_ms(&self) -> u64 {
        self.config.timeouts.element_ms
    }

    fn page_name(&self) -> &str {
        short_name(std::any::type_name::<Self>())
    }

    async fn is_loaded(&self) -> ProbeResult<bool> {
        Ok(self.driver.current_title().await? == self.config.settings_title)
    }
}

// =============================================================================
// TESTS
// =============================================================================

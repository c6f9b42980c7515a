//! Simulated mail client for driving the page objects without a browser.
//!
//! [`MockMailUi`] implements [`UiDriver`] over an in-memory model of the
//! login screen and the folders/labels settings screen. It reproduces the
//! behaviour the page objects have to cope with:
//!
//! - every click that changes the UI bumps a render generation, and handles
//!   from an older generation fail with [`ProbeError::StaleElement`]
//! - the items table is not rendered at all while the list is empty
//! - delete entries only exist once an options menu has been opened
//! - the dialog submit button can be rendered before it accepts input
//!
//! Fault knobs (`without_notifications`, `ignoring_color`) let tests observe
//! how the workflow layer reports failed checks. Render knobs
//! ([`MenuEffect`], `with_stale_name_reads`, [`MockItem::without_name_element`])
//! reproduce list re-renders the page objects must survive.

use crate::config::{
    DEFAULT_LANDING_TITLE_TOKEN, DEFAULT_LOGIN_URL, DEFAULT_SETTINGS_TITLE, DEFAULT_SETTINGS_URL,
};
use crate::driver::{ElementHandle, Key, UiDriver};
use crate::locator::{MailLocators, Selector};
use crate::pages::ItemKind;
use crate::palette;
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// PNG signature written as screenshot content
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// One folder or label as stored by the simulated backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockItem {
    /// Display name
    pub name: String,
    /// Folder or label
    pub kind: ItemKind,
    /// Inline style of the colour icon
    pub style: Option<String>,
    /// Whether the row renders its name element
    pub name_visible: bool,
}

impl MockItem {
    /// Create an item with a palette colour
    #[must_use]
    pub fn new(kind: ItemKind, name: impl Into<String>, color: &palette::PaletteColor) -> Self {
        Self {
            name: name.into(),
            kind,
            style: Some(color.expected_style()),
            name_visible: true,
        }
    }

    /// Render the row without a name element
    #[must_use]
    pub fn without_name_element(mut self) -> Self {
        self.name_visible = false;
        self
    }
}

/// How the list re-renders when a row's options menu opens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuEffect {
    /// Rows keep their positions
    #[default]
    InPlace,
    /// The row whose menu opened moves to the top
    MoveToTop,
    /// The row whose menu opened disappears (removed elsewhere)
    DropRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Blank,
    Login,
    Inbox,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogMode {
    Create(ItemKind),
    Edit(usize),
    ConfirmDelete(usize),
}

#[derive(Debug, Clone)]
struct Dialog {
    mode: DialogMode,
    name: String,
    selected: bool,
    style: Option<String>,
    submit_wait_polls: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Node {
    Username,
    Password,
    WelcomeClose,
    AddFolder,
    AddLabel,
    ItemsTable,
    Row(usize),
    RowName(usize),
    RowColor(usize),
    RowEdit(usize),
    RowDropdown(usize),
    RowDelete(usize),
    Toast(usize),
    DialogHeader,
    DialogName,
    DialogSubmit,
    DialogCancel,
    Swatch(usize),
}

#[derive(Debug)]
struct MockState {
    screen: Screen,
    logged_in: bool,
    username: String,
    password: String,
    typed_username: String,
    typed_password: String,
    show_welcome: bool,
    welcome_open: bool,
    items: Vec<MockItem>,
    dialog: Option<Dialog>,
    menu_open: Option<usize>,
    toasts: Vec<String>,
    generation: u64,
    ids: HashMap<Node, String>,
    nodes: HashMap<String, Node>,
    submit_latency: u32,
    notifications: bool,
    apply_color: bool,
    menu_effect: MenuEffect,
    stale_name_reads: u32,
    history: Vec<String>,
    screenshots: Vec<PathBuf>,
}

impl MockState {
    fn rerender(&mut self) {
        self.generation += 1;
        self.ids.clear();
        self.nodes.clear();
    }

    fn handle(&mut self, node: Node) -> ElementHandle {
        if let Some(id) = self.ids.get(&node) {
            return ElementHandle::new(id.clone());
        }
        let id = format!("{}:{}", self.generation, self.ids.len());
        self.ids.insert(node, id.clone());
        self.nodes.insert(id.clone(), node);
        ElementHandle::new(id)
    }

    fn node(&self, handle: &ElementHandle) -> ProbeResult<Node> {
        self.nodes
            .get(&handle.id)
            .copied()
            .ok_or_else(|| ProbeError::StaleElement {
                id: handle.id.clone(),
            })
    }

    fn title(&self) -> String {
        match self.screen {
            Screen::Blank => String::new(),
            Screen::Login => "Login - ProtonMail".to_string(),
            Screen::Inbox => format!("{DEFAULT_LANDING_TITLE_TOKEN} | ProtonMail"),
            Screen::Settings => DEFAULT_SETTINGS_TITLE.to_string(),
        }
    }

    fn document_nodes(&self, loc: &MailLocators, sel: &Selector) -> Vec<Node> {
        let rows = 0..self.items.len();
        let on_settings = self.screen == Screen::Settings;
        let dialog = self.dialog.as_ref().map(|d| d.mode);
        let editing = matches!(dialog, Some(DialogMode::Create(_) | DialogMode::Edit(_)));

        if *sel == loc.username_field && self.screen == Screen::Login {
            vec![Node::Username]
        } else if *sel == loc.password_field && self.screen == Screen::Login {
            vec![Node::Password]
        } else if *sel == loc.welcome_close && self.welcome_open {
            vec![Node::WelcomeClose]
        } else if *sel == loc.add_folder && on_settings {
            vec![Node::AddFolder]
        } else if *sel == loc.add_label && on_settings {
            vec![Node::AddLabel]
        } else if *sel == loc.items_table && on_settings && !self.items.is_empty() {
            vec![Node::ItemsTable]
        } else if *sel == loc.item_row && on_settings {
            rows.map(Node::Row).collect()
        } else if *sel == loc.item_delete && on_settings && self.menu_open.is_some() {
            rows.map(Node::RowDelete).collect()
        } else if *sel == loc.notification_success {
            (0..self.toasts.len()).map(Node::Toast).collect()
        } else if *sel == loc.dialog_header && dialog.is_some() {
            vec![Node::DialogHeader]
        } else if *sel == loc.dialog_submit && dialog.is_some() {
            vec![Node::DialogSubmit]
        } else if *sel == loc.dialog_cancel && dialog.is_some() {
            vec![Node::DialogCancel]
        } else if *sel == loc.dialog_name && editing {
            vec![Node::DialogName]
        } else if editing {
            palette::PALETTE
                .iter()
                .position(|c| c.swatch_selector() == *sel)
                .map(Node::Swatch)
                .into_iter()
                .collect()
        } else {
            Vec::new()
        }
    }

    fn row_nodes(&self, loc: &MailLocators, row: usize, sel: &Selector) -> Vec<Node> {
        let Some(item) = self.items.get(row) else {
            return Vec::new();
        };
        if *sel == loc.item_name && item.name_visible {
            vec![Node::RowName(row)]
        } else if *sel == loc.item_color && item.style.is_some() {
            vec![Node::RowColor(row)]
        } else if *sel == loc.item_edit {
            vec![Node::RowEdit(row)]
        } else if *sel == loc.item_dropdown {
            vec![Node::RowDropdown(row)]
        } else {
            Vec::new()
        }
    }

    fn toast(&mut self, text: String) {
        self.toasts.clear();
        if self.notifications {
            self.toasts.push(text);
        }
    }

    fn open_dialog(&mut self, mode: DialogMode, name: String, style: Option<String>) {
        self.dialog = Some(Dialog {
            mode,
            name,
            selected: false,
            style,
            submit_wait_polls: self.submit_latency,
        });
        self.menu_open = None;
        self.rerender();
    }

    fn submit(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        match dialog.mode {
            DialogMode::Create(kind) => {
                if dialog.name.is_empty() {
                    // An empty name keeps the dialog open.
                    self.dialog = Some(dialog);
                    return;
                }
                let style = if self.apply_color { dialog.style } else { None };
                self.toast(format!("{} created", dialog.name));
                self.items.push(MockItem {
                    name: dialog.name,
                    kind,
                    style,
                    name_visible: true,
                });
            }
            DialogMode::Edit(row) => {
                if let Some(item) = self.items.get_mut(row) {
                    item.name.clone_from(&dialog.name);
                    if self.apply_color {
                        item.style = dialog.style;
                    }
                }
                self.toast(format!("{} updated", dialog.name));
            }
            DialogMode::ConfirmDelete(row) => {
                if row < self.items.len() {
                    let removed = self.items.remove(row);
                    self.toast(format!("{} removed", removed.name));
                }
            }
        }
        self.rerender();
    }

    fn try_login(&mut self) {
        if self.typed_username == self.username && self.typed_password == self.password {
            self.logged_in = true;
            self.screen = Screen::Inbox;
            self.welcome_open = self.show_welcome;
        }
        self.rerender();
    }
}

/// In-process simulation of the mail client's login and folders/labels screens
#[derive(Debug)]
pub struct MockMailUi {
    locators: MailLocators,
    login_url: String,
    settings_url: String,
    state: Mutex<MockState>,
}

impl Default for MockMailUi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMailUi {
    /// Simulation accepting the credentials `demo` / `demo`
    #[must_use]
    pub fn new() -> Self {
        Self::with_credentials("demo", "demo")
    }

    /// Simulation accepting the given credentials
    #[must_use]
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            locators: MailLocators::default(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            settings_url: DEFAULT_SETTINGS_URL.to_string(),
            state: Mutex::new(MockState {
                screen: Screen::Blank,
                logged_in: false,
                username: username.into(),
                password: password.into(),
                typed_username: String::new(),
                typed_password: String::new(),
                show_welcome: true,
                welcome_open: false,
                items: Vec::new(),
                dialog: None,
                menu_open: None,
                toasts: Vec::new(),
                generation: 0,
                ids: HashMap::new(),
                nodes: HashMap::new(),
                submit_latency: 0,
                notifications: true,
                apply_color: true,
                menu_effect: MenuEffect::InPlace,
                stale_name_reads: 0,
                history: Vec::new(),
                screenshots: Vec::new(),
            }),
        }
    }

    /// Simulation already authenticated and showing the settings screen
    #[must_use]
    pub fn signed_in() -> Self {
        let ui = Self::new();
        {
            let mut state = ui.lock();
            state.logged_in = true;
            state.screen = Screen::Settings;
        }
        ui
    }

    /// Serve the screens at custom URLs
    #[must_use]
    pub fn with_urls(mut self, login_url: impl Into<String>, settings_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self.settings_url = settings_url.into();
        self
    }

    /// Pre-populate the folders/labels list
    #[must_use]
    pub fn with_items(self, items: Vec<MockItem>) -> Self {
        self.lock().items = items;
        self
    }

    /// Whether the welcome overlay shows after login
    #[must_use]
    pub fn with_welcome(self, show: bool) -> Self {
        self.lock().show_welcome = show;
        self
    }

    /// Number of clickability checks the dialog submit fails before accepting input
    #[must_use]
    pub fn with_submit_latency(self, polls: u32) -> Self {
        self.lock().submit_latency = polls;
        self
    }

    /// Never show success toasts
    #[must_use]
    pub fn without_notifications(self) -> Self {
        self.lock().notifications = false;
        self
    }

    /// Drop the colour picked in the dialog when saving
    #[must_use]
    pub fn ignoring_color(self) -> Self {
        self.lock().apply_color = false;
        self
    }

    /// Re-render the list this way whenever an options menu opens
    #[must_use]
    pub fn with_menu_effect(self, effect: MenuEffect) -> Self {
        self.lock().menu_effect = effect;
        self
    }

    /// Re-render the page during the next `reads` row-name reads, failing each
    #[must_use]
    pub fn with_stale_name_reads(self, reads: u32) -> Self {
        self.lock().stale_name_reads = reads;
        self
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current list contents
    #[must_use]
    pub fn items(&self) -> Vec<MockItem> {
        self.lock().items.clone()
    }

    /// Toasts currently shown
    #[must_use]
    pub fn toasts(&self) -> Vec<String> {
        self.lock().toasts.clone()
    }

    /// Whether a dialog is open
    #[must_use]
    pub fn dialog_open(&self) -> bool {
        self.lock().dialog.is_some()
    }

    /// Whether the welcome overlay is showing
    #[must_use]
    pub fn welcome_open(&self) -> bool {
        self.lock().welcome_open
    }

    /// Paths of captured screenshots
    #[must_use]
    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.lock().screenshots.clone()
    }

    /// Check if an action was recorded
    #[must_use]
    pub fn was_called(&self, action: &str) -> bool {
        self.lock().history.iter().any(|c| c.starts_with(action))
    }
}

#[async_trait]
impl UiDriver for MockMailUi {
    async fn navigate(&self, url: &str) -> ProbeResult<()> {
        let mut state = self.lock();
        state.history.push(format!("navigate:{url}"));
        state.dialog = None;
        state.menu_open = None;
        state.welcome_open = false;
        let screen = if url == self.login_url {
            state.typed_username.clear();
            state.typed_password.clear();
            Screen::Login
        } else if url == self.settings_url {
            if state.logged_in {
                Screen::Settings
            } else {
                Screen::Login
            }
        } else {
            Screen::Blank
        };
        state.screen = screen;
        state.rerender();
        Ok(())
    }

    async fn current_title(&self) -> ProbeResult<String> {
        Ok(self.lock().title())
    }

    async fn find_one(&self, selector: &Selector) -> ProbeResult<Option<ElementHandle>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>> {
        let mut state = self.lock();
        let nodes = state.document_nodes(&self.locators, selector);
        Ok(nodes.into_iter().map(|n| state.handle(n)).collect())
    }

    async fn find_all_within(
        &self,
        parent: &ElementHandle,
        selector: &Selector,
    ) -> ProbeResult<Vec<ElementHandle>> {
        if !selector.is_css() {
            return Err(ProbeError::UnsupportedSelector {
                selector: selector.to_string(),
                message: "scoped lookups need CSS".to_string(),
            });
        }
        let mut state = self.lock();
        let nodes = match state.node(parent)? {
            Node::Row(row) => state.row_nodes(&self.locators, row, selector),
            _ => Vec::new(),
        };
        Ok(nodes.into_iter().map(|n| state.handle(n)).collect())
    }

    async fn is_clickable(&self, handle: &ElementHandle) -> ProbeResult<bool> {
        let mut state = self.lock();
        if state.node(handle)? != Node::DialogSubmit {
            return Ok(true);
        }
        Ok(match state.dialog.as_mut() {
            Some(dialog) if dialog.submit_wait_polls > 0 => {
                dialog.submit_wait_polls -= 1;
                false
            }
            Some(_) => true,
            None => false,
        })
    }

    async fn click(&self, handle: &ElementHandle) -> ProbeResult<()> {
        let mut state = self.lock();
        let node = state.node(handle)?;
        state.history.push(format!("click:{node:?}"));
        match node {
            Node::WelcomeClose => {
                state.welcome_open = false;
                state.rerender();
            }
            Node::AddFolder => state.open_dialog(DialogMode::Create(ItemKind::Folder), String::new(), None),
            Node::AddLabel => state.open_dialog(DialogMode::Create(ItemKind::Label), String::new(), None),
            Node::RowEdit(row) => {
                let item = state.items[row].clone();
                state.open_dialog(DialogMode::Edit(row), item.name, item.style);
            }
            Node::RowDropdown(row) => {
                let opened = match state.menu_effect {
                    MenuEffect::InPlace => row,
                    MenuEffect::MoveToTop => {
                        let item = state.items.remove(row);
                        state.items.insert(0, item);
                        0
                    }
                    MenuEffect::DropRow => {
                        state.items.remove(row);
                        row
                    }
                };
                state.menu_open = Some(opened);
                state.rerender();
            }
            Node::RowDelete(row) => {
                let name = state.items[row].name.clone();
                state.open_dialog(DialogMode::ConfirmDelete(row), name, None);
            }
            Node::Swatch(idx) => {
                if let Some(dialog) = state.dialog.as_mut() {
                    dialog.style = Some(palette::PALETTE[idx].expected_style());
                }
            }
            Node::DialogSubmit => state.submit(),
            Node::DialogCancel => {
                state.dialog = None;
                state.rerender();
            }
            _ => {}
        }
        Ok(())
    }

    async fn send_keys(&self, handle: &ElementHandle, text: &str) -> ProbeResult<()> {
        let mut state = self.lock();
        let node = state.node(handle)?;
        state.history.push(format!("type:{node:?}"));
        match node {
            Node::Username => state.typed_username.push_str(text),
            Node::Password => state.typed_password.push_str(text),
            Node::DialogName => {
                if let Some(dialog) = state.dialog.as_mut() {
                    if dialog.selected {
                        dialog.name.clear();
                        dialog.selected = false;
                    }
                    dialog.name.push_str(text);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn send_special_key(&self, handle: &ElementHandle, key: Key) -> ProbeResult<()> {
        let mut state = self.lock();
        let node = state.node(handle)?;
        state.history.push(format!("key:{key}:{node:?}"));
        match (node, key) {
            (Node::Password, Key::Enter) => state.try_login(),
            (Node::DialogName, Key::SelectAll) => {
                if let Some(dialog) = state.dialog.as_mut() {
                    dialog.selected = true;
                }
            }
            (Node::DialogName, Key::Backspace) => {
                if let Some(dialog) = state.dialog.as_mut() {
                    if dialog.selected {
                        dialog.name.clear();
                        dialog.selected = false;
                    } else {
                        dialog.name.pop();
                    }
                }
            }
            (Node::DialogName | Node::DialogSubmit, Key::Enter) => state.submit(),
            _ => {}
        }
        Ok(())
    }

    async fn read_attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
    ) -> ProbeResult<Option<String>> {
        let state = self.lock();
        Ok(match (state.node(handle)?, name) {
            (Node::RowColor(row), "style") => state.items[row].style.clone(),
            (Node::DialogName, "value") => state.dialog.as_ref().map(|d| d.name.clone()),
            _ => None,
        })
    }

    async fn read_text(&self, handle: &ElementHandle) -> ProbeResult<String> {
        let mut state = self.lock();
        let node = state.node(handle)?;
        if matches!(node, Node::RowName(_)) && state.stale_name_reads > 0 {
            state.stale_name_reads -= 1;
            state.rerender();
            return Err(ProbeError::StaleElement {
                id: handle.id.clone(),
            });
        }
        Ok(match node {
            Node::RowName(row) => state.items[row].name.clone(),
            Node::Toast(idx) => state.toasts[idx].clone(),
            Node::DialogHeader => match state.dialog.as_ref().map(|d| d.mode) {
                Some(DialogMode::Create(kind)) => format!("Create {kind}"),
                Some(DialogMode::Edit(_)) => "Edit".to_string(),
                Some(DialogMode::ConfirmDelete(_)) => "Delete".to_string(),
                None => String::new(),
            },
            _ => String::new(),
        })
    }

    async fn capture_screenshot(&self, path: &Path) -> ProbeResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, PNG_MAGIC)?;
        self.lock().screenshots.push(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;

    fn loc() -> MailLocators {
        MailLocators::default()
    }

    mod login_tests {
        use super::*;

        #[tokio::test]
        async fn test_login_with_matching_credentials() {
            let ui = MockMailUi::with_credentials("alice", "s3cret");
            ui.navigate(DEFAULT_LOGIN_URL).await.unwrap();
            let user = ui.find_one(&loc().username_field).await.unwrap().unwrap();
            ui.send_keys(&user, "alice").await.unwrap();
            let pass = ui.find_one(&loc().password_field).await.unwrap().unwrap();
            ui.send_keys(&pass, "s3cret").await.unwrap();
            ui.send_special_key(&pass, Key::Enter).await.unwrap();

            assert!(ui.current_title().await.unwrap().contains("Inbox"));
            assert!(ui.welcome_open());
        }

        #[tokio::test]
        async fn test_settings_redirects_to_login_when_signed_out() {
            let ui = MockMailUi::new();
            ui.navigate(DEFAULT_SETTINGS_URL).await.unwrap();
            assert_eq!(ui.current_title().await.unwrap(), "Login - ProtonMail");
        }
    }

    mod render_tests {
        use super::*;

        #[tokio::test]
        async fn test_handles_go_stale_after_rerender() {
            let ui = MockMailUi::signed_in()
                .with_items(vec![MockItem::new(ItemKind::Folder, "a", &PALETTE[0])]);
            let row = ui.find_one(&loc().item_row).await.unwrap().unwrap();
            let dropdown = ui
                .find_one_within(&row, &loc().item_dropdown)
                .await
                .unwrap()
                .unwrap();
            ui.click(&dropdown).await.unwrap();

            let err = ui.find_all_within(&row, &loc().item_name).await.unwrap_err();
            assert!(matches!(err, ProbeError::StaleElement { .. }));
        }

        #[tokio::test]
        async fn test_handles_stable_within_generation() {
            let ui = MockMailUi::signed_in();
            let a = ui.find_one(&loc().add_folder).await.unwrap().unwrap();
            let b = ui.find_one(&loc().add_folder).await.unwrap().unwrap();
            assert_eq!(a, b);
        }

        #[tokio::test]
        async fn test_table_absent_when_empty() {
            let ui = MockMailUi::signed_in();
            assert!(ui.find_one(&loc().items_table).await.unwrap().is_none());
        }

        #[tokio::test]
        async fn test_delete_entries_need_open_menu() {
            let ui = MockMailUi::signed_in().with_items(vec![
                MockItem::new(ItemKind::Folder, "a", &PALETTE[0]),
                MockItem::new(ItemKind::Label, "b", &PALETTE[1]),
            ]);
            assert!(ui.find_all(&loc().item_delete).await.unwrap().is_empty());

            let rows = ui.find_all(&loc().item_row).await.unwrap();
            let dropdown = ui
                .find_one_within(&rows[1], &loc().item_dropdown)
                .await
                .unwrap()
                .unwrap();
            ui.click(&dropdown).await.unwrap();
            assert_eq!(ui.find_all(&loc().item_delete).await.unwrap().len(), 2);
        }

        #[tokio::test]
        async fn test_menu_can_move_row_to_top() {
            let ui = MockMailUi::signed_in()
                .with_menu_effect(MenuEffect::MoveToTop)
                .with_items(vec![
                    MockItem::new(ItemKind::Folder, "a", &PALETTE[0]),
                    MockItem::new(ItemKind::Label, "b", &PALETTE[1]),
                ]);
            let rows = ui.find_all(&loc().item_row).await.unwrap();
            let dropdown = ui
                .find_one_within(&rows[1], &loc().item_dropdown)
                .await
                .unwrap()
                .unwrap();
            ui.click(&dropdown).await.unwrap();
            let names: Vec<_> = ui.items().into_iter().map(|i| i.name).collect();
            assert_eq!(names, ["b", "a"]);
        }

        #[tokio::test]
        async fn test_nameless_row_has_no_name_element() {
            let ui = MockMailUi::signed_in().with_items(vec![
                MockItem::new(ItemKind::Folder, "a", &PALETTE[0]).without_name_element(),
            ]);
            let row = ui.find_one(&loc().item_row).await.unwrap().unwrap();
            assert!(ui.find_one_within(&row, &loc().item_name).await.unwrap().is_none());
        }

        #[tokio::test]
        async fn test_scoped_xpath_is_rejected() {
            let ui = MockMailUi::signed_in()
                .with_items(vec![MockItem::new(ItemKind::Folder, "a", &PALETTE[0])]);
            let row = ui.find_one(&loc().item_row).await.unwrap().unwrap();
            let err = ui
                .find_all_within(&row, &Selector::xpath(".//span"))
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::UnsupportedSelector { .. }));
        }
    }

    mod dialog_tests {
        use super::*;

        #[tokio::test]
        async fn test_create_via_dialog() {
            let ui = MockMailUi::signed_in();
            let add = ui.find_one(&loc().add_label).await.unwrap().unwrap();
            ui.click(&add).await.unwrap();
            let name = ui.find_one(&loc().dialog_name).await.unwrap().unwrap();
            ui.send_keys(&name, "news").await.unwrap();
            let swatch = ui
                .find_one(&PALETTE[4].swatch_selector())
                .await
                .unwrap()
                .unwrap();
            ui.click(&swatch).await.unwrap();
            let submit = ui.find_one(&loc().dialog_submit).await.unwrap().unwrap();
            ui.click(&submit).await.unwrap();

            assert_eq!(
                ui.items(),
                vec![MockItem::new(ItemKind::Label, "news", &PALETTE[4])]
            );
            assert_eq!(ui.toasts(), vec!["news created".to_string()]);
            assert!(!ui.dialog_open());
        }

        #[tokio::test]
        async fn test_select_all_then_backspace_clears_name() {
            let ui = MockMailUi::signed_in()
                .with_items(vec![MockItem::new(ItemKind::Folder, "long name", &PALETTE[0])]);
            let row = ui.find_one(&loc().item_row).await.unwrap().unwrap();
            let edit = ui
                .find_one_within(&row, &loc().item_edit)
                .await
                .unwrap()
                .unwrap();
            ui.click(&edit).await.unwrap();
            let name = ui.find_one(&loc().dialog_name).await.unwrap().unwrap();
            ui.send_special_key(&name, Key::SelectAll).await.unwrap();
            ui.send_special_key(&name, Key::Backspace).await.unwrap();
            assert_eq!(
                ui.read_attribute(&name, "value").await.unwrap(),
                Some(String::new())
            );
        }

        #[tokio::test]
        async fn test_cancel_closes_dialog() {
            let ui = MockMailUi::signed_in();
            let add = ui.find_one(&loc().add_folder).await.unwrap().unwrap();
            ui.click(&add).await.unwrap();
            assert!(ui.dialog_open());
            let cancel = ui.find_one(&loc().dialog_cancel).await.unwrap().unwrap();
            ui.click(&cancel).await.unwrap();
            assert!(!ui.dialog_open());
            assert!(ui.items().is_empty());
        }
    }

    #[tokio::test]
    async fn test_screenshot_writes_png_signature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shots").join("fail.png");
        let ui = MockMailUi::new();
        ui.capture_screenshot(&path).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), PNG_MAGIC);
        assert_eq!(ui.screenshots(), vec![path]);
    }
}

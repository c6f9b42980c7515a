//! Element descriptors for the mail client's login and settings screens.
//!
//! Page objects never build selector strings themselves; they look up the
//! descriptor they need in a [`MailLocators`] table. The default table
//! targets the ProtonMail beta web client. A different DOM only needs a
//! different table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath selector (document-level lookups only)
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// CSS selector matching a `data-test-id` attribute
    #[must_use]
    pub fn test_id(id: &str) -> Self {
        Self::Css(format!("[data-test-id='{id}']"))
    }

    /// Raw selector text
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }

    /// Whether this is a CSS selector
    #[must_use]
    pub const fn is_css(&self) -> bool {
        matches!(self, Self::Css(_))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
        }
    }
}

/// Descriptors for every element the page objects touch.
///
/// Row-scoped descriptors (`item_name`, `item_color`, `item_edit`,
/// `item_dropdown`) are resolved relative to one list row and must be CSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailLocators {
    /// Login form username input
    pub username_field: Selector,
    /// Login form password input
    pub password_field: Selector,
    /// Close button of the one-time welcome overlay
    pub welcome_close: Selector,
    /// "Add folder" trigger
    pub add_folder: Selector,
    /// "Add label" trigger
    pub add_label: Selector,
    /// Container of the folders/labels list
    pub items_table: Selector,
    /// One list row, folder or label
    pub item_row: Selector,
    /// Display name inside a row
    pub item_name: Selector,
    /// Colour icon inside a row
    pub item_color: Selector,
    /// Edit button inside a row
    pub item_edit: Selector,
    /// Options menu opener inside a row
    pub item_dropdown: Selector,
    /// Delete entries, one per row, in row order
    pub item_delete: Selector,
    /// Success toast
    pub notification_success: Selector,
    /// Header of the modal dialog
    pub dialog_header: Selector,
    /// Name input of the create/edit dialog
    pub dialog_name: Selector,
    /// Dialog submit control
    pub dialog_submit: Selector,
    /// Dialog cancel control
    pub dialog_cancel: Selector,
}

impl Default for MailLocators {
    fn default() -> Self {
        Self {
            username_field: Selector::css("#username"),
            password_field: Selector::css("#password"),
            welcome_close: Selector::css(
                "dialog.onboardingModal-container header.pm-modalHeader button.pm-modalClose",
            ),
            add_folder: Selector::test_id("folders/labels:addFolder"),
            add_label: Selector::test_id("folders/labels:addLabel"),
            items_table: Selector::css(".pm-simple-table.orderableTable"),
            item_row: Selector::css(
                "[data-test-id='folders/labels:item-type:folder'], \
                 [data-test-id='folders/labels:item-type:label']",
            ),
            item_name: Selector::test_id("folders/labels:item-name"),
            item_color: Selector::css("div > .icon-16p"),
            item_edit: Selector::test_id("folders/labels:item-edit"),
            item_dropdown: Selector::test_id("dropdown:open"),
            item_delete: Selector::test_id("folders/labels:item-delete"),
            notification_success: Selector::css("div.notification-success"),
            dialog_header: Selector::css(".pm-modalHeader"),
            dialog_name: Selector::test_id("label/folder-modal:name"),
            dialog_submit: Selector::css("[type='submit']"),
            dialog_cancel: Selector::css("[type='reset']"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_id_builds_attribute_selector() {
        let sel = Selector::test_id("dropdown:open");
        assert_eq!(sel, Selector::Css("[data-test-id='dropdown:open']".to_string()));
        assert!(sel.is_css());
    }

    #[test]
    fn test_display_prefixes_strategy() {
        assert_eq!(Selector::css("#a").to_string(), "css=#a");
        assert_eq!(Selector::xpath("//a").to_string(), "xpath=//a");
    }

    #[test]
    fn test_default_row_scoped_locators_are_css() {
        let loc = MailLocators::default();
        for sel in [&loc.item_name, &loc.item_color, &loc.item_edit, &loc.item_dropdown] {
            assert!(sel.is_css(), "{sel} must be CSS for row-scoped lookup");
        }
    }

    #[test]
    fn test_default_locators_are_distinct() {
        let loc = MailLocators::default();
        let all = [
            &loc.username_field,
            &loc.password_field,
            &loc.welcome_close,
            &loc.add_folder,
            &loc.add_label,
            &loc.items_table,
            &loc.item_row,
            &loc.item_name,
            &loc.item_color,
            &loc.item_edit,
            &loc.item_dropdown,
            &loc.item_delete,
            &loc.notification_success,
            &loc.dialog_header,
            &loc.dialog_name,
            &loc.dialog_submit,
            &loc.dialog_cancel,
        ];
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_locators_serde_roundtrip() {
        let loc = MailLocators::default();
        let json = serde_json::to_string(&loc).unwrap();
        let back: MailLocators = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, back);
    }
}

//! Page Object Model support
//!
//! Each screen the probe drives is a page object: it owns the descriptors
//! of its screen, borrows the session driver and knows how to tell whether
//! it is the screen currently shown.

use crate::result::ProbeResult;
use async_trait::async_trait;

/// Trait for page objects representing one screen of the mail client.
///
/// # Example
///
/// ```ignore
/// let mut settings = SettingsListPage::new(&driver, &config);
/// if settings.go_to().await? {
///     assert!(settings.is_loaded().await?);
/// }
/// ```
#[async_trait]
pub trait PageObject: Send + Sync {
    /// URL the page lives at
    fn url(&self) -> &str;

    /// Wait budget for the page to show up (in milliseconds)
    fn load_timeout_ms(&self) -> u64;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether the tab currently shows this page
    async fn is_loaded(&self) -> ProbeResult<bool>;
}

/// Short page name: the type path without module prefix or generics
#[must_use]
pub fn short_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_path_and_generics() {
        assert_eq!(
            short_name("mailprobe::pages::settings::SettingsListPage<mailprobe::mock::MockMailUi>"),
            "SettingsListPage"
        );
        assert_eq!(short_name("LoginPage"), "LoginPage");
    }
}

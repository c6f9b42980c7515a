//! Login screen.

use crate::config::RunConfig;
use crate::driver::{Key, UiDriver};
use crate::locator::MailLocators;
use crate::page_object::{short_name, PageObject};
use crate::result::ProbeResult;
use crate::wait::Waiter;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Page object for the login form
#[derive(Debug)]
pub struct LoginPage<'a, D: UiDriver + ?Sized> {
    driver: &'a D,
    config: &'a RunConfig,
    locators: MailLocators,
}

impl<'a, D: UiDriver + ?Sized> LoginPage<'a, D> {
    /// Create a login page over an open session
    #[must_use]
    pub fn new(driver: &'a D, config: &'a RunConfig) -> Self {
        Self {
            driver,
            config,
            locators: MailLocators::default(),
        }
    }

    fn waiter(&self) -> Waiter<'a, D> {
        Waiter::new(self.driver).with_poll_interval(self.config.timeouts.poll_ms)
    }

    /// Sign in and report whether the landing page was reached.
    ///
    /// The login form itself is a precondition: if its fields never become
    /// clickable the timeout is returned as an error. Wrong credentials are
    /// not an error, they yield `Ok(false)`.
    pub async fn login(&self) -> ProbeResult<bool> {
        let url = self.url();
        let timeout = self.config.timeouts.element();
        info!(%url, "logging in");
        self.driver.navigate(url).await?;

        let waiter = self.waiter();
        let username = waiter
            .clickable(&self.locators.username_field, timeout)
            .await?
            .or_timeout()?;
        self.driver
            .send_keys(&username, &self.config.credentials.username)
            .await?;
        debug!(field = %self.locators.username_field, "typed username");

        let password = waiter
            .clickable(&self.locators.password_field, timeout)
            .await?
            .or_timeout()?;
        self.driver
            .send_keys(&password, &self.config.credentials.password)
            .await?;
        self.driver.send_special_key(&password, Key::Enter).await?;
        debug!(field = %self.locators.password_field, "submitted credentials");

        let token = &self.config.landing_title_token;
        let landed = waiter.title_contains(token, timeout).await?.is_ready();
        self.dismiss_welcome().await?;
        if !landed {
            warn!(%token, "landing page not reached after login");
            return Ok(false);
        }
        info!("logged in");
        Ok(true)
    }

    /// Close the one-time welcome overlay if it shows up.
    ///
    /// Returns whether an overlay was closed; not seeing one is normal.
    pub async fn dismiss_welcome(&self) -> ProbeResult<bool> {
        let close = self
            .waiter()
            .clickable(&self.locators.welcome_close, self.config.timeouts.welcome())
            .await?
            .into_option();
        let Some(close) = close else {
            debug!("no welcome overlay");
            return Ok(false);
        };
        self.driver.click(&close).await?;
        info!(button = %self.locators.welcome_close, "closed welcome overlay");
        Ok(true)
    }
}

#[async_trait]
impl<D: UiDriver + ?Sized> PageObject for LoginPage<'_, D> {
    fn url(&self) -> &str {
        &self.config.login_url
    }

    fn load_timeout_ms(&self) -> u64 {
        self.config.timeouts.element_ms
    }

    fn page_name(&self) -> &str {
        short_name(std::any::type_name::<Self>())
    }

    async fn is_loaded(&self) -> ProbeResult<bool> {
        Ok(self
            .driver
            .find_one(&self.locators.username_field)
            .await?
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, Timeouts};
    use crate::mock::MockMailUi;
    use crate::result::ProbeError;

    fn config(user: &str, pass: &str) -> RunConfig {
        RunConfig::new(Credentials::new(user, pass)).with_timeouts(Timeouts::fast())
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_reaches_inbox_and_closes_welcome() {
        let ui = MockMailUi::with_credentials("alice", "pw");
        let cfg = config("alice", "pw");
        let page = LoginPage::new(&ui, &cfg);

        assert!(page.login().await.unwrap());
        assert!(!ui.welcome_open());
        assert!(ui.was_called("click:WelcomeClose"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_without_welcome_overlay() {
        let ui = MockMailUi::with_credentials("alice", "pw").with_welcome(false);
        let cfg = config("alice", "pw");
        let page = LoginPage::new(&ui, &cfg);

        assert!(page.login().await.unwrap());
        assert!(!ui.was_called("click:WelcomeClose"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_welcome_closed_even_when_landing_title_differs() {
        let ui = MockMailUi::with_credentials("alice", "pw");
        let mut cfg = config("alice", "pw");
        cfg.landing_title_token = "Posteingang".to_string();
        let page = LoginPage::new(&ui, &cfg);

        assert!(!page.login().await.unwrap());
        assert!(ui.was_called("click:WelcomeClose"));
        assert!(!ui.welcome_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_password_is_false_not_error() {
        let ui = MockMailUi::with_credentials("alice", "pw");
        let cfg = config("alice", "nope");
        let page = LoginPage::new(&ui, &cfg);

        assert!(!page.login().await.unwrap());
        assert!(page.is_loaded().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_form_is_a_timeout_error() {
        let ui = MockMailUi::with_credentials("alice", "pw")
            .with_urls("https://mail.example/elsewhere", "https://mail.example/settings");
        let cfg = config("alice", "pw");
        let page = LoginPage::new(&ui, &cfg);

        let err = page.login().await.unwrap_err();
        assert!(matches!(err, ProbeError::Timeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_welcome_without_overlay() {
        let ui = MockMailUi::new();
        let cfg = config("demo", "demo");
        let page = LoginPage::new(&ui, &cfg);
        assert!(!page.dismiss_welcome().await.unwrap());
    }

    #[test]
    fn test_page_metadata() {
        let ui = MockMailUi::new();
        let cfg = config("demo", "demo");
        let page = LoginPage::new(&ui, &cfg);
        assert_eq!(page.page_name(), "LoginPage");
        assert_eq!(page.url(), crate::config::DEFAULT_LOGIN_URL);
        assert_eq!(page.load_timeout_ms(), 200);
    }
}

//! Wait Mechanisms
//!
//! Bounded polling against live UI state.
//!
//! Every wait has a timeout and every timeout is a value
//! ([`WaitOutcome::TimedOut`]), not an error. Callers for whom absence is
//! information (no dialog, no toast, empty list) inspect the outcome; callers
//! for whom the element is a precondition convert it with
//! [`WaitOutcome::or_timeout`]. Driver failures always propagate.
//!
//! `present` and `clickable` are deliberately separate: the mail client
//! renders controls before they accept input.

use crate::driver::{ElementHandle, UiDriver};
use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT OUTCOME
// =============================================================================

/// Result of a wait operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The condition produced a value
    Ready {
        /// Value produced by the probe
        value: T,
        /// Time spent waiting
        elapsed: Duration,
    },
    /// The timeout elapsed first
    TimedOut {
        /// Configured timeout
        timeout: Duration,
        /// Description of what was waited for
        waited_for: String,
    },
}

impl<T> WaitOutcome<T> {
    /// Whether the condition was met
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// The value, with a timeout read as absence
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Ready { value, .. } => Some(value),
            Self::TimedOut { .. } => None,
        }
    }

    /// The value, with a timeout turned into [`ProbeError::Timeout`]
    pub fn or_timeout(self) -> ProbeResult<T> {
        match self {
            Self::Ready { value, .. } => Ok(value),
            Self::TimedOut {
                timeout,
                waited_for,
            } => Err(ProbeError::Timeout {
                ms: timeout.as_millis() as u64,
                waited_for,
            }),
        }
    }
}

// =============================================================================
// POLL LOOP
// =============================================================================

/// Poll `probe` until it yields `Some`, an error, or `timeout` elapses.
///
/// The probe always runs at least once, so a zero timeout is a single check.
pub async fn wait_until<T, F, Fut>(
    waited_for: impl Into<String>,
    options: WaitOptions,
    mut probe: F,
) -> ProbeResult<WaitOutcome<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<Option<T>>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let poll_interval = options.poll_interval();

    loop {
        if let Some(value) = probe().await? {
            return Ok(WaitOutcome::Ready {
                value,
                elapsed: start.elapsed(),
            });
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            let waited_for = waited_for.into();
            debug!(%waited_for, timeout_ms = options.timeout_ms, "wait timed out");
            return Ok(WaitOutcome::TimedOut {
                timeout,
                waited_for,
            });
        }
        tokio::time::sleep(poll_interval.min(timeout - elapsed)).await;
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Element waits bound to one driver
#[derive(Debug)]
pub struct Waiter<'a, D: UiDriver + ?Sized> {
    driver: &'a D,
    poll_interval_ms: u64,
}

impl<'a, D: UiDriver + ?Sized> Waiter<'a, D> {
    /// Create a waiter polling at the default interval
    pub const fn new(driver: &'a D) -> Self {
        Self {
            driver,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    fn options(&self, timeout: Duration) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(timeout.as_millis() as u64)
            .with_poll_interval(self.poll_interval_ms)
    }

    /// Wait for an element to exist in the render tree
    pub async fn present(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> ProbeResult<WaitOutcome<ElementHandle>> {
        let driver = self.driver;
        wait_until(
            format!("present {selector}"),
            self.options(timeout),
            move || driver.find_one(selector),
        )
        .await
    }

    /// Wait for at least one element to exist; yields all matches
    pub async fn present_all(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> ProbeResult<WaitOutcome<Vec<ElementHandle>>> {
        let driver = self.driver;
        wait_until(
            format!("any {selector}"),
            self.options(timeout),
            move || probe_all(driver, selector),
        )
        .await
    }

    /// Wait for an element that is rendered, visible and enabled
    pub async fn clickable(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> ProbeResult<WaitOutcome<ElementHandle>> {
        let driver = self.driver;
        wait_until(
            format!("clickable {selector}"),
            self.options(timeout),
            move || probe_clickable(driver, selector),
        )
        .await
    }

    /// Wait for an element whose text is exactly `expected`
    pub async fn text_equals(
        &self,
        selector: &Selector,
        expected: &str,
        timeout: Duration,
    ) -> ProbeResult<WaitOutcome<ElementHandle>> {
        let driver = self.driver;
        wait_until(
            format!("{selector} with text {expected:?}"),
            self.options(timeout),
            move || probe_text(driver, selector, expected),
        )
        .await
    }

    /// Wait for the document title to equal `expected`
    pub async fn title_is(&self, expected: &str, timeout: Duration) -> ProbeResult<WaitOutcome<String>> {
        let driver = self.driver;
        wait_until(
            format!("title {expected:?}"),
            self.options(timeout),
            move || probe_title(driver, move |t| t == expected),
        )
        .await
    }

    /// Wait for the document title to contain `token`
    pub async fn title_contains(
        &self,
        token: &str,
        timeout: Duration,
    ) -> ProbeResult<WaitOutcome<String>> {
        let driver = self.driver;
        wait_until(
            format!("title containing {token:?}"),
            self.options(timeout),
            move || probe_title(driver, move |t| t.contains(token)),
        )
        .await
    }
}

async fn probe_all<D: UiDriver + ?Sized>(
    driver: &D,
    selector: &Selector,
) -> ProbeResult<Option<Vec<ElementHandle>>> {
    let found = driver.find_all(selector).await?;
    Ok((!found.is_empty()).then_some(found))
}

// A handle can go stale between lookup and inspection when the page
// re-renders; that only means "not yet", the next poll re-queries.
async fn probe_clickable<D: UiDriver + ?Sized>(
    driver: &D,
    selector: &Selector,
) -> ProbeResult<Option<ElementHandle>> {
    for handle in driver.find_all(selector).await? {
        match driver.is_clickable(&handle).await {
            Ok(true) => return Ok(Some(handle)),
            Ok(false) | Err(ProbeError::StaleElement { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

async fn probe_text<D: UiDriver + ?Sized>(
    driver: &D,
    selector: &Selector,
    expected: &str,
) -> ProbeResult<Option<ElementHandle>> {
    for handle in driver.find_all(selector).await? {
        match driver.read_text(&handle).await {
            Ok(text) if text == expected => return Ok(Some(handle)),
            Ok(_) | Err(ProbeError::StaleElement { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

async fn probe_title<D: UiDriver + ?Sized>(
    driver: &D,
    matches: impl Fn(&str) -> bool,
) -> ProbeResult<Option<String>> {
    let title = driver.current_title().await?;
    Ok(matches(&title).then_some(title))
}

// =============================================================================
// TESTS
// =============================================================================

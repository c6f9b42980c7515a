//! Mailprobe: page objects and CRUD verification for a web mail client
//!
//! Mailprobe drives the "Folders/Labels" settings screen of a web mail
//! client, creating, renaming, recolouring and deleting items, and checks
//! after every step that the list and the toasts reflect the change.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   ┌──────────┐   ┌──────────────────┐   ┌──────────────┐     │
//! │   │ workflow │──►│ LoginPage        │──►│ Waiter       │     │
//! │   │ (checks) │   │ SettingsListPage │   │ resolver     │     │
//! │   └──────────┘   └──────────────────┘   └──────┬───────┘     │
//! │                                                ▼             │
//! │                          UiDriver (CdpDriver | MockMailUi)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The list re-renders after every mutation, so page objects re-query the
//! DOM for every decision and never keep element handles across actions.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Real browser control over CDP (`CdpDriver` needs the `browser` feature)
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod browser;

/// Run configuration and its validation
#[allow(clippy::missing_errors_doc)]
pub mod config;

#[allow(clippy::missing_errors_doc)]
mod driver;

mod locator;

/// Log setup
#[allow(clippy::missing_errors_doc)]
pub mod logging;

/// Simulated mail client for tests and demos
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::too_many_lines
)]
pub mod mock;

#[allow(clippy::missing_errors_doc)]
mod page_object;

/// Page objects for the login and folders/labels screens
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]
pub mod pages;

/// Fixed colour palette of the item dialog
#[allow(clippy::missing_errors_doc)]
pub mod palette;

/// Name resolution over list snapshots
pub mod resolver;

mod result;

/// Bounded waits against live UI state
#[allow(
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::missing_const_for_fn
)]
pub mod wait;

/// CRUD scenarios and verdicts
#[allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]
pub mod workflow;

#[cfg(feature = "browser")]
pub use browser::CdpDriver;
pub use browser::BrowserConfig;
pub use config::{BrowserOptions, Credentials, RunConfig, Timeouts};
pub use driver::{ElementHandle, Key, UiDriver};
pub use locator::{MailLocators, Selector};
pub use mock::{MenuEffect, MockItem, MockMailUi};
pub use page_object::PageObject;
pub use pages::{
    ItemDescriptor, ItemKind, LoginPage, OperationResult, PageState, SettingsListPage,
};
pub use palette::{PaletteColor, PALETTE};
pub use resolver::ListItem;
pub use result::{ProbeError, ProbeResult};
pub use wait::{WaitOptions, WaitOutcome, Waiter};
pub use workflow::{CheckFailure, CrudPlan, ScenarioReport, SuiteReport};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        CheckFailure, CrudPlan, ElementHandle, ItemKind, LoginPage, MailLocators, MockMailUi,
        OperationResult, PageObject, ProbeError, ProbeResult, RunConfig, Selector,
        SettingsListPage, UiDriver, WaitOutcome, Waiter,
    };
}

//! Result and error types for Mailprobe.

use thiserror::Error;

/// Result type for Mailprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur in Mailprobe
///
/// Expected UI absences (an item that is not rendered, a notification that
/// never showed up) are not errors: page objects report them as `false`,
/// `None` or a failed [`crate::OperationResult`]. What remains here is either
/// a driver/transport failure or a programming error in the caller.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The automation driver failed (session gone, protocol error, ...)
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A wait that was a precondition for the next step timed out
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the awaited condition
        waited_for: String,
    },

    /// Element handle no longer refers to a rendered element
    #[error("Stale element handle: {id}")]
    StaleElement {
        /// Handle id
        id: String,
    },

    /// Selector cannot be used for the requested lookup
    #[error("Unsupported selector {selector}: {message}")]
    UnsupportedSelector {
        /// Selector text
        selector: String,
        /// Error message
        message: String,
    },

    /// Unrecognised item kind
    #[error("Unknown item kind \"{kind}\" (expected folder or label)")]
    InvalidKind {
        /// Kind as given by the caller
        kind: String,
    },

    /// Colour name not present in the palette
    #[error("Unknown palette colour \"{name}\"")]
    UnknownColor {
        /// Colour name as given by the caller
        name: String,
    },

    /// Configuration missing or malformed
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

//! Error types for the CLI

use mailprobe::ProbeError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// The landing page never showed after submitting credentials
    #[error("Login failed: landing page not reached from {url}")]
    LoginFailed {
        /// Login URL
        url: String,
    },

    /// The settings page never showed its title
    #[error("Settings page not loaded: title {title:?} not seen")]
    SettingsNotLoaded {
        /// Expected title
        title: String,
    },

    /// Live runs need the `browser` feature
    #[error("Browser support not compiled in. Rebuild with --features browser")]
    BrowserUnavailable,

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Mailprobe library error
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

impl CliError {
    /// Process exit code: 2 for configuration problems, 1 otherwise
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Probe(ProbeError::Config { .. }) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_with_two() {
        let err = CliError::from(ProbeError::config("bad"));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Configuration error: bad");
    }

    #[test]
    fn test_stdout_failure_is_io_error() {
        let err = CliError::from(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        assert_eq!(CliError::BrowserUnavailable.exit_code(), 1);
        let err = CliError::from(ProbeError::driver("session closed"));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Driver error: session closed");
    }
}

//! Log setup: stderr plus an optional plain-text log file.

use crate::result::{ProbeError, ProbeResult};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// How logs are emitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Filter directive (e.g. `debug`); `None` reads `RUST_LOG`, then `info`
    pub level: Option<String>,
    /// JSON lines on stderr instead of human-readable text
    pub json: bool,
    /// Also write logs to this file (truncated)
    pub file: Option<PathBuf>,
}

impl LogOptions {
    /// Filter for the configured level
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        match &self.level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(options: &LogOptions) -> ProbeResult<()> {
    let console = if options.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    let file = match &options.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(options.filter())
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| ProbeError::config(format!("cannot install logger: {e}")))
}

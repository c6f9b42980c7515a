//! Mailprobe CLI Library
//!
//! Command-line interface for running the folders/labels CRUD suite
//! against a live mail client or the built-in simulation.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod error;
mod output;
mod runner;

pub use commands::{
    CheckConfigArgs, Cli, Commands, DemoArgs, FaultArg, KindArg, PaletteArgs, RunArgs, SuiteArgs,
};
pub use error::{CliError, CliResult};
pub use output::{palette_rows, render_palette_text, OutputFormat, PaletteRow, Reporter};
pub use runner::{check_config, log_options, plans, run_demo, run_live, run_session};

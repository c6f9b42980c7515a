//! CLI command definitions using clap

use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use mailprobe::ItemKind;
use std::path::PathBuf;

/// Mailprobe: verify folders/labels CRUD in a web mail client
#[derive(Parser, Debug)]
#[command(name = "mailprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with a real browser and run the CRUD suite
    Run(RunArgs),

    /// Run the CRUD suite against the built-in simulated mail client
    Demo(DemoArgs),

    /// List the colour palette
    Palette(PaletteArgs),

    /// Load and validate a configuration file
    CheckConfig(CheckConfigArgs),
}

/// Which item kinds to exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum KindArg {
    /// Folders only
    Folder,
    /// Labels only
    Label,
    /// Folders, then labels
    #[default]
    All,
}

impl KindArg {
    /// Kinds in execution order
    #[must_use]
    pub fn kinds(self) -> Vec<ItemKind> {
        match self {
            Self::Folder => vec![ItemKind::Folder],
            Self::Label => vec![ItemKind::Label],
            Self::All => ItemKind::ALL.to_vec(),
        }
    }
}

/// Options shared by every suite run
#[derive(Args, Debug, Clone)]
pub struct SuiteArgs {
    /// Item kinds to exercise
    #[arg(long, value_enum, default_value = "all")]
    pub kind: KindArg,

    /// Base item name (default: folder1 / label1)
    #[arg(long)]
    pub name: Option<String>,

    /// Seed for the colour choice (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Suite options
    #[command(flatten)]
    pub suite: SuiteArgs,
}

/// Simulated faults for the demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FaultArg {
    /// Never show success toasts
    NoNotifications,
    /// Save items without the chosen colour
    IgnoreColor,
    /// Move a row to the top when its options menu opens
    ReorderMenu,
    /// Re-render the list while row names are being read
    StaleReads,
}

/// Arguments for the demo command
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Directory for failure screenshots
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Make the simulated client misbehave
    #[arg(long, value_enum)]
    pub fault: Option<FaultArg>,

    /// Suite options
    #[command(flatten)]
    pub suite: SuiteArgs,
}

/// Arguments for the palette command
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the check-config command
#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: PathBuf,
}

//! Mailprobe CLI: folders/labels CRUD verification
//!
//! ## Usage
//!
//! ```bash
//! mailprobe run --config account.json            # Live run in Chromium
//! mailprobe run --config account.json --kind label --seed 7
//! mailprobe demo --format json                   # Simulated mail client
//! mailprobe palette                              # List colours
//! mailprobe check-config --config account.json   # Validate configuration
//! ```

use clap::Parser;
use mailprobe::{logging, SuiteReport};
use mailprobe_cli::{
    check_config, log_options, palette_rows, render_palette_text, run_demo, run_live, Cli,
    CliResult, Commands, OutputFormat, Reporter, SuiteArgs,
};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let options = log_options(cli.verbose, cli.quiet, cli.log_file.clone(), cli.log_json);
    if let Err(e) = logging::init(&options) {
        eprintln!("Error: {e}");
        return ExitCode::from(2);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Returns whether everything that ran passed
async fn run(cli: Cli) -> CliResult<bool> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Run(args) => {
            let report = run_live(&args).await?;
            print_report(&report, &args.suite, quiet)
        }
        Commands::Demo(args) => {
            let report = run_demo(&args).await?;
            print_report(&report, &args.suite, quiet)
        }
        Commands::Palette(args) => {
            let text = match args.format {
                OutputFormat::Text => render_palette_text(),
                OutputFormat::Json => serde_json::to_string_pretty(&palette_rows())?,
            };
            writeln!(io::stdout().lock(), "{text}")?;
            Ok(true)
        }
        Commands::CheckConfig(args) => {
            let config = check_config(&args)?;
            writeln!(
                io::stdout().lock(),
                "{} is valid (user {}, settings {})",
                args.config.display(),
                config.credentials.username,
                config.settings_url
            )?;
            Ok(true)
        }
    }
}

fn print_report(report: &SuiteReport, suite: &SuiteArgs, quiet: bool) -> CliResult<bool> {
    match suite.format {
        OutputFormat::Text => Reporter::new(console::colors_enabled(), quiet).suite(report)?,
        OutputFormat::Json => {
            writeln!(io::stdout().lock(), "{}", serde_json::to_string_pretty(report)?)?;
        }
    }
    Ok(report.passed())
}

//! Suite runner: configuration → driver → pages → workflow

use crate::commands::{CheckConfigArgs, DemoArgs, FaultArg, RunArgs, SuiteArgs};
use crate::error::{CliError, CliResult};
use mailprobe::logging::LogOptions;
use mailprobe::workflow::run_crud_suite;
use mailprobe::{
    Credentials, CrudPlan, LoginPage, MenuEffect, MockMailUi, PageObject, RunConfig,
    SettingsListPage, SuiteReport, Timeouts, UiDriver,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Log options from the global flags
#[must_use]
pub fn log_options(verbose: u8, quiet: bool, file: Option<std::path::PathBuf>, json: bool) -> LogOptions {
    let level = if quiet {
        Some("warn".to_string())
    } else {
        match verbose {
            0 => None,
            1 => Some("debug".to_string()),
            _ => Some("trace".to_string()),
        }
    };
    LogOptions { level, json, file }
}

/// One plan per selected kind, colours drawn from a (possibly seeded) RNG
#[must_use]
pub fn plans(args: &SuiteArgs) -> Vec<CrudPlan> {
    let mut rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    args.kind
        .kinds()
        .into_iter()
        .map(|kind| match &args.name {
            Some(name) => CrudPlan::named(kind, name.clone(), &mut rng),
            None => CrudPlan::random(kind, &mut rng),
        })
        .collect()
}

/// Log in, open the settings page and run the suite on `driver`
pub async fn run_session<D: UiDriver + ?Sized>(
    driver: &D,
    config: &RunConfig,
    plans: &[CrudPlan],
) -> CliResult<SuiteReport> {
    let login = LoginPage::new(driver, config);
    if !login.login().await? {
        return Err(CliError::LoginFailed {
            url: login.url().to_string(),
        });
    }

    let mut settings = SettingsListPage::new(driver, config);
    if !settings.go_to().await? {
        return Err(CliError::SettingsNotLoaded {
            title: config.settings_title.clone(),
        });
    }
    Ok(run_crud_suite(&mut settings, plans).await?)
}

/// Load and validate a configuration file
pub fn check_config(args: &CheckConfigArgs) -> CliResult<RunConfig> {
    Ok(RunConfig::load(&args.config)?)
}

/// Run the suite against the simulated client
pub async fn run_demo(args: &DemoArgs) -> CliResult<SuiteReport> {
    let config = RunConfig::new(Credentials::new("demo", "demo"))
        .with_timeouts(Timeouts::fast())
        .with_data_dir(&args.data_dir);
    let ui = match args.fault {
        None => MockMailUi::new(),
        Some(FaultArg::NoNotifications) => MockMailUi::new().without_notifications(),
        Some(FaultArg::IgnoreColor) => MockMailUi::new().ignoring_color(),
        Some(FaultArg::ReorderMenu) => MockMailUi::new().with_menu_effect(MenuEffect::MoveToTop),
        Some(FaultArg::StaleReads) => MockMailUi::new().with_stale_name_reads(2),
    };
    let plans = plans(&args.suite);
    info!(plans = plans.len(), fault = ?args.fault, "running demo suite");
    run_session(&ui, &config, &plans).await
}

/// Run the suite in a real browser
#[cfg(feature = "browser")]
pub async fn run_live(args: &RunArgs) -> CliResult<SuiteReport> {
    use mailprobe::{BrowserConfig, CdpDriver};

    let mut config = RunConfig::load(&args.config)?;
    if args.headed {
        config.browser.headless = false;
    }
    let plans = plans(&args.suite);
    let driver = CdpDriver::launch(BrowserConfig::from(&config.browser)).await?;
    let result = run_session(&driver, &config, &plans).await;
    driver.close().await?;
    result
}

/// Run the suite in a real browser
#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
pub async fn run_live(args: &RunArgs) -> CliResult<SuiteReport> {
    RunConfig::load(&args.config)?;
    Err(CliError::BrowserUnavailable)
}

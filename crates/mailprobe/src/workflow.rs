//! CRUD scenarios over the settings page, with verdicts.
//!
//! A [`CrudPlan`] fixes everything a create → rename → delete run needs,
//! including both colours, so the colour an action used is the colour its
//! check expects. Each scenario yields a [`ScenarioReport`] listing every
//! failed check; any failure also captures a screenshot into the configured
//! data directory.

use crate::driver::UiDriver;
use crate::pages::{ItemDescriptor, ItemKind, OperationResult, SettingsListPage};
use crate::palette::{self, PaletteColor};
use crate::result::{ProbeError, ProbeResult};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

// =============================================================================
// PLAN
// =============================================================================

/// Names and colours for one create → rename → delete run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrudPlan {
    /// Folder or label
    pub kind: ItemKind,
    /// Name the item is created with
    pub name: String,
    /// Name the item is renamed to
    pub renamed: String,
    /// Colour at creation
    pub color: &'static PaletteColor,
    /// Colour after the rename
    pub new_color: &'static PaletteColor,
}

impl CrudPlan {
    /// Plan with explicit names and colours
    #[must_use]
    pub fn new(
        kind: ItemKind,
        name: impl Into<String>,
        renamed: impl Into<String>,
        color: &'static PaletteColor,
        new_color: &'static PaletteColor,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            renamed: renamed.into(),
            color,
            new_color,
        }
    }

    /// `folder1` → `folder1_modified` (or `label1`…) with random colours
    pub fn random<R: Rng + ?Sized>(kind: ItemKind, rng: &mut R) -> Self {
        Self::named(kind, format!("{kind}1"), rng)
    }

    /// `name` → `name_modified` with random colours
    pub fn named<R: Rng + ?Sized>(kind: ItemKind, name: impl Into<String>, rng: &mut R) -> Self {
        let name = name.into();
        let renamed = format!("{name}_modified");
        let color = palette::choose(rng);
        let new_color = palette::choose(rng);
        Self::new(kind, name, renamed, color, new_color)
    }

    /// What the item should look like after creation
    #[must_use]
    pub fn created(&self) -> ItemDescriptor {
        ItemDescriptor::new(self.name.clone(), self.color)
    }

    /// What the item should look like after the rename
    #[must_use]
    pub fn edited(&self) -> ItemDescriptor {
        ItemDescriptor::new(self.renamed.clone(), self.new_color)
    }
}

// =============================================================================
// REPORTS
// =============================================================================

/// One failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckFailure {
    /// Expected success toast never showed
    NotificationMissing {
        /// Toast text waited for
        expected: String,
    },
    /// Item should be in the list and is not
    NotDisplayed {
        /// Item name
        name: String,
    },
    /// Item should be gone and is not
    StillDisplayed {
        /// Item name
        name: String,
    },
    /// Item has a different colour style than the one chosen
    WrongColor {
        /// Item name
        name: String,
        /// Style for the chosen colour
        expected: String,
        /// Style actually rendered
        actual: Option<String>,
    },
    /// The page action itself did not go through
    ActionFailed {
        /// Action name
        action: String,
        /// Why it failed
        reason: String,
    },
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotificationMissing { expected } => {
                write!(f, "notification {expected:?} not shown")
            }
            Self::NotDisplayed { name } => write!(f, "{name:?} is not displayed"),
            Self::StillDisplayed { name } => write!(f, "{name:?} is still displayed"),
            Self::WrongColor {
                name,
                expected,
                actual,
            } => write!(
                f,
                "{name:?} colour is {}, expected {expected:?}",
                actual.as_deref().map_or_else(|| "missing".to_string(), |a| format!("{a:?}"))
            ),
            Self::ActionFailed { action, reason } => write!(f, "{action} failed: {reason}"),
        }
    }
}

/// Verdict of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    /// Scenario name, e.g. `create_folder`
    pub name: String,
    /// Item kind exercised
    pub kind: ItemKind,
    /// True when no check failed
    pub passed: bool,
    /// Every failed check, in the order checked
    pub failures: Vec<CheckFailure>,
    /// Screenshot taken on failure
    pub screenshot: Option<PathBuf>,
    /// Wall time of the scenario
    pub duration_ms: u64,
}

/// Verdicts of a whole suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Run identifier
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Scenario verdicts in execution order
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Whether every scenario passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.scenarios.iter().all(|s| s.passed)
    }

    /// Number of passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed).count()
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.scenarios.len() - self.passed_count()
    }
}

// =============================================================================
// SCENARIOS
// =============================================================================

struct Checks {
    name: String,
    kind: ItemKind,
    started: Instant,
    failures: Vec<CheckFailure>,
}

impl Checks {
    fn new(action: &str, kind: ItemKind) -> Self {
        let name = format!("{action}_{kind}");
        info!("{}", "=".repeat(40));
        info!(scenario = %name, "starting scenario");
        Self {
            name,
            kind,
            started: Instant::now(),
            failures: Vec::new(),
        }
    }

    fn fail(&mut self, failure: CheckFailure) {
        warn!(scenario = %self.name, %failure, "check failed");
        self.failures.push(failure);
    }

    fn action(&mut self, action: &str, result: &OperationResult) -> bool {
        if !result.succeeded {
            self.fail(CheckFailure::ActionFailed {
                action: action.to_string(),
                reason: result.reason.clone().unwrap_or_default(),
            });
        }
        result.succeeded
    }

    async fn finish<D: UiDriver + ?Sized>(
        self,
        page: &SettingsListPage<'_, D>,
    ) -> ScenarioReport {
        let passed = self.failures.is_empty();
        let screenshot = if passed {
            None
        } else {
            capture_failure(page, &self.name).await
        };
        let duration_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(scenario = %self.name, passed, duration_ms, "scenario finished");
        ScenarioReport {
            name: self.name,
            kind: self.kind,
            passed,
            failures: self.failures,
            screenshot,
            duration_ms,
        }
    }
}

// A lost screenshot must not hide the verdict it was meant to illustrate.
async fn capture_failure<D: UiDriver + ?Sized>(
    page: &SettingsListPage<'_, D>,
    scenario: &str,
) -> Option<PathBuf> {
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
    let path = page.config().data_dir.join(format!("{scenario}_{stamp}.png"));
    match page.driver().capture_screenshot(&path).await {
        Ok(()) => {
            info!(path = %path.display(), "captured failure screenshot");
            Some(path)
        }
        Err(e) => {
            let error = ProbeError::Screenshot {
                message: e.to_string(),
            };
            warn!(%error, "could not capture failure screenshot");
            None
        }
    }
}

async fn check_displayed<D: UiDriver + ?Sized>(
    page: &SettingsListPage<'_, D>,
    checks: &mut Checks,
    expected: &ItemDescriptor,
) -> ProbeResult<()> {
    if !page.item_is_displayed(&expected.name).await? {
        checks.fail(CheckFailure::NotDisplayed {
            name: expected.name.clone(),
        });
        return Ok(());
    }
    let style = expected.color.expected_style();
    if !page.item_color_matches(&expected.name, &style).await? {
        checks.fail(CheckFailure::WrongColor {
            name: expected.name.clone(),
            expected: style,
            actual: page.item_color(&expected.name).await?,
        });
    }
    Ok(())
}

async fn check_notification<D: UiDriver + ?Sized>(
    page: &SettingsListPage<'_, D>,
    checks: &mut Checks,
    expected: String,
) -> ProbeResult<()> {
    let timeout = page.config().timeouts.notification();
    if !page.wait_for_success_notification(&expected, timeout).await? {
        checks.fail(CheckFailure::NotificationMissing { expected });
    }
    Ok(())
}

/// Create the item and check toast, presence and colour
pub async fn create_scenario<D: UiDriver + ?Sized>(
    page: &mut SettingsListPage<'_, D>,
    plan: &CrudPlan,
) -> ProbeResult<ScenarioReport> {
    let mut checks = Checks::new("create", plan.kind);
    let expected = plan.created();
    info!(name = %expected.name, color = %expected.color, "parameters");

    let result = page.add_item(plan.kind, &expected.name, expected.color).await?;
    if checks.action("add", &result) {
        check_notification(page, &mut checks, format!("{} created", expected.name)).await?;
        check_displayed(page, &mut checks, &expected).await?;
    }
    Ok(checks.finish(page).await)
}

/// Rename and recolour the item and check toast, old name gone, new name and colour
pub async fn rename_scenario<D: UiDriver + ?Sized>(
    page: &mut SettingsListPage<'_, D>,
    plan: &CrudPlan,
) -> ProbeResult<ScenarioReport> {
    let mut checks = Checks::new("rename", plan.kind);
    let expected = plan.edited();
    info!(from = %plan.name, to = %expected.name, color = %expected.color, "parameters");

    let result = page
        .edit_item(&plan.name, &expected.name, expected.color)
        .await?;
    if checks.action("edit", &result) {
        check_notification(page, &mut checks, format!("{} updated", expected.name)).await?;
        if plan.name != expected.name && page.item_is_displayed(&plan.name).await? {
            checks.fail(CheckFailure::StillDisplayed {
                name: plan.name.clone(),
            });
        }
        check_displayed(page, &mut checks, &expected).await?;
    }
    Ok(checks.finish(page).await)
}

/// Delete the renamed item and check toast and absence
pub async fn delete_scenario<D: UiDriver + ?Sized>(
    page: &mut SettingsListPage<'_, D>,
    plan: &CrudPlan,
) -> ProbeResult<ScenarioReport> {
    let mut checks = Checks::new("delete", plan.kind);
    let name = &plan.renamed;
    info!(%name, "parameters");

    let result = page.delete_item(name).await?;
    if checks.action("delete", &result) {
        check_notification(page, &mut checks, format!("{name} removed")).await?;
        if page.item_is_displayed(name).await? {
            checks.fail(CheckFailure::StillDisplayed { name: name.clone() });
        }
    }
    Ok(checks.finish(page).await)
}

/// Run create, rename and delete for every plan, in order.
///
/// Any dialog a scenario leaves open is cancelled before the next one runs.
/// Failed checks never stop the suite; driver errors do.
pub async fn run_crud_suite<D: UiDriver + ?Sized>(
    page: &mut SettingsListPage<'_, D>,
    plans: &[CrudPlan],
) -> ProbeResult<SuiteReport> {
    let mut report = SuiteReport {
        run_id: Uuid::new_v4(),
        started_at: Utc::now(),
        scenarios: Vec::with_capacity(plans.len() * 3),
    };
    info!(run_id = %report.run_id, plans = plans.len(), "starting CRUD suite");

    for plan in plans {
        report.scenarios.push(create_scenario(page, plan).await?);
        page.close_open_dialog().await?;
        report.scenarios.push(rename_scenario(page, plan).await?);
        page.close_open_dialog().await?;
        report.scenarios.push(delete_scenario(page, plan).await?);
        page.close_open_dialog().await?;
    }

    info!(
        passed = report.passed_count(),
        failed = report.failed_count(),
        "CRUD suite finished"
    );
    Ok(report)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, RunConfig, Timeouts};
    use crate::mock::{MockItem, MockMailUi};
    use crate::palette::PALETTE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(data_dir: &std::path::Path) -> RunConfig {
        RunConfig::new(Credentials::new("demo", "demo"))
            .with_timeouts(Timeouts::fast())
            .with_data_dir(data_dir)
    }

    fn folder_plan() -> CrudPlan {
        CrudPlan::new(
            ItemKind::Folder,
            "folder1",
            "folder1_modified",
            &PALETTE[2],
            &PALETTE[9],
        )
    }

    mod plan_tests {
        use super::*;

        #[test]
        fn test_random_plan_uses_default_names() {
            let plan = CrudPlan::random(ItemKind::Label, &mut StdRng::seed_from_u64(1));
            assert_eq!(plan.name, "label1");
            assert_eq!(plan.renamed, "label1_modified");
            assert!(PALETTE.contains(plan.color));
            assert!(PALETTE.contains(plan.new_color));
        }

        #[test]
        fn test_seeded_plans_repeat() {
            let a = CrudPlan::random(ItemKind::Folder, &mut StdRng::seed_from_u64(42));
            let b = CrudPlan::random(ItemKind::Folder, &mut StdRng::seed_from_u64(42));
            assert_eq!(a, b);
        }

        #[test]
        fn test_descriptors_carry_plan_colours() {
            let plan = folder_plan();
            assert_eq!(plan.created(), ItemDescriptor::new("folder1", &PALETTE[2]));
            assert_eq!(plan.edited(), ItemDescriptor::new("folder1_modified", &PALETTE[9]));
        }

        #[test]
        fn test_failure_display() {
            let f = CheckFailure::WrongColor {
                name: "a".to_string(),
                expected: "x".to_string(),
                actual: None,
            };
            assert_eq!(f.to_string(), "\"a\" colour is missing, expected \"x\"");
            let json = serde_json::to_value(CheckFailure::StillDisplayed {
                name: "b".to_string(),
            })
            .unwrap();
            assert_eq!(json["check"], "still_displayed");
        }
    }

    mod scenario_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_full_folder_cycle_passes() {
            let dir = tempfile::tempdir().unwrap();
            let cfg = config(dir.path());
            let ui = MockMailUi::signed_in().with_submit_latency(2);
            let mut page = SettingsListPage::new(&ui, &cfg);

            let report = run_crud_suite(&mut page, &[folder_plan()]).await.unwrap();
            let names: Vec<_> = report.scenarios.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, ["create_folder", "rename_folder", "delete_folder"]);
            assert!(report.passed(), "{report:?}");
            assert!(ui.items().is_empty());
            assert!(ui.screenshots().is_empty());
        }

        #[tokio::test(start_paused = true)]
        async fn test_folders_and_labels_in_one_suite() {
            let dir = tempfile::tempdir().unwrap();
            let cfg = config(dir.path());
            let ui = MockMailUi::signed_in();
            let mut page = SettingsListPage::new(&ui, &cfg);
            let mut rng = StdRng::seed_from_u64(9);
            let plans = [
                CrudPlan::random(ItemKind::Folder, &mut rng),
                CrudPlan::random(ItemKind::Label, &mut rng),
            ];

            let report = run_crud_suite(&mut page, &plans).await.unwrap();
            assert_eq!(report.scenarios.len(), 6);
            assert_eq!(report.passed_count(), 6);
            assert_eq!(report.failed_count(), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_missing_notifications_are_reported_with_screenshot() {
            let dir = tempfile::tempdir().unwrap();
            let cfg = config(dir.path());
            let ui = MockMailUi::signed_in().without_notifications();
            let mut page = SettingsListPage::new(&ui, &cfg);

            let report = create_scenario(&mut page, &folder_plan()).await.unwrap();
            assert!(!report.passed);
            assert_eq!(
                report.failures,
                vec![CheckFailure::NotificationMissing {
                    expected: "folder1 created".to_string()
                }]
            );
            let shot = report.screenshot.unwrap();
            assert!(shot.starts_with(dir.path()));
            assert!(shot
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("create_folder_"));
            assert!(shot.exists());
        }

        #[tokio::test(start_paused = true)]
        async fn test_dropped_colour_is_wrong_color() {
            let dir = tempfile::tempdir().unwrap();
            let cfg = config(dir.path());
            let ui = MockMailUi::signed_in().ignoring_color();
            let mut page = SettingsListPage::new(&ui, &cfg);

            let report = create_scenario(&mut page, &folder_plan()).await.unwrap();
            assert_eq!(
                report.failures,
                vec![CheckFailure::WrongColor {
                    name: "folder1".to_string(),
                    expected: PALETTE[2].expected_style(),
                    actual: None,
                }]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_rename_of_missing_item_is_action_failure() {
            let dir = tempfile::tempdir().unwrap();
            let cfg = config(dir.path());
            let ui = MockMailUi::signed_in();
            let mut page = SettingsListPage::new(&ui, &cfg);

            let report = rename_scenario(&mut page, &folder_plan()).await.unwrap();
            assert!(!report.passed);
            assert!(matches!(
                report.failures.as_slice(),
                [CheckFailure::ActionFailed { action, .. }] if action == "edit"
            ));
        }

        #[tokio::test(start_paused = true)]
        async fn test_delete_scenario_removes_renamed_item() {
            let dir = tempfile::tempdir().unwrap();
            let cfg = config(dir.path());
            let ui = MockMailUi::signed_in().with_items(vec![
                MockItem::new(ItemKind::Folder, "other", &PALETTE[0]),
                MockItem::new(ItemKind::Folder, "folder1_modified", &PALETTE[9]),
            ]);
            let mut page = SettingsListPage::new(&ui, &cfg);

            let report = delete_scenario(&mut page, &folder_plan()).await.unwrap();
            assert!(report.passed, "{:?}", report.failures);
            assert_eq!(ui.items().len(), 1);
            assert_eq!(ui.items()[0].name, "other");
        }
    }
}

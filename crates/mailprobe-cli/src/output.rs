//! Output formatting for suite reports and the palette

use clap::ValueEnum;
use console::{style, Style, Term};
use mailprobe::{ScenarioReport, SuiteReport, PALETTE};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Writes human-readable results to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(console::colors_enabled(), false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    /// Print every scenario and the summary line to stdout
    pub fn suite(&self, report: &SuiteReport) -> io::Result<()> {
        let mut out = &self.term;
        self.write_suite(&mut out, report)?;
        out.flush()
    }

    /// Write every scenario and the summary line
    pub fn write_suite<W: Write>(&self, out: &mut W, report: &SuiteReport) -> io::Result<()> {
        self.write_header(out, &format!("CRUD suite {}", report.run_id))?;
        for scenario in &report.scenarios {
            self.write_scenario(out, scenario)?;
        }
        self.write_summary(out, report.passed_count(), report.failed_count())
    }

    /// Write one scenario verdict with its failed checks
    pub fn write_scenario<W: Write>(&self, out: &mut W, report: &ScenarioReport) -> io::Result<()> {
        if report.passed {
            if self.quiet {
                return Ok(());
            }
            let prefix = if self.use_color {
                style("✓").green().bold().to_string()
            } else {
                "PASS".to_string()
            };
            return writeln!(out, "{prefix} {} ({} ms)", report.name, report.duration_ms);
        }

        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };
        writeln!(out, "{prefix} {} ({} ms)", report.name, report.duration_ms)?;
        for failure in &report.failures {
            writeln!(out, "    - {failure}")?;
        }
        if let Some(shot) = &report.screenshot {
            writeln!(out, "    screenshot: {}", shot.display())?;
        }
        Ok(())
    }

    /// Write a section header
    pub fn write_header<W: Write>(&self, out: &mut W, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        writeln!(out, "{styled}")
    }

    /// Write the summary line
    pub fn write_summary<W: Write>(&self, out: &mut W, passed: usize, failed: usize) -> io::Result<()> {
        if self.quiet && failed == 0 {
            return Ok(());
        }
        let total = passed + failed;
        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };
            writeln!(
                out,
                "{status} {total} scenarios ({} passed, {} failed)",
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                }
            )
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            writeln!(out, "{status} {total} scenarios ({passed} passed, {failed} failed)")
        }
    }
}

/// One palette entry as listed by `mailprobe palette`
#[derive(Debug, Clone, Serialize)]
pub struct PaletteRow {
    /// Palette name
    pub name: &'static str,
    /// `#rrggbb`
    pub hex: String,
    /// Swatch descriptor
    pub swatch: String,
    /// Expected row style
    pub style: String,
}

/// Palette rows in swatch order
#[must_use]
pub fn palette_rows() -> Vec<PaletteRow> {
    PALETTE
        .iter()
        .map(|c| PaletteRow {
            name: c.name,
            hex: c.hex(),
            swatch: c.swatch_selector().as_str().to_string(),
            style: c.expected_style(),
        })
        .collect()
}

/// Palette as aligned text
#[must_use]
pub fn render_palette_text() -> String {
    palette_rows()
        .iter()
        .map(|row| format!("{:<16} {}  {:<48} {}", row.name, row.hex, row.swatch, row.style))
        .collect::<Vec<_>>()
        .join("\n")
}

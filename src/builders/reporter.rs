use colored::Colorize;

use crate::core::engine::{FixReport, GuardOutcome};

/// Presents the outcome of a guard run to the user.
pub trait GuardReporter {
    fn report(&self, outcome: &GuardOutcome);
}

/// A concrete implementation of `GuardReporter` that prints to the console.
///
/// Every line names the file involved and, for findings and removals, the
/// offending line text, so the hook output alone tells the user what to do.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    /// The lines printed for an outcome, without colours.
    pub fn render(&self, outcome: &GuardOutcome) -> Vec<String> {
        match outcome {
            GuardOutcome::NoStagedFiles => vec!["📦 No staged files to check.".to_string()],
            GuardOutcome::Blocked(paths) => {
                let mut lines = vec!["\n🚫 Commit blocked! Protected files have been modified:\n".to_string()];
                lines.extend(paths.iter().map(|path| format!(" • {path}")));
                lines.push("\nThese files/folders are protected and must not be changed.".to_string());
                lines
            }
            GuardOutcome::CleanScan => vec!["✅ No unwanted debug statements found.".to_string()],
            GuardOutcome::DirtyScan(findings) => {
                let mut lines: Vec<String> = findings
                    .iter()
                    .map(|finding| {
                        format!(
                            "⚠️  Debug statement ({}) detected in {}:\n   {}",
                            finding.rule, finding.path, finding.line
                        )
                    })
                    .collect();
                lines.push("\n❌ Please remove debug statements before committing.".to_string());
                lines
            }
            GuardOutcome::Fixed(report) => self.render_fix(report),
        }
    }

    fn render_fix(&self, report: &FixReport) -> Vec<String> {
        if report.fixed_files.is_empty() {
            return vec!["✅ No changes needed.".to_string()];
        }

        let mut lines: Vec<String> = report
            .removals
            .iter()
            .map(|removal| format!("🧹 Removed: {} from {}", removal.line.trim(), removal.path))
            .collect();
        lines.push(format!(
            "\n✅ Fixed and re-staged: {}",
            report.fixed_files.join(", ")
        ));
        lines
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardReporter for ConsoleReporter {
    fn report(&self, outcome: &GuardOutcome) {
        let failed = outcome.exit_code() != 0;
        for line in self.render(outcome) {
            if failed {
                println!("{}", line.red());
            } else if line.contains('✅') {
                println!("{}", line.green());
            } else {
                println!("{line}");
            }
        }
    }
}

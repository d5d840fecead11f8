use anyhow::Result;

use crate::builders::patterns::{PatternCatalog, RuleKind, is_added_line};
use crate::core::config::GuardConfig;
use crate::core::git::GitClient;

/// What the guard was asked to do after the protected-path check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Report debug statements in added lines and reject the commit.
    #[default]
    Scan,
    /// Strip debug statements from the working files and re-stage them.
    Fix,
}

/// A debug statement found in an added line of a staged diff.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub path: String,
    /// The added line as it appears in the diff, leading `+` included.
    pub line: String,
    pub rule: RuleKind,
}

/// A line dropped from a working file by the fix pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub path: String,
    pub line: String,
}

/// Outcome of stripping one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FixResult {
    /// The kept lines joined with `\n`, plus one trailing newline.
    pub content: String,
    pub removed: Vec<String>,
}

impl FixResult {
    pub fn is_modified(&self) -> bool {
        !self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixReport {
    /// Files rewritten and re-staged, in processing order.
    pub fixed_files: Vec<String>,
    pub removals: Vec<Removal>,
}

/// The decision of one guard run. `main` turns it into the exit code.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    NoStagedFiles,
    /// Protected paths were staged; nothing was scanned or fixed.
    Blocked(Vec<String>),
    CleanScan,
    DirtyScan(Vec<Finding>),
    Fixed(FixReport),
}

impl GuardOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            GuardOutcome::Blocked(_) | GuardOutcome::DirtyScan(_) => 1,
            GuardOutcome::NoStagedFiles | GuardOutcome::CleanScan | GuardOutcome::Fixed(_) => 0,
        }
    }
}

/// Protected prefixes plus the compiled pattern catalog, built once per run.
#[derive(Debug, Clone)]
pub struct Guard {
    protected_paths: Vec<String>,
    catalog: PatternCatalog,
}

impl Guard {
    pub fn new(protected_paths: Vec<String>, catalog: PatternCatalog) -> Self {
        Self {
            protected_paths,
            catalog,
        }
    }

    /// Compiles the configured custom rules; an invalid one is a hard error.
    pub fn from_config(config: &GuardConfig) -> Result<Self> {
        let catalog = PatternCatalog::with_custom(&config.rules)?;
        Ok(Self::new(config.protected_paths.clone(), catalog))
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn protected_files(&self, files: &[String]) -> Vec<String> {
        files
            .iter()
            .filter(|file| self.is_protected(file))
            .cloned()
            .collect()
    }

    /// Runs the whole check: staged files, protected paths, then scan or fix.
    pub fn run(&self, git: &dyn GitClient, mode: Mode) -> Result<GuardOutcome> {
        let staged_files = git.get_staged_files()?;
        if staged_files.is_empty() {
            return Ok(GuardOutcome::NoStagedFiles);
        }

        let protected = self.protected_files(&staged_files);
        if !protected.is_empty() {
            log::info!("{} protected file(s) staged", protected.len());
            return Ok(GuardOutcome::Blocked(protected));
        }

        match mode {
            Mode::Scan => {
                let findings = self.scan(git, &staged_files)?;
                if findings.is_empty() {
                    Ok(GuardOutcome::CleanScan)
                } else {
                    Ok(GuardOutcome::DirtyScan(findings))
                }
            }
            Mode::Fix => Ok(GuardOutcome::Fixed(self.fix(git, &staged_files)?)),
        }
    }

    /// Files both passes look at: not protected and present on disk.
    fn candidates<'a>(
        &'a self,
        git: &'a dyn GitClient,
        files: &'a [String],
    ) -> impl Iterator<Item = &'a String> + 'a {
        files.iter().filter(move |file| {
            if self.is_protected(file) {
                return false;
            }
            let exists = git.file_exists(file);
            if !exists {
                log::debug!("skipping {file}: not in the working tree");
            }
            exists
        })
    }

    /// Collects every added line matching the scan catalog, across all files.
    pub fn scan(&self, git: &dyn GitClient, files: &[String]) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for file in self.candidates(git, files) {
            let diff = git.staged_diff(file)?;
            for line in added_lines(&diff) {
                if let Some(rule) = self.catalog.scan_match(line) {
                    log::debug!("{file}: {} rule matched", rule.kind);
                    findings.push(Finding {
                        path: file.clone(),
                        line: line.to_string(),
                        rule: rule.kind.clone(),
                    });
                }
            }
        }

        Ok(findings)
    }

    /// Rewrites files containing fix-catalog lines, then re-stages them.
    ///
    /// Works on the working-tree content, so unstaged edits to a fixed file
    /// are staged along with the removal.
    pub fn fix(&self, git: &dyn GitClient, files: &[String]) -> Result<FixReport> {
        let mut report = FixReport::default();

        for file in self.candidates(git, files) {
            let original = git.read_working_file(file)?;
            let result = strip_debug_lines(&self.catalog, &original);
            if !result.is_modified() {
                continue;
            }

            git.write_working_file(file, &result.content)?;
            report.removals.extend(result.removed.into_iter().map(|line| Removal {
                path: file.clone(),
                line,
            }));
            report.fixed_files.push(file.clone());
        }

        if !report.fixed_files.is_empty() {
            git.stage_files(&report.fixed_files)?;
        }

        Ok(report)
    }
}

/// Lines of a unified diff that add content, excluding the `+++` header.
pub fn added_lines(diff: &str) -> Vec<&str> {
    diff.lines().filter(|line| is_added_line(line)).collect()
}

/// Drops every line matched by the fix catalog.
pub fn strip_debug_lines(catalog: &PatternCatalog, content: &str) -> FixResult {
    let mut kept = Vec::new();
    let mut removed = Vec::new();

    for line in content.lines() {
        if catalog.fix_match(line).is_some() {
            removed.push(line.to_string());
        } else {
            kept.push(line);
        }
    }

    let mut content = kept.join("\n");
    content.push('\n');
    FixResult { content, removed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_lines_skip_header_and_context() {
        let diff = "diff --git a/app.js b/app.js\n\
                    --- a/app.js\n\
                    +++ b/app.js\n\
                    @@ -1,2 +1,3 @@\n \
                    const a = 1;\n\
                    -const b = 2;\n\
                    +const b = 3;\n\
                    +  console.log(\"debug\")\n";
        assert_eq!(
            added_lines(diff),
            vec!["+const b = 3;", "+  console.log(\"debug\")"]
        );
    }

    #[test]
    fn test_strip_keeps_order_and_adds_trailing_newline() {
        let catalog = PatternCatalog::builtin().unwrap();
        let result = strip_debug_lines(
            &catalog,
            "function f() {\n  console.log(\"debug\")\n  return 1;\n}",
        );
        assert!(result.is_modified());
        assert_eq!(result.content, "function f() {\n  return 1;\n}\n");
        assert_eq!(result.removed, vec!["  console.log(\"debug\")"]);
    }

    #[test]
    fn test_strip_unmodified_file() {
        let catalog = PatternCatalog::builtin().unwrap();
        let result = strip_debug_lines(&catalog, "let x = 1;\nlogger.log(x);\n");
        assert!(!result.is_modified());
    }

    #[test]
    fn test_strip_is_idempotent() {
        let catalog = PatternCatalog::builtin().unwrap();
        let first = strip_debug_lines(&catalog, "a\nprint(1)\necho hi\nb\n");
        let second = strip_debug_lines(&catalog, &first.content);
        assert_eq!(first.content, "a\nb\n");
        assert!(!second.is_modified());
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn test_is_protected_is_a_prefix_match() {
        let guard = Guard::new(
            vec!["src/config/".to_string(), "src/env/".to_string()],
            PatternCatalog::builtin().unwrap(),
        );
        assert!(guard.is_protected("src/config/settings.yaml"));
        assert!(guard.is_protected("src/env/prod/.env"));
        assert!(!guard.is_protected("src/configuration.rs"));
        assert!(!guard.is_protected("lib/src/config/x"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(GuardOutcome::NoStagedFiles.exit_code(), 0);
        assert_eq!(GuardOutcome::CleanScan.exit_code(), 0);
        assert_eq!(GuardOutcome::Fixed(FixReport::default()).exit_code(), 0);
        assert_eq!(GuardOutcome::Blocked(vec!["x".into()]).exit_code(), 1);
        assert_eq!(GuardOutcome::DirtyScan(Vec::new()).exit_code(), 1);
    }
}

use anyhow::Result;
use std::collections::HashSet;

use crate::builders::patterns::{CustomRule, DebugRule, RuleKind};
use crate::core::config::GuardConfig;

/// The `ConfigValidator` trait defines the public interface for validating the
/// guard configuration.
pub trait ConfigValidator {
    /// Performs a full validation of the `GuardConfig` and returns
    /// a list of issues found.
    fn validate_config(&self, config: &GuardConfig) -> Result<Vec<String>>;

    /// Validates a single custom rule and returns a list of issues.
    fn validate_rule(&self, rule: &CustomRule) -> Result<Vec<String>>;
}

/// The `StandardValidator` is a concrete implementation of `ConfigValidator`.
///
/// It catches prefixes that protect everything or nothing, duplicates, and
/// custom rules that would not compile.
pub struct StandardValidator;

impl StandardValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_protected_paths(&self, paths: &[String]) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for path in paths {
            if path.trim().is_empty() {
                issues.push("Empty protected path would block every commit".to_string());
                continue;
            }
            // Staged paths are repository-relative, so these never match.
            if path.starts_with('/') || path.starts_with('\\') {
                issues.push(format!("Protected path must be repository-relative: {path}"));
            }
            if !seen.insert(path.as_str()) {
                issues.push(format!("Duplicate protected path: {path}"));
            }
        }
        issues
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, config: &GuardConfig) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        // Check for an unsupported configuration version.
        if config.version != "1.0" {
            issues.push(format!("Unsupported config version: {}", config.version));
        }

        issues.extend(self.check_protected_paths(&config.protected_paths));

        let mut names = HashSet::new();
        for rule in &config.rules {
            if !names.insert(rule.name.as_str()) {
                issues.push(format!("Duplicate rule name: {}", rule.name));
            }
            issues.extend(self.validate_rule(rule)?);
        }

        Ok(issues)
    }

    fn validate_rule(&self, rule: &CustomRule) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        if rule.name.trim().is_empty() {
            issues.push("Rule name cannot be empty".to_string());
        }
        if rule.scan.is_empty() || rule.fix.is_empty() {
            issues.push(format!(
                "Rule {} needs both a scan and a fix pattern",
                rule.name
            ));
        }
        if let Err(e) = DebugRule::new(RuleKind::Custom(rule.name.clone()), &rule.scan, &rule.fix) {
            issues.push(format!("Invalid rule {}: {:#}", rule.name, e));
        }

        Ok(issues)
    }
}

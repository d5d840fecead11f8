use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::builders::patterns::CustomRule;
use crate::builders::validator::{ConfigValidator, StandardValidator};

pub const CONFIG_FILE_NAME: &str = "commit-guard.toml";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GlobalSettings {
    #[serde(default)]
    pub verbose: bool,
}

/// The guard's configuration, read once per invocation and never mutated.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GuardConfig {
    #[serde(default = "default_version")]
    pub version: String,
    /// Repository-relative path prefixes. Staging anything below one of them
    /// blocks the commit.
    #[serde(default = "default_protected_paths")]
    pub protected_paths: Vec<String>,
    /// Extra debug-statement rules, appended to the built-in catalog.
    #[serde(default)]
    pub rules: Vec<CustomRule>,
    #[serde(default)]
    pub global_settings: GlobalSettings,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_protected_paths() -> Vec<String> {
    vec!["src/config/".to_string(), "src/env/".to_string()]
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            protected_paths: default_protected_paths(),
            rules: Vec::new(),
            global_settings: GlobalSettings::default(),
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
    repo_root: PathBuf,
}

impl ConfigManager {
    /// Locates the repository containing the current directory.
    pub fn new() -> Result<Self> {
        let repo_root = find_git_root()?;
        Ok(Self::new_at(repo_root))
    }

    pub fn new_at(repo_root: PathBuf) -> Self {
        let config_path = repo_root.join(CONFIG_FILE_NAME);
        Self {
            config_path,
            repo_root,
        }
    }

    /// Writes the default configuration unless a file is already there.
    /// Returns whether a file was written.
    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }

        self.save_config(&GuardConfig::default())?;
        Ok(true)
    }

    pub fn validate_config(&self) -> Result<()> {
        let config = self.load_config()?;
        let validator = StandardValidator::new();
        let issues = validator.validate_config(&config)?;

        if issues.is_empty() {
            println!("✓ Configuration is valid.");
            Ok(())
        } else {
            println!("⚠️  Found issues in configuration:");
            for issue in issues {
                println!("  - {issue}");
            }
            anyhow::bail!("Configuration validation failed.");
        }
    }

    pub fn get_repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Where `load_config` takes its values from, for diagnostics. The
    /// configuration also decides the log level, so this is logged only
    /// once the logger is up.
    pub fn describe_source(&self) -> String {
        if self.config_path.exists() {
            format!("configuration loaded from {}", self.config_path.display())
        } else {
            format!(
                "no {} found, using built-in defaults",
                self.config_path.display()
            )
        }
    }
}

pub trait ConfigProvider {
    fn load_config(&self) -> Result<GuardConfig>;
    fn save_config(&self, config: &GuardConfig) -> Result<()>;
    fn get_config_path(&self) -> &Path;
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<GuardConfig> {
        if !self.config_path.exists() {
            return Ok(GuardConfig::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    fn save_config(&self, config: &GuardConfig) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}

fn find_git_root() -> Result<PathBuf> {
    let current_dir = std::env::current_dir()?;
    let mut dir = current_dir.as_path();

    loop {
        if dir.join(".git").exists() {
            return Ok(dir.to_path_buf());
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => anyhow::bail!("Not in a Git repository"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path().to_path_buf());
        let config = manager.load_config().unwrap();
        assert_eq!(config, GuardConfig::default());
        assert_eq!(config.protected_paths, vec!["src/config/", "src/env/"]);
    }

    #[test]
    fn test_describe_source() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path().to_path_buf());
        assert!(manager.describe_source().ends_with("using built-in defaults"));
        manager.initialize().unwrap();
        assert!(
            manager
                .describe_source()
                .starts_with("configuration loaded from")
        );
    }

    #[test]
    fn test_initialize_writes_once() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path().to_path_buf());
        assert!(manager.initialize().unwrap());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
        assert!(!manager.initialize().unwrap());
        assert_eq!(manager.load_config().unwrap(), GuardConfig::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
version = "1.0"
protected_paths = ["secrets/"]

[[rules]]
name = "dbg-macro"
scan = '\bdbg!\('
fix = '^\s*dbg!\('
"#,
        )
        .unwrap();

        let config = ConfigManager::new_at(dir.path().to_path_buf())
            .load_config()
            .unwrap();
        assert_eq!(config.protected_paths, vec!["secrets/"]);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].name, "dbg-macro");
        assert!(!config.global_settings.verbose);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "protected_paths = [").unwrap();
        let result = ConfigManager::new_at(dir.path().to_path_buf()).load_config();
        assert!(result.is_err());
    }
}

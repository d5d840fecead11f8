use crate::builders::hooks::{self, HookInstall};
use crate::builders::reporter::{ConsoleReporter, GuardReporter};
use crate::core::config::{ConfigManager, ConfigProvider, GuardConfig};
use crate::core::engine::{Guard, GuardOutcome, Mode};
use crate::core::git::Git2Client;
use anyhow::Result;
use std::path::Path;

pub fn initialize_repository() -> Result<()> {
    let config_manager = get_config_manager()?;
    if config_manager.initialize()? {
        println!(
            "✓ Wrote default configuration to {}",
            config_manager.get_config_path().display()
        );
    } else {
        println!("ℹ️  Configuration already exists");
    }
    println!("Run 'commit-guard install-hook' to check every commit automatically");
    Ok(())
}

pub fn install_hooks(fix: bool) -> Result<()> {
    let config_manager = get_config_manager()?;
    match hooks::install_pre_commit_hook(config_manager.get_repo_root(), fix)? {
        HookInstall::AlreadyInstalled => println!("ℹ️  pre-commit hook already installed"),
        HookInstall::ReplacedExisting => {
            println!("ℹ️  Backed up existing pre-commit hook");
            println!("✓ Installed pre-commit hook");
        }
        HookInstall::Installed => println!("✓ Installed pre-commit hook"),
    }
    Ok(())
}

pub fn validate_config() -> Result<()> {
    get_config_manager()?.validate_config()
}

/// Runs the guard against the repository at `repo_root` and prints the outcome.
pub fn run_guard(repo_root: &Path, config: &GuardConfig, mode: Mode) -> Result<GuardOutcome> {
    let guard = Guard::from_config(config)?;
    let git = Git2Client::new(repo_root)?;

    log::debug!("running in {mode:?} mode");
    let outcome = guard.run(&git, mode)?;
    ConsoleReporter::new().report(&outcome);
    Ok(outcome)
}

// Helper function to create ConfigManager instance
pub fn get_config_manager() -> Result<ConfigManager> {
    ConfigManager::new()
}

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const HOOK_MARKER: &str = "Commit Guard";

const PRE_COMMIT_HOOK: &str = r#"#!/bin/sh
# Commit Guard - Pre-commit Hook

# Check if commit-guard is available
if ! command -v commit-guard > /dev/null 2>&1; then
    echo "Warning: commit-guard not found in PATH"
    exit 0
fi

exec commit-guard
"#;

const PRE_COMMIT_FIX_HOOK: &str = r#"#!/bin/sh
# Commit Guard - Pre-commit Hook (fix mode)

# Check if commit-guard is available
if ! command -v commit-guard > /dev/null 2>&1; then
    echo "Warning: commit-guard not found in PATH"
    exit 0
fi

exec commit-guard --fix
"#;

#[derive(Debug, PartialEq, Eq)]
pub enum HookInstall {
    Installed,
    /// A foreign hook was moved to `pre-commit.backup` first.
    ReplacedExisting,
    AlreadyInstalled,
}

/// Installs the `pre-commit` hook into `<repo>/.git/hooks`.
pub fn install_pre_commit_hook(repo_root: &Path, fix: bool) -> Result<HookInstall> {
    let hooks_dir = repo_root.join(".git").join("hooks");
    fs::create_dir_all(&hooks_dir).context("Failed to create hooks directory")?;

    let content = if fix { PRE_COMMIT_FIX_HOOK } else { PRE_COMMIT_HOOK };
    install_hook(&hooks_dir, "pre-commit", content)
}

fn install_hook(hooks_dir: &Path, hook_name: &str, hook_content: &str) -> Result<HookInstall> {
    let hook_path = hooks_dir.join(hook_name);
    let mut status = HookInstall::Installed;

    if hook_path.exists() {
        // Check if it's already our hook
        let existing_content = fs::read_to_string(&hook_path)?;
        if existing_content.contains(HOOK_MARKER) {
            return Ok(HookInstall::AlreadyInstalled);
        }

        // Backup existing hook
        let backup_path = hooks_dir.join(format!("{hook_name}.backup"));
        fs::rename(&hook_path, backup_path).context("Failed to back up existing hook")?;
        status = HookInstall::ReplacedExisting;
    }

    fs::write(&hook_path, hook_content).context("Failed to write hook")?;

    // Make executable on Unix systems
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&hook_path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&hook_path, perms)?;
    }

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_install_backs_up_foreign_hook() {
        let dir = tempdir().unwrap();
        let hooks = dir.path().join(".git").join("hooks");
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("pre-commit"), "#!/bin/sh\nmake lint\n").unwrap();

        let status = install_pre_commit_hook(dir.path(), false).unwrap();
        assert_eq!(status, HookInstall::ReplacedExisting);
        assert_eq!(
            fs::read_to_string(hooks.join("pre-commit.backup")).unwrap(),
            "#!/bin/sh\nmake lint\n"
        );
        assert!(
            fs::read_to_string(hooks.join("pre-commit"))
                .unwrap()
                .contains("exec commit-guard\n")
        );

        let again = install_pre_commit_hook(dir.path(), true).unwrap();
        assert_eq!(again, HookInstall::AlreadyInstalled);
    }

    #[test]
    fn test_install_fix_variant() {
        let dir = tempdir().unwrap();
        let status = install_pre_commit_hook(dir.path(), true).unwrap();
        assert_eq!(status, HookInstall::Installed);
        let hook = fs::read_to_string(dir.path().join(".git/hooks/pre-commit")).unwrap();
        assert!(hook.contains("exec commit-guard --fix"));
    }
}

//! Runs real `git commit` invocations through an installed pre-commit hook.
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn git(root: &Path, args: &[&str]) -> Output {
    Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(args)
        .current_dir(root)
        .env_remove("GIT_INDEX_FILE")
        .env_remove("GIT_DIR")
        .output()
        .expect("git should be installed")
}

fn setup_repo_with_hook(fix: bool) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    assert!(git(root, &["init", "-q"]).status.success());

    fs::create_dir_all(root.join("src/config")).unwrap();
    fs::write(root.join("src/config/settings.yaml"), "retries: 3\n").unwrap();
    fs::write(root.join("app.js"), "let a = 1;\n").unwrap();
    assert!(git(root, &["add", "."]).status.success());
    assert!(git(root, &["commit", "-q", "-m", "initial"]).status.success());

    let hook = root.join(".git/hooks/pre-commit");
    fs::create_dir_all(hook.parent().unwrap()).unwrap();
    let flag = if fix { " --fix" } else { "" };
    fs::write(
        &hook,
        format!("#!/bin/sh\nexec \"{}\"{flag}\n", env!("CARGO_BIN_EXE_commit-guard")),
    )
    .unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&hook, fs::Permissions::from_mode(0o755)).unwrap();
    }
    dir
}

/// Git runs hooks with their stdout redirected to stderr.
fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn commit_count(root: &Path) -> String {
    let output = git(root, &["rev-list", "--count", "HEAD"]);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_commit_all_touching_protected_path_is_blocked() {
    let dir = setup_repo_with_hook(false);
    let root = dir.path();
    fs::write(root.join("src/config/settings.yaml"), "retries: 5\n").unwrap();

    let output = git(root, &["commit", "-a", "-m", "touch protected"]);
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("src/config/settings.yaml"), "{text}");
    assert_eq!(commit_count(root), "1");
}

#[test]
fn test_commit_all_with_debug_statement_is_rejected() {
    let dir = setup_repo_with_hook(false);
    let root = dir.path();
    fs::write(root.join("app.js"), "let a = 1;\nconsole.log(a)\n").unwrap();

    let output = git(root, &["commit", "-a", "-m", "add debug"]);
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("+console.log(a)"), "{text}");
    assert_eq!(commit_count(root), "1");
}

#[test]
fn test_commit_with_pathspec_is_checked() {
    let dir = setup_repo_with_hook(false);
    let root = dir.path();
    fs::write(root.join("app.js"), "let a = 1;\nprint(a)\n").unwrap();

    let output = git(root, &["commit", "-m", "add debug", "app.js"]);
    assert!(!output.status.success());
    assert_eq!(commit_count(root), "1");
}

#[test]
fn test_commit_all_in_fix_mode_commits_cleaned_content() {
    let dir = setup_repo_with_hook(true);
    let root = dir.path();
    fs::write(root.join("app.js"), "let a = 1;\nconsole.log(a)\nlet b = 2;\n").unwrap();

    let output = git(root, &["commit", "-a", "-m", "cleaned"]);
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(commit_count(root), "2");

    let committed = git(root, &["show", "HEAD:app.js"]);
    assert_eq!(
        String::from_utf8_lossy(&committed.stdout),
        "let a = 1;\nlet b = 2;\n"
    );
}

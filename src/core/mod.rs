// This file is the module declaration file for the `core` module.
//
// `config` module:
// The `GuardConfig` data structure, the `ConfigProvider` trait and the
// `ConfigManager` that loads `commit-guard.toml` from the repository root.
pub mod config;
// `engine` module:
// The guard itself: protected-path blocking, the debug scan and the fix pass.
pub mod engine;
// `git` module:
// The `GitClient` abstraction and its libgit2 implementation.
pub mod git;

// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These modules hold the pieces the engine is assembled from.

// `hooks` module:
// Installs the `pre-commit` hook script in `.git/hooks` so the guard runs
// on every commit.
pub mod hooks;

// `patterns` module:
// Defines the debug-statement rules (`DebugRule`) and the `PatternCatalog`
// that evaluates them, in both scan form (added diff lines) and fix form
// (whole working-file lines).
pub mod patterns;

// `reporter` module:
// Prints the outcome of a guard run to the console.
pub mod reporter;

// `validator` module:
// Checks a `GuardConfig` for protected paths and custom rules that cannot
// work as intended.
pub mod validator;

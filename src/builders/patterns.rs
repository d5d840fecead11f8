use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An enum that names the family a debug-statement rule belongs to.
///
/// The five built-in families cover the console/print/log call syntaxes the
/// guard knows about out of the box. `Custom` rules come from the
/// `[[rules]]` tables of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// `console.log` calls (JavaScript / TypeScript).
    ConsoleLog,
    /// `print(` calls (Python and friends).
    Print,
    /// `System.out.println` calls (Java).
    SystemOutPrintln,
    /// `echo` statements (shell).
    Echo,
    /// A bare `log(` call that is not `logger.log(`.
    BareLog,
    /// A rule declared in the configuration file.
    Custom(String),
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::ConsoleLog => write!(f, "console-log"),
            RuleKind::Print => write!(f, "print"),
            RuleKind::SystemOutPrintln => write!(f, "system-out-println"),
            RuleKind::Echo => write!(f, "echo"),
            RuleKind::BareLog => write!(f, "bare-log"),
            RuleKind::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// A user supplied rule, exactly as it is written in `commit-guard.toml`.
///
/// ```toml
/// [[rules]]
/// name = "dbg-macro"
/// scan = '\bdbg!\('
/// fix = '^\s*dbg!\(.*'
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CustomRule {
    pub name: String,
    /// Searched anywhere in an added diff line.
    pub scan: String,
    /// Matched against the start of a working-file line.
    pub fix: String,
}

/// One compiled debug-statement rule.
///
/// `scan` is searched anywhere in an added diff line, `fix` is anchored at the
/// start of a working-file line. When `excluded_prefix` is set, an occurrence
/// only counts if the text right before it does not end with that prefix
/// (compared case-insensitively). This stands in for the look-behind the
/// `regex` crate does not support.
#[derive(Debug, Clone)]
pub struct DebugRule {
    pub kind: RuleKind,
    scan: Regex,
    fix: Regex,
    excluded_prefix: Option<String>,
}

/// The `LineMatcher` trait defines how a rule is evaluated against text.
///
/// The two methods correspond to the two catalogs: one for added lines of a
/// staged diff, one for whole lines of the working file.
pub trait LineMatcher {
    /// True if `line` is an added diff line (`+` but not the `+++` header)
    /// containing a debug statement.
    fn matches_added_line(&self, line: &str) -> bool;

    /// True if `line`, after optional leading whitespace, starts with a debug
    /// statement.
    fn matches_whole_line(&self, line: &str) -> bool;
}

impl DebugRule {
    /// Compiles a rule. Both expressions are always case-insensitive.
    pub fn new(kind: RuleKind, scan: &str, fix: &str) -> Result<Self> {
        Ok(Self {
            scan: compile(scan).with_context(|| format!("Invalid scan pattern for rule {kind}"))?,
            fix: compile(fix).with_context(|| format!("Invalid fix pattern for rule {kind}"))?,
            kind,
            excluded_prefix: None,
        })
    }

    fn excluding(mut self, prefix: &str) -> Self {
        self.excluded_prefix = Some(prefix.to_lowercase());
        self
    }

    /// Checks every occurrence of `regex` in `text`; a hit counts unless it is
    /// directly preceded by the excluded prefix.
    fn has_unexcluded_match(&self, regex: &Regex, text: &str) -> bool {
        match &self.excluded_prefix {
            None => regex.is_match(text),
            Some(prefix) => regex.find_iter(text).any(|m| {
                !text[..m.start()].to_lowercase().ends_with(prefix.as_str())
            }),
        }
    }
}

impl LineMatcher for DebugRule {
    fn matches_added_line(&self, line: &str) -> bool {
        if !is_added_line(line) {
            return false;
        }
        self.has_unexcluded_match(&self.scan, &line[1..])
    }

    fn matches_whole_line(&self, line: &str) -> bool {
        self.has_unexcluded_match(&self.fix, line)
    }
}

/// True for a unified-diff line that adds content. The `+++ b/file` header
/// also starts with `+` and is excluded.
pub fn is_added_line(line: &str) -> bool {
    line.starts_with('+') && !line.starts_with("+++")
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(Into::into)
}

/// The full set of rules the guard evaluates, built once at start-up.
///
/// Rules are tried in order and the first match wins, which is the same as
/// evaluating one alternation of all patterns.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<DebugRule>,
}

impl PatternCatalog {
    /// The five built-in rules.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            rules: builtin_rules()?,
        })
    }

    /// The built-in rules followed by the configured custom rules.
    pub fn with_custom(custom: &[CustomRule]) -> Result<Self> {
        let mut rules = builtin_rules()?;
        for rule in custom {
            rules.push(DebugRule::new(
                RuleKind::Custom(rule.name.clone()),
                &rule.scan,
                &rule.fix,
            )?);
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[DebugRule] {
        &self.rules
    }

    /// Scan catalog: the first rule matching an added diff line.
    pub fn scan_match(&self, line: &str) -> Option<&DebugRule> {
        self.rules.iter().find(|rule| rule.matches_added_line(line))
    }

    /// Fix catalog: the first rule matching a whole working-file line.
    pub fn fix_match(&self, line: &str) -> Option<&DebugRule> {
        self.rules.iter().find(|rule| rule.matches_whole_line(line))
    }
}

const BUILTIN_RULES: [(RuleKind, &str, &str); 5] = [
    (RuleKind::ConsoleLog, r"console\.log", r"^\s*console\.log"),
    (RuleKind::Print, r"\bprint\s*\(", r"^\s*print\s*\("),
    (
        RuleKind::SystemOutPrintln,
        r"System\.out\.println",
        r"^\s*System\.out\.println",
    ),
    (RuleKind::Echo, r"\becho\s+", r"^\s*echo\s+"),
    (RuleKind::BareLog, r"\blog\s*\(", r"^\s*log\s*\("),
];

fn builtin_rules() -> Result<Vec<DebugRule>> {
    compile_table(BUILTIN_RULES)
}

/// Compiles `(kind, scan, fix)` rows; the bare-log rule skips `logger.log(`.
fn compile_table<I>(table: I) -> Result<Vec<DebugRule>>
where
    I: IntoIterator<Item = (RuleKind, &'static str, &'static str)>,
{
    table
        .into_iter()
        .map(|(kind, scan, fix)| -> Result<DebugRule> {
            let excluded = matches!(kind, RuleKind::BareLog);
            let rule = DebugRule::new(kind, scan, fix)?;
            Ok(if excluded { rule.excluding("logger.") } else { rule })
        })
        .collect()
}

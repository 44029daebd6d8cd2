//! Lint failures and their replacement edits.
//!
//! The engine has emitted fixes in several shapes over its history: a single
//! replacement, a list of replacements, or an object wrapping a `replacements`
//! list. Deserialization normalizes every shape into `Vec<Replacement>` so that
//! nothing past this module has to care.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An atomic text edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Replacement {
    /// Start offset (inclusive).
    #[serde(alias = "innerStart")]
    pub start: u32,
    /// Number of units replaced.
    #[serde(alias = "innerLength")]
    pub length: u32,
    /// Replacement text.
    #[serde(alias = "innerText", default)]
    pub text: String,
}

impl Replacement {
    /// Creates a new replacement.
    pub fn new(start: u32, length: u32, text: impl Into<String>) -> Self {
        Self {
            start,
            length,
            text: text.into(),
        }
    }

    /// Creates a replacement that deletes `length` units at `start`.
    pub fn delete(start: u32, length: u32) -> Self {
        Self::new(start, length, "")
    }

    /// Creates a replacement that inserts text at `offset`.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(offset, 0, text)
    }

    /// End offset (exclusive).
    #[inline]
    pub const fn end(&self) -> u32 {
        self.start.saturating_add(self.length)
    }
}

/// One rule violation reported by the engine for one location in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFailure", rename_all = "camelCase")]
pub struct Failure {
    /// File the engine attributed the failure to.
    pub file_name: String,
    /// Start offset (inclusive).
    pub start: u32,
    /// End offset (exclusive).
    pub end: u32,
    /// Failure message.
    pub message: String,
    /// Rule that produced the failure.
    pub rule_name: Option<String>,
    /// Engine-reported severity of the rule.
    pub rule_severity: Option<String>,
    /// Replacements that resolve the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Vec<Replacement>>,
}

impl Failure {
    /// Creates a failure without rule metadata or fix.
    pub fn new(file_name: impl Into<String>, start: u32, end: u32, message: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            start,
            end,
            message: message.into(),
            rule_name: None,
            rule_severity: None,
            fix: None,
        }
    }

    /// Sets the rule name.
    pub fn with_rule(mut self, rule_name: impl Into<String>) -> Self {
        self.rule_name = Some(rule_name.into());
        self
    }

    /// Sets the rule severity.
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.rule_severity = Some(severity.into());
        self
    }

    /// Sets the fix.
    pub fn with_fix(mut self, replacements: Vec<Replacement>) -> Self {
        self.fix = Some(replacements);
        self
    }

    /// Replacements of the fix, empty when there is none.
    pub fn replacements(&self) -> &[Replacement] {
        self.fix.as_deref().unwrap_or_default()
    }

    /// True iff the failure carries a non-empty fix.
    pub fn is_fixable(&self) -> bool {
        !self.replacements().is_empty()
    }

    /// True iff the engine reported the rule with `error` severity.
    pub fn is_error(&self) -> bool {
        self.rule_severity
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("error"))
    }

    /// Rule name or an empty string.
    pub fn rule(&self) -> &str {
        self.rule_name.as_deref().unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFix {
    Many(Vec<Replacement>),
    Legacy { replacements: Vec<Replacement> },
    One(Replacement),
}

impl From<RawFix> for Vec<Replacement> {
    fn from(fix: RawFix) -> Self {
        match fix {
            RawFix::Many(replacements) | RawFix::Legacy { replacements } => replacements,
            RawFix::One(replacement) => vec![replacement],
        }
    }
}

#[derive(Deserialize)]
struct RawPosition {
    position: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Position(RawPosition),
    Offset(u32),
}

impl RawOffset {
    fn offset(&self) -> u32 {
        match self {
            RawOffset::Position(p) => p.position,
            RawOffset::Offset(o) => *o,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFailure {
    #[serde(alias = "name")]
    file_name: String,
    #[serde(alias = "startPosition")]
    start: RawOffset,
    #[serde(alias = "endPosition")]
    end: RawOffset,
    #[serde(alias = "failure")]
    message: String,
    #[serde(default)]
    rule_name: Option<String>,
    #[serde(default)]
    rule_severity: Option<String>,
    #[serde(default)]
    fix: Option<RawFix>,
}

impl From<RawFailure> for Failure {
    fn from(raw: RawFailure) -> Self {
        Self {
            file_name: raw.file_name,
            start: raw.start.offset(),
            end: raw.end.offset(),
            message: raw.message,
            rule_name: raw.rule_name,
            rule_severity: raw.rule_severity,
            fix: raw.fix.map(Vec::from),
        }
    }
}

/// Keeps only the failures attributed to `file_name`.
///
/// Some rules report failures for other files; both sides are normalized for
/// separators, `.`/`..` segments and (where the platform is case-insensitive)
/// case before comparing.
pub fn filter_failures_for_file(file_name: &str, failures: Vec<Failure>) -> Vec<Failure> {
    let target = normalize_path(file_name);
    let mut normalized: HashMap<String, String> = HashMap::new();

    failures
        .into_iter()
        .filter(|failure| {
            let name = normalized
                .entry(failure.file_name.clone())
                .or_insert_with(|| normalize_path(&failure.file_name));
            *name == target
        })
        .collect()
}

/// Lexically normalizes a path for identity comparison.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if absolute {
        normalized.insert(0, '/');
    }

    if cfg!(any(windows, target_os = "macos")) {
        normalized.to_lowercase()
    } else {
        normalized
    }
}

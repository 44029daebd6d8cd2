//! The host language service as seen by the plugin.
//!
//! Only the calls the plugin intercepts are part of [`LanguageService`]; all
//! other host capabilities are reached through [`ProjectHost`].

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity class of a host diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

/// A host-level reported issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub code: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: u32,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextChange {
    pub span: TextSpan,
    pub new_text: String,
}

/// Text changes for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTextChanges {
    pub file_name: String,
    pub text_changes: Vec<TextChange>,
}

/// An offered automated edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFixAction {
    pub description: String,
    pub fix_name: String,
    pub changes: Vec<FileTextChanges>,
    /// Correlation token for the host's batch-fix UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_all_description: Option<String>,
}

/// Result of a combined code fix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedCodeActions {
    pub changes: Vec<FileTextChanges>,
}

/// Scope of a combined code fix. Hosts only ever request whole files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedCodeFixScope {
    pub file_name: String,
}

/// Host formatting options, passed through untouched.
pub type FormatOptions = Value;

/// Host user preferences, passed through untouched.
pub type UserPreferences = Value;

/// The intercepted subset of the host language service.
pub trait LanguageService: Send + Sync {
    fn semantic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic>;

    fn code_fixes_at_position(
        &self,
        file_name: &str,
        start: u32,
        end: u32,
        error_codes: &[u32],
        format_options: &FormatOptions,
        preferences: &UserPreferences,
    ) -> Vec<CodeFixAction>;

    fn combined_code_fix(
        &self,
        scope: &CombinedCodeFixScope,
        fix_id: &str,
        format_options: &FormatOptions,
        preferences: &UserPreferences,
    ) -> CombinedCodeActions;

    /// True once the lint adapter wraps this service.
    fn is_lint_decorated(&self) -> bool {
        false
    }
}

/// Kind of a file-watch notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileWatchEvent {
    Created,
    Changed,
    Deleted,
}

/// Callback invoked by the host's file watcher.
pub type WatchCallback = Box<dyn Fn(&Path, FileWatchEvent) + Send + Sync>;

/// Handle of an active file watch.
pub trait Disposable: Send {
    fn dispose(&mut self);
}

/// Project-level host capabilities.
pub trait ProjectHost: Send + Sync {
    /// The project's current directory.
    fn current_directory(&self) -> PathBuf;

    /// Text of `file_name` as compiled into the current program.
    fn source_text(&self, file_name: &str) -> Option<String>;

    /// Current editor snapshot of `file_name`.
    fn script_snapshot(&self, file_name: &str) -> Option<String>;

    fn watch_file(&self, path: &Path, on_change: WatchCallback) -> Box<dyn Disposable>;

    /// Path of the project configuration file, for configured projects.
    fn project_config_path(&self) -> Option<PathBuf>;

    /// Raw text of the project configuration file.
    fn read_project_config(&self, path: &Path) -> io::Result<String>;

    /// Asks the host to recompute diagnostics for open files.
    fn refresh_diagnostics(&self);

    /// Install location of the running host, if known.
    fn host_install_root(&self) -> Option<PathBuf> {
        None
    }
}

/// Line-oriented view over a text snapshot, measured in UTF-16 code units.
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    text: &'a str,
    line_starts: Vec<u32>,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        let mut offset = 0u32;
        for ch in text.chars() {
            offset += ch.len_utf16() as u32;
            if ch == '\n' {
                line_starts.push(offset);
            }
        }
        Self { text, line_starts }
    }

    /// Zero-based line containing `offset`.
    pub fn line_of(&self, offset: u32) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    pub fn line_start(&self, line: usize) -> u32 {
        self.line_starts.get(line).copied().unwrap_or(0)
    }

    /// Text of the zero-based `line`, without its line break.
    pub fn line_text(&self, line: usize) -> &'a str {
        self.text
            .split('\n')
            .nth(line)
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or_default()
    }

    /// Leading whitespace of the zero-based `line`.
    pub fn indentation(&self, line: usize) -> &'a str {
        let text = self.line_text(line);
        let trimmed = text.trim_start_matches([' ', '\t']);
        &text[..text.len() - trimmed.len()]
    }
}

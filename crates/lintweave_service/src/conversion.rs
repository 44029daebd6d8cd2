//! Conversion of lint results into host diagnostics.

use lintweave_core::Failure;

use crate::host::{Diagnostic, DiagnosticCategory};

/// Source tag of every diagnostic the plugin emits.
pub const LINT_SOURCE: &str = "tslint";

/// Diagnostic code reserved for lint diagnostics.
pub const LINT_ERROR_CODE: u32 = 1;

/// Prefix of non-physical buffers that crash the engine.
const IN_MEMORY_PREFIX: char = '^';

/// True for in-memory buffers that are never linted.
pub fn is_in_memory_file(file_name: &str) -> bool {
    file_name.starts_with(IN_MEMORY_PREFIX)
}

/// Category of a failure: the always-warn override beats the engine severity.
pub fn failure_category(failure: &Failure, always_warn: bool) -> DiagnosticCategory {
    if always_warn {
        DiagnosticCategory::Warning
    } else if failure.is_error() {
        DiagnosticCategory::Error
    } else {
        DiagnosticCategory::Warning
    }
}

/// Converts a failure into a diagnostic on `file_name`.
pub fn failure_to_diagnostic(failure: &Failure, file_name: &str, always_warn: bool) -> Diagnostic {
    let message_text = match &failure.rule_name {
        Some(rule) => format!("{} ({})", failure.message, rule),
        None => failure.message.clone(),
    };

    Diagnostic {
        file: file_name.to_string(),
        start: failure.start,
        length: failure.end.saturating_sub(failure.start),
        message_text,
        category: failure_category(failure, always_warn),
        source: Some(LINT_SOURCE.to_string()),
        code: LINT_ERROR_CODE,
    }
}

/// Diagnostic carrying a runner warning, anchored at the start of the file.
pub fn warning_to_diagnostic(warning: &str, file_name: &str) -> Diagnostic {
    Diagnostic {
        file: file_name.to_string(),
        start: 0,
        length: 1,
        message_text: warning.to_string(),
        category: DiagnosticCategory::Error,
        source: Some(LINT_SOURCE.to_string()),
        code: LINT_ERROR_CODE,
    }
}

//! Lint command implementation

use std::fs;
use std::path::PathBuf;

use lintweave_core::{LintSource, filter_failures_for_file};
use lintweave_service::conversion::failure_to_diagnostic;
use lintweave_service::host::SourceText;
use lintweave_service::{Diagnostic, DiagnosticCategory};
use miette::{IntoDiagnostic, Result, miette};
use tracing::{info, warn};

use super::{absolute, create_runner, load_settings, run_configuration};
use crate::cli::{Cli, OutputFormat};
use crate::output::output_reports;

/// A diagnostic with its one-based position.
pub struct Finding {
    pub diagnostic: Diagnostic,
    pub line: usize,
    pub column: u32,
}

/// Lint result of one file.
pub struct FileReport {
    pub path: PathBuf,
    pub findings: Vec<Finding>,
    pub warnings: Vec<String>,
}

impl FileReport {
    pub fn has_errors(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.diagnostic.category == DiagnosticCategory::Error)
    }
}

pub fn run_lint(cli: &Cli, files: &[PathBuf], format: OutputFormat) -> Result<bool> {
    let settings = load_settings(cli)?;
    let run_config = run_configuration(cli, &settings);
    let mut runner = create_runner(cli);

    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let path = absolute(file)?;
        let content = fs::read_to_string(&path)
            .map_err(|e| miette!("Cannot read {}: {}", path.display(), e))?;

        let result = runner
            .run(&path, LintSource::Text(&content), &run_config)
            .into_diagnostic()?;
        info!("{}: {:?}", path.display(), result.outcome);
        for warning in &result.warnings {
            warn!("{}", warning);
        }

        let file_name = path.to_string_lossy();
        let text = SourceText::new(&content);
        let findings = filter_failures_for_file(&file_name, result.failures)
            .iter()
            .map(|failure| {
                let diagnostic = failure_to_diagnostic(
                    failure,
                    &file_name,
                    settings.always_show_rule_failures_as_warnings,
                );
                let line = text.line_of(diagnostic.start);
                Finding {
                    line: line + 1,
                    column: diagnostic.start - text.line_start(line) + 1,
                    diagnostic,
                }
            })
            .collect();

        reports.push(FileReport {
            path,
            findings,
            warnings: result.warnings,
        });
    }

    output_reports(&reports, format)
}

//! Output formatting

use lintweave_service::DiagnosticCategory;
use miette::{IntoDiagnostic, Result};

use crate::cli::OutputFormat;
use crate::commands::lint::FileReport;

/// Prints lint reports. Returns true when any error was found.
pub fn output_reports(reports: &[FileReport], format: OutputFormat) -> Result<bool> {
    let has_errors = reports.iter().any(FileReport::has_errors);

    match format {
        OutputFormat::Json => output_json(reports)?,
        OutputFormat::Text => output_text(reports),
    }

    Ok(has_errors)
}

fn output_text(reports: &[FileReport]) {
    for report in reports {
        if report.findings.is_empty() {
            continue;
        }

        println!("\n{}:", report.path.display());
        for finding in &report.findings {
            let severity = match finding.diagnostic.category {
                DiagnosticCategory::Error => "error",
                DiagnosticCategory::Warning => "warning",
                DiagnosticCategory::Suggestion => "suggestion",
                DiagnosticCategory::Message => "info",
            };
            println!(
                "  {}:{} {}: {}",
                finding.line, finding.column, severity, finding.diagnostic.message_text
            );
        }
    }

    let total: usize = reports.iter().map(|r| r.findings.len()).sum();
    println!();
    println!("Checked {} files, found {} problems", reports.len(), total);
}

fn output_json(reports: &[FileReport]) -> Result<()> {
    let output: Vec<_> = reports
        .iter()
        .map(|r| {
            let diagnostics: Vec<_> = r
                .findings
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "line": f.line,
                        "column": f.column,
                        "diagnostic": f.diagnostic,
                    })
                })
                .collect();
            serde_json::json!({
                "path": r.path.display().to_string(),
                "diagnostics": diagnostics,
                "warnings": r.warnings,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}

//! Fix command implementation

use std::fs;
use std::path::PathBuf;

use lintweave_core::{
    LintSource, Replacement, apply_replacements, filter_failures_for_file,
    non_overlapping_replacements,
};
use miette::{IntoDiagnostic, Result, miette};
use tracing::{error, warn};

use super::{absolute, create_runner, load_settings, run_configuration};
use crate::cli::Cli;

/// Summary of applied fixes.
struct FixSummary {
    total_fixes: usize,
    fixes_by_file: Vec<(PathBuf, usize)>,
    errors: Vec<(PathBuf, String)>,
}

/// Rewrites UTF-16 offsets into byte offsets of `content`. Replacements that
/// do not fall on character boundaries are dropped.
fn to_byte_offsets(content: &str, replacements: Vec<Replacement>) -> Vec<Replacement> {
    let mut boundaries: Vec<(u32, usize)> = Vec::with_capacity(content.len() + 1);
    let mut utf16 = 0u32;
    for (byte, ch) in content.char_indices() {
        boundaries.push((utf16, byte));
        utf16 += ch.len_utf16() as u32;
    }
    boundaries.push((utf16, content.len()));

    let byte_of = |offset: u32| {
        boundaries
            .binary_search_by_key(&offset, |(u, _)| *u)
            .ok()
            .map(|i| boundaries[i].1 as u32)
    };

    replacements
        .into_iter()
        .filter_map(|r| {
            let start = byte_of(r.start)?;
            let end = byte_of(r.end())?;
            Some(Replacement::new(start, end - start, r.text))
        })
        .collect()
}

pub fn run_fix(cli: &Cli, files: &[PathBuf], dry_run: bool) -> Result<bool> {
    let settings = load_settings(cli)?;
    let run_config = run_configuration(cli, &settings);
    let mut runner = create_runner(cli);

    let mut summary = FixSummary {
        total_fixes: 0,
        fixes_by_file: Vec::new(),
        errors: Vec::new(),
    };

    for file in files {
        let path = absolute(file)?;
        let content = fs::read_to_string(&path)
            .map_err(|e| miette!("Cannot read {}: {}", path.display(), e))?;

        let result = runner
            .run(&path, LintSource::Text(&content), &run_config)
            .into_diagnostic()?;
        for warning in &result.warnings {
            warn!("{}", warning);
        }

        let failures = filter_failures_for_file(&path.to_string_lossy(), result.failures);
        let fixable = failures.iter().filter(|f| f.is_fixable()).count();
        let replacements = to_byte_offsets(&content, non_overlapping_replacements(&failures));
        if replacements.is_empty() {
            continue;
        }

        let applied = apply_replacements(&content, &replacements);
        if !applied.modified {
            continue;
        }
        if !dry_run && let Err(e) = fs::write(&path, &applied.content) {
            error!("Failed to fix {}: {}", path.display(), e);
            summary.errors.push((path, e.to_string()));
            continue;
        }

        if fixable > applied.applied {
            warn!(
                "{}: conflicting fixes skipped, run fix again",
                path.display()
            );
        }
        summary.total_fixes += applied.applied;
        summary.fixes_by_file.push((path, applied.applied));
    }

    output_fix_summary(&summary, dry_run);
    Ok(!summary.errors.is_empty())
}

fn output_fix_summary(summary: &FixSummary, dry_run: bool) {
    if summary.total_fixes == 0 && summary.errors.is_empty() {
        println!("No fixable issues found.");
        return;
    }

    if summary.total_fixes > 0 {
        let action = if dry_run { "Would apply" } else { "Applied" };
        println!(
            "{} {} replacements in {} files:",
            action,
            summary.total_fixes,
            summary.fixes_by_file.len()
        );
        for (path, count) in &summary.fixes_by_file {
            println!("  {}: {}", path.display(), count);
        }
    }

    if !summary.errors.is_empty() {
        println!("Failed to fix {} files:", summary.errors.len());
        for (path, message) in &summary.errors {
            println!("  {}: {}", path.display(), message);
        }
    }
}

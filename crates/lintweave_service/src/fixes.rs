//! Code fix actions built from recorded problems.

use lintweave_core::{Problem, ProblemStore, Replacement, non_overlapping_replacements};

use crate::host::{CodeFixAction, FileTextChanges, SourceText, TextChange, TextSpan};

/// Prefix of every fix name and fix id the plugin emits.
pub const FIX_PREFIX: &str = "tslint:";

/// Fix name of the "fix all auto-fixable" action.
pub const FIX_ALL_NAME: &str = "tslint:fix-all";

const DISABLE_PREFIX: &str = "tslint:disable:";

/// Fix name and fix id of the per-rule actions.
pub fn rule_fix_id(rule: &str) -> String {
    format!("{FIX_PREFIX}{rule}")
}

/// Rule named by a per-rule fix id. Reserved names are not rule ids.
pub fn rule_from_fix_id(fix_id: &str) -> Option<&str> {
    if fix_id == FIX_ALL_NAME || fix_id.starts_with(DISABLE_PREFIX) {
        return None;
    }
    fix_id
        .strip_prefix(FIX_PREFIX)
        .filter(|rule| !rule.is_empty())
}

fn to_text_change(replacement: &Replacement) -> TextChange {
    TextChange {
        span: TextSpan {
            start: replacement.start,
            length: replacement.length,
        },
        new_text: replacement.text.clone(),
    }
}

fn file_changes(file_name: &str, replacements: &[Replacement]) -> FileTextChanges {
    FileTextChanges {
        file_name: file_name.to_string(),
        text_changes: replacements.iter().map(to_text_change).collect(),
    }
}

/// Problems of the store in source order.
fn sorted_problems<'a>(problems: impl Iterator<Item = &'a Problem>) -> Vec<&'a Problem> {
    let mut problems: Vec<_> = problems.collect();
    problems.sort_by_key(|p| (p.failure.start, p.failure.end));
    problems
}

/// "Fix: <message>" for a single fixable problem.
pub fn problem_fix_action(problem: &Problem, file_name: &str) -> CodeFixAction {
    CodeFixAction {
        description: format!("Fix: {}", problem.failure.message),
        fix_name: rule_fix_id(problem.rule_name()),
        changes: vec![file_changes(file_name, problem.failure.replacements())],
        fix_id: None,
        fix_all_description: None,
    }
}

/// Changes fixing every fixable problem of `rule`, one entry per problem.
pub fn rule_fix_all_changes(store: &ProblemStore, rule: &str, file_name: &str) -> Vec<FileTextChanges> {
    sorted_problems(store.fixable_for_rule(rule))
        .into_iter()
        .map(|p| file_changes(file_name, p.failure.replacements()))
        .collect()
}

/// "Fix all '<rule>'", offered only when at least two problems of the rule
/// are fixable.
pub fn rule_fix_all_action(store: &ProblemStore, rule: &str, file_name: &str) -> Option<CodeFixAction> {
    let changes = rule_fix_all_changes(store, rule, file_name);
    if changes.len() < 2 {
        return None;
    }

    let description = format!("Fix all '{rule}'");
    Some(CodeFixAction {
        description: description.clone(),
        fix_name: rule_fix_id(rule),
        changes,
        fix_id: Some(rule_fix_id(rule)),
        fix_all_description: Some(description),
    })
}

/// "Fix all auto-fixable tslint failures" over every fixable problem, with
/// conflicting fixes reconciled away.
pub fn fix_all_action(store: &ProblemStore, file_name: &str) -> CodeFixAction {
    let fixable = sorted_problems(store.values().filter(|p| p.fixable));
    let replacements = non_overlapping_replacements(fixable.into_iter().map(|p| &p.failure));

    CodeFixAction {
        description: "Fix all auto-fixable tslint failures".to_string(),
        fix_name: FIX_ALL_NAME.to_string(),
        changes: vec![file_changes(file_name, &replacements)],
        fix_id: None,
        fix_all_description: None,
    }
}

/// "Disable rule '<rule>'": inserts a disable directive above the failing
/// line, indented like that line.
pub fn disable_rule_action(problem: &Problem, file_name: &str, text: &SourceText<'_>) -> CodeFixAction {
    let rule = problem.rule_name();
    let line = text.line_of(problem.failure.start);
    let indent = text.indentation(line);

    CodeFixAction {
        description: format!("Disable rule '{rule}'"),
        fix_name: format!("{DISABLE_PREFIX}{rule}"),
        changes: vec![FileTextChanges {
            file_name: file_name.to_string(),
            text_changes: vec![TextChange {
                span: TextSpan {
                    start: text.line_start(line),
                    length: 0,
                },
                new_text: format!("{indent}// tslint:disable-next-line: {rule}\n"),
            }],
        }],
        fix_id: None,
        fix_all_description: None,
    }
}

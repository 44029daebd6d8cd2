//! The decorated language service.
//!
//! Lint diagnostics and fixes are appended to the host's own results. Any
//! failure inside the lint layer is logged and the host's results are
//! returned unchanged.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lintweave_core::exclusion::is_definition_file;
use lintweave_core::{
    LintSource, Problem, ProblemStore, ProgramView, RunResult, filter_failures_for_file,
};
use tracing::{debug, error, info};

use crate::ServiceError;
use crate::conversion::{failure_to_diagnostic, is_in_memory_file, warning_to_diagnostic};
use crate::fixes::{
    disable_rule_action, fix_all_action, problem_fix_action, rule_fix_all_action,
    rule_fix_all_changes, rule_from_fix_id,
};
use crate::host::{
    CodeFixAction, CombinedCodeActions, CombinedCodeFixScope, Diagnostic, FormatOptions,
    LanguageService, ProjectHost, SourceText, UserPreferences,
};
use crate::state::SharedState;
use crate::watcher::ConfigFileWatcher;

/// Name of the lint configuration looked up next to the project when deciding
/// whether warnings are shown.
const DEFAULT_CONFIG_NAME: &str = "tslint.json";

/// The host's compiled program seen through [`ProgramView`].
struct HostProgram<'a>(&'a dyn ProjectHost);

impl ProgramView for HostProgram<'_> {
    fn current_directory(&self) -> PathBuf {
        self.0.current_directory()
    }

    fn source_text(&self, file: &Path) -> Option<String> {
        self.0.source_text(&file.to_string_lossy())
    }
}

/// A host language service with lint results layered on top.
pub struct DecoratedLanguageService {
    inner: Arc<dyn LanguageService>,
    host: Arc<dyn ProjectHost>,
    state: SharedState,
    watcher: Arc<ConfigFileWatcher>,
}

impl DecoratedLanguageService {
    pub(crate) fn new(
        inner: Arc<dyn LanguageService>,
        host: Arc<dyn ProjectHost>,
        state: SharedState,
        watcher: Arc<ConfigFileWatcher>,
    ) -> Self {
        Self {
            inner,
            host,
            state,
            watcher,
        }
    }

    fn lint_diagnostics(
        &self,
        file_name: &str,
        host_reported: bool,
    ) -> Result<Vec<Diagnostic>, ServiceError> {
        let (result, always_warn) = {
            let mut state = self.state.lock();
            if state.settings.suppress_while_type_errors_present && host_reported {
                debug!("Host reported diagnostics for {}, lint suppressed", file_name);
                return Ok(Vec::new());
            }

            info!("Computing lint diagnostics for {}", file_name);
            state.problems.remove(file_name);

            let file = Path::new(file_name);
            if state.settings.ignore_definition_files && is_definition_file(file) {
                return Ok(Vec::new());
            }

            let run_config = state.settings.run_configuration(
                Some(self.host.current_directory()),
                self.host.host_install_root(),
            );
            let program = HostProgram(self.host.as_ref());
            let result = state
                .runner
                .run(file, LintSource::Program(&program), &run_config)?;
            (result, state.settings.always_show_rule_failures_as_warnings)
        };

        if let Some(config_path) = &result.config_file_path {
            self.watcher.ensure_watching(config_path);
        }

        let mut diagnostics = self.warning_diagnostics(&result, file_name);

        let mut store = ProblemStore::new();
        for failure in filter_failures_for_file(file_name, result.failures) {
            diagnostics.push(failure_to_diagnostic(&failure, file_name, always_warn));
            store.set(failure.start, failure.end, Problem::new(failure));
        }
        debug!("{} lint problems for {}", store.len(), file_name);
        self.state.lock().problems.insert(file_name.to_string(), store);

        Ok(diagnostics)
    }

    /// Warnings are only surfaced when the project evidently uses the linter.
    fn warning_diagnostics(&self, result: &RunResult, file_name: &str) -> Vec<Diagnostic> {
        if result.warnings.is_empty() {
            return Vec::new();
        }

        let has_config = result
            .config_file_path
            .as_deref()
            .is_some_and(Path::exists)
            || self.host.current_directory().join(DEFAULT_CONFIG_NAME).exists();
        if !has_config {
            for warning in &result.warnings {
                info!("Lint warning (not shown, no configuration found): {}", warning);
            }
            return Vec::new();
        }

        result
            .warnings
            .iter()
            .map(|warning| warning_to_diagnostic(warning, file_name))
            .collect()
    }

    fn lint_fixes(&self, file_name: &str, start: u32, end: u32, host_fixes: bool) -> Vec<CodeFixAction> {
        let state = self.state.lock();
        if state.settings.suppress_while_type_errors_present && host_fixes {
            return Vec::new();
        }
        let Some(store) = state.problems.get(file_name) else {
            return Vec::new();
        };
        let Some(problem) = store.get(start, end) else {
            return Vec::new();
        };

        let mut actions = Vec::new();
        if problem.fixable {
            actions.push(problem_fix_action(problem, file_name));
            actions.extend(rule_fix_all_action(store, problem.rule_name(), file_name));
        }
        actions.push(fix_all_action(store, file_name));

        let snapshot = self
            .host
            .script_snapshot(file_name)
            .or_else(|| self.host.source_text(file_name));
        match snapshot {
            Some(text) => actions.push(disable_rule_action(
                problem,
                file_name,
                &SourceText::new(&text),
            )),
            None => debug!("No snapshot of {}, disable action skipped", file_name),
        }

        actions
    }
}

impl LanguageService for DecoratedLanguageService {
    fn semantic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        let mut diagnostics = self.inner.semantic_diagnostics(file_name);
        if is_in_memory_file(file_name) {
            return diagnostics;
        }

        match self.lint_diagnostics(file_name, !diagnostics.is_empty()) {
            Ok(lint) => diagnostics.extend(lint),
            Err(e) => error!("Lint of {} failed: {}", file_name, e),
        }
        diagnostics
    }

    fn code_fixes_at_position(
        &self,
        file_name: &str,
        start: u32,
        end: u32,
        error_codes: &[u32],
        format_options: &FormatOptions,
        preferences: &UserPreferences,
    ) -> Vec<CodeFixAction> {
        let mut fixes = self.inner.code_fixes_at_position(
            file_name,
            start,
            end,
            error_codes,
            format_options,
            preferences,
        );
        if is_in_memory_file(file_name) {
            return fixes;
        }

        let lint = self.lint_fixes(file_name, start, end, !fixes.is_empty());
        fixes.extend(lint);
        fixes
    }

    fn combined_code_fix(
        &self,
        scope: &CombinedCodeFixScope,
        fix_id: &str,
        format_options: &FormatOptions,
        preferences: &UserPreferences,
    ) -> CombinedCodeActions {
        let Some(rule) = rule_from_fix_id(fix_id) else {
            return self
                .inner
                .combined_code_fix(scope, fix_id, format_options, preferences);
        };

        let state = self.state.lock();
        let changes = state
            .problems
            .get(&scope.file_name)
            .map(|store| rule_fix_all_changes(store, rule, &scope.file_name))
            .unwrap_or_default();
        CombinedCodeActions { changes }
    }

    fn is_lint_decorated(&self) -> bool {
        true
    }
}

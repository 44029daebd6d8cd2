//! One lint pass for one file.
//!
//! ```text
//! Unresolved -> LibraryLoading -> LibraryMissing | WorkspaceNotTrusted | LibraryReady
//! LibraryReady -> Excluded | ConfigError | ConfigMissing | JsDisabled
//!               | DefaultConfigDisabled | LinterOptionsExcluded | Linted
//! ```
//!
//! Every terminal state except `Linted` yields no failures. Normal engine
//! trouble (missing install, unreadable configuration, excluded file) becomes
//! a warning or an empty result; only unexpected errors are returned as `Err`.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::LintError;
use crate::config::{ConfigResolver, LintConfiguration, UNSTABLE_RULES};
use crate::engine::{EngineLoader, EngineWarnings, LintRequest, NodeEngineLoader};
use crate::exclusion::{ExclusionPatterns, is_definition_file, is_js_file};
use crate::failure::Failure;
use crate::locator::{
    LibraryLocator, LibrarySource, LocateOptions, ModuleResolver, NodeModuleResolver,
    PackageManager,
};
use crate::trust::{WorkspaceTrust, is_implicitly_trusted};
use crate::workdir::WorkingDirectoryGuard;

/// Read access to the host's compiled program.
pub trait ProgramView {
    fn current_directory(&self) -> PathBuf;

    /// Current text of `file`, if it is part of the program.
    fn source_text(&self, file: &Path) -> Option<String>;
}

/// What to lint.
#[derive(Clone, Copy)]
pub enum LintSource<'a> {
    Text(&'a str),
    Program(&'a dyn ProgramView),
}

/// Verbosity of runner tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    #[default]
    Normal,
    Verbose,
}

/// Options for one lint pass.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    pub js_enable: bool,
    pub rules_directory: Vec<String>,
    pub config_file: Option<PathBuf>,
    pub ignore_definition_files: bool,
    pub exclude: Vec<String>,
    pub validate_with_default_config: Option<bool>,
    pub node_path: Option<PathBuf>,
    pub package_manager: PackageManager,
    pub trace_level: TraceLevel,
    pub workspace_folder: Option<PathBuf>,
    pub workspace_trust: WorkspaceTrust,
    /// Install location of the running host, for the implicit trust check.
    pub host_install_root: Option<PathBuf>,
    pub strip_unstable_rules: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            js_enable: false,
            rules_directory: Vec::new(),
            config_file: None,
            ignore_definition_files: true,
            exclude: Vec::new(),
            validate_with_default_config: None,
            node_path: None,
            package_manager: PackageManager::default(),
            trace_level: TraceLevel::default(),
            workspace_folder: None,
            workspace_trust: WorkspaceTrust::default(),
            host_install_root: None,
            strip_unstable_rules: true,
        }
    }
}

/// Terminal state of a lint pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    LibraryMissing,
    WorkspaceNotTrusted,
    Excluded,
    ConfigError,
    ConfigMissing,
    JsDisabled,
    DefaultConfigDisabled,
    LinterOptionsExcluded,
    Linted,
}

/// Output of [`LintRunner::run`].
#[derive(Debug, Clone)]
pub struct RunResult {
    pub failures: Vec<Failure>,
    pub error_count: usize,
    pub warning_count: usize,
    pub warnings: Vec<String>,
    pub working_directory: Option<PathBuf>,
    pub config_file_path: Option<PathBuf>,
    pub outcome: RunOutcome,
}

impl RunResult {
    fn empty(outcome: RunOutcome, warnings: Vec<String>) -> Self {
        Self {
            failures: Vec::new(),
            error_count: 0,
            warning_count: 0,
            warnings,
            working_directory: None,
            config_file_path: None,
            outcome,
        }
    }
}

/// Install instructions shown when no engine could be loaded for `file`.
pub fn install_failure_message(
    file: &Path,
    workspace_folder: Option<&Path>,
    package_manager: PackageManager,
) -> String {
    let local = package_manager.local_install_command();
    let global = package_manager.global_install_command();
    if workspace_folder.is_some() {
        [
            String::new(),
            format!("Failed to load the TSLint library for the document {}", file.display()),
            String::new(),
            format!(
                "To use TSLint in this workspace please install tslint using '{local}' or globally using '{global}'."
            ),
            "TSLint has a peer dependency on `typescript`, make sure that `typescript` is installed as well.".to_string(),
            "You need to reopen the workspace after installing tslint.".to_string(),
        ]
        .join("\n")
    } else {
        [
            format!("Failed to load the TSLint library for the document {}", file.display()),
            format!("To use TSLint for single file install tslint globally using '{global}'."),
            "TSLint has a peer dependency on `typescript`, make sure that `typescript` is installed as well.".to_string(),
            "You need to reopen the editor after installing tslint.".to_string(),
        ]
        .join("\n")
    }
}

/// Warning shown when a workspace engine is found but not yet trusted.
pub fn untrusted_workspace_message(module_path: &Path) -> String {
    format!(
        "The TSLint library at '{}' belongs to this workspace and is not trusted yet. \
         Set 'allowWorkspaceLibraryExecution' to true to run it, or to false to use the global installation.",
        module_path.display()
    )
}

/// Runs the lint engine for single files.
pub struct LintRunner {
    locator: LibraryLocator,
    config: ConfigResolver,
}

impl LintRunner {
    pub fn new(resolver: Box<dyn ModuleResolver>, loader: Box<dyn EngineLoader>) -> Self {
        Self {
            locator: LibraryLocator::new(resolver, loader),
            config: ConfigResolver::new(),
        }
    }

    /// Runner that resolves and runs the engine through `node`.
    pub fn with_node() -> Self {
        Self::new(
            Box::new(NodeModuleResolver::new()),
            Box::new(NodeEngineLoader::new()),
        )
    }

    pub fn run(
        &mut self,
        file: &Path,
        source: LintSource<'_>,
        run_config: &RunConfiguration,
    ) -> Result<RunResult, LintError> {
        debug!("Start lint pass for {}", file.display());
        let mut warnings = Vec::new();

        let trust = run_config.workspace_trust.or(WorkspaceTrust::from_env());
        let options = LocateOptions {
            node_path: run_config.node_path.clone(),
            package_manager: run_config.package_manager,
            allow_workspace: trust != WorkspaceTrust::Disallow,
        };

        debug!("Loading lint library");
        let Some(library) = self.locator.locate(file, &options, &mut warnings) else {
            warnings.push(install_failure_message(
                file,
                run_config.workspace_folder.as_deref(),
                run_config.package_manager,
            ));
            return Ok(RunResult::empty(RunOutcome::LibraryMissing, warnings));
        };

        let workspace_allowed = match trust {
            WorkspaceTrust::Allow => true,
            WorkspaceTrust::Disallow => false,
            WorkspaceTrust::Unknown if library.source == LibrarySource::Workspace => {
                if !is_implicitly_trusted(
                    &library.module_path,
                    run_config.host_install_root.as_deref(),
                ) {
                    info!("Workspace library {} is not trusted", library.module_path.display());
                    warnings.push(untrusted_workspace_message(&library.module_path));
                    return Ok(RunResult::empty(RunOutcome::WorkspaceNotTrusted, warnings));
                }
                debug!("Workspace library is implicitly trusted");
                true
            }
            WorkspaceTrust::Unknown => false,
        };

        let Some(engine) = self.locator.engine(&library.module_path) else {
            warnings.push(install_failure_message(
                file,
                run_config.workspace_folder.as_deref(),
                run_config.package_manager,
            ));
            return Ok(RunResult::empty(RunOutcome::LibraryMissing, warnings));
        };
        debug!("Lint library ready");

        let cwd = match (&run_config.workspace_folder, source) {
            (Some(folder), _) => Some(folder.clone()),
            (None, LintSource::Program(program)) => Some(program.current_directory()),
            (None, LintSource::Text(_)) => None,
        };

        if run_config.ignore_definition_files && is_definition_file(file) {
            debug!("No linting: {} is a definition file", file.display());
            return Ok(RunResult::empty(RunOutcome::Excluded, warnings));
        }
        if ExclusionPatterns::new(&run_config.exclude).is_excluded(file, cwd.as_deref()) {
            debug!("No linting: {} is excluded", file.display());
            return Ok(RunResult::empty(RunOutcome::Excluded, warnings));
        }

        let _cwd_guard = match &run_config.workspace_folder {
            Some(folder) if workspace_allowed => match WorkingDirectoryGuard::change_to(folder) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    warn!("Cannot change directory to {}: {}", folder.display(), e);
                    None
                }
            },
            _ => None,
        };

        self.config
            .set_strip_unstable_rules(run_config.strip_unstable_rules);
        let resolved = match self.config.resolve(
            engine.config_discovery(),
            file,
            run_config.config_file.as_deref(),
        ) {
            Ok(resolved) => resolved,
            Err(e @ LintError::ConfigRead(_)) => {
                debug!("No linting: cannot read configuration for {}", file.display());
                warnings.push(e.to_string());
                return Ok(RunResult::empty(RunOutcome::ConfigError, warnings));
            }
            Err(e) => return Err(e),
        };

        let Some(configuration) = resolved.configuration.as_ref() else {
            debug!("No linting: no configuration");
            return Ok(RunResult::empty(RunOutcome::ConfigMissing, warnings));
        };

        if is_js_file(file) && !run_config.js_enable {
            debug!("No linting: JS linting is disabled");
            return Ok(RunResult::empty(RunOutcome::JsDisabled, warnings));
        }

        if run_config.validate_with_default_config == Some(false) && resolved.is_default {
            debug!("No linting: linting with the default configuration is disabled");
            return Ok(RunResult::empty(RunOutcome::DefaultConfigDisabled, warnings));
        }

        let config_dir = resolved.path.as_deref().and_then(Path::parent);
        if ExclusionPatterns::new(configuration.excluded_patterns()).is_excluded(file, config_dir) {
            debug!("No linting: excluded by linterOptions.exclude");
            return Ok(RunResult::empty(RunOutcome::LinterOptionsExcluded, warnings));
        }

        let configuration: Cow<'_, LintConfiguration> =
            if !workspace_allowed && configuration.rules_directory.is_some() {
                warn!("Ignoring rulesDirectory of an untrusted workspace");
                let mut stripped = configuration.clone();
                stripped.rules_directory = None;
                Cow::Owned(stripped)
            } else {
                Cow::Borrowed(configuration)
            };
        let rules_directory: &[String] = if workspace_allowed {
            &run_config.rules_directory
        } else {
            &[]
        };

        if run_config.trace_level == TraceLevel::Verbose {
            match serde_json::to_string_pretty(configuration.as_ref()) {
                Ok(json) => info!("Lint configuration: {}", json),
                Err(e) => debug!("Cannot print lint configuration: {}", e),
            }
        }

        let contents = match source {
            LintSource::Text(text) => Cow::Borrowed(text),
            LintSource::Program(program) => Cow::Owned(program.source_text(file).ok_or_else(|| {
                LintError::crash(format!("{} is not part of the program", file.display()))
            })?),
        };

        let request = LintRequest {
            file,
            contents: &contents,
            configuration: &configuration,
            config_path: resolved.path.as_deref(),
            rules_directory,
            disabled_rules: if run_config.strip_unstable_rules {
                UNSTABLE_RULES
            } else {
                &[]
            },
            working_directory: cwd.as_deref(),
        };

        let mut engine_warnings = EngineWarnings::new();
        debug!("Linting: start");
        let output = engine.lint(&request, &mut engine_warnings)?;
        debug!("Linting: {} failures", output.failures.len());
        warnings.extend(engine_warnings.into_vec());

        Ok(RunResult {
            failures: output.failures,
            error_count: output.error_count,
            warning_count: output.warning_count,
            warnings,
            working_directory: run_config.workspace_folder.clone(),
            config_file_path: resolved.path.clone(),
            outcome: RunOutcome::Linted,
        })
    }

    /// A lint configuration file changed on disk.
    pub fn on_config_file_change(&mut self, path: &Path) {
        info!("Lint configuration {} changed", path.display());
        self.config.flush();
    }
}

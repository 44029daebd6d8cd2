//! The boundary to the external lint engine.
//!
//! [`LintEngine`] is what the runner invokes; [`EngineLoader`] turns a
//! resolved module path into an engine. The process-backed implementations
//! drive a Node installation of the engine over a JSON stdin/stdout protocol:
//! one request object in, one `{ failures, errorCount, warningCount }` object
//! out, free-text warnings on stderr. Configuration loading goes through the
//! same module so that `extends` chains and `tslint.js` files resolve exactly
//! as they do on the command line.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::LintError;
use crate::config::{
    ConfigDiscovery, DiscoveredConfiguration, FsConfigDiscovery, LintConfiguration,
};
use crate::failure::Failure;
use crate::process;

/// Warnings the engine emitted during one invocation.
#[derive(Debug, Default)]
pub struct EngineWarnings {
    messages: Vec<String>,
}

impl EngineWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and forwards it to the log.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(target: "lintweave::engine", "{}", message);
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.messages
    }
}

/// Input of one engine invocation.
#[derive(Debug, Clone, Copy)]
pub struct LintRequest<'a> {
    pub file: &'a Path,
    pub contents: &'a str,
    pub configuration: &'a LintConfiguration,
    /// Path of the configuration file, used to resolve `extends`.
    pub config_path: Option<&'a Path>,
    pub rules_directory: &'a [String],
    /// Rules removed after the engine has merged any remaining `extends`.
    pub disabled_rules: &'a [&'a str],
    pub working_directory: Option<&'a Path>,
}

/// Result of one engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintOutput {
    #[serde(default)]
    pub failures: Vec<Failure>,
    #[serde(default)]
    pub error_count: usize,
    #[serde(default)]
    pub warning_count: usize,
}

/// A loaded lint engine.
pub trait LintEngine: Send + Sync {
    /// Lints one file. Side-channel warnings go to `warnings`.
    fn lint(
        &self,
        request: &LintRequest<'_>,
        warnings: &mut EngineWarnings,
    ) -> Result<LintOutput, LintError>;

    /// The engine's configuration-discovery facility.
    fn config_discovery(&self) -> &dyn ConfigDiscovery {
        &FsConfigDiscovery
    }
}

/// Loads an engine from a resolved module path.
pub trait EngineLoader: Send + Sync {
    fn load(&self, module_path: &Path) -> Result<Arc<dyn LintEngine>, LintError>;
}

const LINT_SCRIPT: &str = r#"
const engine = require(process.argv[1]);
let input = '';
process.stdin.setEncoding('utf8');
process.stdin.on('data', chunk => { input += chunk; });
process.stdin.on('end', () => {
    const request = JSON.parse(input);
    const linter = new engine.Linter({
        fix: false,
        formatter: 'json',
        rulesDirectory: request.rulesDirectory.length > 0 ? request.rulesDirectory : undefined,
    });
    const configuration = engine.Configuration.parseConfigFile(
        request.configuration,
        request.configDirectory || process.cwd(),
        engine.Configuration.readConfigurationFile,
    );
    for (const rule of request.disabledRules) {
        configuration.rules.delete(rule);
        configuration.jsRules.delete(rule);
    }
    linter.lint(request.fileName, request.contents, configuration);
    const result = linter.getResult();
    process.stdout.write(JSON.stringify({
        failures: result.failures.map(f => f.toJson()),
        errorCount: result.errorCount,
        warningCount: result.warningCount,
    }));
});
"#;

const CONFIG_SCRIPT: &str = r#"
const engine = require(process.argv[1]);
let input = '';
process.stdin.setEncoding('utf8');
process.stdin.on('data', chunk => { input += chunk; });
process.stdin.on('end', () => {
    const request = JSON.parse(input);
    let found;
    try {
        found = engine.Configuration.findConfiguration(request.configFile, request.fileName);
    } catch (e) {
        process.stderr.write(String(e && e.message ? e.message : e));
        process.exit(3);
    }
    const toRaw = rules => {
        const raw = {};
        if (rules) {
            rules.forEach((options, name) => {
                raw[name] = { severity: options.ruleSeverity, options: options.ruleArguments };
            });
        }
        return raw;
    };
    const config = found.results;
    process.stdout.write(JSON.stringify({
        path: found.path || null,
        configuration: config ? {
            rules: toRaw(config.rules),
            jsRules: toRaw(config.jsRules),
            rulesDirectory: config.rulesDirectory,
            linterOptions: config.linterOptions,
        } : null,
    }));
});
"#;

/// Exit status of [`CONFIG_SCRIPT`] for a configuration the engine rejects.
const CONFIG_ERROR_EXIT: i32 = 3;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    file_name: String,
    contents: &'a str,
    configuration: &'a LintConfiguration,
    config_directory: Option<&'a Path>,
    rules_directory: &'a [String],
    disabled_rules: &'a [&'a str],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireConfigRequest<'a> {
    config_file: Option<&'a Path>,
    file_name: &'a Path,
}

#[derive(Deserialize)]
struct WireConfigResponse {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    configuration: Option<LintConfiguration>,
}

/// Configuration discovery through the engine module's own loader.
///
/// The lookup of the configuration path is the same as for
/// [`FsConfigDiscovery`]; loading runs the engine, which merges the whole
/// `extends` chain, resolves `linterOptions.exclude` against the file's
/// directory and accepts `tslint.js` files.
#[derive(Debug, Clone)]
pub struct NodeConfigDiscovery {
    node: PathBuf,
    module_path: PathBuf,
    timeout: Option<Duration>,
}

impl NodeConfigDiscovery {
    pub fn new(node: impl Into<PathBuf>, module_path: impl Into<PathBuf>) -> Self {
        Self {
            node: node.into(),
            module_path: module_path.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl ConfigDiscovery for NodeConfigDiscovery {
    fn find_configuration_path(&self, override_path: Option<&Path>, file: &Path) -> Option<PathBuf> {
        FsConfigDiscovery.find_configuration_path(override_path, file)
    }

    fn find_configuration(
        &self,
        override_path: Option<&Path>,
        file: &Path,
    ) -> Result<DiscoveredConfiguration, LintError> {
        let input = serde_json::to_vec(&WireConfigRequest {
            config_file: override_path,
            file_name: file,
        })?;

        let mut command = Command::new(&self.node);
        command.arg("-e").arg(CONFIG_SCRIPT).arg(&self.module_path);

        debug!("Loading lint configuration for {} through the engine", file.display());
        let output = process::run(&mut command, Some(&input), self.timeout)?;

        if output.status.code() == Some(CONFIG_ERROR_EXIT) {
            return Err(LintError::config(output.stderr.trim()));
        }
        if !output.success() {
            return Err(LintError::crash(format!(
                "{} exited with {}",
                self.module_path.display(),
                output.status
            )));
        }

        let response: WireConfigResponse = serde_json::from_str(&output.stdout)
            .map_err(|e| LintError::protocol(format!("Invalid configuration output: {}", e)))?;
        Ok(DiscoveredConfiguration {
            configuration: response.configuration,
            path: response.path,
        })
    }
}

/// An engine module run by a `node` executable.
#[derive(Debug, Clone)]
pub struct NodeEngine {
    node: PathBuf,
    module_path: PathBuf,
    timeout: Option<Duration>,
    discovery: NodeConfigDiscovery,
}

impl NodeEngine {
    pub fn new(node: impl Into<PathBuf>, module_path: impl Into<PathBuf>) -> Self {
        let node = node.into();
        let module_path = module_path.into();
        Self {
            discovery: NodeConfigDiscovery::new(&node, &module_path),
            node,
            module_path,
            timeout: None,
        }
    }

    /// Bounds each engine call; calls are unbounded by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self.discovery = self.discovery.with_timeout(timeout);
        self
    }
}

impl LintEngine for NodeEngine {
    fn lint(
        &self,
        request: &LintRequest<'_>,
        warnings: &mut EngineWarnings,
    ) -> Result<LintOutput, LintError> {
        let wire = WireRequest {
            file_name: request.file.to_string_lossy().into_owned(),
            contents: request.contents,
            configuration: request.configuration,
            config_directory: request.config_path.and_then(Path::parent),
            rules_directory: request.rules_directory,
            disabled_rules: request.disabled_rules,
        };
        let input = serde_json::to_vec(&wire)?;

        let mut command = Command::new(&self.node);
        command.arg("-e").arg(LINT_SCRIPT).arg(&self.module_path);
        if let Some(dir) = request.working_directory {
            command.current_dir(dir);
        }

        debug!("Running lint engine {}", self.module_path.display());
        let output = process::run(&mut command, Some(&input), self.timeout)?;

        for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
            warnings.warn(line);
        }

        if !output.success() {
            return Err(LintError::crash(format!(
                "{} exited with {}",
                self.module_path.display(),
                output.status
            )));
        }

        serde_json::from_str(&output.stdout)
            .map_err(|e| LintError::protocol(format!("Invalid engine output: {}", e)))
    }

    fn config_discovery(&self) -> &dyn ConfigDiscovery {
        &self.discovery
    }
}

/// Loads engines through the `node` executable found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct NodeEngineLoader {
    node: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl NodeEngineLoader {
    pub fn new() -> Self {
        Self {
            node: which::which("node").ok(),
            timeout: None,
        }
    }

    pub fn with_node(node: impl Into<PathBuf>) -> Self {
        Self {
            node: Some(node.into()),
            timeout: None,
        }
    }

    /// Timeout applied to every engine created by this loader.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl EngineLoader for NodeEngineLoader {
    fn load(&self, module_path: &Path) -> Result<Arc<dyn LintEngine>, LintError> {
        let Some(node) = &self.node else {
            return Err(LintError::EngineMissing(
                "no 'node' executable on PATH".to_string(),
            ));
        };
        if !module_path.is_file() {
            return Err(LintError::EngineMissing(module_path.display().to_string()));
        }

        let mut engine = NodeEngine::new(node, module_path);
        if let Some(timeout) = self.timeout {
            engine = engine.with_timeout(timeout);
        }
        Ok(Arc::new(engine))
    }
}

//! Integration tests for the lint runner state machine.
//!
//! The engine, its loader and the module resolver are replaced by in-process
//! fakes so that no Node installation is needed.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lintweave_core::{
    ConfigDiscovery, DiscoveredConfiguration, EngineLoader, EngineWarnings, Failure,
    FsConfigDiscovery, LintConfiguration, LintEngine, LintError, LintOutput, LintRequest,
    LintRunner, LintSource, ModuleResolver, PackageManager, ProgramView, Replacement,
    RunConfiguration, RunOutcome, WorkspaceTrust,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const CONTENT: &str = "let t: Array<string> = new Array<string>(); console.log(t);";

#[derive(Debug, Clone)]
struct Seen {
    rules: Vec<String>,
    rules_directory: Vec<String>,
    working_directory: Option<PathBuf>,
    process_cwd: PathBuf,
    contents: String,
}

struct NoConfigDiscovery;

impl ConfigDiscovery for NoConfigDiscovery {
    fn find_configuration_path(&self, _: Option<&Path>, _: &Path) -> Option<PathBuf> {
        None
    }

    fn find_configuration(
        &self,
        _: Option<&Path>,
        _: &Path,
    ) -> Result<DiscoveredConfiguration, LintError> {
        Ok(DiscoveredConfiguration {
            configuration: Some(LintConfiguration::recommended()),
            path: None,
        })
    }
}

#[derive(Default)]
struct FakeEngine {
    warnings: Vec<String>,
    default_config: bool,
    seen: Mutex<Vec<Seen>>,
}

impl FakeEngine {
    fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    fn last(&self) -> Seen {
        self.seen.lock().last().cloned().unwrap()
    }
}

impl LintEngine for FakeEngine {
    fn lint(
        &self,
        request: &LintRequest<'_>,
        warnings: &mut EngineWarnings,
    ) -> Result<LintOutput, LintError> {
        self.seen.lock().push(Seen {
            rules: request.configuration.rules.keys().cloned().collect(),
            rules_directory: request.rules_directory.to_vec(),
            working_directory: request.working_directory.map(Path::to_path_buf),
            process_cwd: env::current_dir()?,
            contents: request.contents.to_string(),
        });
        for warning in &self.warnings {
            warnings.warn(warning.clone());
        }

        let failure = Failure::new(
            request.file.to_string_lossy(),
            7,
            20,
            "Array type using 'Array<T>' is forbidden for simple types. Use 'T[]' instead.",
        )
        .with_rule("array-type")
        .with_severity("error")
        .with_fix(vec![Replacement::delete(7, 6), Replacement::new(19, 1, "[]")]);

        Ok(LintOutput {
            failures: vec![failure],
            error_count: 1,
            warning_count: 0,
        })
    }

    fn config_discovery(&self) -> &dyn ConfigDiscovery {
        if self.default_config {
            &NoConfigDiscovery
        } else {
            &FsConfigDiscovery
        }
    }
}

struct FakeLoader(Arc<FakeEngine>);

impl EngineLoader for FakeLoader {
    fn load(&self, _: &Path) -> Result<Arc<dyn LintEngine>, LintError> {
        Ok(self.0.clone())
    }
}

struct FakeResolver {
    workspace: Option<PathBuf>,
    global: Option<PathBuf>,
}

impl ModuleResolver for FakeResolver {
    fn resolve_module(&self, search_path: Option<&Path>, _: &Path) -> Option<PathBuf> {
        match search_path {
            Some(_) => self.global.clone(),
            None => self.workspace.clone(),
        }
    }

    fn global_root(&self, _: PackageManager) -> Option<PathBuf> {
        Some(PathBuf::from("/usr/lib/node_modules"))
    }
}

struct FakeProgram {
    cwd: PathBuf,
}

impl ProgramView for FakeProgram {
    fn current_directory(&self) -> PathBuf {
        self.cwd.clone()
    }

    fn source_text(&self, _: &Path) -> Option<String> {
        Some(CONTENT.to_string())
    }
}

fn workspace_module(dir: &TempDir) -> PathBuf {
    dir.path().join("node_modules/tslint/lib/index.js")
}

fn global_module() -> PathBuf {
    PathBuf::from("/usr/lib/node_modules/tslint/lib/index.js")
}

fn create_runner(engine: &Arc<FakeEngine>, workspace: Option<PathBuf>, global: Option<PathBuf>) -> LintRunner {
    LintRunner::new(
        Box::new(FakeResolver { workspace, global }),
        Box::new(FakeLoader(Arc::clone(engine))),
    )
}

fn trusted() -> RunConfiguration {
    RunConfiguration {
        workspace_trust: WorkspaceTrust::Allow,
        ..RunConfiguration::default()
    }
}

fn write_config(dir: &TempDir, json: &str) -> PathBuf {
    let path = dir.path().join("tslint.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_lints_with_the_nearest_configuration() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, r#"{ "rules": { "array-type": true } }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    let file = dir.path().join("test.ts");
    let result = runner
        .run(&file, LintSource::Text(CONTENT), &trusted())
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::Linted);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.error_count, 1);
    assert_eq!(result.config_file_path, Some(config_path));
    assert_eq!(engine.last().rules, vec!["array-type".to_string()]);
    assert_eq!(engine.last().contents, CONTENT);
}

#[test]
fn test_missing_library_yields_install_instructions() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, None, None);

    let config = RunConfiguration {
        package_manager: PackageManager::Pnpm,
        ..trusted()
    };
    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &config)
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::LibraryMissing);
    assert!(result.failures.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("'pnpm add -g tslint'"));
    assert_eq!(engine.calls(), 0);
}

#[test]
fn test_excluded_files_produce_no_failures() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "rules": { "array-type": true } }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    let definition = runner
        .run(&dir.path().join("types.d.ts"), LintSource::Text(CONTENT), &trusted())
        .unwrap();
    assert_eq!(definition.outcome, RunOutcome::Excluded);

    let relative = RunConfiguration {
        exclude: vec!["test.ts".to_string()],
        workspace_folder: Some(dir.path().to_path_buf()),
        ..trusted()
    };
    let excluded = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &relative)
        .unwrap();
    assert_eq!(excluded.outcome, RunOutcome::Excluded);

    let absolute = RunConfiguration {
        exclude: vec![dir.path().join("test.ts").to_string_lossy().into_owned()],
        ..trusted()
    };
    let excluded = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &absolute)
        .unwrap();
    assert_eq!(excluded.outcome, RunOutcome::Excluded);

    let js = runner
        .run(&dir.path().join("test.js"), LintSource::Text(CONTENT), &trusted())
        .unwrap();
    assert_eq!(js.outcome, RunOutcome::JsDisabled);

    assert!(definition.failures.is_empty() && excluded.failures.is_empty() && js.failures.is_empty());
    assert_eq!(engine.calls(), 0);
}

#[test]
fn test_relative_exclusion_uses_the_program_directory() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "rules": {} }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);
    let program = FakeProgram {
        cwd: dir.path().to_path_buf(),
    };

    let config = RunConfiguration {
        exclude: vec!["*.ts".to_string()],
        ..trusted()
    };
    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Program(&program), &config)
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::Excluded);
}

#[test]
fn test_program_source_is_linted() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "rules": {} }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);
    let program = FakeProgram {
        cwd: dir.path().to_path_buf(),
    };

    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Program(&program), &trusted())
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::Linted);
    assert_eq!(engine.last().contents, CONTENT);
    assert_eq!(engine.last().working_directory, Some(dir.path().to_path_buf()));
}

#[test]
fn test_js_files_are_linted_when_enabled() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "jsRules": true }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    let config = RunConfiguration {
        js_enable: true,
        ..trusted()
    };
    let result = runner
        .run(&dir.path().join("test.mjs"), LintSource::Text(CONTENT), &config)
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::Linted);
}

#[test]
fn test_unreadable_configuration_becomes_a_warning() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "rules": ["#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &trusted())
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::ConfigError);
    assert!(result.failures.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("Cannot read tslint configuration - '"));
}

#[test]
fn test_default_configuration_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(FakeEngine {
        default_config: true,
        ..FakeEngine::default()
    });
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);
    let file = dir.path().join("test.ts");

    let disabled = RunConfiguration {
        validate_with_default_config: Some(false),
        ..trusted()
    };
    let result = runner.run(&file, LintSource::Text(CONTENT), &disabled).unwrap();
    assert_eq!(result.outcome, RunOutcome::DefaultConfigDisabled);

    let result = runner.run(&file, LintSource::Text(CONTENT), &trusted()).unwrap();
    assert_eq!(result.outcome, RunOutcome::Linted);
    assert_eq!(result.config_file_path, None);
}

#[test]
fn test_linter_options_exclude_is_honored() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{ "rules": {}, "linterOptions": { "exclude": ["**/generated/**"] } }"#,
    );
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    let result = runner
        .run(
            &dir.path().join("generated").join("test.ts"),
            LintSource::Text(CONTENT),
            &trusted(),
        )
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::LinterOptionsExcluded);
    assert_eq!(engine.calls(), 0);
}

#[test]
fn test_relative_linter_options_exclude_uses_the_configuration_directory() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{ "rules": {}, "linterOptions": { "exclude": ["excluded.ts", "src/gen/*.ts"] } }"#,
    );
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    for excluded in [dir.path().join("excluded.ts"), dir.path().join("src/gen/api.ts")] {
        let result = runner
            .run(&excluded, LintSource::Text(CONTENT), &trusted())
            .unwrap();
        assert_eq!(result.outcome, RunOutcome::LinterOptionsExcluded);
    }
    assert_eq!(engine.calls(), 0);

    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &trusted())
        .unwrap();
    assert_eq!(result.outcome, RunOutcome::Linted);
}

#[test]
fn test_inherited_rules_reach_the_engine() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("base.json"),
        r#"{ "rules": { "no-unused-variable": true, "semicolon": true } }"#,
    )
    .unwrap();
    write_config(&dir, r#"{ "extends": "./base.json", "rules": { "array-type": true } }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &trusted())
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::Linted);
    let mut rules = engine.last().rules;
    rules.sort();
    assert_eq!(rules, vec!["array-type".to_string(), "semicolon".to_string()]);
}

#[test]
fn test_untrusted_workspace_library_is_not_run() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "rules": {} }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), Some(global_module()));

    let config = RunConfiguration {
        workspace_trust: WorkspaceTrust::Unknown,
        ..RunConfiguration::default()
    };
    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &config)
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::WorkspaceNotTrusted);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("not trusted yet"));
    assert_eq!(engine.calls(), 0);
}

#[test]
fn test_library_next_to_the_host_is_implicitly_trusted() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "rules": {} }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    let config = RunConfiguration {
        workspace_trust: WorkspaceTrust::Unknown,
        host_install_root: Some(dir.path().join("node_modules/typescript/lib")),
        ..RunConfiguration::default()
    };
    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &config)
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::Linted);
}

#[test]
fn test_disallowed_workspace_uses_global_library_without_rules_directory() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "rules": {} }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), Some(global_module()));

    let config = RunConfiguration {
        workspace_trust: WorkspaceTrust::Disallow,
        rules_directory: vec!["./custom-rules".to_string()],
        ..RunConfiguration::default()
    };
    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &config)
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::Linted);
    assert!(engine.last().rules_directory.is_empty());

    let allowed = RunConfiguration {
        workspace_trust: WorkspaceTrust::Allow,
        ..config
    };
    runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &allowed)
        .unwrap();
    assert_eq!(engine.last().rules_directory, vec!["./custom-rules".to_string()]);
}

#[test]
fn test_working_directory_is_changed_and_restored() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "rules": {} }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    let config = RunConfiguration {
        workspace_folder: Some(dir.path().to_path_buf()),
        ..trusted()
    };
    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &config)
        .unwrap();

    assert_eq!(result.working_directory, Some(dir.path().to_path_buf()));
    assert_eq!(
        engine.last().process_cwd.canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
    assert_ne!(
        env::current_dir().unwrap().canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
}

#[test]
fn test_engine_warnings_are_appended() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "rules": {} }"#);
    let engine = Arc::new(FakeEngine {
        warnings: vec!["Could not find implementations for the following rules".to_string()],
        ..FakeEngine::default()
    });
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &trusted())
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::Linted);
    assert_eq!(
        result.warnings,
        vec!["Could not find implementations for the following rules".to_string()]
    );
}

#[test]
fn test_configuration_is_cached_until_the_file_changes() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, r#"{ "rules": { "a": true } }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);
    let file = dir.path().join("test.ts");

    runner.run(&file, LintSource::Text(CONTENT), &trusted()).unwrap();
    write_config(&dir, r#"{ "rules": { "b": true } }"#);

    runner.run(&file, LintSource::Text(CONTENT), &trusted()).unwrap();
    assert_eq!(engine.last().rules, vec!["a".to_string()]);

    runner.on_config_file_change(&config_path);
    runner.run(&file, LintSource::Text(CONTENT), &trusted()).unwrap();
    assert_eq!(engine.last().rules, vec!["b".to_string()]);
}

#[test]
fn test_unstable_rule_is_removed_before_linting() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{ "rules": { "array-type": true, "no-unused-variable": true } }"#,
    );
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &trusted())
        .unwrap();

    assert_eq!(engine.last().rules, vec!["array-type".to_string()]);
}

#[test]
fn test_invalid_node_path_warns_and_still_lints() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{ "rules": {} }"#);
    let engine = Arc::new(FakeEngine::default());
    let mut runner = create_runner(&engine, Some(workspace_module(&dir)), None);

    let config = RunConfiguration {
        node_path: Some(dir.path().join("missing")),
        ..trusted()
    };
    let result = runner
        .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &config)
        .unwrap();

    assert_eq!(result.outcome, RunOutcome::Linted);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("The setting 'nodePath' refers to"));
}

#[cfg(unix)]
mod node_engine {
    use super::*;
    use pretty_assertions::assert_eq;
    use lintweave_core::engine::NodeEngineLoader;
    use serde_json::{Value, json};
    use std::os::unix::fs::PermissionsExt;

    const NO_FAILURES: &str = r#"{"failures":[],"errorCount":0,"warningCount":0}"#;

    /// Writes a stand-in `node` that stores each request next to itself and
    /// runs `on_config` for configuration calls.
    fn fake_node(dir: &Path, on_config: &str) -> PathBuf {
        let bin = dir.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let script = bin.join("node");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\ncase \"$2\" in\n  *findConfiguration*) cat > \"{bin}/config-request.json\"; {on_config} ;;\n  *) cat > \"{bin}/lint-request.json\"; printf '%s' '{NO_FAILURES}' ;;\nesac\n",
                bin = bin.display(),
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    fn answering(response: &Value) -> String {
        format!("printf '%s' '{}'", response)
    }

    fn recorded(node: &Path, name: &str) -> Value {
        let bin = node.parent().unwrap();
        serde_json::from_str(&fs::read_to_string(bin.join(name)).unwrap()).unwrap()
    }

    fn node_runner(dir: &TempDir, node: &Path) -> LintRunner {
        let module = workspace_module(dir);
        fs::create_dir_all(module.parent().unwrap()).unwrap();
        fs::write(&module, "").unwrap();
        LintRunner::new(
            Box::new(FakeResolver {
                workspace: Some(module),
                global: None,
            }),
            Box::new(NodeEngineLoader::with_node(node)),
        )
    }

    #[test]
    fn test_tslint_js_configuration_is_loaded_by_the_engine() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("tslint.js");
        fs::write(&config_path, "module.exports = { rules: { 'array-type': true } };").unwrap();
        let response = json!({
            "path": config_path,
            "configuration": {
                "rules": {
                    "array-type": { "severity": "error", "options": [] },
                    "no-unused-variable": { "severity": "error", "options": [] }
                },
                "linterOptions": { "exclude": [] }
            }
        });
        let node = fake_node(dir.path(), &answering(&response));
        let mut runner = node_runner(&dir, &node);

        let config = RunConfiguration {
            config_file: Some(config_path.clone()),
            ..trusted()
        };
        let result = runner
            .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &config)
            .unwrap();

        assert_eq!(result.outcome, RunOutcome::Linted);
        assert_eq!(result.config_file_path, Some(config_path.clone()));
        assert_eq!(recorded(&node, "config-request.json")["configFile"], json!(config_path));

        let lint = recorded(&node, "lint-request.json");
        let rules = lint["configuration"]["rules"].as_object().unwrap();
        assert!(rules.contains_key("array-type"));
        assert!(!rules.contains_key("no-unused-variable"));
        assert_eq!(lint["configDirectory"], json!(dir.path()));
        assert_eq!(lint["disabledRules"], json!(["no-unused-variable"]));
    }

    #[test]
    fn test_default_configuration_rules_reach_the_engine() {
        let dir = TempDir::new().unwrap();
        let response = json!({
            "path": null,
            "configuration": {
                "rules": { "semicolon": { "severity": "error", "options": ["always"] } }
            }
        });
        let node = fake_node(dir.path(), &answering(&response));
        let mut runner = node_runner(&dir, &node);

        let result = runner
            .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &trusted())
            .unwrap();

        assert_eq!(result.outcome, RunOutcome::Linted);
        assert_eq!(result.config_file_path, None);
        assert_eq!(recorded(&node, "config-request.json")["configFile"], Value::Null);

        let lint = recorded(&node, "lint-request.json");
        assert_eq!(
            lint["configuration"]["rules"]["semicolon"]["options"],
            json!(["always"])
        );
    }

    #[test]
    fn test_configuration_rejected_by_the_engine_is_a_warning() {
        let dir = TempDir::new().unwrap();
        let node = fake_node(
            dir.path(),
            "printf '%s' 'Invalid \"extends\" configuration value' >&2; exit 3",
        );
        let mut runner = node_runner(&dir, &node);

        let result = runner
            .run(&dir.path().join("test.ts"), LintSource::Text(CONTENT), &trusted())
            .unwrap();

        assert_eq!(result.outcome, RunOutcome::ConfigError);
        assert_eq!(
            result.warnings,
            vec!["Cannot read tslint configuration - 'Invalid \"extends\" configuration value'".to_string()]
        );
    }
}

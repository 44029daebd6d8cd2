//! Plugin settings read from the project configuration.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonschema::Validator;
use lintweave_core::config::OneOrMany;
use lintweave_core::{PackageManager, RunConfiguration, TraceLevel, WorkspaceTrust};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ServiceError;

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/settings.json");
static SETTINGS_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Plugin entry names recognized in `compilerOptions.plugins`.
pub const PLUGIN_NAMES: &[&str] = &["lintweave", "typescript-tslint-plugin"];

/// Recognized plugin options. Replaced wholesale on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Lint configuration file override (absolute after loading).
    pub config_file: Option<PathBuf>,
    pub ignore_definition_files: bool,
    pub always_show_rule_failures_as_warnings: bool,
    pub suppress_while_type_errors_present: bool,
    pub js_enable: bool,
    pub exclude: OneOrMany,
    pub package_manager: PackageManager,
    pub allow_workspace_library_execution: WorkspaceTrust,
    /// Strips `no-unused-variable` from resolved configurations.
    pub disable_no_unused_variable_rule: bool,
    pub validate_with_default_config: Option<bool>,
    pub node_path: Option<PathBuf>,
    pub rules_directory: Option<OneOrMany>,
    pub trace_level: TraceLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_file: None,
            ignore_definition_files: true,
            always_show_rule_failures_as_warnings: false,
            suppress_while_type_errors_present: false,
            js_enable: false,
            exclude: OneOrMany::default(),
            package_manager: PackageManager::default(),
            allow_workspace_library_execution: WorkspaceTrust::default(),
            disable_no_unused_variable_rule: true,
            validate_with_default_config: None,
            node_path: None,
            rules_directory: None,
            trace_level: TraceLevel::default(),
        }
    }
}

fn validator() -> Result<&'static Validator, ServiceError> {
    SETTINGS_SCHEMA
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(SCHEMA_JSON)
                .map_err(|e| format!("Invalid embedded settings schema: {}", e))?;
            Validator::new(&schema).map_err(|e| format!("Invalid settings schema: {}", e))
        })
        .as_ref()
        .map_err(|e| ServiceError::settings(e.clone()))
}

impl Settings {
    /// Validates and parses a plugin settings block.
    ///
    /// A relative `configFile` is made absolute against `project_root`.
    pub fn from_value(value: &Value, project_root: &Path) -> Result<Self, ServiceError> {
        if let Err(e) = validator()?.validate(value) {
            return Err(ServiceError::settings(format!(
                "{} at {}",
                e,
                e.instance_path()
            )));
        }

        let mut settings: Settings = serde_json::from_value(value.clone())
            .map_err(|e| ServiceError::settings(e.to_string()))?;

        if let Some(config_file) = &settings.config_file
            && config_file.is_relative()
        {
            settings.config_file = Some(project_root.join(config_file));
        }

        Ok(settings)
    }

    /// Finds the plugin entry in a parsed project configuration.
    pub fn find_plugin_entry(project_config: &Value) -> Option<&Value> {
        project_config
            .get("compilerOptions")?
            .get("plugins")?
            .as_array()?
            .iter()
            .find(|entry| {
                entry
                    .get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|name| PLUGIN_NAMES.contains(&name))
            })
    }

    /// Runner options for one pass.
    pub fn run_configuration(
        &self,
        workspace_folder: Option<PathBuf>,
        host_install_root: Option<PathBuf>,
    ) -> RunConfiguration {
        RunConfiguration {
            js_enable: self.js_enable,
            rules_directory: self
                .rules_directory
                .clone()
                .map(OneOrMany::into_vec)
                .unwrap_or_default(),
            config_file: self.config_file.clone(),
            ignore_definition_files: self.ignore_definition_files,
            exclude: self.exclude.clone().into_vec(),
            validate_with_default_config: self.validate_with_default_config,
            node_path: self.node_path.clone(),
            package_manager: self.package_manager,
            trace_level: self.trace_level,
            workspace_folder,
            workspace_trust: self.allow_workspace_library_execution,
            host_install_root,
            strip_unstable_rules: self.disable_no_unused_variable_rule,
        }
    }
}

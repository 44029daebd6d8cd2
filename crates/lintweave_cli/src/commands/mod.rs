//! Subcommand implementations and shared setup.

pub mod config;
pub mod fix;
pub mod lint;

use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use lintweave_core::engine::NodeEngineLoader;
use lintweave_core::locator::NodeModuleResolver;
use lintweave_core::{LintRunner, RunConfiguration};
use lintweave_service::Settings;
use miette::{IntoDiagnostic, Result, miette};
use tracing::debug;

use crate::cli::Cli;

/// Reads plugin settings from `--settings`, or the defaults.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let Some(path) = &cli.settings else {
        return Ok(Settings::default());
    };

    let content = fs::read_to_string(path)
        .map_err(|e| miette!("Cannot read settings file {}: {}", path.display(), e))?;
    let value = jsonc_parser::parse_to_serde_value(&content, &ParseOptions::default())
        .map_err(|e| miette!("Invalid settings file {}: {}", path.display(), e))?
        .unwrap_or_default();

    let root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let block = match Settings::find_plugin_entry(&value) {
        Some(entry) => {
            debug!("Using plugin entry of {}", path.display());
            entry
        }
        None => &value,
    };
    Settings::from_value(block, &root).into_diagnostic()
}

/// Runner driving `node`, explicit or from `PATH`.
pub fn create_runner(cli: &Cli) -> LintRunner {
    match &cli.node {
        Some(node) => LintRunner::new(
            Box::new(NodeModuleResolver::with_node(node)),
            Box::new(NodeEngineLoader::with_node(node)),
        ),
        None => LintRunner::with_node(),
    }
}

/// Runner options for the command line.
pub fn run_configuration(cli: &Cli, settings: &Settings) -> RunConfiguration {
    settings.run_configuration(cli.workspace.clone(), None)
}

/// Absolute form of a command-line path.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).into_diagnostic()
}

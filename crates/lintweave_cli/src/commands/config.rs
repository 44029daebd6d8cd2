//! Config command implementation

use std::path::Path;

use lintweave_core::{ConfigResolver, FsConfigDiscovery};
use miette::{IntoDiagnostic, Result};
use serde_json::json;

use super::{absolute, load_settings};
use crate::cli::Cli;

/// Prints the lint configuration resolved for `file` as JSON.
pub fn run_config(cli: &Cli, file: &Path) -> Result<()> {
    let settings = load_settings(cli)?;
    let path = absolute(file)?;

    let mut resolver = ConfigResolver::new();
    resolver.set_strip_unstable_rules(settings.disable_no_unused_variable_rule);
    let resolved = resolver
        .resolve(&FsConfigDiscovery, &path, settings.config_file.as_deref())
        .into_diagnostic()?;

    let output = json!({
        "file": path.display().to_string(),
        "configFile": resolved.path,
        "isDefault": resolved.is_default,
        "configuration": resolved.configuration,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}

//! Workspace trust gate for executing a workspace-local engine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable consulted when the host gives no explicit trust state.
pub const WORKSPACE_TRUST_ENV: &str = "TS_TSLINT_ENABLE_WORKSPACE_LIBRARY_EXECUTION";

/// Whether a workspace-local engine (and custom rules directory) may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum WorkspaceTrust {
    Allow,
    Disallow,
    #[default]
    Unknown,
}

impl From<Option<bool>> for WorkspaceTrust {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => WorkspaceTrust::Allow,
            Some(false) => WorkspaceTrust::Disallow,
            None => WorkspaceTrust::Unknown,
        }
    }
}

impl From<WorkspaceTrust> for Option<bool> {
    fn from(value: WorkspaceTrust) -> Self {
        match value {
            WorkspaceTrust::Allow => Some(true),
            WorkspaceTrust::Disallow => Some(false),
            WorkspaceTrust::Unknown => None,
        }
    }
}

impl WorkspaceTrust {
    /// Parses `true`/`1` and `false`/`0`; anything else is unknown.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => WorkspaceTrust::Allow,
            "false" | "0" => WorkspaceTrust::Disallow,
            _ => WorkspaceTrust::Unknown,
        }
    }

    /// Reads [`WORKSPACE_TRUST_ENV`].
    pub fn from_env() -> Self {
        std::env::var(WORKSPACE_TRUST_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    /// Returns `self` unless it is unknown, in which case `other`.
    pub fn or(self, other: WorkspaceTrust) -> Self {
        match self {
            WorkspaceTrust::Unknown => other,
            known => known,
        }
    }
}

/// The `node_modules` directory an installed module lives in.
pub(crate) fn modules_root(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|p| p.file_name().is_some_and(|n| n == "node_modules"))
        .map(Path::to_path_buf)
}

/// Heuristic for "the user already trusts this location": the workspace engine
/// is installed in the same `node_modules` root as the running host.
///
/// This is a policy default, not a security guarantee.
pub fn is_implicitly_trusted(engine_path: &Path, host_install_root: Option<&Path>) -> bool {
    let Some(host) = host_install_root else {
        return false;
    };
    match (modules_root(engine_path), modules_root(host)) {
        (Some(engine_root), Some(host_root)) => engine_root == host_root,
        _ => false,
    }
}

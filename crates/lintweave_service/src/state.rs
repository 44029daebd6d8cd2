//! Plugin state shared between the decorated service and the watchers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use lintweave_core::{LintRunner, ProblemStore};
use parking_lot::Mutex;

use crate::settings::Settings;

/// Mutable plugin state.
pub(crate) struct PluginState {
    /// Current settings. Replaced wholesale on every change.
    pub settings: Settings,
    pub runner: LintRunner,
    /// Problems of the last lint pass, per file name.
    pub problems: HashMap<String, ProblemStore>,
}

impl fmt::Debug for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginState")
            .field("settings", &self.settings)
            .field("runner", &"<LintRunner>")
            .field("problems", &self.problems.len())
            .finish()
    }
}

impl PluginState {
    pub fn new(settings: Settings, runner: LintRunner) -> Self {
        Self {
            settings,
            runner,
            problems: HashMap::new(),
        }
    }
}

/// Type alias for shared state.
pub(crate) type SharedState = Arc<Mutex<PluginState>>;
